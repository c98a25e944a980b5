//! Content fingerprinting for submitted files.

use blake3::Hasher as Blake3Hasher;

/// BLAKE3 fingerprints of raw submission bytes.
pub struct Hasher;

impl Hasher {
    /// Generate a BLAKE3 hash from an in-memory byte buffer.
    ///
    /// The whole file is already in memory for decoding, so it is hashed
    /// from the same buffer.
    pub fn content_hash_from_bytes(data: &[u8]) -> String {
        let mut hasher = Blake3Hasher::new();
        hasher.update(data);
        hasher.finalize().to_hex().to_string()
    }
}
