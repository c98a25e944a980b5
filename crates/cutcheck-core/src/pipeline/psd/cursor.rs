//! Big-endian byte cursor over a borrowed buffer.

use crate::error::PsdError;

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    section: &'static str,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8], section: &'static str) -> Self {
        Self {
            data,
            pos: 0,
            section,
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn eof(&self) -> PsdError {
        PsdError::UnexpectedEof {
            section: self.section,
        }
    }

    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], PsdError> {
        if len > self.remaining() {
            return Err(self.eof());
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Consume the cursor, returning everything not yet read.
    pub fn rest(self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn skip(&mut self, len: usize) -> Result<(), PsdError> {
        self.bytes(len).map(|_| ())
    }

    /// Split off the next `len` bytes as their own cursor.
    pub fn sub(&mut self, len: usize, section: &'static str) -> Result<Cursor<'a>, PsdError> {
        let data = self.bytes(len)?;
        Ok(Cursor::new(data, section))
    }

    /// Split off a section prefixed by its u32 length.
    pub fn section(&mut self, section: &'static str) -> Result<Cursor<'a>, PsdError> {
        let len = self.u32()? as usize;
        self.sub(len, section)
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], PsdError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, PsdError> {
        Ok(self.array::<1>()?[0])
    }

    pub fn u16(&mut self) -> Result<u16, PsdError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    pub fn i16(&mut self) -> Result<i16, PsdError> {
        Ok(i16::from_be_bytes(self.array()?))
    }

    pub fn u32(&mut self) -> Result<u32, PsdError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    pub fn i32(&mut self) -> Result<i32, PsdError> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    /// Pascal string padded so that the length byte plus text is a multiple of `align`.
    pub fn pascal_string(&mut self, align: usize) -> Result<String, PsdError> {
        let len = self.u8()? as usize;
        let text = String::from_utf8_lossy(self.bytes(len)?).into_owned();
        let used = 1 + len;
        let padded = used.div_ceil(align) * align;
        self.skip(padded - used)?;
        Ok(text)
    }
}
