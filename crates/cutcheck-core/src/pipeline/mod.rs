//! Submission check pipeline components.
//!
//! Stages, in the order a file passes through them:
//! - **dispatch**: Pick a container from the file extension
//! - **decode**: Decode PNG or layered documents into one RGBA bitmap
//! - **metadata**: Color-mode and layer-count rows (layered only)
//! - **validate**: Exact width/height checks against the active profile
//! - **pixels**: Mono / color / transparency scan
//! - **report**: Assemble rows into a `ValidationReport`
//! - **processor**: Orchestrates the full pipeline
//!
//! Supporting modules: `psd` (layered reader), `layers` (layer tree),
//! `cancel` (decode deadline), `state` (per-file state machine), `hash`,
//! `preview`, and `discovery`.

pub mod cancel;
pub mod decode;
pub mod discovery;
pub mod dispatch;
pub mod hash;
pub mod layers;
pub mod metadata;
pub mod pixels;
pub mod preview;
pub mod processor;
pub mod psd;
pub mod report;
pub mod state;
pub mod validate;

// Re-exports for convenient access
pub use cancel::{CancelToken, DecodeDeadline};
pub use decode::{ContainerDecoder, DecodedImage, LayeredDecoder, LayeredDocument, RasterDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use dispatch::FormatDispatcher;
pub use hash::Hasher;
pub use layers::{LayerNode, LayerTree};
pub use metadata::MetadataExtractor;
pub use pixels::PixelClassifier;
pub use preview::PreviewRenderer;
pub use processor::Checker;
pub use psd::{PsdDecoder, PsdLimits};
pub use report::{format_bytes, ReportBuilder};
pub use state::{PipelineRun, PipelineState};
pub use validate::DimensionValidator;
