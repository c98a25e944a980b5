//! Cutcheck Core - print-submission image checks.
//!
//! Cutcheck validates images submitted for print against an exact pixel-size
//! profile before they are allowed to upload. It accepts two containers, PNG
//! and layered PSD documents, and reports every finding as a row in a
//! [`ValidationReport`] instead of failing.
//!
//! # Architecture
//!
//! ```text
//! File → Dispatch → Decode → [Color mode / Layers] → Width / Height → Pixel scan → Report
//! ```
//!
//! Only `error` rows block submission. The single out-of-band failure is a
//! layered document that does not finish decoding before its deadline.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cutcheck_core::{Checker, Config, Session};
//!
//! #[tokio::main]
//! async fn main() -> cutcheck_core::Result<()> {
//!     let config = Config::load()?;
//!     let mut session = Session::new(Checker::new(&config)?);
//!
//!     let bytes = std::fs::read("./cover.psd")?;
//!     let report = session.submit_file("cover.psd", bytes).await?;
//!     for row in &report.fields {
//!         println!("{}: {} ({:?})", row.label(), row.value, row.status);
//!     }
//!     println!("submit enabled: {}", session.can_submit());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, CutcheckError, PipelineError, PipelineResult, PsdError, Result};
pub use output::{OutputFormat, ReportWriter};
pub use pipeline::{Checker, PipelineState};
pub use session::Session;
pub use types::{
    ColorMode, ContainerKind, Field, FieldOutcome, FieldStatus, PixelTally, SubmissionSpec,
    ValidationReport,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
