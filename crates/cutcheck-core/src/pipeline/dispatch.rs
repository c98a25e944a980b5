//! Extension-based container selection.

use crate::error::PipelineError;
use crate::types::{ContainerKind, Field, FieldOutcome, FieldStatus};

/// Chooses a decoder variant from the submitted file name.
pub struct FormatDispatcher;

impl FormatDispatcher {
    /// Lowercase text after the last `.` in `file_name`, or empty if none.
    pub fn extension(file_name: &str) -> String {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }

    pub fn dispatch(file_name: &str) -> Result<ContainerKind, PipelineError> {
        let extension = Self::extension(file_name);
        ContainerKind::from_extension(&extension).ok_or_else(|| PipelineError::UnsupportedFormat {
            file: file_name.to_string(),
            extension,
        })
    }

    /// The format row for a dispatch result.
    pub fn outcome(file_name: &str) -> (Option<ContainerKind>, FieldOutcome) {
        match Self::dispatch(file_name) {
            Ok(kind) => (
                Some(kind),
                FieldOutcome::new(Field::Format, Self::extension(file_name), FieldStatus::Ok),
            ),
            Err(e) => {
                tracing::debug!(error = %e, "format rejected");
                let value = match e {
                    PipelineError::UnsupportedFormat { extension, .. } if !extension.is_empty() => {
                        extension
                    }
                    _ => "(none)".to_string(),
                };
                (
                    None,
                    FieldOutcome::new(Field::Format, value, FieldStatus::Error)
                        .with_note("unsupported format"),
                )
            }
        }
    }
}
