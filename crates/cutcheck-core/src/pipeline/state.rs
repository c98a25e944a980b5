//! Per-file pipeline state machine.
//!
//! Every checked file walks forward through these states and stops at exactly
//! one terminal state. No transition re-enters an earlier state.

use serde::{Deserialize, Serialize};

/// Where a single file's check currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Dispatching,
    Decoding,
    /// Layered documents only
    MetadataExtracted,
    DimensionChecked,
    PixelClassified,
    ReportReady,
    RejectedFormat,
    DecodeTimedOut,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::ReportReady | Self::RejectedFormat | Self::DecodeTimedOut
        )
    }
}

/// States reachable in one step from `from`.
///
/// `Decoding -> ReportReady` covers a raster that failed to decode: the
/// failure is reported as a field, so the run still ends with a report.
pub fn allowed_transitions(from: PipelineState) -> &'static [PipelineState] {
    use PipelineState::*;
    match from {
        Idle => &[Dispatching],
        Dispatching => &[Decoding, RejectedFormat],
        Decoding => &[MetadataExtracted, DimensionChecked, ReportReady, DecodeTimedOut],
        MetadataExtracted => &[DimensionChecked],
        DimensionChecked => &[PixelClassified],
        PixelClassified => &[ReportReady],
        ReportReady | RejectedFormat | DecodeTimedOut => &[],
    }
}

/// Tracks one file's progress through the pipeline.
#[derive(Debug)]
pub struct PipelineRun {
    file: String,
    history: Vec<PipelineState>,
}

impl PipelineRun {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        // history always starts with Idle
        self.history[self.history.len() - 1]
    }

    /// Every state visited so far, in order.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Move to `next`. Illegal transitions are programming errors.
    pub fn advance(&mut self, next: PipelineState) {
        let from = self.state();
        debug_assert!(
            allowed_transitions(from).contains(&next),
            "illegal pipeline transition {from:?} -> {next:?}"
        );
        tracing::trace!(file = %self.file, ?from, to = ?next, "pipeline transition");
        self.history.push(next);
    }
}
