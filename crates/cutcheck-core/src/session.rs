//! Submission gate for one upload context.
//!
//! A [`Session`] owns the single active report. Each new file replaces it
//! wholesale, and the submit action is only enabled while the active report
//! finished cleanly without blocking errors.

use std::sync::Arc;

use crate::error::PipelineResult;
use crate::pipeline::Checker;
use crate::types::{SubmissionSpec, ValidationReport};

pub struct Session {
    checker: Checker,
    active_report: Option<ValidationReport>,
    submit_enabled: bool,
}

impl Session {
    pub fn new(checker: Checker) -> Self {
        Self {
            checker,
            active_report: None,
            submit_enabled: false,
        }
    }

    /// The profile every file in this session is checked against.
    pub fn spec(&self) -> &SubmissionSpec {
        self.checker.spec()
    }

    pub fn active_report(&self) -> Option<&ValidationReport> {
        self.active_report.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.submit_enabled
    }

    /// Check a newly selected file.
    ///
    /// Submission is disabled and the previous report discarded before the
    /// check starts. On error (a layered-decode timeout) the session is left
    /// with no report and submission stays disabled.
    pub async fn submit_file(
        &mut self,
        file_name: &str,
        bytes: impl Into<Arc<[u8]>>,
    ) -> PipelineResult<&ValidationReport> {
        self.submit_enabled = false;
        self.active_report = None;

        let report = self.checker.check(file_name, bytes).await?;
        self.submit_enabled = report.can_submit();
        tracing::debug!(file = file_name, submit_enabled = self.submit_enabled, "report ready");
        Ok(self.active_report.insert(report))
    }
}
