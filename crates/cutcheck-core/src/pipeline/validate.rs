//! Exact-size validation against the active submission profile.

use crate::types::{Field, FieldOutcome, FieldStatus, SubmissionSpec};

/// Compares decoded dimensions with a [`SubmissionSpec`].
pub struct DimensionValidator {
    spec: SubmissionSpec,
}

impl DimensionValidator {
    /// Create a new validator for the given profile.
    pub fn new(spec: SubmissionSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &SubmissionSpec {
        &self.spec
    }

    /// Width and height rows, checked independently.
    ///
    /// Exact equality only: no tolerance and no aspect-ratio matching.
    pub fn validate(&self, width: u32, height: u32) -> [FieldOutcome; 2] {
        [
            Self::axis(Field::Width, width, self.spec.width),
            Self::axis(Field::Height, height, self.spec.height),
        ]
    }

    fn axis(field: Field, actual: u32, expected: u32) -> FieldOutcome {
        let value = format!("{actual}px");
        if actual == expected {
            FieldOutcome::new(field, value, FieldStatus::Ok)
        } else {
            FieldOutcome::new(field, value, FieldStatus::Error)
                .with_note(format!("expected {expected}px"))
        }
    }
}
