use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::engine::ValidationEngine;
use crate::report::ValidationResult;
use crate::values::FormValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("form '{form_id}' does not allow drafts")]
    DraftsDisabled { form_id: String },
    #[error("form '{form_id}' has {} validation error(s)", .result.errors.len())]
    Invalid {
        form_id: String,
        result: ValidationResult,
    },
}

/// Snapshot of values handed to the persistence layer.
///
/// Only values of visible fields known to the schema are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub form_id: String,
    pub schema_version: String,
    pub status: SubmissionStatus,
    pub values: FormValues,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub submitted_at: Option<OffsetDateTime>,
}

impl FormSubmission {
    /// Builds a submitted snapshot; refuses when any visible field has errors.
    pub fn submit(engine: &ValidationEngine, values: &FormValues) -> Result<Self, SubmissionError> {
        let result = engine.validate_form(values);
        if !result.is_valid {
            return Err(SubmissionError::Invalid {
                form_id: engine.schema().id.clone(),
                result,
            });
        }
        let mut submission = Self::snapshot(engine, values, SubmissionStatus::Submitted);
        submission.submitted_at = Some(OffsetDateTime::now_utc());
        debug!(form_id = %submission.form_id, "form submitted");
        Ok(submission)
    }

    /// Builds a draft snapshot without validating; needs `allowDrafts`.
    pub fn draft(engine: &ValidationEngine, values: &FormValues) -> Result<Self, SubmissionError> {
        let schema = engine.schema();
        if !schema.settings.allow_drafts {
            return Err(SubmissionError::DraftsDisabled {
                form_id: schema.id.clone(),
            });
        }
        Ok(Self::snapshot(engine, values, SubmissionStatus::Draft))
    }

    fn snapshot(
        engine: &ValidationEngine,
        values: &FormValues,
        status: SubmissionStatus,
    ) -> Self {
        let visibility = engine.visibility(values);
        let kept = values
            .iter()
            .filter(|(field_id, value)| {
                visibility.get(*field_id).copied().unwrap_or(false) && !value.is_empty()
            })
            .map(|(field_id, value)| (field_id.clone(), value.clone()))
            .collect();

        let schema = engine.schema();
        Self {
            form_id: schema.id.clone(),
            schema_version: schema.version.clone(),
            status,
            values: kept,
            submitted_at: None,
        }
    }
}
