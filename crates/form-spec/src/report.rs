use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::RuleType;

/// A failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_id: String,
    pub rule: RuleType,
    pub message: String,
}

/// Reasons a value is flagged without failing validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum WarningCode {
    /// Length is close to the field's `maxLength`.
    NearMaxLength,
    /// A value was supplied for a field that is currently hidden.
    HiddenValue,
    /// A value was supplied for an id the schema does not define.
    UnknownField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldWarning {
    pub field_id: String,
    pub code: WarningCode,
    pub message: String,
}

/// Result returned from `ValidationEngine::validate_form`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<FieldError>,
    #[serde(default)]
    pub warnings: Vec<FieldWarning>,
}

impl ValidationResult {
    pub fn errors_for<'a>(&'a self, field_id: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.errors
            .iter()
            .filter(move |error| error.field_id == field_id)
    }
}
