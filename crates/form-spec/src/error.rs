use thiserror::Error;

use crate::spec::{FieldType, RuleType};

/// Structural problems in a form schema, raised once when the schema is loaded.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse form schema: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("field at position {index} has an empty id")]
    EmptyFieldId { index: usize },
    #[error("duplicate field id '{field_id}'")]
    DuplicateFieldId { field_id: String },
    #[error("field '{field_id}' of type {kind} needs at least one option")]
    MissingOptions { field_id: String, kind: FieldType },
    #[error("field '{field_id}' lists option value '{value}' more than once")]
    DuplicateOptionValue { field_id: String, value: String },
    #[error("field '{field_id}' has a non-finite {rule} bound")]
    NonFiniteBound { field_id: String, rule: RuleType },
    #[error("field '{field_id}' declares min {min} greater than max {max}")]
    InvalidRange { field_id: String, min: f64, max: f64 },
    #[error("field '{field_id}' declares minLength {min} greater than maxLength {max}")]
    InvalidLengthRange {
        field_id: String,
        min: usize,
        max: usize,
    },
    #[error("field '{field_id}' has an invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        field_id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("visibleIf of field '{field_id}' references unknown field '{reference}'")]
    UnknownConditionReference { field_id: String, reference: String },
    #[error("visibleIf of field '{field_id}' references the field itself")]
    SelfReferencingCondition { field_id: String },
    #[error(
        "visibleIf of field '{field_id}' references '{reference}', which is declared after it"
    )]
    ForwardConditionReference { field_id: String, reference: String },
}
