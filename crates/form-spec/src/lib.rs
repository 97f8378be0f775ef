#![allow(missing_docs)]

pub mod answers_schema;
mod compile;
pub mod condition;
pub mod engine;
pub mod error;
pub mod progress;
pub mod report;
pub mod spec;
pub mod submission;
pub mod validate;
pub mod values;
pub mod visibility;

pub use answers_schema::generate as answers_schema;
pub use condition::Condition;
pub use engine::{EngineOptions, ValidationEngine};
pub use error::SchemaError;
pub use progress::{completion_percentage, next_field};
pub use report::{FieldError, FieldWarning, ValidationResult, WarningCode};
pub use spec::{
    FieldDefinition, FieldOption, FieldType, FormSchema, FormSettings, RuleKind, RuleType,
    ValidationRule,
};
pub use submission::{FormSubmission, SubmissionError, SubmissionStatus};
pub use values::{FileHandle, FormValue, FormValues, values_from_json};
pub use visibility::{VisibilityMap, resolve_visibility, visible_fields};
