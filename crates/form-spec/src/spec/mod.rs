pub mod field;
pub mod form;
pub mod rule;

pub use field::{FieldDefinition, FieldOption, FieldType};
pub use form::{FormSchema, FormSettings};
pub use rule::{RuleKind, RuleType, ValidationRule};
