use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Declarative constraint attached to a field, evaluated in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength { value: usize },
    MaxLength { value: usize },
    Min { value: f64 },
    Max { value: f64 },
    Email,
    Phone,
    Pattern { value: String },
}

impl RuleKind {
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleKind::Required => RuleType::Required,
            RuleKind::MinLength { .. } => RuleType::MinLength,
            RuleKind::MaxLength { .. } => RuleType::MaxLength,
            RuleKind::Min { .. } => RuleType::Min,
            RuleKind::Max { .. } => RuleType::Max,
            RuleKind::Email => RuleType::Email,
            RuleKind::Phone => RuleType::Phone,
            RuleKind::Pattern { .. } => RuleType::Pattern,
        }
    }
}

/// A rule plus the message shown when it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationRule {
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<RuleKind> for ValidationRule {
    fn from(kind: RuleKind) -> Self {
        Self::new(kind)
    }
}

/// Tag carried by every reported error.
///
/// Besides the declarable rules this includes `type` (the value has the wrong
/// shape for the field) and `choice` (the value is not one of the options).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RuleType {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Email,
    Phone,
    Pattern,
    Type,
    Choice,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Required => "required",
            RuleType::MinLength => "minLength",
            RuleType::MaxLength => "maxLength",
            RuleType::Min => "min",
            RuleType::Max => "max",
            RuleType::Email => "email",
            RuleType::Phone => "phone",
            RuleType::Pattern => "pattern",
            RuleType::Type => "type",
            RuleType::Choice => "choice",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rule_descriptors() {
        let rules: Vec<ValidationRule> = serde_json::from_value(json!([
            { "type": "required", "message": "Please enter a name" },
            { "type": "minLength", "value": 2 },
            { "type": "pattern", "value": "^[A-Z]", "message": "Capitalize" },
            { "type": "phone" }
        ]))
        .expect("rules should parse");

        assert_eq!(rules[0].kind, RuleKind::Required);
        assert_eq!(rules[0].message.as_deref(), Some("Please enter a name"));
        assert_eq!(rules[1].kind, RuleKind::MinLength { value: 2 });
        assert_eq!(
            rules[2].kind,
            RuleKind::Pattern {
                value: "^[A-Z]".into()
            }
        );
        assert_eq!(rules[3].kind.rule_type(), RuleType::Phone);
    }

    #[test]
    fn rule_serializes_flat() {
        let rule = ValidationRule::new(RuleKind::Max { value: 4.0 }).with_message("max four");
        let value = serde_json::to_value(&rule).expect("serialize");
        assert_eq!(value["type"], "max");
        assert_eq!(value["value"], 4.0);
        assert_eq!(value["message"], "max four");
    }

    #[test]
    fn unknown_rule_type_is_rejected() {
        let result = serde_json::from_value::<ValidationRule>(json!({ "type": "luhn" }));
        assert!(result.is_err());
    }
}
