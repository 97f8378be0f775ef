use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::spec::rule::{RuleKind, ValidationRule};

/// Supported input types. Unknown types fail schema parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Url,
    Password,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    Time,
    File,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Password => "password",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::File => "file",
        }
    }

    /// Choice fields must declare at least one option.
    pub fn requires_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }

    /// Types whose value is a single free-form string.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldType::Text
                | FieldType::Email
                | FieldType::Url
                | FieldType::Password
                | FieldType::Textarea
                | FieldType::Date
                | FieldType::Time
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable choice for select, radio and checkbox fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Definition of a single input inside a form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<Condition>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, kind: FieldType) -> Self {
        Self {
            id: id.into(),
            kind,
            label: String::new(),
            placeholder: None,
            description: None,
            help_text: None,
            required: false,
            validation: Vec::new(),
            options: Vec::new(),
            visible_if: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_rule(mut self, rule: impl Into<ValidationRule>) -> Self {
        self.validation.push(rule.into());
        self
    }

    pub fn with_options<I, L, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|(label, value)| FieldOption::new(label, value))
            .collect();
        self
    }

    pub fn visible_if(mut self, condition: Condition) -> Self {
        self.visible_if = Some(condition);
        self
    }

    /// True when either the `required` flag or a `required` rule is present.
    pub fn is_required(&self) -> bool {
        self.required
            || self
                .validation
                .iter()
                .any(|rule| matches!(rule.kind, RuleKind::Required))
    }

    /// Name used in default messages: the label, or the id when unlabeled.
    pub fn display_name(&self) -> &str {
        let label = self.label.trim();
        if label.is_empty() { &self.id } else { label }
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }

    pub(crate) fn has_rule(&self, predicate: impl Fn(&RuleKind) -> bool) -> bool {
        self.validation.iter().any(|rule| predicate(&rule.kind))
    }
}
