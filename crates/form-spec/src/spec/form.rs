use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::spec::field::FieldDefinition;

fn default_submit_text() -> String {
    "Submit".to_string()
}

/// Form-level presentation and submission settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_submit_text")]
    pub submit_button_text: String,
    #[serde(default)]
    pub allow_drafts: bool,
    #[serde(default)]
    pub require_auth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            submit_button_text: default_submit_text(),
            allow_drafts: false,
            require_auth: false,
            theme: None,
        }
    }
}

/// Top-level form definition. Field order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSchema {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub settings: FormSettings,
}

impl FormSchema {
    pub fn new(id: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            version: "1".into(),
            fields,
            settings: FormSettings::default(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_value(value: Value) -> Result<Self, SchemaError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.id == id)
    }
}
