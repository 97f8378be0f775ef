use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::compile::{CompiledField, compile};
use crate::error::SchemaError;
use crate::report::{FieldError, FieldWarning, ValidationResult, WarningCode};
use crate::spec::{FieldDefinition, FormSchema};
use crate::validate::{validate_value, value_warnings};
use crate::values::{FormValue, FormValues};
use crate::visibility::{VisibilityMap, resolve_visibility, visible_fields};
use crate::{answers_schema, progress};

/// Tunables for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Fraction of `maxLength` at which a near-limit warning is emitted.
    /// Values outside `(0, 1]` disable the warning.
    pub near_limit_ratio: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            near_limit_ratio: 0.9,
        }
    }
}

/// A loaded form schema ready to evaluate values.
///
/// Construction runs every structural check; afterwards no operation can fail.
/// The engine holds no per-call state, so results depend only on the values
/// snapshot passed in.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    schema: FormSchema,
    compiled: Vec<CompiledField>,
    index: BTreeMap<String, usize>,
    options: EngineOptions,
}

impl ValidationEngine {
    pub fn new(schema: FormSchema) -> Result<Self, SchemaError> {
        Self::with_options(schema, EngineOptions::default())
    }

    pub fn with_options(schema: FormSchema, options: EngineOptions) -> Result<Self, SchemaError> {
        let compiled = compile(&schema)?;
        debug!(
            form_id = %schema.id,
            version = %schema.version,
            fields = schema.fields.len(),
            "compiled form schema"
        );
        Ok(Self {
            schema,
            compiled: compiled.fields,
            index: compiled.index,
            options,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        Self::new(FormSchema::from_json(raw)?)
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.index
            .get(field_id)
            .map(|position| &self.schema.fields[*position])
    }

    pub fn visibility(&self, values: &FormValues) -> VisibilityMap {
        resolve_visibility(&self.schema, values)
    }

    /// Fields to render for the current values, in display order.
    pub fn visible_fields(&self, values: &FormValues) -> Vec<&FieldDefinition> {
        visible_fields(&self.schema, &self.visibility(values))
    }

    /// Errors for one field, ignoring visibility. Unknown ids yield no errors.
    pub fn validate_field(&self, field_id: &str, value: Option<&FormValue>) -> Vec<FieldError> {
        match self.index.get(field_id) {
            Some(position) => validate_value(
                &self.schema.fields[*position],
                &self.compiled[*position].patterns,
                value,
            ),
            None => {
                trace!(field_id, "validate_field called for unknown field");
                Vec::new()
            }
        }
    }

    /// Validates every visible field. Hidden fields never contribute errors.
    pub fn validate_form(&self, values: &FormValues) -> ValidationResult {
        let visibility = self.visibility(values);
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (field, compiled) in self.schema.fields.iter().zip(&self.compiled) {
            if !visibility.get(&field.id).copied().unwrap_or(true) {
                continue;
            }
            let value = values.get(&field.id);
            errors.extend(validate_value(field, &compiled.patterns, value));
            warnings.extend(value_warnings(field, value, self.options.near_limit_ratio));
        }

        for (field_id, value) in values {
            match visibility.get(field_id) {
                None => warnings.push(FieldWarning {
                    field_id: field_id.clone(),
                    code: WarningCode::UnknownField,
                    message: format!("'{field_id}' is not a field of this form"),
                }),
                Some(false) if !value.is_empty() => warnings.push(FieldWarning {
                    field_id: field_id.clone(),
                    code: WarningCode::HiddenValue,
                    message: format!("'{field_id}' is hidden; its value is ignored"),
                }),
                Some(_) => {}
            }
        }

        debug!(
            form_id = %self.schema.id,
            errors = errors.len(),
            warnings = warnings.len(),
            "validated form values"
        );

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Share of visible required fields holding a value, 0 to 100.
    pub fn completion_percentage(&self, values: &FormValues) -> u8 {
        progress::completion_percentage(&self.schema, &self.visibility(values), values)
    }

    pub fn is_form_complete(&self, values: &FormValues) -> bool {
        self.validate_form(values).is_valid
    }

    /// Next visible field still waiting for input.
    pub fn next_field(&self, values: &FormValues) -> Option<&FieldDefinition> {
        progress::next_field(&self.schema, &self.visibility(values), values)
    }

    /// JSON Schema describing the values object for the currently visible fields.
    pub fn answers_schema(&self, values: &FormValues) -> Value {
        answers_schema::generate(&self.schema, &self.visibility(values))
    }
}
