use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::error::SchemaError;
use crate::spec::{FieldDefinition, FormSchema, RuleKind};

/// Per-field data prepared once at load time. `patterns` is index-aligned
/// with the field's `validation` list.
#[derive(Debug, Clone)]
pub(crate) struct CompiledField {
    pub patterns: Vec<Option<Regex>>,
}

pub(crate) struct CompiledSchema {
    pub fields: Vec<CompiledField>,
    pub index: BTreeMap<String, usize>,
}

/// Checks the schema structure and compiles rule patterns.
pub(crate) fn compile(schema: &FormSchema) -> Result<CompiledSchema, SchemaError> {
    let mut index = BTreeMap::new();
    for (position, field) in schema.fields.iter().enumerate() {
        if field.id.trim().is_empty() {
            return Err(SchemaError::EmptyFieldId { index: position });
        }
        if index.insert(field.id.clone(), position).is_some() {
            return Err(SchemaError::DuplicateFieldId {
                field_id: field.id.clone(),
            });
        }
    }

    let mut fields = Vec::with_capacity(schema.fields.len());
    for (position, field) in schema.fields.iter().enumerate() {
        check_options(field)?;
        check_bounds(field)?;
        check_condition(field, position, &index)?;
        fields.push(CompiledField {
            patterns: compile_patterns(field)?,
        });
    }

    Ok(CompiledSchema { fields, index })
}

fn check_options(field: &FieldDefinition) -> Result<(), SchemaError> {
    if field.kind.requires_options() && field.options.is_empty() {
        return Err(SchemaError::MissingOptions {
            field_id: field.id.clone(),
            kind: field.kind,
        });
    }
    let mut seen = BTreeSet::new();
    for option in &field.options {
        if !seen.insert(option.value.as_str()) {
            return Err(SchemaError::DuplicateOptionValue {
                field_id: field.id.clone(),
                value: option.value.clone(),
            });
        }
    }
    Ok(())
}

fn check_bounds(field: &FieldDefinition) -> Result<(), SchemaError> {
    let mut mins = Vec::new();
    let mut maxes = Vec::new();
    let mut min_lengths = Vec::new();
    let mut max_lengths = Vec::new();

    for rule in &field.validation {
        match &rule.kind {
            RuleKind::Min { value } | RuleKind::Max { value } if !value.is_finite() => {
                return Err(SchemaError::NonFiniteBound {
                    field_id: field.id.clone(),
                    rule: rule.kind.rule_type(),
                });
            }
            RuleKind::Min { value } => mins.push(*value),
            RuleKind::Max { value } => maxes.push(*value),
            RuleKind::MinLength { value } => min_lengths.push(*value),
            RuleKind::MaxLength { value } => max_lengths.push(*value),
            _ => {}
        }
    }

    for min in &mins {
        for max in &maxes {
            if min > max {
                return Err(SchemaError::InvalidRange {
                    field_id: field.id.clone(),
                    min: *min,
                    max: *max,
                });
            }
        }
    }

    for min in &min_lengths {
        for max in &max_lengths {
            if min > max {
                return Err(SchemaError::InvalidLengthRange {
                    field_id: field.id.clone(),
                    min: *min,
                    max: *max,
                });
            }
        }
    }

    Ok(())
}

fn check_condition(
    field: &FieldDefinition,
    position: usize,
    index: &BTreeMap<String, usize>,
) -> Result<(), SchemaError> {
    let Some(condition) = &field.visible_if else {
        return Ok(());
    };

    for reference in condition.references() {
        if reference == field.id {
            return Err(SchemaError::SelfReferencingCondition {
                field_id: field.id.clone(),
            });
        }
        match index.get(reference) {
            None => {
                return Err(SchemaError::UnknownConditionReference {
                    field_id: field.id.clone(),
                    reference: reference.to_string(),
                });
            }
            Some(target) if *target > position => {
                return Err(SchemaError::ForwardConditionReference {
                    field_id: field.id.clone(),
                    reference: reference.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    Ok(())
}

fn compile_patterns(field: &FieldDefinition) -> Result<Vec<Option<Regex>>, SchemaError> {
    field
        .validation
        .iter()
        .map(|rule| match &rule.kind {
            RuleKind::Pattern { value } => Regex::new(value).map(Some).map_err(|source| {
                SchemaError::InvalidPattern {
                    field_id: field.id.clone(),
                    pattern: value.clone(),
                    source,
                }
            }),
            _ => Ok(None),
        })
        .collect()
}
