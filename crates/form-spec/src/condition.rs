use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::values::{FormValue, FormValues, scalar_text};

/// Serializable `visibleIf` expression over other fields' values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Condition {
    Equals { field: String, value: Value },
    NotEquals { field: String, value: Value },
    In { field: String, values: Vec<Value> },
    NotIn { field: String, values: Vec<Value> },
    /// List membership for checkbox groups, substring match for text.
    Contains { field: String, value: Value },
    IsSet { field: String },
    IsEmpty { field: String },
    GreaterThan { field: String, value: f64 },
    LessThan { field: String, value: f64 },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

impl Condition {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_set(field: impl Into<String>) -> Self {
        Condition::IsSet {
            field: field.into(),
        }
    }

    /// Evaluates against the values snapshot. Missing fields read as null.
    pub fn evaluate(&self, values: &FormValues) -> bool {
        match self {
            Condition::Equals { field, value } => lookup(values, field).matches_json(value),
            Condition::NotEquals { field, value } => !lookup(values, field).matches_json(value),
            Condition::In {
                field,
                values: expected,
            } => {
                let actual = lookup(values, field);
                expected.iter().any(|candidate| actual.matches_json(candidate))
            }
            Condition::NotIn {
                field,
                values: expected,
            } => {
                let actual = lookup(values, field);
                !expected.iter().any(|candidate| actual.matches_json(candidate))
            }
            Condition::Contains { field, value } => contains(lookup(values, field), value),
            Condition::IsSet { field } => !lookup(values, field).is_empty(),
            Condition::IsEmpty { field } => lookup(values, field).is_empty(),
            Condition::GreaterThan { field, value } => lookup(values, field)
                .as_number()
                .is_some_and(|actual| actual > *value),
            Condition::LessThan { field, value } => lookup(values, field)
                .as_number()
                .is_some_and(|actual| actual < *value),
            Condition::All { conditions } => {
                conditions.iter().all(|condition| condition.evaluate(values))
            }
            Condition::Any { conditions } => {
                conditions.iter().any(|condition| condition.evaluate(values))
            }
            Condition::Not { condition } => !condition.evaluate(values),
        }
    }

    /// Field ids read by this expression, in first-seen order without repeats.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::Equals { field, .. }
            | Condition::NotEquals { field, .. }
            | Condition::In { field, .. }
            | Condition::NotIn { field, .. }
            | Condition::Contains { field, .. }
            | Condition::IsSet { field }
            | Condition::IsEmpty { field }
            | Condition::GreaterThan { field, .. }
            | Condition::LessThan { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field.as_str());
                }
            }
            Condition::All { conditions } | Condition::Any { conditions } => {
                for condition in conditions {
                    condition.collect_references(out);
                }
            }
            Condition::Not { condition } => condition.collect_references(out),
        }
    }
}

static NULL_VALUE: FormValue = FormValue::Null;

fn lookup<'a>(values: &'a FormValues, field: &str) -> &'a FormValue {
    values.get(field).unwrap_or(&NULL_VALUE)
}

fn contains(actual: &FormValue, expected: &Value) -> bool {
    let Some(needle) = scalar_text(expected) else {
        return false;
    };
    match actual {
        FormValue::List(items) => items.iter().any(|item| *item == needle),
        FormValue::Text(text) => text.contains(&needle),
        _ => false,
    }
}
