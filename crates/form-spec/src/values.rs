use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Current form values keyed by field id.
pub type FormValues = BTreeMap<String, FormValue>;

/// Reference to an uploaded file. The engine never reads file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Value held by a single field.
///
/// Decoding from JSON never fails: arrays of scalars become lists of strings,
/// objects with a `name` become file handles, and anything else (other
/// objects, arrays holding nulls, objects or arrays) is kept verbatim as
/// `Other` so validation can report it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    File(FileHandle),
    Other(Value),
}

impl FormValue {
    pub fn text(value: impl Into<String>) -> Self {
        FormValue::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FormValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Null, blank strings and empty lists count as "no value". Booleans,
    /// including `false`, are values; no field type accepts them, so they
    /// surface as `type` errors rather than `required`.
    pub fn is_empty(&self) -> bool {
        match self {
            FormValue::Null => true,
            FormValue::Bool(_)
            | FormValue::Number(_)
            | FormValue::File(_)
            | FormValue::Other(_) => false,
            FormValue::Text(text) => text.trim().is_empty(),
            FormValue::List(items) => items.is_empty(),
        }
    }

    /// Numeric view of the value; text is coerced, NaN and infinities are rejected.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            FormValue::Number(number) => *number,
            FormValue::Text(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        number.is_finite().then_some(number)
    }

    /// Scalar values rendered as text; `None` for lists, files and null.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FormValue::Text(text) => Some(Cow::Borrowed(text.as_str())),
            FormValue::Number(number) => Some(Cow::Owned(format_number(*number))),
            FormValue::Bool(value) => Some(Cow::Borrowed(if *value { "true" } else { "false" })),
            FormValue::Null | FormValue::List(_) | FormValue::File(_) | FormValue::Other(_) => {
                None
            }
        }
    }

    /// Length used by length rules: characters for text, items for lists.
    pub fn length(&self) -> Option<usize> {
        match self {
            FormValue::Text(text) => Some(text.chars().count()),
            FormValue::List(items) => Some(items.len()),
            FormValue::Number(number) => Some(format_number(*number).chars().count()),
            _ => None,
        }
    }

    /// Loose equality against a JSON literal as written in a condition.
    pub fn matches_json(&self, expected: &Value) -> bool {
        match (self, expected) {
            (actual, Value::Null) => actual.is_empty(),
            (FormValue::Text(text), Value::String(expected)) => text == expected,
            (FormValue::Bool(value), Value::Bool(expected)) => value == expected,
            (FormValue::Bool(value), Value::String(expected)) => {
                parse_bool(expected) == Some(*value)
            }
            (FormValue::Text(text), Value::Bool(expected)) => parse_bool(text) == Some(*expected),
            (actual, Value::Number(expected)) => match (actual.as_number(), expected.as_f64()) {
                (Some(actual), Some(expected)) => actual == expected,
                _ => false,
            },
            (FormValue::Number(number), Value::String(expected)) => expected
                .trim()
                .parse::<f64>()
                .is_ok_and(|expected| expected == *number),
            (FormValue::Other(raw), expected) => raw == expected,
            (FormValue::List(items), Value::Array(expected)) => {
                items.len() == expected.len()
                    && items
                        .iter()
                        .zip(expected)
                        .all(|(item, expected)| scalar_text(expected).as_deref() == Some(item))
            }
            _ => false,
        }
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FormValue::Null,
            Value::Bool(value) => FormValue::Bool(value),
            Value::Number(number) => number
                .as_f64()
                .map(FormValue::Number)
                .unwrap_or(FormValue::Null),
            Value::String(text) => FormValue::Text(text),
            Value::Array(items) => {
                let list: Option<Vec<String>> = items.iter().map(scalar_text).collect();
                match list {
                    Some(list) => FormValue::List(list),
                    None => FormValue::Other(Value::Array(items)),
                }
            }
            Value::Object(map) => {
                let raw = Value::Object(map);
                match serde_json::from_value::<FileHandle>(raw.clone()) {
                    Ok(handle) => FormValue::File(handle),
                    Err(_) => FormValue::Other(raw),
                }
            }
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Number(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Bool(value)
    }
}

impl<'de> Deserialize<'de> for FormValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(FormValue::from)
    }
}

/// Converts a JSON object of field values. Anything but an object yields no values.
pub fn values_from_json(value: Value) -> FormValues {
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| (key, FormValue::from(value)))
            .collect(),
        _ => FormValues::new(),
    }
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}

pub(crate) fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_values() {
        assert!(FormValue::Null.is_empty());
        assert!(FormValue::text("").is_empty());
        assert!(FormValue::text("   ").is_empty());
        assert!(FormValue::List(vec![]).is_empty());
        assert!(!FormValue::Bool(false).is_empty());
        assert!(!FormValue::Other(json!({})).is_empty());
        assert!(!FormValue::Number(0.0).is_empty());
        assert!(!FormValue::text("x").is_empty());
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(FormValue::text(" 42 ").as_number(), Some(42.0));
        assert_eq!(FormValue::text("four").as_number(), None);
        assert_eq!(FormValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FormValue::Bool(true).as_number(), None);
    }

    #[test]
    fn length_counts_characters() {
        assert_eq!(FormValue::text("héllo").length(), Some(5));
        assert_eq!(FormValue::text("⛳⛳").length(), Some(2));
        assert_eq!(FormValue::list(["a", "b", "c"]).length(), Some(3));
    }

    #[test]
    fn decodes_json_documents() {
        let values = values_from_json(json!({
            "name": "Ada",
            "players": 4,
            "newsletter": true,
            "extras": ["cart", 2],
            "scorecard": { "name": "card.pdf", "size": 1024, "mimeType": "application/pdf" },
            "notes": null
        }));
        assert_eq!(values["name"], FormValue::text("Ada"));
        assert_eq!(values["players"], FormValue::Number(4.0));
        assert_eq!(values["newsletter"], FormValue::Bool(true));
        assert_eq!(values["extras"], FormValue::list(["cart", "2"]));
        assert!(matches!(
            values["scorecard"],
            FormValue::File(ref handle) if handle.size == Some(1024)
        ));
        assert_eq!(values["notes"], FormValue::Null);
    }

    #[test]
    fn malformed_shapes_are_kept_verbatim() {
        let values = values_from_json(json!({
            "name": { "first": "Ada" },
            "extras": ["cart", { "x": 1 }, [2]],
            "blank": [null]
        }));
        assert_eq!(values["name"], FormValue::Other(json!({ "first": "Ada" })));
        assert_eq!(
            values["extras"],
            FormValue::Other(json!(["cart", { "x": 1 }, [2]]))
        );
        assert_eq!(values["blank"], FormValue::Other(json!([null])));
        assert_eq!(values["name"].as_text(), None);
        assert_eq!(values["name"].length(), None);
        assert!(values["name"].matches_json(&json!({ "first": "Ada" })));

        let encoded = serde_json::to_value(&values["extras"]).expect("serialize");
        assert_eq!(encoded, json!(["cart", { "x": 1 }, [2]]));
    }

    #[test]
    fn non_object_document_yields_no_values() {
        assert!(values_from_json(json!(["a"])).is_empty());
    }

    #[test]
    fn loose_matching() {
        assert!(FormValue::text("5").matches_json(&json!(5)));
        assert!(FormValue::Number(5.0).matches_json(&json!("5")));
        assert!(FormValue::Bool(true).matches_json(&json!("yes")));
        assert!(FormValue::text("true").matches_json(&json!(true)));
        assert!(FormValue::text("").matches_json(&Value::Null));
        assert!(FormValue::list(["a", "b"]).matches_json(&json!(["a", "b"])));
        assert!(!FormValue::text("business").matches_json(&json!("personal")));
    }
}
