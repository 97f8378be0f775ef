use serde_json::{Map, Value};

use crate::spec::{FieldDefinition, FieldType, FormSchema, RuleKind};
use crate::visibility::VisibilityMap;

/// Generates a JSON Schema for the values object restricted to the visible fields.
pub fn generate(schema: &FormSchema, visibility: &VisibilityMap) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &schema.fields {
        if !visibility.get(&field.id).copied().unwrap_or(true) {
            continue;
        }
        properties.insert(field.id.clone(), field_schema(field));
        if field.is_required() {
            required.push(Value::String(field.id.clone()));
        }
    }

    let mut root = Map::new();
    root.insert("type".into(), Value::String("object".into()));
    if let Some(title) = &schema.settings.title {
        root.insert("title".into(), Value::String(title.clone()));
    }
    root.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        root.insert("required".into(), Value::Array(required));
    }

    Value::Object(root)
}

fn field_schema(field: &FieldDefinition) -> Value {
    let mut schema = Map::new();
    let is_list = matches!(field.kind, FieldType::Checkbox);

    match field.kind {
        FieldType::Number => {
            schema.insert("type".into(), Value::String("number".into()));
        }
        FieldType::Select | FieldType::Radio => {
            schema.insert("type".into(), Value::String("string".into()));
            schema.insert("enum".into(), option_values(field));
        }
        FieldType::Checkbox => {
            let mut items = Map::new();
            items.insert("type".into(), Value::String("string".into()));
            items.insert("enum".into(), option_values(field));
            schema.insert("type".into(), Value::String("array".into()));
            schema.insert("items".into(), Value::Object(items));
            schema.insert("uniqueItems".into(), Value::Bool(true));
        }
        FieldType::File => {
            let mut props = Map::new();
            props.insert("name".into(), type_only("string"));
            props.insert("size".into(), type_only("integer"));
            props.insert("mimeType".into(), type_only("string"));
            schema.insert("type".into(), Value::String("object".into()));
            schema.insert("properties".into(), Value::Object(props));
            schema.insert(
                "required".into(),
                Value::Array(vec![Value::String("name".into())]),
            );
        }
        _ => {
            schema.insert("type".into(), Value::String("string".into()));
            let format = match field.kind {
                FieldType::Email => Some("email"),
                FieldType::Url => Some("uri"),
                FieldType::Date => Some("date"),
                FieldType::Time => Some("time"),
                _ => None,
            };
            if let Some(format) = format {
                schema.insert("format".into(), Value::String(format.into()));
            }
            if matches!(field.kind, FieldType::Password) {
                schema.insert("writeOnly".into(), Value::Bool(true));
            }
        }
    }

    if !field.label.is_empty() {
        schema.insert("title".into(), Value::String(field.label.clone()));
    }
    if let Some(description) = field.description.as_ref().or(field.help_text.as_ref()) {
        schema.insert("description".into(), Value::String(description.clone()));
    }

    for rule in &field.validation {
        match &rule.kind {
            RuleKind::MinLength { value } => {
                let key = if is_list { "minItems" } else { "minLength" };
                schema.insert(key.into(), Value::Number((*value).into()));
            }
            RuleKind::MaxLength { value } => {
                let key = if is_list { "maxItems" } else { "maxLength" };
                schema.insert(key.into(), Value::Number((*value).into()));
            }
            RuleKind::Min { value } => {
                if let Some(number) = number_from_f64(*value) {
                    schema.insert("minimum".into(), number);
                }
            }
            RuleKind::Max { value } => {
                if let Some(number) = number_from_f64(*value) {
                    schema.insert("maximum".into(), number);
                }
            }
            RuleKind::Pattern { value } => {
                schema.insert("pattern".into(), Value::String(value.clone()));
            }
            RuleKind::Email => {
                schema.insert("format".into(), Value::String("email".into()));
            }
            RuleKind::Required | RuleKind::Phone => {}
        }
    }

    Value::Object(schema)
}

fn option_values(field: &FieldDefinition) -> Value {
    Value::Array(
        field
            .options
            .iter()
            .map(|option| Value::String(option.value.clone()))
            .collect(),
    )
}

fn type_only(kind: &str) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), Value::String(kind.into()));
    Value::Object(map)
}

fn number_from_f64(value: f64) -> Option<Value> {
    serde_json::Number::from_f64(value).map(Value::Number)
}
