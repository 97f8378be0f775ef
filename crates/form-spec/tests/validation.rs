use serde_json::json;

use form_spec::{
    FieldDefinition, FieldType, FormSchema, FormValue, RuleKind, RuleType, ValidationEngine,
    ValidationRule, WarningCode, values_from_json,
};

fn engine_for(fields: Vec<FieldDefinition>) -> ValidationEngine {
    ValidationEngine::new(FormSchema::new("test", fields)).expect("schema should compile")
}

fn rules(engine: &ValidationEngine, field_id: &str, value: FormValue) -> Vec<RuleType> {
    engine
        .validate_field(field_id, Some(&value))
        .into_iter()
        .map(|error| error.rule)
        .collect()
}

fn booking_form() -> FormSchema {
    FormSchema::from_json_value(json!({
        "id": "booking",
        "name": "Tee time booking",
        "version": "3",
        "fields": [
            { "id": "type", "type": "select", "label": "Booking type", "required": true,
              "options": [
                  { "label": "Personal", "value": "personal" },
                  { "label": "Business", "value": "business" }
              ] },
            { "id": "name", "type": "text", "label": "Name", "required": true },
            { "id": "company", "type": "text", "label": "Company", "required": true,
              "visibleIf": { "op": "equals", "field": "type", "value": "business" } }
        ]
    }))
    .expect("booking form should parse")
}

#[test]
fn hidden_required_field_does_not_block_submission() {
    let engine = ValidationEngine::new(booking_form()).expect("compile");

    let personal = values_from_json(json!({ "type": "personal", "name": "Ada" }));
    let result = engine.validate_form(&personal);
    assert!(result.is_valid, "{:?}", result.errors);

    let business = values_from_json(json!({ "type": "business", "name": "Ada" }));
    let result = engine.validate_form(&business);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].field_id, "company");
    assert_eq!(result.errors[0].rule, RuleType::Required);

    let complete = values_from_json(json!({
        "type": "business", "name": "Ada", "company": "Acme"
    }));
    assert!(engine.validate_form(&complete).is_valid);
    assert!(engine.is_form_complete(&complete));
}

#[test]
fn only_type_given_reports_missing_name_only() {
    let engine = ValidationEngine::new(booking_form()).expect("compile");
    let values = values_from_json(json!({ "type": "personal" }));
    let result = engine.validate_form(&values);
    assert!(!result.is_valid);
    let ids: Vec<_> = result.errors.iter().map(|error| error.field_id.as_str()).collect();
    assert_eq!(ids, vec!["name"]);
}

#[test]
fn invalid_email_reports_one_email_error() {
    let engine = engine_for(vec![
        FieldDefinition::new("email", FieldType::Email)
            .with_label("Email")
            .required(),
    ]);
    assert_eq!(
        rules(&engine, "email", FormValue::text("not-an-email")),
        vec![RuleType::Email]
    );
    assert_eq!(
        rules(&engine, "email", FormValue::text("")),
        vec![RuleType::Required]
    );
    assert!(rules(&engine, "email", FormValue::text("ada@example.com")).is_empty());
}

#[test]
fn explicit_email_rule_is_not_doubled() {
    let engine = engine_for(vec![
        FieldDefinition::new("email", FieldType::Email)
            .required()
            .with_rule(ValidationRule::new(RuleKind::Email).with_message("Bad email")),
    ]);
    let errors = engine.validate_field("email", Some(&FormValue::text("nope")));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule, RuleType::Email);
    assert_eq!(errors[0].message, "Bad email");
}

#[test]
fn required_short_circuits_other_rules() {
    let engine = engine_for(vec![
        FieldDefinition::new("name", FieldType::Text)
            .with_rule(ValidationRule::new(RuleKind::Required).with_message("Name please"))
            .with_rule(RuleKind::MinLength { value: 3 })
            .with_rule(RuleKind::Pattern {
                value: "^[A-Z]".into(),
            }),
    ]);
    for empty in [FormValue::Null, FormValue::text(""), FormValue::text("  ")] {
        let errors = engine.validate_field("name", Some(&empty));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, RuleType::Required);
        assert_eq!(errors[0].message, "Name please");
    }
    let errors = engine.validate_field("name", None);
    assert_eq!(errors.len(), 1);
}

#[test]
fn empty_optional_value_has_no_errors() {
    let engine = engine_for(vec![
        FieldDefinition::new("phone", FieldType::Text).with_rule(RuleKind::Phone),
    ]);
    assert!(engine.validate_field("phone", None).is_empty());
    assert!(
        engine
            .validate_field("phone", Some(&FormValue::text("")))
            .is_empty()
    );
}

#[test]
fn multiple_failures_are_collected() {
    let engine = engine_for(vec![
        FieldDefinition::new("code", FieldType::Text)
            .with_rule(RuleKind::MinLength { value: 5 })
            .with_rule(RuleKind::Pattern {
                value: "^[0-9]+$".into(),
            }),
    ]);
    assert_eq!(
        rules(&engine, "code", FormValue::text("ab")),
        vec![RuleType::MinLength, RuleType::Pattern]
    );
}

#[test]
fn number_range_rules() {
    let engine = engine_for(vec![
        FieldDefinition::new("players", FieldType::Number)
            .with_label("Players")
            .with_rule(RuleKind::Min { value: 1.0 })
            .with_rule(RuleKind::Max { value: 4.0 }),
    ]);
    assert!(rules(&engine, "players", FormValue::Number(1.0)).is_empty());
    assert!(rules(&engine, "players", FormValue::Number(4.0)).is_empty());
    assert!(rules(&engine, "players", FormValue::text("3")).is_empty());
    assert_eq!(rules(&engine, "players", FormValue::Number(0.0)), vec![RuleType::Min]);
    assert_eq!(rules(&engine, "players", FormValue::text("5")), vec![RuleType::Max]);
    assert_eq!(rules(&engine, "players", FormValue::text("four")), vec![RuleType::Type]);
    assert_eq!(
        rules(&engine, "players", FormValue::Number(f64::NAN)),
        vec![RuleType::Type]
    );

    let errors = engine.validate_field("players", Some(&FormValue::Number(9.0)));
    assert_eq!(errors[0].message, "Players must be at most 4");
}

#[test]
fn max_length_counts_characters_not_bytes() {
    let engine = engine_for(vec![
        FieldDefinition::new("nickname", FieldType::Text)
            .with_rule(RuleKind::MaxLength { value: 4 }),
    ]);
    assert!(rules(&engine, "nickname", FormValue::text("éééé")).is_empty());
    assert!(rules(&engine, "nickname", FormValue::text("⛳🏌️")).is_empty());
    assert_eq!(
        rules(&engine, "nickname", FormValue::text("ééééé")),
        vec![RuleType::MaxLength]
    );
}

#[test]
fn checkbox_group_values() {
    let engine = engine_for(vec![
        FieldDefinition::new("extras", FieldType::Checkbox)
            .required()
            .with_options([("Cart", "cart"), ("Range balls", "range"), ("Lesson", "lesson")])
            .with_rule(RuleKind::MaxLength { value: 2 }),
    ]);
    assert_eq!(
        rules(&engine, "extras", FormValue::List(vec![])),
        vec![RuleType::Required]
    );
    assert!(rules(&engine, "extras", FormValue::list(["cart"])).is_empty());
    assert_eq!(
        rules(&engine, "extras", FormValue::list(["cart", "range", "lesson"])),
        vec![RuleType::MaxLength]
    );
    assert_eq!(
        rules(&engine, "extras", FormValue::list(["caddie"])),
        vec![RuleType::Choice]
    );
    assert_eq!(
        rules(&engine, "extras", FormValue::text("cart")),
        vec![RuleType::Type]
    );

    let mixed = values_from_json(json!({ "extras": ["cart", { "x": 1 }, [2]] }));
    let result = engine.validate_form(&mixed);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].rule, RuleType::Type);

    let nulls = values_from_json(json!({ "extras": [null] }));
    let result = engine.validate_form(&nulls);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].rule, RuleType::Type);
}

#[test]
fn select_and_radio_values_must_be_options() {
    let engine = engine_for(vec![
        FieldDefinition::new("holes", FieldType::Radio).with_options([("9", "9"), ("18", "18")]),
    ]);
    assert!(rules(&engine, "holes", FormValue::text("18")).is_empty());
    assert!(rules(&engine, "holes", FormValue::Number(9.0)).is_empty());
    assert_eq!(rules(&engine, "holes", FormValue::text("27")), vec![RuleType::Choice]);
    assert_eq!(
        rules(&engine, "holes", FormValue::list(["9"])),
        vec![RuleType::Type]
    );
}

#[test]
fn file_fields_need_file_handles() {
    let engine = engine_for(vec![
        FieldDefinition::new("handicap_card", FieldType::File).required(),
    ]);
    let values = values_from_json(json!({
        "handicap_card": { "name": "card.png", "size": 2048, "mimeType": "image/png" }
    }));
    assert!(engine.validate_form(&values).is_valid);
    assert_eq!(
        rules(&engine, "handicap_card", FormValue::text("card.png")),
        vec![RuleType::Type]
    );
}

#[test]
fn malformed_values_are_reported_not_raised() {
    let engine = engine_for(vec![
        FieldDefinition::new("name", FieldType::Text).required(),
        FieldDefinition::new("players", FieldType::Number).required(),
        FieldDefinition::new("nickname", FieldType::Text),
        FieldDefinition::new("secret", FieldType::Password),
        FieldDefinition::new("holes", FieldType::Select)
            .with_options([("9", "9"), ("18", "18")]),
    ]);
    let values = values_from_json(json!({
        "name": ["not", "text"],
        "players": { "unexpected": true },
        "nickname": { "first": "Ada" },
        "secret": { "value": "hunter2" },
        "holes": { "value": "9" }
    }));
    let result = engine.validate_form(&values);
    assert!(!result.is_valid);
    assert!(result.errors.iter().all(|error| error.rule == RuleType::Type));
    let ids: Vec<_> = result.errors.iter().map(|error| error.field_id.as_str()).collect();
    assert_eq!(ids, vec!["name", "players", "nickname", "secret", "holes"]);
}

#[test]
fn booleans_are_values_not_blanks() {
    let engine = engine_for(vec![
        FieldDefinition::new("name", FieldType::Text).required(),
        FieldDefinition::new("players", FieldType::Number).required(),
    ]);
    for flag in [true, false] {
        assert_eq!(
            rules(&engine, "name", FormValue::Bool(flag)),
            vec![RuleType::Type]
        );
        assert_eq!(
            rules(&engine, "players", FormValue::Bool(flag)),
            vec![RuleType::Type]
        );
    }
}

#[test]
fn warnings_do_not_block_validity() {
    let engine = engine_for(vec![
        FieldDefinition::new("type", FieldType::Select)
            .with_options([("Personal", "personal"), ("Business", "business")]),
        FieldDefinition::new("company", FieldType::Text)
            .visible_if(form_spec::Condition::equals("type", "business")),
        FieldDefinition::new("notes", FieldType::Textarea)
            .with_rule(RuleKind::MaxLength { value: 10 }),
    ]);
    let values = values_from_json(json!({
        "type": "personal",
        "company": "Acme",
        "notes": "0123456789",
        "coupon": "SUMMER"
    }));
    let result = engine.validate_form(&values);
    assert!(result.is_valid);
    let codes: Vec<_> = result
        .warnings
        .iter()
        .map(|warning| (warning.field_id.as_str(), warning.code))
        .collect();
    assert!(codes.contains(&("notes", WarningCode::NearMaxLength)));
    assert!(codes.contains(&("company", WarningCode::HiddenValue)));
    assert!(codes.contains(&("coupon", WarningCode::UnknownField)));
}

#[test]
fn validate_form_is_idempotent() {
    let engine = ValidationEngine::new(booking_form()).expect("compile");
    let values = values_from_json(json!({ "type": "business", "name": "" }));
    let first = engine.validate_form(&values);
    let second = engine.validate_form(&values);
    assert_eq!(first, second);
}

#[test]
fn result_serializes_camel_case() {
    let engine = ValidationEngine::new(booking_form()).expect("compile");
    let result = engine.validate_form(&values_from_json(json!({ "type": "business" })));
    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["isValid"], false);
    assert_eq!(value["errors"][0]["fieldId"], "name");
    assert_eq!(value["errors"][0]["rule"], "required");
}
