use once_cell::sync::Lazy;
use regex::Regex;
use time::Date;
use time::Time;
use time::macros::format_description;
use tracing::trace;

use crate::report::{FieldError, FieldWarning, WarningCode};
use crate::spec::{FieldDefinition, FieldType, RuleKind, RuleType, ValidationRule};
use crate::values::{FormValue, format_number};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ().\-]{5,19}[0-9]$").expect("valid phone regex"));

/// Validates one value against a field definition.
///
/// An empty value yields a single `required` error when the field is required
/// and nothing otherwise. A value of the wrong shape yields a single `type` or
/// `choice` error. Otherwise format checks implied by the field type run
/// first, then every rule in declaration order, and all failures are kept.
pub(crate) fn validate_value(
    field: &FieldDefinition,
    patterns: &[Option<Regex>],
    value: Option<&FormValue>,
) -> Vec<FieldError> {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        if field.is_required() {
            let message = field
                .validation
                .iter()
                .find(|rule| matches!(rule.kind, RuleKind::Required))
                .and_then(|rule| rule.message.clone())
                .unwrap_or_else(|| format!("{} is required", field.display_name()));
            return vec![error(field, RuleType::Required, message)];
        }
        return Vec::new();
    };

    if let Some(shape_error) = check_shape(field, value) {
        trace!(field_id = %field.id, rule = %shape_error.rule, "value has the wrong shape");
        return vec![shape_error];
    }

    let mut errors = Vec::new();
    if let Some(format_error) = check_format(field, value) {
        errors.push(format_error);
    }

    let mut numeric_reported = false;
    for (position, rule) in field.validation.iter().enumerate() {
        let pattern = patterns.get(position).and_then(Option::as_ref);
        if let Some(rule_error) = apply_rule(field, rule, pattern, value, &mut numeric_reported) {
            errors.push(rule_error);
        }
    }

    errors
}

/// Informational flags for a present value.
pub(crate) fn value_warnings(
    field: &FieldDefinition,
    value: Option<&FormValue>,
    near_limit_ratio: f64,
) -> Vec<FieldWarning> {
    let mut warnings = Vec::new();
    if !(near_limit_ratio > 0.0 && near_limit_ratio <= 1.0) {
        return warnings;
    }
    let Some(length) = value.and_then(FormValue::length) else {
        return warnings;
    };
    if length == 0 {
        return warnings;
    }

    for rule in &field.validation {
        if let RuleKind::MaxLength { value: max } = rule.kind
            && max > 0
            && length <= max
            && length as f64 >= max as f64 * near_limit_ratio
        {
            warnings.push(FieldWarning {
                field_id: field.id.clone(),
                code: WarningCode::NearMaxLength,
                message: format!(
                    "{} uses {} of {} allowed characters",
                    field.display_name(),
                    length,
                    max
                ),
            });
        }
    }

    warnings
}

fn check_shape(field: &FieldDefinition, value: &FormValue) -> Option<FieldError> {
    match field.kind {
        kind if kind.is_textual() => match value {
            FormValue::Text(_) | FormValue::Number(_) => None,
            _ => Some(type_error(field, "must be text")),
        },
        FieldType::Number => match value.as_number() {
            Some(_) => None,
            None => Some(type_error(field, "must be a number")),
        },
        FieldType::Select | FieldType::Radio => match value.as_text() {
            Some(text) if field.has_option(&text) => None,
            Some(_) => Some(choice_error(field)),
            None => Some(type_error(field, "must be a single choice")),
        },
        FieldType::Checkbox => match value {
            FormValue::List(items) if items.iter().all(|item| field.has_option(item)) => None,
            FormValue::List(_) => Some(choice_error(field)),
            _ => Some(type_error(field, "must be a list of choices")),
        },
        FieldType::File => match value {
            FormValue::File(_) => None,
            _ => Some(type_error(field, "must be a file")),
        },
        _ => None,
    }
}

fn check_format(field: &FieldDefinition, value: &FormValue) -> Option<FieldError> {
    let text = value.as_text()?;
    let text = text.trim();
    match field.kind {
        FieldType::Email
            if !field.has_rule(|kind| matches!(kind, RuleKind::Email)) && !EMAIL.is_match(text) =>
        {
            Some(error(
                field,
                RuleType::Email,
                format!("{} must be a valid email address", field.display_name()),
            ))
        }
        FieldType::Url if !is_absolute_url(text) => {
            Some(type_error(field, "must be a valid URL"))
        }
        FieldType::Date if !is_date(text) => Some(type_error(field, "must be a date (YYYY-MM-DD)")),
        FieldType::Time if !is_time(text) => Some(type_error(field, "must be a time (HH:MM)")),
        _ => None,
    }
}

fn apply_rule(
    field: &FieldDefinition,
    rule: &ValidationRule,
    pattern: Option<&Regex>,
    value: &FormValue,
    numeric_reported: &mut bool,
) -> Option<FieldError> {
    let name = field.display_name();
    match &rule.kind {
        RuleKind::Required => None,
        RuleKind::MinLength { value: min } => {
            let length = value.length()?;
            (length < *min).then(|| {
                rule_error(field, rule, || {
                    format!("{name} must be at least {min} {}", unit(value, *min))
                })
            })
        }
        RuleKind::MaxLength { value: max } => {
            let length = value.length()?;
            (length > *max).then(|| {
                rule_error(field, rule, || {
                    format!("{name} must be at most {max} {}", unit(value, *max))
                })
            })
        }
        RuleKind::Min { value: min } => match value.as_number() {
            None => numeric_type_error(field, numeric_reported),
            Some(number) => (number < *min).then(|| {
                rule_error(field, rule, || {
                    format!("{name} must be at least {}", format_number(*min))
                })
            }),
        },
        RuleKind::Max { value: max } => match value.as_number() {
            None => numeric_type_error(field, numeric_reported),
            Some(number) => (number > *max).then(|| {
                rule_error(field, rule, || {
                    format!("{name} must be at most {}", format_number(*max))
                })
            }),
        },
        RuleKind::Email => {
            let text = value.as_text()?;
            (!EMAIL.is_match(text.trim())).then(|| {
                rule_error(field, rule, || {
                    format!("{name} must be a valid email address")
                })
            })
        }
        RuleKind::Phone => {
            let text = value.as_text()?;
            (!PHONE.is_match(text.trim())).then(|| {
                rule_error(field, rule, || format!("{name} must be a valid phone number"))
            })
        }
        RuleKind::Pattern { .. } => {
            let regex = pattern?;
            let text = value.as_text()?;
            (!regex.is_match(&text))
                .then(|| rule_error(field, rule, || format!("{name} has an invalid format")))
        }
    }
}

fn numeric_type_error(field: &FieldDefinition, reported: &mut bool) -> Option<FieldError> {
    if *reported {
        return None;
    }
    *reported = true;
    Some(type_error(field, "must be a number"))
}

fn unit(value: &FormValue, count: usize) -> &'static str {
    match (value, count == 1) {
        (FormValue::List(_), true) => "option",
        (FormValue::List(_), false) => "options",
        (_, true) => "character",
        (_, false) => "characters",
    }
}

fn is_absolute_url(text: &str) -> bool {
    url::Url::parse(text).is_ok_and(|url| url.has_host())
}

fn is_date(text: &str) -> bool {
    Date::parse(text, format_description!("[year]-[month]-[day]")).is_ok()
}

fn is_time(text: &str) -> bool {
    Time::parse(text, format_description!("[hour]:[minute]")).is_ok()
        || Time::parse(text, format_description!("[hour]:[minute]:[second]")).is_ok()
}

fn rule_error(
    field: &FieldDefinition,
    rule: &ValidationRule,
    default_message: impl FnOnce() -> String,
) -> FieldError {
    let message = rule.message.clone().unwrap_or_else(default_message);
    error(field, rule.kind.rule_type(), message)
}

fn type_error(field: &FieldDefinition, detail: &str) -> FieldError {
    error(
        field,
        RuleType::Type,
        format!("{} {}", field.display_name(), detail),
    )
}

fn choice_error(field: &FieldDefinition) -> FieldError {
    error(
        field,
        RuleType::Choice,
        format!("{} has an option that is not available", field.display_name()),
    )
}

fn error(field: &FieldDefinition, rule: RuleType, message: String) -> FieldError {
    FieldError {
        field_id: field.id.clone(),
        rule,
        message,
    }
}
