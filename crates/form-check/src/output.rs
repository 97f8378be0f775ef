use std::io::Write;

use anyhow::Result;
use form_spec::{FieldDefinition, FieldError, FormSchema, ValidationResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub form_id: String,
    pub completion: u8,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub form_id: String,
    pub version: String,
    pub fields: usize,
    pub conditional_fields: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReport<'a> {
    field_id: &'a str,
    is_valid: bool,
    errors: &'a [FieldError],
}

pub fn emit_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_validation<W: Write>(
    out: &mut W,
    schema: &FormSchema,
    result: &ValidationResult,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return emit_json(out, result);
    }

    let verdict = if result.is_valid { "valid" } else { "invalid" };
    writeln!(out, "form '{}' (version {}): {verdict}", schema.id, schema.version)?;
    for error in &result.errors {
        writeln!(out, "  error    {} [{}] {}", error.field_id, error.rule, error.message)?;
    }
    for warning in &result.warnings {
        let code = serde_json::to_value(warning.code)?;
        let code = code.as_str().unwrap_or_default();
        writeln!(out, "  warning  {} [{code}] {}", warning.field_id, warning.message)?;
    }
    Ok(())
}

pub fn write_field_errors<W: Write>(
    out: &mut W,
    field_id: &str,
    errors: &[FieldError],
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return emit_json(
            out,
            &FieldReport {
                field_id,
                is_valid: errors.is_empty(),
                errors,
            },
        );
    }

    if errors.is_empty() {
        writeln!(out, "field '{field_id}': valid")?;
    } else {
        writeln!(out, "field '{field_id}': invalid")?;
        for error in errors {
            writeln!(out, "  error    [{}] {}", error.rule, error.message)?;
        }
    }
    Ok(())
}

pub fn write_visible<W: Write>(
    out: &mut W,
    fields: &[&FieldDefinition],
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        let ids: Vec<&str> = fields.iter().map(|field| field.id.as_str()).collect();
        return emit_json(out, &ids);
    }
    for field in fields {
        let marker = if field.is_required() { "*" } else { " " };
        writeln!(out, "{marker} {:<20} {}", field.id, field.kind)?;
    }
    Ok(())
}

pub fn write_progress<W: Write>(
    out: &mut W,
    report: &ProgressReport,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return emit_json(out, report);
    }
    writeln!(out, "completion: {}%", report.completion)?;
    writeln!(out, "complete: {}", if report.complete { "yes" } else { "no" })?;
    match &report.next_field {
        Some(field_id) => writeln!(out, "next field: {field_id}")?,
        None => writeln!(out, "next field: none")?,
    }
    Ok(())
}

pub fn write_check<W: Write>(
    out: &mut W,
    report: &CheckReport,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return emit_json(out, report);
    }
    writeln!(
        out,
        "ok: form '{}' (version {}) with {} field(s), {} conditional",
        report.form_id, report.version, report.fields, report.conditional_fields
    )?;
    Ok(())
}
