use crate::spec::{FieldDefinition, FormSchema};
use crate::values::FormValues;
use crate::visibility::VisibilityMap;

fn is_visible(field: &FieldDefinition, visibility: &VisibilityMap) -> bool {
    visibility.get(&field.id).copied().unwrap_or(true)
}

fn is_filled(field: &FieldDefinition, values: &FormValues) -> bool {
    values.get(&field.id).is_some_and(|value| !value.is_empty())
}

/// Filled visible required fields over all visible required fields, rounded
/// to the nearest percent. A form with nothing required reports 100.
pub fn completion_percentage(
    schema: &FormSchema,
    visibility: &VisibilityMap,
    values: &FormValues,
) -> u8 {
    let (total, filled) = schema
        .fields
        .iter()
        .filter(|field| is_visible(field, visibility) && field.is_required())
        .fold((0usize, 0usize), |(total, filled), field| {
            (total + 1, filled + usize::from(is_filled(field, values)))
        });

    if total == 0 {
        return 100;
    }
    ((filled * 100 + total / 2) / total) as u8
}

/// First visible required field without a value, else the first visible
/// optional one.
pub fn next_field<'a>(
    schema: &'a FormSchema,
    visibility: &VisibilityMap,
    values: &FormValues,
) -> Option<&'a FieldDefinition> {
    let mut pending = schema
        .fields
        .iter()
        .filter(|field| is_visible(field, visibility) && !is_filled(field, values));
    let first = pending.next()?;
    if first.is_required() {
        return Some(first);
    }
    pending
        .find(|field| field.is_required())
        .or(Some(first))
}
