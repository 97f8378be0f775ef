use std::collections::BTreeMap;

use tracing::trace;

use crate::spec::{FieldDefinition, FormSchema};
use crate::values::FormValues;

pub type VisibilityMap = BTreeMap<String, bool>;

/// Resolves every field's visibility in declaration order.
///
/// A field whose condition reads a field that is hidden (or not yet resolved)
/// is hidden as well, whatever the condition would say about the raw values.
pub fn resolve_visibility(schema: &FormSchema, values: &FormValues) -> VisibilityMap {
    let mut map = VisibilityMap::new();

    for field in &schema.fields {
        let visible = match &field.visible_if {
            None => true,
            Some(condition) => {
                let dependencies_visible = condition
                    .references()
                    .iter()
                    .all(|reference| map.get(*reference).copied().unwrap_or(false));
                dependencies_visible && condition.evaluate(values)
            }
        };
        trace!(field_id = %field.id, visible, "resolved field visibility");
        map.insert(field.id.clone(), visible);
    }

    map
}

/// Visible fields in display order.
pub fn visible_fields<'a>(
    schema: &'a FormSchema,
    visibility: &VisibilityMap,
) -> Vec<&'a FieldDefinition> {
    schema
        .fields
        .iter()
        .filter(|field| visibility.get(&field.id).copied().unwrap_or(true))
        .collect()
}
