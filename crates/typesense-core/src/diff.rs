//! Field-level schema diffing
//!
//! Typesense cannot alter a field in place, so any changed field is dropped
//! and recreated under the same name. The plan computed here is applied as a
//! single batched schema update.

use std::collections::HashMap;

use typesense_client::{CollectionUpdate, Field, FieldAlteration};

/// One mutation in a schema change plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    /// Add this field definition
    Create(Field),
    /// Remove the field with this name
    Drop(String),
}

/// Plan the mutations that take `current` to `desired`.
///
/// Ordering is deterministic: changed and new fields follow `desired` order
/// (a changed field contributes its Drop immediately before its Create), and
/// leftover drops follow `current` order.
pub fn diff_fields(desired: &[Field], current: &[Field]) -> Vec<FieldChange> {
    let mut remaining: HashMap<&str, &Field> =
        current.iter().map(|field| (field.name.as_str(), field)).collect();

    let mut changes = Vec::new();
    for field in desired {
        match remaining.remove(field.name.as_str()) {
            None => {
                tracing::info!("field {} will be created", field.name);
                changes.push(FieldChange::Create(field.clone()));
            }
            Some(applied) if applied != field => {
                tracing::info!("field {} changed, will be recreated", field.name);
                changes.push(FieldChange::Drop(field.name.clone()));
                changes.push(FieldChange::Create(field.clone()));
            }
            Some(_) => {}
        }
    }

    for field in current {
        if remaining.contains_key(field.name.as_str()) {
            tracing::info!("field {} no longer defined, will be dropped", field.name);
            changes.push(FieldChange::Drop(field.name.clone()));
        }
    }

    changes
}

/// Render a change plan as the wire-level schema update.
pub fn to_update(changes: Vec<FieldChange>) -> CollectionUpdate {
    let fields = changes
        .into_iter()
        .map(|change| match change {
            FieldChange::Create(field) => FieldAlteration::Define(field),
            FieldChange::Drop(name) => FieldAlteration::drop(name),
        })
        .collect();
    CollectionUpdate { fields }
}
