//! Collection reconciler
//!
//! The collection name is its server identity, so renames force replacement,
//! as do the structural attributes the server fixes at creation time. Field
//! definitions are the one mutable part and converge through the batched
//! drop-and-recreate plan in [`crate::diff`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use typesense_client::{Collection, CollectionSchema, Field, TypesenseApi};

use crate::diff::{diff_fields, to_update};
use crate::error::{Error, Result};
use crate::reconcile::{Observation, Reconcile};

const KIND: &str = "collection";

/// Attributes that cannot change without recreating the collection
pub const IMMUTABLE_ATTRIBUTES: [&str; 5] = [
    "name",
    "default_sorting_field",
    "enable_nested_fields",
    "symbols_to_index",
    "token_separators",
];

/// Desired configuration of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    pub default_sorting_field: Option<String>,
    pub enable_nested_fields: bool,
    pub symbols_to_index: Vec<String>,
    pub token_separators: Vec<String>,
    pub fields: Vec<Field>,
}

/// Known remote state of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionState {
    pub id: String,
    pub name: String,
    pub default_sorting_field: Option<String>,
    pub enable_nested_fields: bool,
    pub symbols_to_index: Vec<String>,
    pub token_separators: Vec<String>,
    pub fields: Vec<Field>,
}

impl CollectionSpec {
    /// Immutable attributes that differ between `state` and this spec.
    ///
    /// A non-empty result means the collection cannot be converged in place;
    /// the caller must replace it.
    pub fn forces_replacement(&self, state: &CollectionState) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.name != state.name {
            changed.push("name");
        }
        if self.default_sorting_field != state.default_sorting_field {
            changed.push("default_sorting_field");
        }
        if self.enable_nested_fields != state.enable_nested_fields {
            changed.push("enable_nested_fields");
        }
        if self.symbols_to_index != state.symbols_to_index {
            changed.push("symbols_to_index");
        }
        if self.token_separators != state.token_separators {
            changed.push("token_separators");
        }
        changed
    }

    fn to_schema(&self) -> CollectionSchema {
        CollectionSchema {
            name: self.name.clone(),
            fields: self.fields.clone(),
            default_sorting_field: self.default_sorting_field.clone(),
            enable_nested_fields: Some(self.enable_nested_fields),
            symbols_to_index: non_empty(&self.symbols_to_index),
            token_separators: non_empty(&self.token_separators),
        }
    }
}

/// Converges collections against the remote server
pub struct CollectionReconciler {
    client: Arc<dyn TypesenseApi>,
}

impl CollectionReconciler {
    pub fn new(client: Arc<dyn TypesenseApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Reconcile for CollectionReconciler {
    type Spec = CollectionSpec;
    type State = CollectionState;

    async fn create(&self, spec: &Self::Spec) -> Result<Self::State> {
        let response = self
            .client
            .create_collection(&spec.to_schema())
            .await
            .map_err(|e| Error::remote("create", KIND, e))?;
        tracing::info!("created collection {}", response.name);
        Ok(state_from_response(response))
    }

    async fn read(&self, state: &Self::State) -> Result<Observation<Self::State>> {
        match self.client.retrieve_collection(&state.id).await {
            Ok(response) => Ok(Observation::Present(state_from_response(response))),
            Err(e) if e.is_not_found() => {
                tracing::warn!("collection {} not found, assuming drift: {}", state.id, e);
                Ok(Observation::Absent)
            }
            Err(e) => Err(Error::remote("read", KIND, e)),
        }
    }

    async fn update(&self, state: &Self::State, spec: &Self::Spec) -> Result<Self::State> {
        let changes = diff_fields(&spec.fields, &state.fields);
        if changes.is_empty() {
            tracing::info!("collection {} schema unchanged", state.id);
            return Ok(state_from_spec(&state.id, spec));
        }

        self.client
            .update_collection(&state.id, &to_update(changes))
            .await
            .map_err(|e| Error::remote("update", KIND, e))?;
        tracing::info!("updated collection {} schema", state.id);
        Ok(state_from_spec(&state.id, spec))
    }

    async fn delete(&self, state: &Self::State) -> Result<()> {
        match self.client.delete_collection(&state.id).await {
            Ok(()) => {
                tracing::info!("deleted collection {}", state.id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("collection {} already absent: {}", state.id, e);
                Ok(())
            }
            Err(e) => Err(Error::remote("delete", KIND, e)),
        }
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

fn state_from_response(response: Collection) -> CollectionState {
    CollectionState {
        id: response.name.clone(),
        name: response.name,
        default_sorting_field: response
            .default_sorting_field
            .filter(|field| !field.is_empty()),
        enable_nested_fields: response.enable_nested_fields.unwrap_or_default(),
        symbols_to_index: response.symbols_to_index.unwrap_or_default(),
        token_separators: response.token_separators.unwrap_or_default(),
        fields: response.fields,
    }
}

fn state_from_spec(id: &str, spec: &CollectionSpec) -> CollectionState {
    CollectionState {
        id: id.to_string(),
        name: spec.name.clone(),
        default_sorting_field: spec.default_sorting_field.clone(),
        enable_nested_fields: spec.enable_nested_fields,
        symbols_to_index: spec.symbols_to_index.clone(),
        token_separators: spec.token_separators.clone(),
        fields: spec.fields.clone(),
    }
}
