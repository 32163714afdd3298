//! Alias reconciler
//!
//! An alias is a single pointer from a name to a collection. The upsert
//! endpoint covers both creation and retargeting; only renaming the alias
//! itself forces replacement.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use typesense_client::{AliasDefinition, TypesenseApi};

use crate::error::{Error, Result};
use crate::reconcile::{Observation, Reconcile};

const KIND: &str = "alias";

/// Attributes that cannot change without recreating the alias
pub const IMMUTABLE_ATTRIBUTES: [&str; 1] = ["name"];

/// Desired configuration of an alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSpec {
    pub name: String,
    pub collection_name: String,
}

/// Known remote state of an alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasState {
    pub id: String,
    pub name: String,
    pub collection_name: String,
}

impl AliasSpec {
    /// Immutable attributes that differ between `state` and this spec.
    pub fn forces_replacement(&self, state: &AliasState) -> Vec<&'static str> {
        if self.name != state.name {
            vec!["name"]
        } else {
            Vec::new()
        }
    }

    fn to_definition(&self) -> AliasDefinition {
        AliasDefinition {
            collection_name: self.collection_name.clone(),
        }
    }
}

/// Converges aliases against the remote server
pub struct AliasReconciler {
    client: Arc<dyn TypesenseApi>,
}

impl AliasReconciler {
    pub fn new(client: Arc<dyn TypesenseApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Reconcile for AliasReconciler {
    type Spec = AliasSpec;
    type State = AliasState;

    async fn create(&self, spec: &Self::Spec) -> Result<Self::State> {
        let applied = self
            .client
            .upsert_alias(&spec.name, &spec.to_definition())
            .await
            .map_err(|e| Error::remote("create", KIND, e))?;
        tracing::info!("created alias {} -> {}", applied.name, applied.collection_name);

        Ok(AliasState {
            id: applied.name.clone(),
            name: applied.name,
            collection_name: applied.collection_name,
        })
    }

    async fn read(&self, state: &Self::State) -> Result<Observation<Self::State>> {
        match self.client.retrieve_alias(&state.id).await {
            Ok(response) => Ok(Observation::Present(AliasState {
                id: state.id.clone(),
                name: response.name,
                collection_name: response.collection_name,
            })),
            Err(e) if e.is_not_found() => {
                tracing::warn!("alias {} not found, assuming drift: {}", state.id, e);
                Ok(Observation::Absent)
            }
            Err(e) => Err(Error::remote("read", KIND, e)),
        }
    }

    async fn update(&self, state: &Self::State, spec: &Self::Spec) -> Result<Self::State> {
        let applied = self
            .client
            .upsert_alias(&state.id, &spec.to_definition())
            .await
            .map_err(|e| Error::remote("update", KIND, e))?;
        tracing::info!("updated alias {} -> {}", applied.name, applied.collection_name);

        Ok(AliasState {
            id: state.id.clone(),
            name: applied.name,
            collection_name: applied.collection_name,
        })
    }

    async fn delete(&self, state: &Self::State) -> Result<()> {
        match self.client.delete_alias(&state.id).await {
            Ok(()) => {
                tracing::info!("deleted alias {}", state.id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("alias {} already absent: {}", state.id, e);
                Ok(())
            }
            Err(e) => Err(Error::remote("delete", KIND, e)),
        }
    }
}
