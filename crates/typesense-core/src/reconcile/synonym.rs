//! Synonym reconciler
//!
//! Synonym sets are keyed by name within a collection and applied through
//! the server's upsert endpoint. A set with no entries is rejected before
//! any network call. The server omits the root word from some reads, so a
//! refresh keeps the previously known root when the response carries none.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use typesense_client::{Synonym, SynonymDefinition, TypesenseApi};

use crate::error::{Error, Result};
use crate::ident::CompositeId;
use crate::reconcile::{Observation, Reconcile};

const KIND: &str = "synonym";

/// Attributes that cannot change without recreating the synonym set
pub const IMMUTABLE_ATTRIBUTES: [&str; 2] = ["collection", "name"];

/// Desired configuration of a synonym set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymSpec {
    pub collection: String,
    pub name: String,
    pub root: Option<String>,
    pub synonyms: Vec<String>,
}

/// Known remote state of a synonym set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymState {
    pub id: CompositeId,
    pub root: Option<String>,
    pub synonyms: Vec<String>,
}

impl SynonymSpec {
    /// Immutable attributes that differ between `state` and this spec.
    pub fn forces_replacement(&self, state: &SynonymState) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.collection != state.id.collection() {
            changed.push("collection");
        }
        if self.name != state.id.local() {
            changed.push("name");
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        if self.synonyms.is_empty() {
            return Err(Error::EmptySynonyms {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    fn to_definition(&self) -> SynonymDefinition {
        SynonymDefinition {
            root: self.root.clone(),
            synonyms: self.synonyms.clone(),
        }
    }
}

/// Converges synonym sets against the remote server
pub struct SynonymReconciler {
    client: Arc<dyn TypesenseApi>,
}

impl SynonymReconciler {
    pub fn new(client: Arc<dyn TypesenseApi>) -> Self {
        Self { client }
    }

    async fn apply(
        &self,
        operation: &'static str,
        collection: &str,
        name: &str,
        spec: &SynonymSpec,
    ) -> Result<Synonym> {
        spec.validate()?;
        self.client
            .upsert_synonym(collection, name, &spec.to_definition())
            .await
            .map_err(|e| Error::remote(operation, KIND, e))
    }
}

#[async_trait]
impl Reconcile for SynonymReconciler {
    type Spec = SynonymSpec;
    type State = SynonymState;

    async fn create(&self, spec: &Self::Spec) -> Result<Self::State> {
        let applied = self.apply("create", &spec.collection, &spec.name, spec).await?;
        let id = CompositeId::new(&spec.collection, &applied.id)?;
        tracing::info!("created synonym {}", id);

        Ok(SynonymState {
            id,
            root: spec.root.clone(),
            synonyms: applied.synonyms,
        })
    }

    async fn read(&self, state: &Self::State) -> Result<Observation<Self::State>> {
        match self
            .client
            .retrieve_synonym(state.id.collection(), state.id.local())
            .await
        {
            Ok(response) => {
                let root = match response.root.filter(|root| !root.is_empty()) {
                    Some(root) => Some(root),
                    None => state.root.clone(),
                };
                Ok(Observation::Present(SynonymState {
                    id: state.id.clone(),
                    root,
                    synonyms: response.synonyms,
                }))
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("synonym {} not found, assuming drift: {}", state.id, e);
                Ok(Observation::Absent)
            }
            Err(e) => Err(Error::remote("read", KIND, e)),
        }
    }

    async fn update(&self, state: &Self::State, spec: &Self::Spec) -> Result<Self::State> {
        let applied = self
            .apply("update", state.id.collection(), state.id.local(), spec)
            .await?;
        tracing::info!("updated synonym {}", state.id);

        Ok(SynonymState {
            id: state.id.clone(),
            root: spec.root.clone(),
            synonyms: applied.synonyms,
        })
    }

    async fn delete(&self, state: &Self::State) -> Result<()> {
        match self
            .client
            .delete_synonym(state.id.collection(), state.id.local())
            .await
        {
            Ok(()) => {
                tracing::info!("deleted synonym {}", state.id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("synonym {} already absent: {}", state.id, e);
                Ok(())
            }
            Err(e) => Err(Error::remote("delete", KIND, e)),
        }
    }
}
