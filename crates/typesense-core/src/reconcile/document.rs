//! Document reconciler
//!
//! The configured name doubles as the document id: it is injected under the
//! reserved `id` key on the way out and stripped from every body read back,
//! so stored state stays free of transport bookkeeping.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use typesense_client::{Document, TypesenseApi};

use crate::error::{Error, Result};
use crate::ident::CompositeId;
use crate::reconcile::{Observation, Reconcile};

const KIND: &str = "document";

/// Key the server uses for document identity
pub const RESERVED_KEY: &str = "id";

/// Attributes that cannot change without recreating the document
pub const IMMUTABLE_ATTRIBUTES: [&str; 2] = ["collection", "name"];

/// Desired configuration of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    pub collection: String,
    pub name: String,
    pub body: Document,
}

impl DocumentSpec {
    /// Immutable attributes that differ between `state` and this spec.
    pub fn forces_replacement(&self, state: &DocumentState) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.collection != state.id.collection() {
            changed.push("collection");
        }
        if self.name != state.id.local() {
            changed.push("name");
        }
        changed
    }
}

/// Known remote state of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentState {
    pub id: CompositeId,
    pub body: Document,
}

/// Converges documents against the remote server
pub struct DocumentReconciler {
    client: Arc<dyn TypesenseApi>,
}

impl DocumentReconciler {
    pub fn new(client: Arc<dyn TypesenseApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Reconcile for DocumentReconciler {
    type Spec = DocumentSpec;
    type State = DocumentState;

    async fn create(&self, spec: &Self::Spec) -> Result<Self::State> {
        let payload = outbound_body(spec, &spec.name)?;

        let mut stored = self
            .client
            .create_document(&spec.collection, &payload)
            .await
            .map_err(|e| Error::remote("create", KIND, e))?;

        // Trust the id the server echoes back over the one we sent.
        let assigned = match stored.remove(RESERVED_KEY) {
            Some(Value::String(assigned)) => assigned,
            _ => spec.name.clone(),
        };
        let id = CompositeId::new(&spec.collection, &assigned)?;
        tracing::info!("created document {}", id);

        Ok(DocumentState { id, body: stored })
    }

    async fn read(&self, state: &Self::State) -> Result<Observation<Self::State>> {
        match self
            .client
            .retrieve_document(state.id.collection(), state.id.local())
            .await
        {
            Ok(mut body) => {
                body.remove(RESERVED_KEY);
                Ok(Observation::Present(DocumentState {
                    id: state.id.clone(),
                    body,
                }))
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("document {} not found, assuming drift: {}", state.id, e);
                Ok(Observation::Absent)
            }
            Err(e) => Err(Error::remote("read", KIND, e)),
        }
    }

    async fn update(&self, state: &Self::State, spec: &Self::Spec) -> Result<Self::State> {
        let payload = outbound_body(spec, state.id.local())?;

        match self
            .client
            .update_document(state.id.collection(), state.id.local(), &payload)
            .await
        {
            Ok(()) => {}
            // The server occasionally answers an update with 201 Created.
            Err(e) if e.status() == Some(201) => {
                tracing::warn!("document {} update answered 201, treating as success", state.id);
            }
            Err(e) => return Err(Error::remote("update", KIND, e)),
        }
        tracing::info!("updated document {}", state.id);

        Ok(DocumentState {
            id: state.id.clone(),
            body: spec.body.clone(),
        })
    }

    async fn delete(&self, state: &Self::State) -> Result<()> {
        match self
            .client
            .delete_document(state.id.collection(), state.id.local())
            .await
        {
            Ok(()) => {
                tracing::info!("deleted document {}", state.id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("document {} already absent: {}", state.id, e);
                Ok(())
            }
            Err(e) => Err(Error::remote("delete", KIND, e)),
        }
    }
}

/// Validate the configured body and inject the identity key.
fn outbound_body(spec: &DocumentSpec, id: &str) -> Result<Document> {
    if spec.body.contains_key(RESERVED_KEY) {
        return Err(Error::ReservedDocumentKey {
            name: spec.name.clone(),
        });
    }
    let mut payload = spec.body.clone();
    payload.insert(RESERVED_KEY.to_string(), Value::String(id.to_string()));
    Ok(payload)
}
