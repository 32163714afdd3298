//! Resource reconcilers
//!
//! Each reconciler converges one resource kind against the remote server
//! through the [`Reconcile`] trait. All of them hold an
//! `Arc<dyn TypesenseApi>`, so tests run against an in-memory fake and
//! production wires in the HTTP client.

use async_trait::async_trait;

use crate::error::Result;

pub mod alias;
pub mod collection;
pub mod document;
pub mod synonym;

pub use alias::{AliasReconciler, AliasSpec, AliasState};
pub use collection::{CollectionReconciler, CollectionSpec, CollectionState};
pub use document::{DocumentReconciler, DocumentSpec, DocumentState};
pub use synonym::{SynonymReconciler, SynonymSpec, SynonymState};

/// Outcome of reading a resource back from the server
///
/// Absence is a normal observation, not an error: the caller reacts by
/// scheduling recreation of the drifted resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation<S> {
    /// The resource exists remotely; this is its refreshed state.
    Present(S),
    /// The resource is gone from the server.
    Absent,
}

impl<S> Observation<S> {
    /// True when the resource was found remotely.
    pub fn is_present(&self) -> bool {
        matches!(self, Observation::Present(_))
    }
}

/// Lifecycle of one resource kind
///
/// `Spec` is the desired configuration; `State` is what is known to exist
/// remotely, including server-assigned identity. Operations validate their
/// input before touching the network, so a rejected spec never leaves a
/// half-applied resource behind.
#[async_trait]
pub trait Reconcile: Send + Sync {
    type Spec: Send + Sync;
    type State: Send + Sync;

    /// Create the resource described by `spec`.
    async fn create(&self, spec: &Self::Spec) -> Result<Self::State>;

    /// Refresh `state` from the server.
    async fn read(&self, state: &Self::State) -> Result<Observation<Self::State>>;

    /// Converge the live resource onto `spec`.
    async fn update(&self, state: &Self::State, spec: &Self::Spec) -> Result<Self::State>;

    /// Remove the resource. Deleting an already-absent resource succeeds.
    async fn delete(&self, state: &Self::State) -> Result<()>;
}
