//! Reconciliation engine for Typesense resources
//!
//! Converges declaratively configured collections, documents, synonyms, and
//! aliases against a live Typesense server. Each resource kind implements the
//! same four-operation lifecycle, and absence observed during a refresh is
//! drift to repair, never a failure.
//!
//! ```text
//!   Settings ──resolve──▶ Credentials
//!                              │
//!                              ▼
//!   CollectionSpec ─┐   ┌─────────────────┐   ┌──────────────────┐
//!   DocumentSpec  ──┼──▶│   Reconcile     │──▶│  TypesenseApi    │──▶ server
//!   SynonymSpec   ──┤   │ create/read/    │   │ (HTTP or fake)   │
//!   AliasSpec     ──┘   │ update/delete   │   └──────────────────┘
//!                       └─────────────────┘
//!                              │
//!                              ▼
//!                       Observation<State>
//! ```
//!
//! Modules:
//!
//! - [`config`]: connection settings with environment fallback
//! - [`ident`]: composite `<collection>.<name>` identifiers
//! - [`diff`]: field-level schema change planning
//! - [`reconcile`]: the [`Reconcile`](reconcile::Reconcile) trait and the
//!   four resource reconcilers
//! - [`error`]: the crate-wide error taxonomy

pub mod config;
pub mod diff;
pub mod error;
pub mod ident;
pub mod reconcile;

pub use config::{Credentials, Settings};
pub use diff::{FieldChange, diff_fields, to_update};
pub use error::{Error, Result};
pub use ident::CompositeId;
pub use reconcile::{
    AliasReconciler, AliasSpec, AliasState, CollectionReconciler, CollectionSpec, CollectionState,
    DocumentReconciler, DocumentSpec, DocumentState, Observation, Reconcile, SynonymReconciler,
    SynonymSpec, SynonymState,
};
