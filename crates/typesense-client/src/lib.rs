//! Typed client for the Typesense admin API
//!
//! This crate is the remote side of the typesense-manager workspace:
//!
//! - **Wire models**: collection schemas, field definitions, documents,
//!   synonyms, and aliases as the server sends and receives them
//! - **[`TypesenseApi`]**: the per-resource CRUD trait reconcilers depend on
//! - **[`HttpClient`]**: the reqwest-backed production implementation
//! - **[`Error`]**: a status-coded taxonomy that distinguishes "not found"
//!   from other failures without inspecting message text
//!
//! Query and search endpoints are deliberately absent: this client covers
//! schema, document, synonym, and alias administration only.

pub mod api;
pub mod error;
pub mod http;
pub mod model;

pub use api::TypesenseApi;
pub use error::{Error, Result};
pub use http::HttpClient;
pub use model::{
    Alias, AliasDefinition, Collection, CollectionSchema, CollectionUpdate, Document, Field,
    FieldAlteration, FieldType, Synonym, SynonymDefinition,
};
