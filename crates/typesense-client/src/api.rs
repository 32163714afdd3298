//! The `TypesenseApi` trait: per-resource CRUD operations
//!
//! Reconcilers depend on this trait, never on a concrete transport, so tests
//! substitute an in-memory implementation and production wires in
//! [`HttpClient`](crate::HttpClient).

use async_trait::async_trait;

use crate::Result;
use crate::model::{
    Alias, AliasDefinition, Collection, CollectionSchema, CollectionUpdate, Document, Synonym,
    SynonymDefinition,
};

/// Typed CRUD surface of the Typesense admin API
///
/// Every operation is single-shot: no retry, backoff, or timeout policy is
/// applied here. A missing resource is reported as
/// [`Error::NotFound`](crate::Error::NotFound); callers decide whether that
/// is recoverable.
#[async_trait]
pub trait TypesenseApi: Send + Sync {
    async fn create_collection(&self, schema: &CollectionSchema) -> Result<Collection>;
    async fn retrieve_collection(&self, name: &str) -> Result<Collection>;
    async fn update_collection(&self, name: &str, update: &CollectionUpdate) -> Result<()>;
    async fn delete_collection(&self, name: &str) -> Result<()>;

    async fn create_document(&self, collection: &str, document: &Document) -> Result<Document>;
    async fn retrieve_document(&self, collection: &str, id: &str) -> Result<Document>;
    async fn update_document(&self, collection: &str, id: &str, document: &Document)
    -> Result<()>;
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;

    async fn upsert_synonym(
        &self,
        collection: &str,
        id: &str,
        definition: &SynonymDefinition,
    ) -> Result<Synonym>;
    async fn retrieve_synonym(&self, collection: &str, id: &str) -> Result<Synonym>;
    async fn delete_synonym(&self, collection: &str, id: &str) -> Result<()>;

    async fn upsert_alias(&self, name: &str, definition: &AliasDefinition) -> Result<Alias>;
    async fn retrieve_alias(&self, name: &str) -> Result<Alias>;
    async fn delete_alias(&self, name: &str) -> Result<()>;
}
