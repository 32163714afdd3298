//! [`FakeServer`]: an in-memory [`TypesenseApi`] implementation
//!
//! Holds collections, documents, synonyms, and aliases in plain maps, records
//! every call in a journal, and supports one-shot failure injection so tests
//! can exercise error paths without a network.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use typesense_client::{
    Alias, AliasDefinition, Collection, CollectionSchema, CollectionUpdate, Document, Error,
    FieldAlteration, Result, Synonym, SynonymDefinition, TypesenseApi,
};

const CREATED_AT: i64 = 1_700_000_000;

#[derive(Default)]
struct Remote {
    collections: BTreeMap<String, Collection>,
    documents: BTreeMap<(String, String), Document>,
    synonyms: BTreeMap<(String, String), Synonym>,
    aliases: BTreeMap<String, Alias>,
}

/// In-memory stand-in for a Typesense server.
///
/// # Example
///
/// ```rust,no_run
/// use typesense_test_utils::FakeServer;
///
/// let server = FakeServer::new();
/// server.fail_next("retrieve_collection", 500, "boom");
/// ```
#[derive(Default)]
pub struct FakeServer {
    remote: Mutex<Remote>,
    journal: Mutex<Vec<String>>,
    failures: Mutex<Vec<(String, u16, String)>>,
    strip_synonym_roots: Mutex<bool>,
}

impl FakeServer {
    /// Create an empty server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call to `operation` fail with the given status.
    ///
    /// Status 404 is surfaced as `Error::NotFound`, anything else as
    /// `Error::Api`. The injection is consumed by the first matching call.
    pub fn fail_next(&self, operation: &str, status: u16, message: &str) {
        self.failures.lock().unwrap().push((
            operation.to_string(),
            status,
            message.to_string(),
        ));
    }

    /// Omit the root word from synonym reads, as some server versions do.
    pub fn strip_synonym_roots(&self, strip: bool) {
        *self.strip_synonym_roots.lock().unwrap() = strip;
    }

    /// Every call made so far, formatted as `"<operation> <target>"`.
    pub fn calls(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }

    /// Assert that `call` (formatted as `"<operation> <target>"`) happened.
    ///
    /// # Panics
    /// Panics with the full journal if the call is absent.
    pub fn assert_called(&self, call: &str) {
        let journal = self.journal.lock().unwrap();
        assert!(
            journal.iter().any(|entry| entry == call),
            "expected call {call:?}, journal: {journal:?}"
        );
    }

    /// Assert that no call matching `call` happened.
    ///
    /// # Panics
    /// Panics with the full journal if the call is present.
    pub fn assert_not_called(&self, call: &str) {
        let journal = self.journal.lock().unwrap();
        assert!(
            !journal.iter().any(|entry| entry == call),
            "unexpected call {call:?}, journal: {journal:?}"
        );
    }

    /// Seed a collection with an empty schema, bypassing the journal.
    pub fn seed_collection(&self, name: &str) {
        let mut remote = self.remote.lock().unwrap();
        remote.collections.insert(
            name.to_string(),
            Collection {
                name: name.to_string(),
                default_sorting_field: None,
                enable_nested_fields: None,
                symbols_to_index: None,
                token_separators: None,
                fields: Vec::new(),
                num_documents: Some(0),
                created_at: Some(CREATED_AT),
            },
        );
    }

    /// Remove a collection behind the reconciler's back, simulating drift.
    pub fn evict_collection(&self, name: &str) {
        let mut remote = self.remote.lock().unwrap();
        remote.collections.remove(name);
        remote.documents.retain(|(collection, _), _| collection != name);
        remote.synonyms.retain(|(collection, _), _| collection != name);
    }

    /// Remove a document behind the reconciler's back, simulating drift.
    pub fn evict_document(&self, collection: &str, id: &str) {
        self.remote
            .lock()
            .unwrap()
            .documents
            .remove(&(collection.to_string(), id.to_string()));
    }

    /// Current schema of the named collection, if present.
    pub fn collection(&self, name: &str) -> Option<Collection> {
        self.remote.lock().unwrap().collections.get(name).cloned()
    }

    /// Current body of the identified document, if present.
    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.remote
            .lock()
            .unwrap()
            .documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    /// Current definition of the identified synonym, if present.
    pub fn synonym(&self, collection: &str, id: &str) -> Option<Synonym> {
        self.remote
            .lock()
            .unwrap()
            .synonyms
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    /// Current target of the named alias, if present.
    pub fn alias(&self, name: &str) -> Option<Alias> {
        self.remote.lock().unwrap().aliases.get(name).cloned()
    }

    /// Journal the call and surface any injected failure.
    fn record(&self, operation: &str, target: &str) -> Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{operation} {target}"));

        let mut failures = self.failures.lock().unwrap();
        if let Some(position) = failures.iter().position(|(op, _, _)| op == operation) {
            let (_, status, message) = failures.remove(position);
            return Err(injected(status, message));
        }
        Ok(())
    }
}

fn injected(status: u16, message: String) -> Error {
    if status == 404 {
        Error::NotFound { message }
    } else {
        Error::Api { status, message }
    }
}

fn not_found(kind: &str, target: &str) -> Error {
    Error::NotFound {
        message: format!("{kind} {target} not found"),
    }
}

#[async_trait]
impl TypesenseApi for FakeServer {
    async fn create_collection(&self, schema: &CollectionSchema) -> Result<Collection> {
        self.record("create_collection", &schema.name)?;
        let mut remote = self.remote.lock().unwrap();
        if remote.collections.contains_key(&schema.name) {
            return Err(Error::Api {
                status: 409,
                message: format!("collection {} already exists", schema.name),
            });
        }
        let collection = Collection {
            name: schema.name.clone(),
            default_sorting_field: schema.default_sorting_field.clone(),
            enable_nested_fields: schema.enable_nested_fields,
            symbols_to_index: schema.symbols_to_index.clone(),
            token_separators: schema.token_separators.clone(),
            fields: schema.fields.clone(),
            num_documents: Some(0),
            created_at: Some(CREATED_AT),
        };
        remote
            .collections
            .insert(schema.name.clone(), collection.clone());
        Ok(collection)
    }

    async fn retrieve_collection(&self, name: &str) -> Result<Collection> {
        self.record("retrieve_collection", name)?;
        self.remote
            .lock()
            .unwrap()
            .collections
            .get(name)
            .cloned()
            .ok_or_else(|| not_found("collection", name))
    }

    async fn update_collection(&self, name: &str, update: &CollectionUpdate) -> Result<()> {
        self.record("update_collection", name)?;
        let mut remote = self.remote.lock().unwrap();
        let collection = remote
            .collections
            .get_mut(name)
            .ok_or_else(|| not_found("collection", name))?;

        for alteration in &update.fields {
            match alteration {
                FieldAlteration::Drop { name, .. } => {
                    collection.fields.retain(|field| field.name != *name);
                }
                FieldAlteration::Define(field) => {
                    collection.fields.push(field.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.record("delete_collection", name)?;
        let mut remote = self.remote.lock().unwrap();
        if remote.collections.remove(name).is_none() {
            return Err(not_found("collection", name));
        }
        remote.documents.retain(|(collection, _), _| collection != name);
        remote.synonyms.retain(|(collection, _), _| collection != name);
        Ok(())
    }

    async fn create_document(&self, collection: &str, document: &Document) -> Result<Document> {
        let id = document
            .get("id")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();
        self.record("create_document", &format!("{collection}/{id}"))?;

        let mut remote = self.remote.lock().unwrap();
        if !remote.collections.contains_key(collection) {
            return Err(not_found("collection", collection));
        }
        if id.is_empty() {
            return Err(Error::Api {
                status: 400,
                message: "document is missing an id".to_string(),
            });
        }
        remote
            .documents
            .insert((collection.to_string(), id.clone()), document.clone());
        Ok(document.clone())
    }

    async fn retrieve_document(&self, collection: &str, id: &str) -> Result<Document> {
        self.record("retrieve_document", &format!("{collection}/{id}"))?;
        self.remote
            .lock()
            .unwrap()
            .documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
            .ok_or_else(|| not_found("document", id))
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
    ) -> Result<()> {
        self.record("update_document", &format!("{collection}/{id}"))?;
        let mut remote = self.remote.lock().unwrap();
        let key = (collection.to_string(), id.to_string());
        if !remote.documents.contains_key(&key) {
            return Err(not_found("document", id));
        }
        remote.documents.insert(key, document.clone());
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.record("delete_document", &format!("{collection}/{id}"))?;
        let removed = self
            .remote
            .lock()
            .unwrap()
            .documents
            .remove(&(collection.to_string(), id.to_string()));
        if removed.is_none() {
            return Err(not_found("document", id));
        }
        Ok(())
    }

    async fn upsert_synonym(
        &self,
        collection: &str,
        id: &str,
        definition: &SynonymDefinition,
    ) -> Result<Synonym> {
        self.record("upsert_synonym", &format!("{collection}/{id}"))?;
        let mut remote = self.remote.lock().unwrap();
        if !remote.collections.contains_key(collection) {
            return Err(not_found("collection", collection));
        }
        let synonym = Synonym {
            id: id.to_string(),
            root: definition.root.clone(),
            synonyms: definition.synonyms.clone(),
        };
        remote
            .synonyms
            .insert((collection.to_string(), id.to_string()), synonym.clone());
        Ok(synonym)
    }

    async fn retrieve_synonym(&self, collection: &str, id: &str) -> Result<Synonym> {
        self.record("retrieve_synonym", &format!("{collection}/{id}"))?;
        let mut synonym = self
            .remote
            .lock()
            .unwrap()
            .synonyms
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
            .ok_or_else(|| not_found("synonym", id))?;
        if *self.strip_synonym_roots.lock().unwrap() {
            synonym.root = None;
        }
        Ok(synonym)
    }

    async fn delete_synonym(&self, collection: &str, id: &str) -> Result<()> {
        self.record("delete_synonym", &format!("{collection}/{id}"))?;
        let removed = self
            .remote
            .lock()
            .unwrap()
            .synonyms
            .remove(&(collection.to_string(), id.to_string()));
        if removed.is_none() {
            return Err(not_found("synonym", id));
        }
        Ok(())
    }

    async fn upsert_alias(&self, name: &str, definition: &AliasDefinition) -> Result<Alias> {
        self.record("upsert_alias", name)?;
        let alias = Alias {
            name: name.to_string(),
            collection_name: definition.collection_name.clone(),
        };
        self.remote
            .lock()
            .unwrap()
            .aliases
            .insert(name.to_string(), alias.clone());
        Ok(alias)
    }

    async fn retrieve_alias(&self, name: &str) -> Result<Alias> {
        self.record("retrieve_alias", name)?;
        self.remote
            .lock()
            .unwrap()
            .aliases
            .get(name)
            .cloned()
            .ok_or_else(|| not_found("alias", name))
    }

    async fn delete_alias(&self, name: &str) -> Result<()> {
        self.record("delete_alias", name)?;
        if self.remote.lock().unwrap().aliases.remove(name).is_none() {
            return Err(not_found("alias", name));
        }
        Ok(())
    }
}
