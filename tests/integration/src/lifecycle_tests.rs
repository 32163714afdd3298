//! End-to-end lifecycle tests
//!
//! These tests exercise the complete flow: settings resolution -> reconciler
//! construction -> create/read/update/delete across every resource kind, with
//! [`FakeServer`] standing in for the remote Typesense instance.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use typesense_client::{Document, Field, FieldType};
use typesense_core::{
    AliasReconciler, AliasSpec, CollectionReconciler, CollectionSpec, DocumentReconciler,
    DocumentSpec, Observation, Reconcile, Settings, SynonymReconciler, SynonymSpec,
};
use typesense_test_utils::FakeServer;

fn setup() -> Arc<FakeServer> {
    typesense_test_utils::logging::init();
    Arc::new(FakeServer::new())
}

fn books_spec() -> CollectionSpec {
    CollectionSpec {
        name: "books".to_string(),
        default_sorting_field: Some("year".to_string()),
        enable_nested_fields: false,
        symbols_to_index: Vec::new(),
        token_separators: vec!["-".to_string()],
        fields: vec![
            Field::new("title", FieldType::String),
            Field::new("year", FieldType::Int32),
        ],
    }
}

fn book(title: &str) -> Document {
    let mut body = Document::new();
    body.insert("title".to_string(), json!(title));
    body
}

#[test]
fn settings_resolution_feeds_the_client() {
    let settings = Settings {
        api_key: None,
        api_address: Some("http://localhost:8108/".to_string()),
    };
    let credentials = settings
        .resolve_with(|name| (name == "TYPESENSE_API_KEY").then(|| "secret".to_string()))
        .unwrap();

    assert_eq!(credentials.api_key, "secret");
    // Construction is all that is needed; no request leaves this test.
    let _client = typesense_client::HttpClient::new(&credentials.api_address, &credentials.api_key);
}

#[tokio::test]
async fn full_catalog_lifecycle() {
    let server = setup();
    let collections = CollectionReconciler::new(server.clone());
    let documents = DocumentReconciler::new(server.clone());
    let synonyms = SynonymReconciler::new(server.clone());
    let aliases = AliasReconciler::new(server.clone());

    // Provision the collection and its dependents.
    let collection = collections.create(&books_spec()).await.unwrap();

    let document_spec = DocumentSpec {
        collection: "books".to_string(),
        name: "moby-dick".to_string(),
        body: book("Moby Dick"),
    };
    let document = documents.create(&document_spec).await.unwrap();
    assert_eq!(document.id.to_string(), "books.moby-dick");

    let synonym_spec = SynonymSpec {
        collection: "books".to_string(),
        name: "ship-words".to_string(),
        root: None,
        synonyms: vec!["ship".to_string(), "vessel".to_string()],
    };
    let synonym = synonyms.create(&synonym_spec).await.unwrap();

    let alias_spec = AliasSpec {
        name: "catalog".to_string(),
        collection_name: "books".to_string(),
    };
    let alias = aliases.create(&alias_spec).await.unwrap();

    // Evolve the schema: facet the title, add a field, drop another.
    let mut faceted_title = Field::new("title", FieldType::String);
    faceted_title.facet = Some(true);
    let evolved = CollectionSpec {
        fields: vec![faceted_title, Field::new("author", FieldType::String)],
        ..books_spec()
    };
    let collection = collections.update(&collection, &evolved).await.unwrap();
    assert_eq!(collection.fields, evolved.fields);

    let remote_fields: Vec<&str> = server
        .collection("books")
        .unwrap()
        .fields
        .iter()
        .map(|field| field.name.as_str())
        .collect();
    assert!(remote_fields.contains(&"author"));
    assert!(!remote_fields.contains(&"year"));

    // Everything reads back as present.
    assert!(collections.read(&collection).await.unwrap().is_present());
    assert!(documents.read(&document).await.unwrap().is_present());
    assert!(synonyms.read(&synonym).await.unwrap().is_present());
    assert!(aliases.read(&alias).await.unwrap().is_present());

    // Tear down in reverse dependency order.
    aliases.delete(&alias).await.unwrap();
    synonyms.delete(&synonym).await.unwrap();
    documents.delete(&document).await.unwrap();
    collections.delete(&collection).await.unwrap();

    assert!(server.collection("books").is_none());
    assert!(server.alias("catalog").is_none());
}

#[tokio::test]
async fn drift_is_observed_and_repaired_by_recreation() {
    let server = setup();
    let collections = CollectionReconciler::new(server.clone());
    let documents = DocumentReconciler::new(server.clone());

    let collection = collections.create(&books_spec()).await.unwrap();
    let document_spec = DocumentSpec {
        collection: "books".to_string(),
        name: "moby-dick".to_string(),
        body: book("Moby Dick"),
    };
    let document = documents.create(&document_spec).await.unwrap();

    // Someone deletes the collection out from under us.
    server.evict_collection("books");

    assert_eq!(
        collections.read(&collection).await.unwrap(),
        Observation::Absent
    );
    assert_eq!(
        documents.read(&document).await.unwrap(),
        Observation::Absent
    );

    // Recreating converges back to the desired state.
    let collection = collections.create(&books_spec()).await.unwrap();
    let document = documents.create(&document_spec).await.unwrap();
    assert!(collections.read(&collection).await.unwrap().is_present());
    assert!(documents.read(&document).await.unwrap().is_present());
}

#[tokio::test]
async fn alias_follows_a_blue_green_collection_swap() {
    let server = setup();
    let collections = CollectionReconciler::new(server.clone());
    let aliases = AliasReconciler::new(server.clone());

    let blue = collections
        .create(&CollectionSpec {
            name: "books-v1".to_string(),
            ..books_spec()
        })
        .await
        .unwrap();
    let alias = aliases
        .create(&AliasSpec {
            name: "catalog".to_string(),
            collection_name: "books-v1".to_string(),
        })
        .await
        .unwrap();

    let green = collections
        .create(&CollectionSpec {
            name: "books-v2".to_string(),
            ..books_spec()
        })
        .await
        .unwrap();
    let alias = aliases
        .update(
            &alias,
            &AliasSpec {
                name: "catalog".to_string(),
                collection_name: "books-v2".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(alias.collection_name, "books-v2");

    collections.delete(&blue).await.unwrap();
    assert!(collections.read(&green).await.unwrap().is_present());
    assert_eq!(server.alias("catalog").unwrap().collection_name, "books-v2");
}
