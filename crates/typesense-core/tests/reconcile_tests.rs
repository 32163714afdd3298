//! Reconciler behavior against an in-memory server
//!
//! These tests drive every reconciler through its lifecycle with
//! [`FakeServer`] standing in for the remote side, including the drift and
//! failure paths that are awkward to provoke against a real server.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use typesense_client::{Document, Field, FieldType};
use typesense_core::{
    AliasReconciler, AliasSpec, CollectionReconciler, CollectionSpec, DocumentReconciler,
    DocumentSpec, Error, Observation, Reconcile, SynonymReconciler, SynonymSpec,
};
use typesense_test_utils::FakeServer;

fn server() -> Arc<FakeServer> {
    typesense_test_utils::logging::init();
    Arc::new(FakeServer::new())
}

fn collection_spec(name: &str, fields: Vec<Field>) -> CollectionSpec {
    CollectionSpec {
        name: name.to_string(),
        default_sorting_field: None,
        enable_nested_fields: false,
        symbols_to_index: Vec::new(),
        token_separators: Vec::new(),
        fields,
    }
}

fn document_body(pairs: &[(&str, Value)]) -> Document {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

mod collection {
    use super::*;

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let server = server();
        let reconciler = CollectionReconciler::new(server.clone());
        let spec = collection_spec("books", vec![Field::new("title", FieldType::String)]);

        let state = reconciler.create(&spec).await.unwrap();
        assert_eq!(state.id, "books");
        assert_eq!(state.fields, spec.fields);

        let observed = reconciler.read(&state).await.unwrap();
        assert_eq!(observed, Observation::Present(state));
    }

    #[tokio::test]
    async fn read_reports_drift_when_collection_is_gone() {
        let server = server();
        let reconciler = CollectionReconciler::new(server.clone());
        let state = reconciler
            .create(&collection_spec("books", vec![]))
            .await
            .unwrap();

        server.evict_collection("books");

        let observed = reconciler.read(&state).await.unwrap();
        assert_eq!(observed, Observation::Absent);
    }

    #[tokio::test]
    async fn update_converges_remote_fields() {
        let server = server();
        let reconciler = CollectionReconciler::new(server.clone());
        let state = reconciler
            .create(&collection_spec(
                "books",
                vec![
                    Field::new("title", FieldType::String),
                    Field::new("year", FieldType::Int32),
                ],
            ))
            .await
            .unwrap();

        let mut faceted_title = Field::new("title", FieldType::String);
        faceted_title.facet = Some(true);
        let desired = collection_spec(
            "books",
            vec![faceted_title.clone(), Field::new("pages", FieldType::Int32)],
        );

        let updated = reconciler.update(&state, &desired).await.unwrap();
        assert_eq!(updated.fields, desired.fields);

        let remote = server.collection("books").unwrap();
        let mut names: Vec<&str> = remote.fields.iter().map(|f| f.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["pages", "title"]);
        assert!(remote.fields.contains(&faceted_title));
    }

    #[tokio::test]
    async fn update_without_changes_skips_the_remote_call() {
        let server = server();
        let reconciler = CollectionReconciler::new(server.clone());
        let spec = collection_spec("books", vec![Field::new("title", FieldType::String)]);
        let state = reconciler.create(&spec).await.unwrap();

        let updated = reconciler.update(&state, &spec).await.unwrap();
        assert_eq!(updated, state);
        server.assert_not_called("update_collection books");
    }

    #[tokio::test]
    async fn delete_tolerates_an_already_absent_collection() {
        let server = server();
        let reconciler = CollectionReconciler::new(server.clone());
        let state = reconciler
            .create(&collection_spec("books", vec![]))
            .await
            .unwrap();

        reconciler.delete(&state).await.unwrap();
        reconciler.delete(&state).await.unwrap();
    }

    #[tokio::test]
    async fn remote_failure_is_wrapped_with_operation_context() {
        let server = server();
        let reconciler = CollectionReconciler::new(server.clone());
        server.fail_next("create_collection", 503, "lagging");

        let err = reconciler
            .create(&collection_spec("books", vec![]))
            .await
            .unwrap_err();
        match err {
            Error::Remote { operation, kind, .. } => {
                assert_eq!(operation, "create");
                assert_eq!(kind, "collection");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn read_failure_other_than_not_found_is_an_error() {
        let server = server();
        let reconciler = CollectionReconciler::new(server.clone());
        let state = reconciler
            .create(&collection_spec("books", vec![]))
            .await
            .unwrap();

        server.fail_next("retrieve_collection", 500, "boom");
        assert!(reconciler.read(&state).await.is_err());
    }
}

mod document {
    use super::*;

    #[tokio::test]
    async fn create_injects_the_name_and_strips_the_echoed_id() {
        let server = server();
        server.seed_collection("books");
        let reconciler = DocumentReconciler::new(server.clone());
        let spec = DocumentSpec {
            collection: "books".to_string(),
            name: "moby-dick".to_string(),
            body: document_body(&[("title", json!("Moby Dick"))]),
        };

        let state = reconciler.create(&spec).await.unwrap();
        assert_eq!(state.id.to_string(), "books.moby-dick");
        assert!(!state.body.contains_key("id"));

        let stored = server.document("books", "moby-dick").unwrap();
        assert_eq!(stored.get("id"), Some(&json!("moby-dick")));
    }

    #[tokio::test]
    async fn create_rejects_a_body_with_a_reserved_id_key() {
        let server = server();
        server.seed_collection("books");
        let reconciler = DocumentReconciler::new(server.clone());
        let spec = DocumentSpec {
            collection: "books".to_string(),
            name: "moby-dick".to_string(),
            body: document_body(&[("id", json!("sneaky"))]),
        };

        let err = reconciler.create(&spec).await.unwrap_err();
        assert!(matches!(err, Error::ReservedDocumentKey { .. }));
        server.assert_not_called("create_document books/moby-dick");
    }

    #[tokio::test]
    async fn read_strips_the_id_and_reports_drift_after_eviction() {
        let server = server();
        server.seed_collection("books");
        let reconciler = DocumentReconciler::new(server.clone());
        let spec = DocumentSpec {
            collection: "books".to_string(),
            name: "moby-dick".to_string(),
            body: document_body(&[("title", json!("Moby Dick"))]),
        };
        let state = reconciler.create(&spec).await.unwrap();

        match reconciler.read(&state).await.unwrap() {
            Observation::Present(refreshed) => {
                assert!(!refreshed.body.contains_key("id"));
                assert_eq!(refreshed.body.get("title"), Some(&json!("Moby Dick")));
            }
            Observation::Absent => panic!("expected the document to be present"),
        }

        server.evict_document("books", "moby-dick");
        assert_eq!(reconciler.read(&state).await.unwrap(), Observation::Absent);
    }

    #[tokio::test]
    async fn update_forgives_a_201_response() {
        let server = server();
        server.seed_collection("books");
        let reconciler = DocumentReconciler::new(server.clone());
        let spec = DocumentSpec {
            collection: "books".to_string(),
            name: "moby-dick".to_string(),
            body: document_body(&[("title", json!("Moby Dick"))]),
        };
        let state = reconciler.create(&spec).await.unwrap();

        server.fail_next("update_document", 201, "Created");
        let revised = DocumentSpec {
            body: document_body(&[("title", json!("Moby-Dick; or, The Whale"))]),
            ..spec
        };

        let updated = reconciler.update(&state, &revised).await.unwrap();
        assert_eq!(updated.body, revised.body);
    }

    #[tokio::test]
    async fn update_failure_other_than_201_is_an_error() {
        let server = server();
        server.seed_collection("books");
        let reconciler = DocumentReconciler::new(server.clone());
        let spec = DocumentSpec {
            collection: "books".to_string(),
            name: "moby-dick".to_string(),
            body: document_body(&[("title", json!("Moby Dick"))]),
        };
        let state = reconciler.create(&spec).await.unwrap();

        server.fail_next("update_document", 422, "schema mismatch");
        assert!(reconciler.update(&state, &spec).await.is_err());
    }

    #[tokio::test]
    async fn delete_tolerates_an_already_absent_document() {
        let server = server();
        server.seed_collection("books");
        let reconciler = DocumentReconciler::new(server.clone());
        let spec = DocumentSpec {
            collection: "books".to_string(),
            name: "moby-dick".to_string(),
            body: document_body(&[("title", json!("Moby Dick"))]),
        };
        let state = reconciler.create(&spec).await.unwrap();

        reconciler.delete(&state).await.unwrap();
        reconciler.delete(&state).await.unwrap();
    }
}

mod synonym {
    use super::*;

    fn synonym_spec(root: Option<&str>, synonyms: &[&str]) -> SynonymSpec {
        SynonymSpec {
            collection: "books".to_string(),
            name: "ship-words".to_string(),
            root: root.map(str::to_string),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn create_upserts_and_keys_by_name() {
        let server = server();
        server.seed_collection("books");
        let reconciler = SynonymReconciler::new(server.clone());

        let state = reconciler
            .create(&synonym_spec(None, &["ship", "vessel"]))
            .await
            .unwrap();
        assert_eq!(state.id.to_string(), "books.ship-words");

        let stored = server.synonym("books", "ship-words").unwrap();
        assert_eq!(stored.synonyms, vec!["ship", "vessel"]);
    }

    #[tokio::test]
    async fn empty_synonym_set_never_reaches_the_server() {
        let server = server();
        server.seed_collection("books");
        let reconciler = SynonymReconciler::new(server.clone());

        let err = reconciler.create(&synonym_spec(None, &[])).await.unwrap_err();
        assert!(matches!(err, Error::EmptySynonyms { .. }));
        server.assert_not_called("upsert_synonym books/ship-words");
    }

    #[tokio::test]
    async fn update_validates_before_the_remote_call() {
        let server = server();
        server.seed_collection("books");
        let reconciler = SynonymReconciler::new(server.clone());
        let state = reconciler
            .create(&synonym_spec(None, &["ship"]))
            .await
            .unwrap();

        let err = reconciler
            .update(&state, &synonym_spec(None, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptySynonyms { .. }));
    }

    #[tokio::test]
    async fn read_keeps_the_known_root_when_the_server_omits_it() {
        let server = server();
        server.seed_collection("books");
        let reconciler = SynonymReconciler::new(server.clone());
        let state = reconciler
            .create(&synonym_spec(Some("boat"), &["ship", "vessel"]))
            .await
            .unwrap();

        server.strip_synonym_roots(true);

        match reconciler.read(&state).await.unwrap() {
            Observation::Present(refreshed) => {
                assert_eq!(refreshed.root.as_deref(), Some("boat"));
                assert_eq!(refreshed.synonyms, vec!["ship", "vessel"]);
            }
            Observation::Absent => panic!("expected the synonym to be present"),
        }
    }

    #[tokio::test]
    async fn delete_tolerates_an_already_absent_synonym() {
        let server = server();
        server.seed_collection("books");
        let reconciler = SynonymReconciler::new(server.clone());
        let state = reconciler
            .create(&synonym_spec(None, &["ship"]))
            .await
            .unwrap();

        reconciler.delete(&state).await.unwrap();
        reconciler.delete(&state).await.unwrap();
    }
}

mod alias {
    use super::*;

    fn alias_spec(collection: &str) -> AliasSpec {
        AliasSpec {
            name: "catalog".to_string(),
            collection_name: collection.to_string(),
        }
    }

    #[tokio::test]
    async fn create_points_the_alias_at_its_collection() {
        let server = server();
        let reconciler = AliasReconciler::new(server.clone());

        let state = reconciler.create(&alias_spec("books-v1")).await.unwrap();
        assert_eq!(state.id, "catalog");
        assert_eq!(state.collection_name, "books-v1");
        assert_eq!(server.alias("catalog").unwrap().collection_name, "books-v1");
    }

    #[tokio::test]
    async fn update_retargets_in_place() {
        let server = server();
        let reconciler = AliasReconciler::new(server.clone());
        let state = reconciler.create(&alias_spec("books-v1")).await.unwrap();

        let updated = reconciler
            .update(&state, &alias_spec("books-v2"))
            .await
            .unwrap();
        assert_eq!(updated.id, state.id);
        assert_eq!(updated.collection_name, "books-v2");
        assert_eq!(server.alias("catalog").unwrap().collection_name, "books-v2");
    }

    #[tokio::test]
    async fn read_reports_drift_when_the_alias_is_gone() {
        let server = server();
        let reconciler = AliasReconciler::new(server.clone());
        let state = reconciler.create(&alias_spec("books-v1")).await.unwrap();

        reconciler.delete(&state).await.unwrap();
        assert_eq!(reconciler.read(&state).await.unwrap(), Observation::Absent);
    }

    #[tokio::test]
    async fn delete_tolerates_an_already_absent_alias() {
        let server = server();
        let reconciler = AliasReconciler::new(server.clone());
        let state = reconciler.create(&alias_spec("books-v1")).await.unwrap();

        reconciler.delete(&state).await.unwrap();
        reconciler.delete(&state).await.unwrap();
    }
}
