//! HTTP implementation of [`TypesenseApi`] over reqwest

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::api::TypesenseApi;
use crate::error::{Error, Result};
use crate::model::{
    Alias, AliasDefinition, Collection, CollectionSchema, CollectionUpdate, Document, Synonym,
    SynonymDefinition,
};

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Client for a Typesense server, authenticated with a static API key
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpClient {
    /// Create a client for the server at `base_url`.
    ///
    /// A trailing slash on the address is tolerated and stripped.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .request(reqwest::Method::GET, &self.url(path))
            .send()
            .await?;
        read_json(resp).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let resp = self
            .request(reqwest::Method::DELETE, &self.url(path))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl TypesenseApi for HttpClient {
    async fn create_collection(&self, schema: &CollectionSchema) -> Result<Collection> {
        let resp = self
            .request(reqwest::Method::POST, &self.url("/collections"))
            .json(schema)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn retrieve_collection(&self, name: &str) -> Result<Collection> {
        self.get_json(&format!("/collections/{name}")).await
    }

    async fn update_collection(&self, name: &str, update: &CollectionUpdate) -> Result<()> {
        let resp = self
            .request(reqwest::Method::PATCH, &self.url(&format!("/collections/{name}")))
            .json(update)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.delete(&format!("/collections/{name}")).await
    }

    async fn create_document(&self, collection: &str, document: &Document) -> Result<Document> {
        let resp = self
            .request(
                reqwest::Method::POST,
                &self.url(&format!("/collections/{collection}/documents")),
            )
            .json(document)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn retrieve_document(&self, collection: &str, id: &str) -> Result<Document> {
        self.get_json(&format!("/collections/{collection}/documents/{id}"))
            .await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
    ) -> Result<()> {
        let resp = self
            .request(
                reqwest::Method::PATCH,
                &self.url(&format!("/collections/{collection}/documents/{id}")),
            )
            .json(document)
            .send()
            .await?;
        // Strictly the documented success code. The server occasionally
        // answers 201 for document upserts; that surfaces as Api { 201 } and
        // the caller decides whether to forgive it.
        if resp.status().as_u16() != 200 {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.delete(&format!("/collections/{collection}/documents/{id}"))
            .await
    }

    async fn upsert_synonym(
        &self,
        collection: &str,
        id: &str,
        definition: &SynonymDefinition,
    ) -> Result<Synonym> {
        let resp = self
            .request(
                reqwest::Method::PUT,
                &self.url(&format!("/collections/{collection}/synonyms/{id}")),
            )
            .json(definition)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn retrieve_synonym(&self, collection: &str, id: &str) -> Result<Synonym> {
        self.get_json(&format!("/collections/{collection}/synonyms/{id}"))
            .await
    }

    async fn delete_synonym(&self, collection: &str, id: &str) -> Result<()> {
        self.delete(&format!("/collections/{collection}/synonyms/{id}"))
            .await
    }

    async fn upsert_alias(&self, name: &str, definition: &AliasDefinition) -> Result<Alias> {
        let resp = self
            .request(reqwest::Method::PUT, &self.url(&format!("/aliases/{name}")))
            .json(definition)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn retrieve_alias(&self, name: &str) -> Result<Alias> {
        self.get_json(&format!("/aliases/{name}")).await
    }

    async fn delete_alias(&self, name: &str) -> Result<()> {
        self.delete(&format!("/aliases/{name}")).await
    }
}

/// Reject non-success responses, passing successful ones through.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(error_from_response(resp).await)
    }
}

/// Read a successful response body as JSON.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let resp = check_status(resp).await?;
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Build a typed error from a non-success response.
///
/// The server wraps diagnostics as `{"message": "..."}`; fall back to the
/// raw body when that shape is absent.
async fn error_from_response(resp: reqwest::Response) -> Error {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);

    if status == 404 {
        Error::NotFound { message }
    } else {
        Error::Api { status, message }
    }
}
