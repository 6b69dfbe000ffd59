// Firestore REST API client

mod codec;

use crate::document::{Document, Fields, Query};
use crate::error::{Result, StoreError};
use crate::{ContentStore, ContentWriter};
use async_trait::async_trait;
use codec::{RawDocument, RunQueryEntry};
use jobspot_core::FirestoreConfig;
use reqwest::{StatusCode, Url};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

const PRODUCTION_HOST: &str = "https://firestore.googleapis.com";

/// Firestore client speaking the v1 REST API.
///
/// Construct once at startup and share; `reqwest::Client` pools
/// connections internally.
pub struct FirestoreClient {
    client: reqwest::Client,
    documents_url: String,
    api_key: Option<String>,
}

impl FirestoreClient {
    /// Create new Firestore client
    pub fn new(config: &FirestoreConfig) -> Result<Self> {
        let host = match &config.emulator_host {
            Some(emulator) => format!("http://{}", emulator),
            None => PRODUCTION_HOST.to_string(),
        };

        let documents_url = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            host, config.project_id, config.database
        );

        // The emulator treats the literal token "owner" as an admin and
        // skips security rules.
        let token = match (&config.bearer_token, &config.emulator_host) {
            (Some(token), _) => Some(token.as_str()),
            (None, Some(_)) => Some("owner"),
            (None, None) => None,
        };

        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| StoreError::Unavailable(format!("invalid bearer token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            documents_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }

    /// URL of one document. Both parts are pushed as single percent-encoded
    /// path segments, so `#`, `?` and `/` in an id cannot change the request.
    pub fn document_url(&self, collection: &str, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.documents_url)
            .map_err(|e| StoreError::Unavailable(format!("invalid documents url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Unavailable("documents url cannot hold a path".to_string()))?
            .push(collection)
            .push(id);
        Ok(url)
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    /// Read the body, turning non-success statuses into `StoreError::Backend`
    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StoreError::Backend {
                status: status.as_u16(),
                message: codec::error_message(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl ContentStore for FirestoreClient {
    async fn run_query(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        let url = format!("{}:runQuery", self.documents_url);
        let body = codec::encode_query(collection, query);

        tracing::debug!(collection, ?query, "firestore runQuery");

        let response = self
            .with_key(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        let text = Self::read_body(response).await?;
        let entries: Vec<RunQueryEntry> = serde_json::from_str(&text)?;

        entries
            .into_iter()
            .filter_map(|entry| entry.document)
            .map(codec::decode_document)
            .collect()
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let url = self.document_url(collection, id)?;

        tracing::debug!(collection, id, "firestore get");

        let response = self.with_key(self.client.get(url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let text = Self::read_body(response).await?;
        let raw: RawDocument = serde_json::from_str(&text)?;

        codec::decode_document(raw).map(Some)
    }
}

#[async_trait]
impl ContentWriter for FirestoreClient {
    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String> {
        let url = format!("{}/{}", self.documents_url, collection);
        let body = serde_json::json!({ "fields": codec::encode_fields(&fields) });

        let response = self
            .with_key(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        let text = Self::read_body(response).await?;
        let raw: RawDocument = serde_json::from_str(&text)?;

        Ok(codec::decode_document(raw)?.id)
    }
}
