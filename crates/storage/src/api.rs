//! Remote API storage backend.
//!
//! Each operation maps 1:1 to an HTTP call against the configured base
//! URL, carrying the session token as a bearer credential. The backend
//! answers with the uniform `{success, data, error, message}` envelope;
//! non-2xx statuses are translated into the storage error kinds: 404 to
//! `NotFound`, 401 to `Unauthorized`, everything else (including network
//! failure and non-JSON bodies) to `StorageUnavailable`.

use std::marker::PhantomData;
use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use async_trait::async_trait;
use debtfolio_core::errors::{Error, Result};
use debtfolio_core::storage::{EntityStore, StoredEntity};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct ApiStore<E> {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderValue,
    _entity: PhantomData<fn() -> E>,
}

impl<E: StoredEntity> ApiStore<E> {
    pub fn new(base_url: &str, access_token: &str) -> Result<Self> {
        let auth_header = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| Error::Unexpected(format!("Invalid access token format: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
            _entity: PhantomData,
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, E::COLLECTION)
    }

    fn entity_url(&self, id: &str) -> String {
        format!("{}/{}/{id}", self.base_url, E::COLLECTION)
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<&E>,
    ) -> Result<(StatusCode, String)> {
        debug!("[ApiStore] {method} {url}");
        let mut request = self.client.request(method, &url).headers(self.headers());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::StorageUnavailable(format!("Request failed: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::StorageUnavailable(format!("Failed to read response: {e}")))?;
        Ok((status, text))
    }

    /// Translate a non-2xx response into the matching error kind.
    fn translate_failure(status: StatusCode, body: &str, context: &str) -> Error {
        let remote_message = serde_json::from_str::<Envelope<serde_json::Value>>(body)
            .ok()
            .and_then(|envelope| envelope.error.or(envelope.message));
        match status {
            StatusCode::NOT_FOUND => Error::NotFound(context.to_string()),
            StatusCode::UNAUTHORIZED => Error::Unauthorized(
                remote_message.unwrap_or_else(|| "rejected by storage backend".to_string()),
            ),
            _ => Error::StorageUnavailable(format!(
                "API error {status}: {}",
                remote_message.unwrap_or_else(|| body.chars().take(200).collect())
            )),
        }
    }

    async fn expect_data<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<&E>,
        context: &str,
    ) -> Result<T> {
        let (status, text) = self.send(method, url, body).await?;
        if !status.is_success() {
            return Err(Self::translate_failure(status, &text, context));
        }
        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| Error::StorageUnavailable(format!("Malformed response: {e}")))?;
        if !envelope.success {
            return Err(Error::StorageUnavailable(
                envelope
                    .error
                    .unwrap_or_else(|| "backend reported failure".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| Error::StorageUnavailable("Response carried no data".to_string()))
    }

    fn context(id: &str) -> String {
        format!("{} '{id}'", E::COLLECTION)
    }
}

#[async_trait]
impl<E: StoredEntity> EntityStore<E> for ApiStore<E> {
    async fn list(&self) -> Result<Vec<E>> {
        self.expect_data(Method::GET, self.collection_url(), None, E::COLLECTION)
            .await
    }

    async fn get(&self, id: &str) -> Result<E> {
        self.expect_data(Method::GET, self.entity_url(id), None, &Self::context(id))
            .await
    }

    async fn save(&self, entity: E) -> Result<E> {
        if entity.id().is_empty() {
            self.expect_data(
                Method::POST,
                self.collection_url(),
                Some(&entity),
                E::COLLECTION,
            )
            .await
        } else {
            let url = self.entity_url(entity.id());
            let context = Self::context(entity.id());
            self.expect_data(Method::PUT, url, Some(&entity), &context)
                .await
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let (status, text) = self
            .send(Method::DELETE, self.entity_url(id), None)
            .await?;
        if !status.is_success() {
            return Err(Self::translate_failure(status, &text, &Self::context(id)));
        }
        Ok(())
    }
}
