//! Hosted backend-as-a-service storage backend.
//!
//! Maps the storage contract onto the hosted document service's
//! query/insert/update/delete primitives. Requests are authenticated
//! with an API key; records live in named collections and the service
//! assigns identifiers on insert. Error-kind translation follows the
//! same discipline as the remote API backend.

use std::marker::PhantomData;
use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use async_trait::async_trait;
use debtfolio_core::errors::{Error, Result};
use debtfolio_core::storage::{EntityStore, StoredEntity};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const API_KEY_HEADER: &str = "x-api-key";

#[derive(Serialize)]
struct RecordQuery<'a> {
    collection: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

#[derive(Serialize)]
struct RecordWrite<'a, E> {
    collection: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    record: &'a E,
}

#[derive(Deserialize)]
struct QueryResponse<E> {
    records: Vec<E>,
}

#[derive(Deserialize)]
struct RecordResponse<E> {
    record: E,
}

#[derive(Deserialize)]
struct ServiceError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct HostedStore<E> {
    client: reqwest::Client,
    base_url: String,
    api_key: HeaderValue,
    _entity: PhantomData<fn() -> E>,
}

impl<E: StoredEntity> HostedStore<E> {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let api_key = HeaderValue::from_str(api_key)
            .map_err(|e| Error::Unexpected(format!("Invalid API key format: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            _entity: PhantomData,
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, self.api_key.clone());
        headers
    }

    async fn call<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        operation: &str,
        body: &B,
        context: &str,
    ) -> Result<T> {
        let url = format!("{}/v1/records/{operation}", self.base_url);
        debug!("[HostedStore] POST {url}");
        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(|e| Error::StorageUnavailable(format!("Request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::StorageUnavailable(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::translate_failure(status, &text, context));
        }
        serde_json::from_str(&text)
            .map_err(|e| Error::StorageUnavailable(format!("Malformed response: {e}")))
    }

    fn translate_failure(status: StatusCode, body: &str, context: &str) -> Error {
        let remote_message = serde_json::from_str::<ServiceError>(body)
            .ok()
            .and_then(|err| err.message.or(err.error));
        match status {
            StatusCode::NOT_FOUND => Error::NotFound(context.to_string()),
            StatusCode::UNAUTHORIZED => Error::Unauthorized(
                remote_message.unwrap_or_else(|| "rejected by hosted service".to_string()),
            ),
            _ => Error::StorageUnavailable(format!(
                "Hosted service error {status}: {}",
                remote_message.unwrap_or_else(|| body.chars().take(200).collect())
            )),
        }
    }

    fn context(id: &str) -> String {
        format!("{} '{id}'", E::COLLECTION)
    }
}

#[async_trait]
impl<E: StoredEntity> EntityStore<E> for HostedStore<E> {
    async fn list(&self) -> Result<Vec<E>> {
        let response: QueryResponse<E> = self
            .call(
                "query",
                &RecordQuery {
                    collection: E::COLLECTION,
                    id: None,
                },
                E::COLLECTION,
            )
            .await?;
        Ok(response.records)
    }

    async fn get(&self, id: &str) -> Result<E> {
        let response: QueryResponse<E> = self
            .call(
                "query",
                &RecordQuery {
                    collection: E::COLLECTION,
                    id: Some(id),
                },
                &Self::context(id),
            )
            .await?;
        response
            .records
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(Self::context(id)))
    }

    async fn save(&self, entity: E) -> Result<E> {
        let response: RecordResponse<E> = if entity.id().is_empty() {
            // The service assigns the identifier on insert.
            self.call(
                "insert",
                &RecordWrite {
                    collection: E::COLLECTION,
                    id: None,
                    record: &entity,
                },
                E::COLLECTION,
            )
            .await?
        } else {
            let context = Self::context(entity.id());
            self.call(
                "update",
                &RecordWrite {
                    collection: E::COLLECTION,
                    id: Some(entity.id()),
                    record: &entity,
                },
                &context,
            )
            .await?
        };
        Ok(response.record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "delete",
                &RecordQuery {
                    collection: E::COLLECTION,
                    id: Some(id),
                },
                &Self::context(id),
            )
            .await?;
        Ok(())
    }
}
