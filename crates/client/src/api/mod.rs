//! Equipment backend API client.
//!
//! Every outbound call goes through [`ApiClient`]: it attaches the bearer
//! token and applies the global authorization policy. The token is read from
//! the durably persisted session blob at request time rather than from the
//! in-memory store, so a freshly restarted process authenticates correctly
//! before any store has been touched.
//!
//! # 401 policy
//!
//! Any response with status 401 - whichever endpoint produced it - means the
//! backend no longer honors the session. The gateway invalidates the session
//! store first (clearing both in-memory and persisted state, and the cart via
//! the session observer) and only then surfaces [`ApiError::Unauthorized`].
//! Front-ends route that error to the login entry point. Invalidate-first
//! ordering guarantees a restart can never resurrect the rejected credentials.
//!
//! No retries anywhere: a failed request is terminal for that user action.

mod auth;
mod equipment;
mod requests;
pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use toolcrib_core::EquipmentId;

use crate::config::ClientConfig;
use crate::session::{Session, SessionStore};
use crate::storage::{StateRepository, keys};
use types::Equipment;

/// Fallback shown when an error response carries no usable message.
const GENERIC_ERROR_MESSAGE: &str = "request failed; please try again";

/// Catalog cache TTL.
const CATALOG_CACHE_TTL: std::time::Duration = std::time::Duration::from_secs(300);

/// Errors that can occur when talking to the equipment backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected the session; it has been invalidated.
    #[error("authorization rejected - sign in again")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, or a generic fallback.
        message: String,
    },
}

/// Error body shape used by the backend. Both field names occur in the wild.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Extract a human-readable message from an error response body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_owned())
}

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(crate) enum CacheKey {
    Catalog,
    Item(EquipmentId),
}

/// Cached catalog values.
#[derive(Debug, Clone)]
pub(crate) enum CacheValue {
    Catalog(Vec<Equipment>),
    Item(Box<Equipment>),
}

/// Client for the equipment backend REST API.
///
/// Cheaply cloneable; catalog reads are cached for five minutes and the
/// cache is dropped on any catalog mutation.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn StateRepository>,
    session: SessionStore,
    catalog_cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn StateRepository>,
        session: SessionStore,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .expect("Failed to create HTTP client");

        let catalog_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.as_str().trim_end_matches('/').to_owned(),
                storage,
                session,
                catalog_cache,
            }),
        }
    }

    /// Build the absolute URL for an API path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Read the bearer token from the persisted session blob.
    ///
    /// Reading durable state (not the in-memory store) at request time is
    /// deliberate: it tolerates process restarts that happened after login.
    fn bearer_token(&self) -> Option<String> {
        let blob = self.inner.storage.load(keys::AUTH_STORAGE).ok()??;
        let session: Session = serde_json::from_str(&blob).ok()?;
        session.access_token
    }

    /// Attach credentials, send, and apply the global status policy.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let request = match self.bearer_token() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Invalidate-then-surface: stale credentials must be gone before
            // the caller can react to the error.
            self.inner.session.invalidate();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        Ok(response)
    }

    /// GET a JSON resource.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.inner.http.get(self.endpoint(path))).await?;
        Ok(response.json().await?)
    }

    /// GET a JSON resource with a query string.
    pub(crate) async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .execute(self.inner.http.get(self.endpoint(path)).query(query))
            .await?;
        Ok(response.json().await?)
    }

    /// POST a JSON body, expecting a JSON response.
    pub(crate) async fn post_json<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(self.inner.http.post(self.endpoint(path)).json(body))
            .await?;
        Ok(response.json().await?)
    }

    /// POST a JSON body, ignoring the response body.
    pub(crate) async fn post_json_unit<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.execute(self.inner.http.post(self.endpoint(path)).json(body))
            .await?;
        Ok(())
    }

    /// POST with an empty body, ignoring the response body.
    pub(crate) async fn post_unit(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.inner.http.post(self.endpoint(path)))
            .await?;
        Ok(())
    }

    /// Send a multipart form, expecting a JSON response.
    pub(crate) async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(
                self.inner
                    .http
                    .request(method, self.endpoint(path))
                    .multipart(form),
            )
            .await?;
        Ok(response.json().await?)
    }

    /// DELETE a resource, ignoring the response body.
    pub(crate) async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.inner.http.delete(self.endpoint(path)))
            .await?;
        Ok(())
    }

    pub(crate) fn catalog_cache(&self) -> &Cache<CacheKey, CacheValue> {
        &self.inner.catalog_cache
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn client() -> ApiClient {
        let storage: Arc<dyn StateRepository> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&storage));
        let config = ClientConfig::new("http://localhost:8080/api/", "/tmp/unused").unwrap();
        ApiClient::new(&config, storage, session)
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = client();
        assert_eq!(
            client.endpoint("/equipment"),
            "http://localhost:8080/api/equipment"
        );
        assert_eq!(
            client.endpoint("requests/my"),
            "http://localhost:8080/api/requests/my"
        );
    }

    #[test]
    fn test_bearer_token_reads_persisted_blob() {
        let storage: Arc<dyn StateRepository> = Arc::new(MemoryStore::new());
        storage
            .save(
                keys::AUTH_STORAGE,
                r#"{"user":{"id":1,"name":"U","email":"user@test.com","role":"USER"},"accessToken":"tok-123","refreshToken":"r","isAuthenticated":true}"#,
            )
            .unwrap();
        let session = SessionStore::new(Arc::clone(&storage));
        let config = ClientConfig::new("http://localhost:8080/api", "/tmp/unused").unwrap();
        let client = ApiClient::new(&config, storage, session);

        assert_eq!(client.bearer_token().as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_bearer_token_absent_without_session() {
        assert!(client().bearer_token().is_none());
    }

    #[test]
    fn test_extract_error_message_prefers_message_field() {
        assert_eq!(
            extract_error_message(r#"{"message":"stock exhausted","error":"ignored"}"#),
            "stock exhausted"
        );
    }

    #[test]
    fn test_extract_error_message_falls_back_to_error_field() {
        assert_eq!(
            extract_error_message(r#"{"error":"bad category"}"#),
            "bad category"
        );
    }

    #[test]
    fn test_extract_error_message_generic_fallback() {
        assert_eq!(extract_error_message("<html>nope</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_error_message(""), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_error_message(r#"{"message":""}"#), GENERIC_ERROR_MESSAGE);
    }
}
