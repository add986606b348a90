//! Provider API key cache
//!
//! The provider API key is issued by an external endpoint and fetched
//! at most once per process. Concurrent first callers coalesce onto a
//! single in-flight fetch; once populated the value is read-only for
//! the remaining process lifetime.
//!
//! A provider error response never invalidates the cached key. A failed
//! issuance fetch is not cached either, so a later call retries.

use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::error::AppError;

/// Response body from the credential issuing endpoint
#[derive(Debug, serde::Deserialize)]
struct IssuedCredential {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

/// Lazily-fetched, process-lifetime API key cache
pub struct CredentialCache {
    /// HTTP client for the issuance fetch
    http_client: Arc<reqwest::Client>,
    /// Full URL of the key-issuing endpoint
    issuer_url: String,
    /// Application-level bearer token authenticating the issuance fetch
    bearer_token: String,
    /// The one credential slot; single-flight on initialization
    key: OnceCell<String>,
}

impl CredentialCache {
    /// Create a new, unpopulated cache
    pub fn new(
        http_client: Arc<reqwest::Client>,
        issuer_url: impl Into<String>,
        bearer_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            issuer_url: issuer_url.into(),
            bearer_token: bearer_token.into(),
            key: OnceCell::new(),
        }
    }

    /// Get the cached API key, fetching it from the issuer on first use.
    ///
    /// `OnceCell::get_or_try_init` serializes concurrent initializers, so
    /// at most one issuance fetch is ever in flight.
    ///
    /// # Errors
    /// `AppError::CredentialFetch` if the issuer is unreachable, returns
    /// a non-success status, or returns no key.
    pub async fn get(&self) -> Result<String, AppError> {
        let key = self.key.get_or_try_init(|| self.fetch()).await?;
        Ok(key.clone())
    }

    /// Whether a key has been fetched and cached already.
    pub fn is_populated(&self) -> bool {
        self.key.initialized()
    }

    async fn fetch(&self) -> Result<String, AppError> {
        tracing::debug!(issuer = %self.issuer_url, "Fetching provider API key from issuer");

        let response = self
            .http_client
            .get(&self.issuer_url)
            .bearer_auth(&self.bearer_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| AppError::CredentialFetch(format!("issuer unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::CredentialFetch(format!(
                "issuer returned status {status}"
            )));
        }

        let body: IssuedCredential = response
            .json()
            .await
            .map_err(|e| AppError::CredentialFetch(format!("invalid issuer response: {e}")))?;

        let key = body
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::CredentialFetch("apiKey missing from issuer response".to_string())
            })?;

        tracing::info!("Provider API key fetched and cached for process lifetime");
        Ok(key)
    }
}
