//! Provider API client
//!
//! Thin typed wrapper over the provider's HTTP API. Each operation
//! builds a URL against the configured base, attaches the cached API
//! key, issues the call, and surfaces failures as
//! `AppError::ProviderRequest` carrying the operation name and the
//! upstream message. No retries happen here; retry policy belongs to
//! the caller.

use std::sync::Arc;

use reqwest::{Method, StatusCode, header};
use serde::de::DeserializeOwned;

use super::credentials::CredentialCache;
use super::types::*;
use crate::error::AppError;
use crate::metrics::{PROVIDER_REQUEST_DURATION_SECONDS, PROVIDER_REQUESTS_TOTAL};

/// Default page size for the sent-invitations list
const DEFAULT_INVITATIONS_LIMIT: u32 = 100;

/// Client for the messaging-provider HTTP API
pub struct ProviderClient {
    http_client: Arc<reqwest::Client>,
    /// Base URL without trailing slash, e.g. "https://api14.unipile.com:14496"
    base_url: String,
    credentials: Arc<CredentialCache>,
}

impl ProviderClient {
    /// Create a new client against the given base URL.
    pub fn new(
        http_client: Arc<reqwest::Client>,
        base_url: impl Into<String>,
        credentials: Arc<CredentialCache>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
            credentials,
        }
    }

    /// Create a hosted auth link.
    ///
    /// The caller is responsible for driving the user through the
    /// returned URL out-of-band; completion is reported through the
    /// webhook, not through this call.
    pub async fn create_hosted_auth_link(
        &self,
        request: &CreateHostedAuthLinkRequest,
    ) -> Result<CreateHostedAuthLinkResponse, AppError> {
        const OPERATION: &str = "create_hosted_auth_link";
        let builder = self
            .request(Method::POST, "/api/v1/hosted/accounts/link", OPERATION)
            .await?
            .json(request);
        self.execute(OPERATION, builder).await
    }

    /// Fetch a profile by its public identifier, scoped to the caller's
    /// connected account.
    pub async fn get_profile_by_identifier(
        &self,
        identifier: &str,
        account_id: &str,
    ) -> Result<ProviderProfile, AppError> {
        const OPERATION: &str = "get_profile_by_identifier";
        let path = format!(
            "/api/v1/users/{}?account_id={}",
            urlencoding::encode(identifier),
            urlencoding::encode(account_id)
        );
        let builder = self.request(Method::GET, &path, OPERATION).await?;
        self.execute(OPERATION, builder).await
    }

    /// Send a connection invitation.
    ///
    /// `provider_id` must come from a prior profile fetch; the public
    /// identifier is not accepted by this endpoint.
    pub async fn send_invitation(
        &self,
        request: &SendInvitationRequest,
    ) -> Result<SendInvitationResponse, AppError> {
        const OPERATION: &str = "send_invitation";
        let builder = self
            .request(Method::POST, "/api/v1/users/invite", OPERATION)
            .await?
            .json(request);
        self.execute(OPERATION, builder).await
    }

    /// List all sent invitations for an account (first page, provider default size).
    pub async fn get_invitations(&self, account_id: &str) -> Result<InvitationsPage, AppError> {
        const OPERATION: &str = "get_invitations";
        let path = format!(
            "/api/v1/users/invite/sent?account_id={}",
            urlencoding::encode(account_id)
        );
        let builder = self.request(Method::GET, &path, OPERATION).await?;
        self.execute(OPERATION, builder).await
    }

    /// List sent invitations with explicit cursor pagination.
    ///
    /// Omitting the cursor starts from the beginning; the limit defaults
    /// to 100.
    pub async fn get_invitations_paginated(
        &self,
        query: &InvitationsQuery,
    ) -> Result<InvitationsPage, AppError> {
        const OPERATION: &str = "get_invitations_paginated";
        let limit = query.limit.unwrap_or(DEFAULT_INVITATIONS_LIMIT);
        let mut path = format!(
            "/api/v1/users/invite/sent?account_id={}&limit={}",
            urlencoding::encode(&query.account_id),
            limit
        );
        if let Some(cursor) = &query.cursor {
            path.push_str("&cursor=");
            path.push_str(&urlencoding::encode(cursor));
        }
        let builder = self.request(Method::GET, &path, OPERATION).await?;
        self.execute(OPERATION, builder).await
    }

    /// Fetch account details for a connected account.
    ///
    /// Used by the webhook handler to resolve the durable public
    /// identifier after hosted auth completes.
    pub async fn get_account(&self, account_id: &str) -> Result<AccountDetail, AppError> {
        const OPERATION: &str = "get_account";
        let path = format!("/api/v1/accounts/{}", urlencoding::encode(account_id));
        let builder = self.request(Method::GET, &path, OPERATION).await?;
        self.execute(OPERATION, builder).await
    }

    /// Build a request with the cached API key attached.
    async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        operation: &'static str,
    ) -> Result<reqwest::RequestBuilder, AppError> {
        let api_key = self.credentials.get().await?;
        let url = format!("{}{}", self.base_url, path_and_query);
        tracing::debug!(%operation, %url, "Provider request");
        Ok(self
            .http_client
            .request(method, url)
            .header("X-API-KEY", api_key)
            .header(header::ACCEPT, "application/json"))
    }

    /// Issue the call and decode the response.
    ///
    /// Non-2xx responses and transport/decode failures all map to
    /// `AppError::ProviderRequest` with the upstream message attached.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, AppError> {
        let timer = PROVIDER_REQUEST_DURATION_SECONDS
            .with_label_values(&[operation])
            .start_timer();
        let result = builder.send().await;
        timer.observe_duration();

        let response = result.map_err(|e| {
            PROVIDER_REQUESTS_TOTAL
                .with_label_values(&[operation, "transport_error"])
                .inc();
            AppError::ProviderRequest {
                operation,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        PROVIDER_REQUESTS_TOTAL
            .with_label_values(&[operation, status.as_str()])
            .inc();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(status, &body);
            tracing::warn!(%operation, %status, %message, "Provider returned error");
            return Err(AppError::ProviderRequest { operation, message });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ProviderRequest {
                operation,
                message: format!("invalid response body: {e}"),
            })
    }
}

/// Extract a human-readable message from an error response body.
///
/// The provider usually returns JSON; fall back to the raw text, then
/// to the HTTP status line for empty bodies.
fn upstream_message(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status.to_string();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(value) => value.to_string(),
        Err(_) => body.to_string(),
    }
}
