//! LinkedIn connection endpoints
//!
//! Thin HTTP surface over the provider client and the connection
//! workflow. Retry policy lives with the mobile caller; these handlers
//! surface upstream messages as-is.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::AppState;
use crate::connection::{ConnectOutcome, ConnectionStatus, connect_linkedin_user};
use crate::error::AppError;
use crate::provider::{
    CreateHostedAuthLinkRequest, CreateHostedAuthLinkResponse, HostedAuthLinkMode,
    InvitationsPage, InvitationsQuery,
};

/// Create the LinkedIn router.
///
/// Routes:
/// - POST /linkedin/hosted-auth-link - start the hosted auth flow
/// - GET /linkedin/profiles/:identifier - profile plus derived status
/// - POST /linkedin/connect - send a connection request
/// - GET /linkedin/invitations - list sent invitations
pub fn linkedin_router() -> Router<AppState> {
    Router::new()
        .route("/linkedin/hosted-auth-link", post(create_hosted_auth_link))
        .route("/linkedin/profiles/:identifier", get(get_profile_status))
        .route("/linkedin/connect", post(connect))
        .route("/linkedin/invitations", get(get_invitations))
}

// =============================================================================
// Hosted auth
// =============================================================================

/// Request body for starting the hosted auth flow
#[derive(Debug, Deserialize)]
struct HostedAuthLinkBody {
    /// Application user id; becomes the webhook correlation id
    user_id: String,
    /// "create" (default) or "reconnect"
    mode: Option<HostedAuthLinkMode>,
}

/// POST /api/linkedin/hosted-auth-link
///
/// Builds the provider request with the user id as the correlation
/// `name` and the configured webhook as `notify_url`. The caller drives
/// the user through the returned URL; completion arrives via webhook.
async fn create_hosted_auth_link(
    State(state): State<AppState>,
    Json(body): Json<HostedAuthLinkBody>,
) -> Result<Json<CreateHostedAuthLinkResponse>, AppError> {
    // The webhook can only reconcile events for known users.
    if state.db.get_profile(&body.user_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let expiry_seconds = state.config.provider.hosted_auth_expiry_seconds;
    let request = CreateHostedAuthLinkRequest {
        mode: body.mode.unwrap_or(HostedAuthLinkMode::Create),
        api_url: None,
        expires_on: Utc::now() + Duration::seconds(expiry_seconds as i64),
        providers: vec!["LINKEDIN".to_string()],
        notify_url: Some(state.config.provider.notify_url(&state.config.server)),
        name: Some(body.user_id.clone()),
    };

    let response = state.provider.create_hosted_auth_link(&request).await?;
    tracing::info!(user_id = %body.user_id, link_id = %response.id, "Hosted auth link created");
    Ok(Json(response))
}

// =============================================================================
// Profile + status
// =============================================================================

/// Query parameters carrying the caller's connected account id
#[derive(Debug, Deserialize)]
struct AccountScope {
    account_id: String,
}

/// GET /api/linkedin/profiles/:identifier?account_id=
///
/// Fetches the profile fresh and derives the connection status in the
/// same response, so the status can never be stale relative to the
/// profile it was derived from.
async fn get_profile_status(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(scope): Query<AccountScope>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = state
        .provider
        .get_profile_by_identifier(&identifier, &scope.account_id)
        .await?;
    let status = ConnectionStatus::of_profile(&profile);

    Ok(Json(serde_json::json!({
        "profile": profile,
        "connection_status": status,
    })))
}

// =============================================================================
// Connect
// =============================================================================

/// Request body for a connection attempt
#[derive(Debug, Deserialize)]
struct ConnectBody {
    /// Target's public identifier
    public_identifier: String,
    /// Caller's connected account id
    account_id: String,
}

/// POST /api/linkedin/connect
///
/// Always responds 200; the outcome (including failures) is a
/// user-facing result body, not an HTTP error.
async fn connect(
    State(state): State<AppState>,
    Json(body): Json<ConnectBody>,
) -> Json<ConnectOutcome> {
    let outcome =
        connect_linkedin_user(&state.provider, &body.public_identifier, &body.account_id).await;
    Json(outcome)
}

// =============================================================================
// Invitations
// =============================================================================

/// Query parameters for the sent-invitations list
#[derive(Debug, Deserialize)]
struct InvitationsParams {
    account_id: String,
    cursor: Option<String>,
    limit: Option<u32>,
}

/// GET /api/linkedin/invitations?account_id=&cursor=&limit=
async fn get_invitations(
    State(state): State<AppState>,
    Query(params): Query<InvitationsParams>,
) -> Result<Json<InvitationsPage>, AppError> {
    let page = state
        .provider
        .get_invitations_paginated(&InvitationsQuery {
            account_id: params.account_id,
            cursor: params.cursor,
            limit: params.limit,
        })
        .await?;
    Ok(Json(page))
}
