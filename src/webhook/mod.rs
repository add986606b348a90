//! Provider webhook endpoint
//!
//! The provider calls `POST /unipile-webhook` after a hosted auth
//! session completes. One event per request; the handler reconciles the
//! event with the persisted profile record and then enriches it with
//! the durable public identifier.
//!
//! Every failure maps to an HTTP status; nothing propagates unhandled.
//! Redelivered events reapply the same keyed overwrite, so no
//! idempotency token is needed.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;

use crate::AppState;
use crate::data::Database;
use crate::error::AppError;
use crate::metrics::WEBHOOK_EVENTS_TOTAL;
use crate::provider::ProviderClient;

/// Statuses that mark a completed hosted auth session
const PROCESSED_STATUSES: [&str; 2] = ["CREATION_SUCCESS", "RECONNECTED"];

/// Metric label for a provider-supplied status string.
///
/// The provider controls the value, so anything outside the processed
/// set collapses to one label to keep cardinality bounded.
fn status_label(status: &str) -> &'static str {
    PROCESSED_STATUSES
        .iter()
        .find(|known| **known == status)
        .copied()
        .unwrap_or("other")
}

/// Outcome of applying one connection event
///
/// The primary update and the enrichment step fail independently;
/// recording both makes the partial-failure path assertable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookOutcome {
    /// `linkedin_connected` / `unipile_id` were written
    pub primary_update_ok: bool,
    /// `linkedin_profile_id` was resolved and written
    pub enrichment_ok: bool,
}

/// Create the webhook router.
///
/// Non-POST methods on the path are rejected with 405 by axum's
/// method routing.
pub fn webhook_router() -> Router<AppState> {
    Router::new().route("/unipile-webhook", post(handle_provider_webhook))
}

/// POST /unipile-webhook
///
/// State machine per event:
/// 1. Unparseable body -> 400
/// 2. `AccountStatus` heartbeat shape -> 200, ignored
/// 3. Missing `status` / `account_id` / `name` -> 400
/// 4. Status outside CREATION_SUCCESS/RECONNECTED -> 200, ignored
/// 5. Primary update (connected flag + account id) -> 500 on failure
/// 6. Enrichment (public identifier) -> soft failure unless the
///    persist itself fails
async fn handle_provider_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let event: Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Webhook body is not valid JSON");
            WEBHOOK_EVENTS_TOTAL
                .with_label_values(&["invalid", "rejected"])
                .inc();
            return AppError::WebhookValidation("invalid JSON body".to_string()).into_response();
        }
    };

    tracing::debug!(event = %event, "Received provider webhook");

    // Account-status heartbeats carry no connection outcome.
    if event.get("AccountStatus").is_some() {
        tracing::debug!("Ignoring webhook with AccountStatus heartbeat shape");
        WEBHOOK_EVENTS_TOTAL
            .with_label_values(&["heartbeat", "ignored"])
            .inc();
        return (StatusCode::OK, "Ignoring AccountStatus webhook").into_response();
    }

    let status = event.get("status").and_then(Value::as_str);
    let account_id = event.get("account_id").and_then(Value::as_str);
    // `name` carries the correlation id supplied at link-creation time,
    // which is the application's own user id.
    let user_id = event.get("name").and_then(Value::as_str);

    let (Some(status), Some(account_id), Some(user_id)) = (status, account_id, user_id) else {
        tracing::warn!(
            has_status = status.is_some(),
            has_account_id = account_id.is_some(),
            has_name = user_id.is_some(),
            "Webhook event missing required fields"
        );
        WEBHOOK_EVENTS_TOTAL
            .with_label_values(&["incomplete", "rejected"])
            .inc();
        return AppError::WebhookValidation(
            "missing required fields: status, account_id, name".to_string(),
        )
        .into_response();
    };

    if !PROCESSED_STATUSES.contains(&status) {
        tracing::info!(%status, "Ignoring webhook with unhandled status");
        WEBHOOK_EVENTS_TOTAL
            .with_label_values(&[status_label(status), "ignored"])
            .inc();
        return (StatusCode::OK, "Status not handled").into_response();
    }

    match apply_connection_event(&state.db, &state.provider, user_id, account_id).await {
        Ok(outcome) => {
            tracing::info!(
                %user_id,
                %account_id,
                enrichment_ok = outcome.enrichment_ok,
                "Webhook processed: LinkedIn connection recorded"
            );
            WEBHOOK_EVENTS_TOTAL
                .with_label_values(&[status_label(status), "processed"])
                .inc();
            Json(serde_json::json!({
                "success": true,
                "accountId": account_id,
                "userId": user_id,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!(%user_id, %account_id, error = %e, "Webhook processing failed");
            WEBHOOK_EVENTS_TOTAL
                .with_label_values(&[status_label(status), "failed"])
                .inc();
            // All processing failures are server-side conditions.
            AppError::Persistence(e.to_string()).into_response()
        }
    }
}

/// Apply a successful-connection event to the profile store.
///
/// The primary update commits first; the enrichment fetch is a
/// secondary step whose transport/shape failures are logged and
/// swallowed. Only a failure to persist an identifier that was
/// actually resolved is a hard error, since at that point the store
/// is known to be writable and the data is in hand.
pub async fn apply_connection_event(
    db: &Database,
    provider: &ProviderClient,
    user_id: &str,
    account_id: &str,
) -> Result<WebhookOutcome, AppError> {
    db.mark_linkedin_connected(user_id, account_id).await?;

    let detail = match provider.get_account(account_id).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::warn!(
                %account_id,
                error = %e,
                "Enrichment fetch failed; connection flag already committed"
            );
            return Ok(WebhookOutcome {
                primary_update_ok: true,
                enrichment_ok: false,
            });
        }
    };

    let Some(public_identifier) = detail.public_identifier() else {
        tracing::warn!(%account_id, "Account detail carries no public identifier");
        return Ok(WebhookOutcome {
            primary_update_ok: true,
            enrichment_ok: false,
        });
    };

    db.set_linkedin_profile_id(user_id, public_identifier)
        .await?;

    Ok(WebhookOutcome {
        primary_update_ok: true,
        enrichment_ok: true,
    })
}
