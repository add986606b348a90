//! Provider API request/response types
//!
//! The provider still returns a handful of legacy field names next to
//! their current equivalents. Those collapse into one normalized shape
//! here via serde aliases; nothing downstream sees both spellings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Hosted auth link
// =============================================================================

/// Hosted auth link mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostedAuthLinkMode {
    /// First-time account connection
    Create,
    /// Re-authenticate an existing connected account
    Reconnect,
}

/// Request body for `POST /api/v1/hosted/accounts/link`
#[derive(Debug, Clone, Serialize)]
pub struct CreateHostedAuthLinkRequest {
    #[serde(rename = "type")]
    pub mode: HostedAuthLinkMode,
    /// Provider API base URL (DSN), echoed back by some deployments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Link expiry timestamp (RFC 3339)
    #[serde(rename = "expiresOn")]
    pub expires_on: DateTime<Utc>,
    /// Target providers, e.g. ["LINKEDIN"]
    pub providers: Vec<String>,
    /// Webhook URL the provider notifies once auth completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    /// Caller-supplied correlation id, echoed in the webhook `name` field.
    /// Set to the application user id so the callback can be matched to
    /// a profile record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response from `POST /api/v1/hosted/accounts/link`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateHostedAuthLinkResponse {
    /// Hosted auth URL to drive the user through out-of-band
    pub url: String,
    /// Opaque link id (not tracked further by this system)
    pub id: String,
    #[serde(rename = "expiresOn")]
    pub expires_on: String,
}

// =============================================================================
// Profile
// =============================================================================

/// A LinkedIn profile as seen through the provider
///
/// Fetched fresh on every status check; never persisted locally.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderProfile {
    /// Provider-internal opaque id, required to send an invitation.
    /// Legacy deployments return this as `id`.
    #[serde(alias = "id")]
    pub provider_id: Option<String>,
    /// Human-readable slug identifying the member.
    /// Legacy deployments return this as `identifier`.
    #[serde(alias = "identifier")]
    pub public_identifier: Option<String>,
    pub member_urn: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub is_influencer: bool,
    #[serde(default)]
    pub is_creator: bool,
    /// True if the caller's account is already connected to this member
    #[serde(default)]
    pub is_relationship: bool,
    pub network_distance: Option<String>,
    #[serde(default)]
    pub is_self: bool,
    pub follower_count: Option<u64>,
    #[serde(alias = "connection_count")]
    pub connections_count: Option<u64>,
    /// Present when an invitation exists between the two members
    pub invitation: Option<ProfileInvitation>,
    pub profile_picture_url: Option<String>,
}

/// Invitation signal embedded in a fetched profile
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileInvitation {
    /// "SENT" or "RECEIVED"
    #[serde(rename = "type")]
    pub kind: String,
    /// "PENDING", etc.
    pub status: String,
}

// =============================================================================
// Invitations
// =============================================================================

/// Request body for `POST /api/v1/users/invite`
#[derive(Debug, Clone, Serialize)]
pub struct SendInvitationRequest {
    /// Provider-internal id from a prior profile fetch,
    /// never the public identifier
    pub provider_id: String,
    /// Connected account that sends the invitation
    pub account_id: String,
}

/// Response from `POST /api/v1/users/invite`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendInvitationResponse {
    pub object: Option<String>,
    pub invitation_id: String,
    /// Invitation quota usage counter reported by the provider
    pub usage: Option<u64>,
}

/// A previously sent connection request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Invitation {
    pub id: String,
    pub object: Option<String>,
    pub date: Option<String>,
    pub parsed_datetime: Option<String>,
    pub invitation_text: Option<String>,
    pub invited_user: Option<String>,
    pub invited_user_description: Option<String>,
    pub invited_user_id: Option<String>,
    pub invited_user_public_id: Option<String>,
}

/// Cursor-paginated list envelope from the invitations endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvitationsPage {
    pub items: Vec<Invitation>,
    pub has_more: bool,
    pub cursor: Option<String>,
    pub total_count: Option<u64>,
}

/// Pagination parameters for the sent-invitations list
#[derive(Debug, Clone)]
pub struct InvitationsQuery {
    pub account_id: String,
    pub cursor: Option<String>,
    /// Page size (default: 100)
    pub limit: Option<u32>,
}

// =============================================================================
// Account detail (webhook enrichment)
// =============================================================================

/// Response from `GET /api/v1/accounts/{account_id}`
///
/// Only the fields the enrichment step needs are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountDetail {
    pub id: Option<String>,
    pub name: Option<String>,
    pub connection_params: Option<ConnectionParams>,
}

/// Per-protocol connection parameters on an account detail
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionParams {
    pub im: Option<ImParams>,
}

/// Instant-messaging connection parameters
#[derive(Debug, Clone, Deserialize)]
pub struct ImParams {
    #[serde(rename = "publicIdentifier")]
    pub public_identifier: Option<String>,
}

impl AccountDetail {
    /// Durable public identifier of the connected account, if reported.
    pub fn public_identifier(&self) -> Option<&str> {
        self.connection_params
            .as_ref()?
            .im
            .as_ref()?
            .public_identifier
            .as_deref()
    }
}
