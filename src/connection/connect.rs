//! Connection orchestration
//!
//! Sequences "fetch profile -> resolve provider id -> send invitation"
//! into a single user-facing result. Failures become a structured
//! outcome instead of an error, because the caller renders a message
//! rather than crashing.

use serde::Serialize;

use super::status::ConnectionStatus;
use crate::metrics::CONNECTION_ATTEMPTS_TOTAL;
use crate::provider::{ProviderClient, SendInvitationRequest};

/// User-facing result of a connection attempt
///
/// Serialized in camelCase, matching the webhook acknowledgement body.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectOutcome {
    pub success: bool,
    #[serde(rename = "invitationId", skip_serializing_if = "Option::is_none")]
    pub invitation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectOutcome {
    fn success(invitation_id: String) -> Self {
        Self {
            success: true,
            invitation_id: Some(invitation_id),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            invitation_id: None,
            error: Some(error.into()),
        }
    }
}

/// Connect with a LinkedIn member.
///
/// # Steps
/// 1. Fetch the target's profile by public identifier, scoped to the
///    caller's connected account
/// 2. Require a provider id on the fetched profile
/// 3. Refuse to send when the derived status is already connected or
///    pending, so rapid repeated attempts cannot double-invite
/// 4. Send the invitation using the resolved provider id
///
/// The two provider calls are strictly sequential; the send must
/// observe the provider id resolved by the fetch.
pub async fn connect_linkedin_user(
    provider: &ProviderClient,
    public_identifier: &str,
    account_id: &str,
) -> ConnectOutcome {
    let profile = match provider
        .get_profile_by_identifier(public_identifier, account_id)
        .await
    {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(
                %public_identifier,
                error = %e,
                "Connection attempt failed: profile unavailable"
            );
            CONNECTION_ATTEMPTS_TOTAL
                .with_label_values(&["profile_unavailable"])
                .inc();
            return ConnectOutcome::failure(format!("LinkedIn profile unavailable: {e}"));
        }
    };

    let Some(provider_id) = profile.provider_id.clone() else {
        CONNECTION_ATTEMPTS_TOTAL
            .with_label_values(&["profile_unavailable"])
            .inc();
        return ConnectOutcome::failure(
            "LinkedIn profile unavailable: provider id missing from profile",
        );
    };

    match ConnectionStatus::of_profile(&profile) {
        ConnectionStatus::Connected => {
            CONNECTION_ATTEMPTS_TOTAL
                .with_label_values(&["already_connected"])
                .inc();
            return ConnectOutcome::failure("Already connected with this profile");
        }
        ConnectionStatus::Pending => {
            CONNECTION_ATTEMPTS_TOTAL
                .with_label_values(&["already_pending"])
                .inc();
            return ConnectOutcome::failure("A connection request is already pending");
        }
        ConnectionStatus::None | ConnectionStatus::Error => {}
    }

    let invitation = match provider
        .send_invitation(&SendInvitationRequest {
            provider_id,
            account_id: account_id.to_string(),
        })
        .await
    {
        Ok(invitation) => invitation,
        Err(e) => {
            tracing::warn!(
                %public_identifier,
                error = %e,
                "Connection attempt failed: invitation send rejected"
            );
            CONNECTION_ATTEMPTS_TOTAL
                .with_label_values(&["send_failed"])
                .inc();
            return ConnectOutcome::failure(e.to_string());
        }
    };

    tracing::info!(
        %public_identifier,
        invitation_id = %invitation.invitation_id,
        "Connection invitation sent"
    );
    CONNECTION_ATTEMPTS_TOTAL
        .with_label_values(&["sent"])
        .inc();
    ConnectOutcome::success(invitation.invitation_id)
}
