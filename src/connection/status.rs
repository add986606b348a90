//! Connection status derivation
//!
//! The status between the caller and a target profile is derived from
//! a freshly fetched provider profile on every read. It is never
//! stored, so it cannot go stale against the provider's live
//! relationship graph.

use serde::Serialize;
use serde_json::Value;

use crate::provider::ProviderProfile;

/// Derived connection status between the caller and a target profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Already connected
    Connected,
    /// An invitation was sent and is awaiting a response
    Pending,
    /// No relationship and no pending sent invitation
    None,
    /// The profile data could not be evaluated
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Pending => "pending",
            Self::None => "none",
            Self::Error => "error",
        }
    }

    /// Derive the status from a typed profile.
    ///
    /// Typed input cannot be malformed, so this never yields `Error`.
    pub fn of_profile(profile: &ProviderProfile) -> Self {
        if profile.is_relationship {
            return Self::Connected;
        }

        if let Some(invitation) = &profile.invitation {
            if invitation.kind == "SENT" && invitation.status == "PENDING" {
                return Self::Pending;
            }
        }

        Self::None
    }
}

/// Result of a status derivation
///
/// `error` carries the reason when `status` is `Error`.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatusResult {
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Derive the connection status from raw profile JSON.
///
/// Decision order:
/// 1. `is_relationship == true` -> connected
/// 2. `invitation.type == "SENT" && invitation.status == "PENDING"` -> pending
/// 3. otherwise -> none
///
/// Malformed input becomes the `Error` status with a message attached;
/// this function never fails past its own boundary.
pub fn resolve_status(profile: &Value) -> ConnectionStatusResult {
    match evaluate(profile) {
        Ok(status) => ConnectionStatusResult {
            status,
            error: None,
        },
        Err(message) => ConnectionStatusResult {
            status: ConnectionStatus::Error,
            error: Some(message),
        },
    }
}

fn evaluate(profile: &Value) -> Result<ConnectionStatus, String> {
    let object = profile
        .as_object()
        .ok_or_else(|| "profile is not a JSON object".to_string())?;

    let is_relationship = match object.get("is_relationship") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => return Err(format!("is_relationship is not a boolean: {other}")),
    };

    if is_relationship {
        return Ok(ConnectionStatus::Connected);
    }

    match object.get("invitation") {
        None | Some(Value::Null) => Ok(ConnectionStatus::None),
        Some(Value::Object(invitation)) => {
            let kind = invitation.get("type").and_then(Value::as_str);
            let status = invitation.get("status").and_then(Value::as_str);
            if kind == Some("SENT") && status == Some("PENDING") {
                Ok(ConnectionStatus::Pending)
            } else {
                Ok(ConnectionStatus::None)
            }
        }
        Some(other) => Err(format!("invitation is not an object: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn relationship_wins_regardless_of_invitation() {
        let result = resolve_status(&json!({
            "is_relationship": true,
            "invitation": { "type": "SENT", "status": "PENDING" },
        }));
        assert_eq!(result.status, ConnectionStatus::Connected);
        assert!(result.error.is_none());
    }

    #[test]
    fn sent_pending_invitation_is_pending() {
        let result = resolve_status(&json!({
            "is_relationship": false,
            "invitation": { "type": "SENT", "status": "PENDING" },
        }));
        assert_eq!(result.status, ConnectionStatus::Pending);
    }

    #[test]
    fn no_signals_is_none() {
        let result = resolve_status(&json!({ "provider_id": "P1" }));
        assert_eq!(result.status, ConnectionStatus::None);
    }

    #[test]
    fn received_invitation_is_none() {
        let result = resolve_status(&json!({
            "is_relationship": false,
            "invitation": { "type": "RECEIVED", "status": "PENDING" },
        }));
        assert_eq!(result.status, ConnectionStatus::None);
    }

    #[test]
    fn sent_non_pending_invitation_is_none() {
        let result = resolve_status(&json!({
            "invitation": { "type": "SENT", "status": "IGNORED" },
        }));
        assert_eq!(result.status, ConnectionStatus::None);
    }

    #[test]
    fn non_object_profile_is_error_with_message() {
        let result = resolve_status(&Value::Null);
        assert_eq!(result.status, ConnectionStatus::Error);
        assert!(!result.error.unwrap().is_empty());
    }

    #[test]
    fn wrongly_typed_relationship_flag_is_error() {
        let result = resolve_status(&json!({ "is_relationship": "yes" }));
        assert_eq!(result.status, ConnectionStatus::Error);
        assert!(result.error.unwrap().contains("is_relationship"));
    }

    #[test]
    fn wrongly_typed_invitation_is_error() {
        let result = resolve_status(&json!({ "invitation": "SENT" }));
        assert_eq!(result.status, ConnectionStatus::Error);
    }

    #[test]
    fn typed_profile_derivation_matches_raw() {
        use crate::provider::{ProfileInvitation, ProviderProfile};

        let profile: ProviderProfile = serde_json::from_value(json!({
            "provider_id": "P1",
            "invitation": { "type": "SENT", "status": "PENDING" },
        }))
        .unwrap();
        assert_eq!(
            ConnectionStatus::of_profile(&profile),
            ConnectionStatus::Pending
        );

        let connected = ProviderProfile {
            is_relationship: true,
            invitation: Some(ProfileInvitation {
                kind: "SENT".to_string(),
                status: "PENDING".to_string(),
            }),
            ..profile
        };
        assert_eq!(
            ConnectionStatus::of_profile(&connected),
            ConnectionStatus::Connected
        );
    }
}
