//! Data models
//!
//! Rust structs representing database entities.
//! Profile ids are caller-supplied and match the auth identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable application profile record
///
/// Created at registration, mutated by the webhook when hosted auth
/// completes, never deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    /// Matches the auth identity id
    pub id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Tri-state: `None` means a connection was never attempted
    pub linkedin_connected: Option<bool>,
    /// Provider public identifier, populated asynchronously by the webhook
    pub linkedin_profile_id: Option<String>,
    /// Provider account id, set at webhook time; scopes all provider
    /// calls made on behalf of this user afterwards
    pub unipile_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a profile at registration
#[derive(Debug, Clone, Deserialize)]
pub struct NewUserProfile {
    pub id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Patchable profile fields (self-service updates)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl UserProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.display_name.is_none()
    }
}
