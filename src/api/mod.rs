//! HTTP API layer
//!
//! - `profiles`: registration-time profile records
//! - `linkedin`: connection workflow endpoints backed by the provider

pub mod linkedin;
pub mod profiles;

use axum::Router;

use crate::AppState;

/// Create the `/api` router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(profiles::profiles_router())
        .merge(linkedin::linkedin_router())
}
