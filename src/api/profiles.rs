//! Profile endpoints
//!
//! Registration-time records; the LinkedIn connection fields on them
//! are written only by the webhook handler.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::AppState;
use crate::data::{NewUserProfile, UserProfile, UserProfilePatch};
use crate::error::AppError;

/// Create the profiles router.
///
/// Routes:
/// - GET /profiles - list all profiles, most recently updated first
/// - POST /profiles - create a profile at registration
/// - GET /profiles/:id - fetch one profile
/// - PATCH /profiles/:id - self-service field updates
pub fn profiles_router() -> Router<AppState> {
    Router::new()
        .route("/profiles", get(list_profiles).post(create_profile))
        .route(
            "/profiles/:id",
            get(get_profile).patch(patch_profile),
        )
}

/// GET /api/profiles
async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>, AppError> {
    let profiles = state.db.list_profiles().await?;
    Ok(Json(profiles))
}

/// GET /api/profiles/:id
async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.db.get_profile(&id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(profile))
}

/// POST /api/profiles
///
/// The id must match the auth identity; it is supplied by the caller,
/// not generated here.
async fn create_profile(
    State(state): State<AppState>,
    Json(new): Json<NewUserProfile>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    if new.id.trim().is_empty() {
        return Err(AppError::Validation("id must not be empty".to_string()));
    }

    let profile = state.db.insert_profile(&new).await?;
    tracing::info!(user_id = %profile.id, "Profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// PATCH /api/profiles/:id
async fn patch_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UserProfilePatch>,
) -> Result<Json<UserProfile>, AppError> {
    if patch.is_empty() {
        return Err(AppError::Validation(
            "at least one field must be provided".to_string(),
        ));
    }

    let profile = state.db.patch_profile(&id, &patch).await?;
    Ok(Json(profile))
}
