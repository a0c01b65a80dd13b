//! User profile and family endpoints

use api_types::{
    family::{Family, FamilyNew},
    user::{UserProfile, UserProfileNew, UserProfileUpdate},
};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{Caller, ServerError, server::ServerState};

/// Registers the profile of the token's identity.
///
/// Without an explicit e-mail the one carried by the token is used.
pub async fn register(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(mut payload): Json<UserProfileNew>,
) -> Result<(StatusCode, Json<UserProfile>), ServerError> {
    if payload.email.is_none() {
        payload.email = caller.email.clone();
    }
    let profile = state
        .engine
        .users()
        .register(&caller.identity_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_me(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<UserProfile>, ServerError> {
    Ok(Json(caller.profile(&state.engine).await?))
}

pub async fn update_me(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<UserProfileUpdate>,
) -> Result<Json<UserProfile>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let updated = state
        .engine
        .users()
        .update(profile.user_id, &payload)
        .await?;
    Ok(Json(updated))
}

/// Creates a family with the caller as its first member.
pub async fn create_family(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<FamilyNew>,
) -> Result<(StatusCode, Json<Family>), ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let family = state
        .engine
        .users()
        .create_family(profile.user_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(family)))
}
