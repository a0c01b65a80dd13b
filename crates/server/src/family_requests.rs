//! Family member request endpoints
//!
//! A request invites an e-mail address into the caller's family. Requests
//! can be listed, read and withdrawn by their sender.

use api_types::family::{FamilyMemberRequest, FamilyMemberRequestList, FamilyMemberRequestNew};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Engine, EngineError};

use crate::{Caller, ServerError, server::ServerState};

/// Requests sent by the caller and those targeting the caller's family.
pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<FamilyMemberRequestList>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    Ok(Json(
        state
            .engine
            .family_requests()
            .list_for(profile.user_id, profile.family_id)
            .await?,
    ))
}

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<FamilyMemberRequestNew>,
) -> Result<(StatusCode, Json<FamilyMemberRequest>), ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let request = state
        .engine
        .family_requests()
        .create(profile.user_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn get(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<FamilyMemberRequest>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let request = state
        .engine
        .family_requests()
        .get_by_id(id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("request not exists".to_string()))?;

    let sender = request.requested_by_user_id == profile.user_id;
    if !sender && Engine::require_family_member(&profile, request.family_id).is_err() {
        return Err(EngineError::KeyNotFound("request not exists".to_string()).into());
    }
    Ok(Json(request))
}

pub async fn withdraw(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    state
        .engine
        .family_requests()
        .withdraw(profile.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
