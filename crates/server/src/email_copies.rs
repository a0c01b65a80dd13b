//! Copies of e-mails sent on behalf of the caller

use api_types::email::{EmailCopy, EmailCopyNew};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{Caller, ServerError, server::ServerState};

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<EmailCopy>>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    Ok(Json(
        state
            .engine
            .email_copies()
            .get_by_user(profile.user_id)
            .await?,
    ))
}

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<EmailCopyNew>,
) -> Result<(StatusCode, Json<EmailCopy>), ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let copy = state
        .engine
        .email_copies()
        .add(profile.user_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(copy)))
}
