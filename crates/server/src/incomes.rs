//! Income API endpoints

use api_types::{PeriodQuery, income::UserIncome};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Engine, EngineError};

use crate::{Caller, ServerError, server::ServerState};

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Vec<UserIncome>>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let (month, year) = period.or_sentinel();
    Ok(Json(
        state
            .engine
            .incomes()
            .get_by_user(profile.user_id, month, year)
            .await?,
    ))
}

pub async fn list_family(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Vec<UserIncome>>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let family_id = profile
        .family_id
        .ok_or_else(|| EngineError::Forbidden("caller does not belong to a family".to_string()))?;
    let (month, year) = period.or_sentinel();
    Ok(Json(
        state
            .engine
            .incomes()
            .get_by_family(family_id, month, year)
            .await?,
    ))
}

pub async fn get(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<UserIncome>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let income = state
        .engine
        .incomes()
        .get_by_id(id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;
    if !state.engine.can_view(&profile, income.user_id).await? {
        return Err(EngineError::KeyNotFound("income not exists".to_string()).into());
    }
    Ok(Json(income))
}

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(mut payload): Json<UserIncome>,
) -> Result<(StatusCode, Json<UserIncome>), ServerError> {
    let profile = caller.profile(&state.engine).await?;
    state
        .engine
        .incomes()
        .add(profile.user_id, &mut payload)
        .await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn update(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(mut payload): Json<UserIncome>,
) -> Result<Json<UserIncome>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let current = state
        .engine
        .incomes()
        .get_by_id(id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;
    state
        .engine
        .require_modifiable(&profile, current.user_id, "income")
        .await?;

    payload.income_id = Some(id);
    state
        .engine
        .incomes()
        .update(profile.user_id, &mut payload)
        .await?;
    Ok(Json(payload))
}

pub async fn delete(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    if let Some(current) = state.engine.incomes().get_by_id(id).await? {
        // Hidden records look missing, so deleting one is a no-op.
        if !state.engine.can_view(&profile, current.user_id).await? {
            return Ok(StatusCode::NO_CONTENT);
        }
        Engine::require_owner(&profile, current.user_id)?;
    }
    state.engine.incomes().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
