//! Budget API endpoints

use api_types::{PeriodQuery, budget::UserBudget};
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
) -> Result<Json<Vec<UserBudget>>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let (month, year) = period.or_sentinel();
    Ok(Json(
        state
            .engine
            .budgets()
            .get_by_user(profile.user_id, month, year)
            .await?,
    ))
}

pub async fn get(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<UserBudget>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let budget = state
        .engine
        .budgets()
        .get_by_id(id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))?;
    if !state.engine.can_view(&profile, budget.user_id).await? {
        return Err(EngineError::KeyNotFound("budget not exists".to_string()).into());
    }
    Ok(Json(budget))
}

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(mut payload): Json<UserBudget>,
) -> Result<(StatusCode, Json<UserBudget>), ServerError> {
    let profile = caller.profile(&state.engine).await?;
    state
        .engine
        .budgets()
        .add(profile.user_id, &mut payload)
        .await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn update(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(mut payload): Json<UserBudget>,
) -> Result<Json<UserBudget>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let current = state
        .engine
        .budgets()
        .get_by_id(id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))?;
    state
        .engine
        .require_modifiable(&profile, current.user_id, "budget")
        .await?;

    payload.budget_id = Some(id);
    state
        .engine
        .budgets()
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
    if let Some(current) = state.engine.budgets().get_by_id(id).await? {
        // Hidden records look missing, so deleting one is a no-op.
        if !state.engine.can_view(&profile, current.user_id).await? {
            return Ok(StatusCode::NO_CONTENT);
        }
        Engine::require_owner(&profile, current.user_id)?;
    }
    state.engine.budgets().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
