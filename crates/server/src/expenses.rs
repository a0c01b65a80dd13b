//! Expense API endpoints

use api_types::{PeriodQuery, expense::Expense};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Engine, EngineError};

use crate::{Caller, ServerError, server::ServerState};

/// Caller's expenses for `?month&year` (missing or `0` = current).
pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let (month, year) = period.or_sentinel();
    let expenses = state
        .engine
        .expenses()
        .get_expenses_by_user_id(profile.user_id, month, year)
        .await?;
    Ok(Json(expenses))
}

/// Expenses of every member of the caller's family.
pub async fn list_family(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let family_id = profile
        .family_id
        .ok_or_else(|| EngineError::Forbidden("caller does not belong to a family".to_string()))?;
    let (month, year) = period.or_sentinel();
    let expenses = state
        .engine
        .expenses()
        .get_expenses_by_family_id(family_id, month, year)
        .await?;
    Ok(Json(expenses))
}

pub async fn get(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Expense>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let expense = state
        .engine
        .expenses()
        .get_expense_by_id(id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;

    // Hidden records look missing.
    if !state.engine.can_view(&profile, expense.user_id).await? {
        return Err(EngineError::KeyNotFound("expense not exists".to_string()).into());
    }
    Ok(Json(expense))
}

/// Adds an expense owned by the caller. The body is echoed back with the
/// generated ids and the reconciled amount.
pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(mut payload): Json<Expense>,
) -> Result<(StatusCode, Json<Expense>), ServerError> {
    let profile = caller.profile(&state.engine).await?;
    payload.user_id = Some(profile.user_id);
    state.engine.expenses().add_expense(&mut payload).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn update(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(mut payload): Json<Expense>,
) -> Result<Json<Expense>, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    let current = state
        .engine
        .expenses()
        .get_expense_by_id(id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
    state
        .engine
        .require_modifiable(&profile, current.user_id, "expense")
        .await?;

    payload.expense_id = Some(id);
    payload.user_id = Some(profile.user_id);
    state.engine.expenses().update_expense(&mut payload).await?;
    Ok(Json(payload))
}

/// Deleting a missing expense succeeds.
pub async fn delete(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    let profile = caller.profile(&state.engine).await?;
    if let Some(current) = state.engine.expenses().get_expense_by_id(id).await? {
        // Hidden records look missing, so deleting one is a no-op.
        if !state.engine.can_view(&profile, current.user_id).await? {
            return Ok(StatusCode::NO_CONTENT);
        }
        Engine::require_owner(&profile, current.user_id)?;
    }
    state.engine.expenses().delete_expense(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
