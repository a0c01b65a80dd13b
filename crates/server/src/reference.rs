//! Read-only reference data

use api_types::expense::{ExpenseCategory, ExpenseType};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn expense_types(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ExpenseType>>, ServerError> {
    Ok(Json(state.engine.expenses().get_all_expense_types().await?))
}

pub async fn expense_categories(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ExpenseCategory>>, ServerError> {
    Ok(Json(
        state.engine.expenses().get_all_expense_categories().await?,
    ))
}
