//! Credit card endpoints
//!
//! Cards are shared reference data: any authenticated caller may manage them.

use api_types::credit_card::CreditCard;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CreditCard>>, ServerError> {
    Ok(Json(state.engine.expenses().get_all_credit_cards().await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<CreditCard>,
) -> Result<(StatusCode, Json<CreditCard>), ServerError> {
    state.engine.credit_cards().add(&mut payload).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(mut payload): Json<CreditCard>,
) -> Result<Json<CreditCard>, ServerError> {
    payload.credit_card_id = Some(id);
    state.engine.credit_cards().update(&mut payload).await?;
    Ok(Json(payload))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.credit_cards().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
