use axum::{
    Json,
    http::{StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use auth::{AuthSettings, AuthSetupError, Caller, TokenValidator};
pub use server::{ServerOptions, ServerState, router, run, run_with_listener};

mod auth;
mod body_logging;
mod budgets;
mod credit_cards;
mod email_copies;
mod expenses;
mod family_requests;
mod incomes;
mod profiles;
mod reference;
mod server;

/// Body of every `500` response. Details are only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    Internal(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidPeriod(_)
        | EngineError::InvalidName(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Generic `500` answer; the cause must already be logged.
pub(crate) fn internal_error_response() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        INTERNAL_ERROR_MESSAGE,
    )
        .into_response()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(EngineError::Database(db_err)) => {
                tracing::error!("database error: {db_err:?}");
                return internal_error_response();
            }
            ServerError::Internal(err) => {
                tracing::error!("internal error: {err}");
                return internal_error_response();
            }
            ServerError::Engine(err) => (status_for_engine_error(&err), err.to_string()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
