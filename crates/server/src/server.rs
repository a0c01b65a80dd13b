use std::{any::Any, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::State,
    http::HeaderValue,
    middleware,
    response::Response,
    routing::{get, post, put},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    ServerError, auth, body_logging, budgets, credit_cards, email_copies, expenses,
    family_requests, incomes, internal_error_response, profiles, reference,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub validator: Arc<auth::TokenValidator>,
}

/// Transport options that do not affect business behavior.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    /// `*` allows any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Log request and response bodies at debug level.
    pub log_bodies: bool,
    pub request_timeout: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec!["*".to_string()],
            log_bodies: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

async fn health(State(state): State<ServerState>) -> Result<&'static str, ServerError> {
    state.engine.ping().await?;
    Ok("ok")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("unhandled panic while serving request: {details}");
    internal_error_response()
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods(cors::Any)
            .allow_headers(cors::Any);
    }

    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
}

pub fn router(state: ServerState, options: &ServerOptions) -> Router {
    let api = Router::new()
        .route("/user-profiles", post(profiles::register))
        .route(
            "/user-profiles/me",
            get(profiles::get_me).put(profiles::update_me),
        )
        .route("/families", post(profiles::create_family))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/family", get(expenses::list_family))
        .route(
            "/expenses/{id}",
            get(expenses::get).put(expenses::update).delete(expenses::delete),
        )
        .route("/expense-types", get(reference::expense_types))
        .route("/expense-categories", get(reference::expense_categories))
        .route(
            "/credit-cards",
            get(credit_cards::list).post(credit_cards::create),
        )
        .route(
            "/credit-cards/{id}",
            put(credit_cards::update).delete(credit_cards::delete),
        )
        .route("/incomes", get(incomes::list).post(incomes::create))
        .route("/incomes/family", get(incomes::list_family))
        .route(
            "/incomes/{id}",
            get(incomes::get).put(incomes::update).delete(incomes::delete),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            get(budgets::get).put(budgets::update).delete(budgets::delete),
        )
        .route(
            "/family-member-requests",
            get(family_requests::list).post(family_requests::create),
        )
        .route(
            "/family-member-requests/{id}",
            get(family_requests::get).delete(family_requests::withdraw),
        )
        .route(
            "/email-copies",
            get(email_copies::list).post(email_copies::create),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    let mut router = Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state);
    if options.log_bodies {
        router = router.layer(middleware::from_fn(body_logging::log_bodies));
    }

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&options.cors_allowed_origins))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

pub async fn run(
    engine: Engine,
    validator: auth::TokenValidator,
    options: ServerOptions,
    addr: impl tokio::net::ToSocketAddrs,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_with_listener(engine, validator, options, listener).await
}

pub async fn run_with_listener(
    engine: Engine,
    validator: auth::TokenValidator,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        validator: Arc::new(validator),
    };

    axum::serve(listener, router(state, &options))
        .with_graceful_shutdown(shutdown_signal())
        .await
}
