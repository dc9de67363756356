use std::sync::Arc;

use api_types::HealthResponse;
use axum::{Json, Router, middleware, routing::get};
use sea_orm::DatabaseConnection;

use crate::{auth, settings, statistics, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Builds the API router. Exposed so tests can drive it without a socket.
pub fn router(engine: Engine, db: DatabaseConnection) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    Router::new()
        .route(
            "/users/{user_id}/transaction",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/users/{user_id}/transaction/{transaction_id}",
            get(transactions::get_one)
                .put(transactions::update)
                .delete(transactions::remove),
        )
        .route(
            "/users/{user_id}/settings",
            get(settings::get_settings)
                .post(settings::update_settings)
                .put(settings::update_settings),
        )
        .route(
            "/users/{user_id}/statistics",
            get(statistics::get_monthly),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::middleware))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, db)).await
}
