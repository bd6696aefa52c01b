//! Superficie HTTP (axum).
//!
//! Rutas:
//! - `GET /` y `GET /health`: sondas.
//! - `POST|GET /molecules/`, `GET|PUT|DELETE /molecules/:id`: CRUD.
//! - `POST /molecules/search/start`, `GET /molecules/search/results/:task_id`:
//!   búsquedas asíncronas por subestructura.

pub mod error;
pub mod molecules;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(root))
                 .route("/health", get(health))
                 .route("/molecules/", post(molecules::create).get(molecules::list))
                 .route("/molecules/search/start", post(molecules::start_search))
                 .route("/molecules/search/results/:task_id", get(molecules::search_result))
                 .route("/molecules/:id",
                        get(molecules::get).put(molecules::update).delete(molecules::delete))
                 .with_state(state)
}

/// Sirve el router hasta que `shutdown` se resuelva.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
    where F: std::future::Future<Output = ()> + Send + 'static
{
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown).await
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "server_id": &*state.server_id }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
