//! molecules-api
//!
//! Servidor HTTP del registro de moléculas:
//! - `config`: `AppConfig` desde entorno / .env.
//! - `state`: montaje de adaptadores (Postgres + Redis o memoria).
//! - `api`: router axum y traducción de errores a códigos HTTP.
//! - `errors`: errores de arranque.

pub mod api;
pub mod config;
pub mod errors;
pub mod state;

pub use config::{AppConfig, StorageBackend};
pub use errors::AppError;
pub use state::{App, AppState};
