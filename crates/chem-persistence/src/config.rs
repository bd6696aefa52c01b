//! Carga de configuración de conexión desde variables de entorno.
//!
//! `DATABASE_URL` tiene prioridad; si falta, la URL se arma con
//! `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_HOST`, `POSTGRES_PORT` y
//! `POSTGRES_DB`. El tamaño del pool sale de `DATABASE_MIN_CONNECTIONS` y
//! `DATABASE_MAX_CONNECTIONS`.

use std::env;
use once_cell::sync::Lazy;
use dotenvy::dotenv;

use crate::error::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero leyendo de una función arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PersistenceError>
        where F: Fn(&str) -> Option<String>
    {
        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => url_from_parts(&lookup)?,
        };
        let min_connections = lookup("DATABASE_MIN_CONNECTIONS").and_then(|v| v.parse().ok()).unwrap_or(2);
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS").and_then(|v| v.parse().ok()).unwrap_or(16);
        Ok(Self { url, min_connections, max_connections })
    }
}

fn url_from_parts<F>(lookup: &F) -> Result<String, PersistenceError>
    where F: Fn(&str) -> Option<String>
{
    let get = |key: &str| {
        lookup(key).ok_or_else(|| PersistenceError::Config(format!("ni DATABASE_URL ni {key} definidos")))
    };
    let user = get("POSTGRES_USER")?;
    let password = get("POSTGRES_PASSWORD")?;
    let host = get("POSTGRES_HOST")?;
    let port = get("POSTGRES_PORT")?;
    let db = get("POSTGRES_DB")?;
    Ok(format!("postgres://{user}:{password}@{host}:{port}/{db}"))
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() { Lazy::force(&DOTENV_LOADED); }
