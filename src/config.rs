//! Configuración del servidor HTTP.
//! Se lee del entorno (tras cargar `.env`) una sola vez al arrancar; la
//! configuración de Postgres y Redis vive en sus crates (`DbConfig`,
//! `RedisConfig`).
use std::env;
use std::str::FromStr;
use std::time::Duration;

use chem_core::constants::CACHE_TTL_SECS;
use chem_domain::validator::DEFAULT_VALIDATOR_CAPACITY;

use crate::errors::AppError;

/// Dónde viven los registros, la cache y la cola.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Postgres (registros + cola) y Redis (cache). Los workers corren aparte
    /// con `chem worker`.
    Postgres,
    /// Todo en memoria, con un worker en un hilo del propio proceso.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(AppError::Config(format!("STORAGE_BACKEND desconocido: '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Identificador devuelto por `GET /` para distinguir réplicas detrás del
    /// balanceador.
    pub server_id: String,
    pub cache_ttl: Duration,
    pub validator_capacity: usize,
    pub backend: StorageBackend,
    /// Espera del worker embebido (modo memoria) cuando la cola está vacía.
    pub worker_poll: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { bind_addr: "0.0.0.0:8000".to_string(),
               server_id: "unknown".to_string(),
               cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
               validator_capacity: DEFAULT_VALIDATOR_CAPACITY,
               backend: StorageBackend::Postgres,
               worker_poll: Duration::from_millis(500) }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        chem_persistence::init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Variables ausentes toman el valor por defecto; valores presentes pero
    /// mal formados son error de configuración.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        let backend = match lookup("STORAGE_BACKEND") {
            Some(v) => v.parse()?,
            None => defaults.backend,
        };
        Ok(Self { bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
                  server_id: lookup("SERVER_ID").unwrap_or(defaults.server_id),
                  cache_ttl: parse_or(&lookup, "CACHE_TTL_SECS", CACHE_TTL_SECS).map(Duration::from_secs)?,
                  validator_capacity: parse_or(&lookup, "VALIDATOR_CACHE_CAPACITY", defaults.validator_capacity)?,
                  backend,
                  worker_poll: parse_or(&lookup, "WORKER_POLL_MS", 500).map(Duration::from_millis)? })
    }

    /// Configuración para el modo en memoria (desarrollo y tests).
    pub fn in_memory() -> Self {
        Self { backend: StorageBackend::Memory, ..Self::default() }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
    where F: Fn(&str) -> Option<String>,
          T: FromStr
{
    match lookup(key) {
        Some(raw) => raw.trim()
                        .parse()
                        .map_err(|_| AppError::Config(format!("{key} inválido: '{raw}'"))),
        None => Ok(default),
    }
}
