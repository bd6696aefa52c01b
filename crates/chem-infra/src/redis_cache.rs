//! Cache Redis para registros de moléculas.
//!
//! Cada operación toma una conexión de un pool r2d2 y la devuelve al
//! terminar. El timeout del pool es corto: una cache lenta debe degradar a
//! lecturas del almacén, no bloquear la petición.

use std::env;
use std::time::Duration;

use chem_core::KeyValueCache;
use chem_domain::CacheError;
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("configuración inválida: {0}")]
    Config(String),
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("pool redis: {0}")]
    Pool(#[from] r2d2::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub url: String,
    pub pool_size: u32,
    pub timeout: Duration,
}

impl RedisConfig {
    /// `REDIS_URL` o, si falta, `REDIS_HOST` + `REDIS_PORT` (base 0).
    pub fn from_env() -> Result<Self, InfraError> {
        chem_persistence::init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, InfraError>
        where F: Fn(&str) -> Option<String>
    {
        let url = match lookup("REDIS_URL") {
            Some(url) => url,
            None => {
                let host = lookup("REDIS_HOST").ok_or_else(|| InfraError::Config("ni REDIS_URL ni REDIS_HOST definidos".into()))?;
                let port = lookup("REDIS_PORT").unwrap_or_else(|| "6379".to_string());
                format!("redis://{host}:{port}/0")
            }
        };
        let pool_size = lookup("REDIS_POOL_SIZE").and_then(|v| v.parse().ok()).unwrap_or(8);
        let timeout_ms = lookup("REDIS_TIMEOUT_MS").and_then(|v| v.parse().ok()).unwrap_or(250);
        Ok(Self { url, pool_size, timeout: Duration::from_millis(timeout_ms) })
    }
}

/// `KeyValueCache` sobre Redis (`GET`, `SET .. EX`, `DEL`).
#[derive(Clone)]
pub struct RedisCache {
    pool: r2d2::Pool<redis::Client>,
}

impl RedisCache {
    /// Crea el pool sin exigir que Redis esté arriba: las conexiones se
    /// abren bajo demanda y un Redis caído sólo produce fallos de cache.
    pub fn connect(cfg: &RedisConfig) -> Result<Self, InfraError> {
        let client = redis::Client::open(cfg.url.as_str())?;
        let pool = r2d2::Pool::builder().max_size(cfg.pool_size.max(1))
                                        .min_idle(Some(0))
                                        .connection_timeout(cfg.timeout)
                                        .build_unchecked(client);
        info!("Cache Redis configurada en {} (pool={})", cfg.url, cfg.pool_size);
        Ok(Self { pool })
    }

    pub fn from_env() -> Result<Self, InfraError> {
        Self::connect(&RedisConfig::from_env()?)
    }

    fn connection(&self) -> Result<r2d2::PooledConnection<redis::Client>, CacheError> {
        self.pool.get().map_err(|e| CacheError::Backend(format!("pool: {e}")))
    }
}

fn backend(e: redis::RedisError) -> CacheError {
    CacheError::Backend(e.to_string())
}

impl KeyValueCache for RedisCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection()?;
        redis::cmd("GET").arg(key).query::<Option<String>>(&mut *conn).map_err(backend)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection()?;
        redis::cmd("SET").arg(key)
                         .arg(value)
                         .arg("EX")
                         .arg(ttl.as_secs().max(1))
                         .query::<()>(&mut *conn)
                         .map_err(backend)?;
        debug!("SET {key} (ttl={}s)", ttl.as_secs());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection()?;
        redis::cmd("DEL").arg(key).query::<()>(&mut *conn).map_err(backend)
    }
}
