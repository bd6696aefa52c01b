//! chem-infra: adaptadores de infraestructura fuera de Postgres.
//!
//! - `redis_cache`: cache Redis de registros (`RedisCache`).
//! - `logging`: backend `fern` para la fachada `log`.

pub mod logging;
pub mod redis_cache;

pub use logging::LogConfig;
pub use redis_cache::{InfraError, RedisCache, RedisConfig};
