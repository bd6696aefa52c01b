//! Implementaciones Postgres (Diesel) de los puertos del core.
//!
//! - `PgMoleculeStore`: tabla `molecules` (CRUD + stream paginado por id).
//! - `PgJobQueue`: tabla `search_jobs`, broker y almacén de resultados de las
//!   búsquedas. Los workers reclaman con `FOR UPDATE SKIP LOCKED`.
//!
//! Cada operación toma una conexión del pool y la devuelve al terminar, haya
//! éxito o error. Los errores transitorios se reintentan con un backoff corto.

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::{info, warn};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;

mod jobs;
mod molecules;

pub use jobs::PgJobQueue;
pub use molecules::{MoleculeRow, PgMoleculeStore, STREAM_PAGE_SIZE};

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
///
/// Al construirlo con `build_pool` se corren las migraciones pendientes.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real o un doble de pruebas sin acoplar los
/// almacenes a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    /// Obtiene una conexión lista para ejecutar consultas Diesel.
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
#[derive(Clone)]
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Determina si un error es transitorio (recomendado reintentar con backoff).
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        // Algunos errores del driver llegan como Unknown con texto.
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("could not serialize access due to concurrent update")
            || m.contains("terminating connection due to administrator command")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Reintento con backoff lineal corto (hasta 3 reintentos: 15, 30, 45 ms).
///
/// Sólo para operaciones idempotentes o transaccionales: la unidad de trabajo
/// `f` se repite completa.
pub(crate) fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Construye un pool y aplica las migraciones pendientes con la primera
/// conexión.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_max = max_size.max(1);
    let validated_min = min_size.max(1);
    if validated_min > validated_max {
        warn!("min_size > max_size ({validated_min} > {validated_max}), ajustando min=max");
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        let applied = run_pending_migrations(&mut conn)?;
        info!("Pool Postgres listo (min={final_min}, max={validated_max}, migraciones aplicadas={applied})");
    }
    Ok(pool)
}

/// Carga `.env`, lee `DbConfig` y construye un pool ya migrado.
pub fn build_pool_from_env() -> Result<PgPool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env()?;
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
