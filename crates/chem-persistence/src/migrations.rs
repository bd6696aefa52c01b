//! Migraciones Diesel embebidas (`migrations/` de este crate).
//!
//! Se corren una vez al construir el pool y también bajo demanda con
//! `chem migrate`.

use crate::error::PersistenceError;
use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Aplica las migraciones pendientes y devuelve cuántas se aplicaron.
pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<usize, PersistenceError> {
    let applied = conn.run_pending_migrations(MIGRATIONS)
                      .map_err(|e| PersistenceError::Unknown(format!("migration error: {e}")))?;
    for version in &applied {
        info!("Migración aplicada: {version}");
    }
    Ok(applied.len())
}
