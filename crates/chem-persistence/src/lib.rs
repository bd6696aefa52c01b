//! chem-persistence
//!
//! Backend Postgres (Diesel + r2d2) de los puertos del core: almacén de
//! moléculas y cola de búsquedas.
//!
//! Módulos:
//! - `pg`: `PgMoleculeStore`, `PgJobQueue`, pool y proveedor de conexiones.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde entorno / .env.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_pool, build_pool_from_env, ConnectionProvider, PgJobQueue, PgMoleculeStore, PgPool, PoolProvider};
