//! Constantes del núcleo de moléculas.

/// Vida de una entrada de la cache de registros (segundos).
pub const CACHE_TTL_SECS: u64 = 3600;

/// Prefijo de las claves de la cache; la clave completa es `molecule:<id>`.
pub const CACHE_KEY_PREFIX: &str = "molecule:";

/// Paginación por defecto del listado y su tope.
pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 1000;
