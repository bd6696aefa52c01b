use std::time::Duration;

use chem_domain::CacheError;

/// Operaciones mínimas de un backend clave-valor con expiración.
///
/// Todas pueden fallar; quien las usa decide si degradar o propagar.
pub trait KeyValueCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}
