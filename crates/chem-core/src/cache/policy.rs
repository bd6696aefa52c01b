use std::sync::Arc;
use std::time::Duration;

use chem_domain::{CacheError, MoleculeRecord};
use log::{debug, error};

use super::KeyValueCache;
use crate::constants::{CACHE_KEY_PREFIX, CACHE_TTL_SECS};

/// Cache de registros por id sobre un `KeyValueCache`.
///
/// Nunca propaga errores: un fallo del backend se registra y se comporta como
/// un fallo de cache (lectura) o como una escritura omitida. El almacén sigue
/// siendo la fuente de verdad.
#[derive(Clone)]
pub struct MoleculeCache {
    backend: Arc<dyn KeyValueCache>,
    ttl: Duration,
}

impl MoleculeCache {
    pub fn new(backend: Arc<dyn KeyValueCache>) -> Self {
        Self::with_ttl(backend, Duration::from_secs(CACHE_TTL_SECS))
    }

    pub fn with_ttl(backend: Arc<dyn KeyValueCache>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    pub fn key(id: i32) -> String {
        format!("{CACHE_KEY_PREFIX}{id}")
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, id: i32) -> Option<MoleculeRecord> {
        let key = Self::key(id);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss para {key}");
                return None;
            }
            Err(e) => {
                error!("Error leyendo {key} de la cache: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => {
                debug!("Cache hit para {key}");
                Some(record)
            }
            Err(e) => {
                error!("Entrada de cache corrupta en {key}: {e}");
                None
            }
        }
    }

    pub fn put(&self, record: &MoleculeRecord) {
        let key = Self::key(record.id);
        if let Err(e) = self.try_put(&key, record) {
            error!("Error escribiendo {key} en la cache: {e}");
        }
    }

    fn try_put(&self, key: &str, record: &MoleculeRecord) -> Result<(), CacheError> {
        let raw = serde_json::to_string(record)?;
        self.backend.set(key, &raw, self.ttl)
    }

    /// Borra la entrada exista o no.
    pub fn invalidate(&self, id: i32) {
        let key = Self::key(id);
        match self.backend.delete(&key) {
            Ok(()) => debug!("Cache invalidada para {key}"),
            Err(e) => error!("Error invalidando {key} en la cache: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;

    struct BrokenCache;

    impl KeyValueCache for BrokenCache {
        fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }
        fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }
    }

    fn record() -> MoleculeRecord {
        MoleculeRecord { id: 42, smiles: "CCO".into(), name: Some("Ethanol".into()) }
    }

    #[test]
    fn key_format() {
        assert_eq!(MoleculeCache::key(42), "molecule:42");
    }

    #[test]
    fn put_then_get_round_trips() {
        let backend = Arc::new(InMemoryCache::new());
        let cache = MoleculeCache::new(backend.clone());
        assert_eq!(cache.ttl(), Duration::from_secs(3600));
        assert_eq!(cache.get(42), None);
        cache.put(&record());
        assert!(backend.contains("molecule:42"));
        assert_eq!(cache.get(42), Some(record()));
        cache.invalidate(42);
        assert_eq!(cache.get(42), None);
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let backend = Arc::new(InMemoryCache::new());
        backend.set("molecule:42", "not json", Duration::from_secs(60)).unwrap();
        let cache = MoleculeCache::new(backend);
        assert_eq!(cache.get(42), None);
    }

    #[test]
    fn backend_errors_are_swallowed() {
        let cache = MoleculeCache::new(Arc::new(BrokenCache));
        assert_eq!(cache.get(1), None);
        cache.put(&record());
        cache.invalidate(1);
    }
}
