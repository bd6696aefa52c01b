use std::time::{Duration, Instant};

use chem_domain::CacheError;
use dashmap::DashMap;

use super::KeyValueCache;

/// Cache en proceso con expiración perezosa: una entrada vencida se descarta
/// al leerla.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<String, (String, Instant)>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|e| e.1 > Instant::now())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueCache for InMemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.1 > now {
                return Ok(Some(entry.0.clone()));
            }
        }
        self.entries.remove_if(key, |_, (_, expires)| *expires <= now);
        Ok(None)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire() {
        let cache = InMemoryCache::new();
        cache.set("k", "v", Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));
        cache.set("gone", "v", Duration::ZERO).unwrap();
        assert_eq!(cache.get("gone").unwrap(), None);
        assert!(!cache.contains("gone"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn delete_is_idempotent() {
        let cache = InMemoryCache::new();
        cache.delete("missing").unwrap();
        cache.set("k", "v", Duration::from_secs(60)).unwrap();
        cache.delete("k").unwrap();
        assert!(cache.is_empty());
    }
}
