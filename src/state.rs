//! Montaje de los adaptadores según `STORAGE_BACKEND` y estado compartido de
//! los handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use chem_core::{InMemoryCache, InMemoryJobQueue, InMemoryMoleculeStore, MoleculeCache, MoleculeService, SearchWorker};
use chem_domain::StructureValidator;
use chem_infra::RedisCache;
use chem_persistence::{build_pool, DbConfig, PgJobQueue, PgMoleculeStore, PoolProvider};
use chemengine::ChemEngine;
use log::{error, info};

use crate::config::{AppConfig, StorageBackend};
use crate::errors::AppError;

/// Lo que necesitan los handlers HTTP. Barato de clonar.
#[derive(Clone)]
pub struct AppState {
    pub service: MoleculeService,
    pub server_id: Arc<str>,
}

/// Estado más los hilos de fondo que hay que detener al apagar.
pub struct App {
    pub state: AppState,
    shutdown: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl App {
    /// Construye el backend indicado. En modo Postgres se crea el pool (que
    /// aplica migraciones) y el pool de Redis; es bloqueante.
    pub fn build(cfg: &AppConfig) -> Result<Self, AppError> {
        match cfg.backend {
            StorageBackend::Memory => Ok(Self::in_memory(cfg)),
            StorageBackend::Postgres => Self::postgres(cfg),
        }
    }

    /// Almacén, cache y cola en memoria con un `SearchWorker` en segundo plano.
    pub fn in_memory(cfg: &AppConfig) -> Self {
        let store = Arc::new(InMemoryMoleculeStore::new());
        let queue = Arc::new(InMemoryJobQueue::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let worker = SearchWorker::new(store.clone(), queue.clone()).with_poll_interval(cfg.worker_poll);
        let workers = vec![worker.spawn(shutdown.clone())];
        let kv = Arc::new(InMemoryCache::new());
        let cache = MoleculeCache::with_ttl(kv.clone(), cfg.cache_ttl);
        let service = MoleculeService::new(store, kv, queue, validator(cfg)).with_cache(cache);
        info!("Backend en memoria listo (server_id={})", cfg.server_id);
        Self { state: AppState { service, server_id: cfg.server_id.as_str().into() }, shutdown, workers }
    }

    fn postgres(cfg: &AppConfig) -> Result<Self, AppError> {
        let db = DbConfig::from_env()?;
        let pool = build_pool(&db.url, db.min_connections, db.max_connections)?;
        let provider = PoolProvider { pool };
        let store = Arc::new(PgMoleculeStore::new(provider.clone()));
        let queue = Arc::new(PgJobQueue::new(provider));
        let redis: Arc<RedisCache> = Arc::new(RedisCache::from_env()?);
        let cache = MoleculeCache::with_ttl(redis.clone(), cfg.cache_ttl);
        let service = MoleculeService::new(store, redis, queue, validator(cfg)).with_cache(cache);
        info!("Backend Postgres + Redis listo (server_id={})", cfg.server_id);
        Ok(Self { state: AppState { service, server_id: cfg.server_id.as_str().into() },
                  shutdown: Arc::new(AtomicBool::new(false)),
                  workers: Vec::new() })
    }

    /// Detiene los workers embebidos y espera a que terminen el trabajo en
    /// curso.
    pub fn shutdown(self) {
        self.shutdown.store(true, Ordering::Relaxed);
        for handle in self.workers {
            if handle.join().is_err() {
                error!("Un worker terminó con pánico");
            }
        }
        info!("Servidor detenido");
    }
}

fn validator(cfg: &AppConfig) -> Arc<StructureValidator> {
    Arc::new(StructureValidator::with_capacity(ChemEngine::new(), cfg.validator_capacity))
}
