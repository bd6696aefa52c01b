//! Servicio de moléculas: orquesta validación, almacén, cache y cola.

use std::sync::Arc;

use chem_domain::{JobState, MoleculeError, MoleculeRecord, MoleculeUpdate, NewMolecule, SearchArgs, SearchResult,
                  SearchTicket, StructureValidator, SEARCH_TASK_NAME};
use log::{error, info};

use crate::cache::{KeyValueCache, MoleculeCache};
use crate::queue::JobQueue;
use crate::store::MoleculeStore;

#[derive(Clone)]
pub struct MoleculeService {
    store: Arc<dyn MoleculeStore>,
    cache: MoleculeCache,
    queue: Arc<dyn JobQueue>,
    validator: Arc<StructureValidator>,
}

impl MoleculeService {
    pub fn new(store: Arc<dyn MoleculeStore>,
               cache: Arc<dyn KeyValueCache>,
               queue: Arc<dyn JobQueue>,
               validator: Arc<StructureValidator>)
               -> Self {
        Self { store, cache: MoleculeCache::new(cache), queue, validator }
    }

    /// Sustituye la política de cache (p. ej. para otro TTL).
    pub fn with_cache(mut self, cache: MoleculeCache) -> Self {
        self.cache = cache;
        self
    }

    fn ensure_valid(&self, smiles: &str) -> Result<(), MoleculeError> {
        if self.validator.validate(smiles) {
            Ok(())
        } else {
            Err(MoleculeError::InvalidStructure(smiles.to_string()))
        }
    }

    /// Alta de una molécula validada. No toca la cache.
    pub fn create(&self, new: &NewMolecule) -> Result<MoleculeRecord, MoleculeError> {
        self.ensure_valid(&new.smiles)?;
        let record = self.store.add(new)?;
        info!("Molécula creada {record}");
        Ok(record)
    }

    /// Lectura a través de la cache. Un acierto de cache no consulta el
    /// almacén.
    pub fn get(&self, id: i32) -> Result<MoleculeRecord, MoleculeError> {
        if let Some(record) = self.cache.get(id) {
            return Ok(record);
        }
        let record = self.store.get_by_id(id)?.ok_or(MoleculeError::NotFound(id))?;
        self.cache.put(&record);
        Ok(record)
    }

    /// Listado directo del almacén, sin cache.
    pub fn list(&self, skip: i64, limit: i64) -> Result<Vec<MoleculeRecord>, MoleculeError> {
        Ok(self.store.list(skip, limit)?)
    }

    /// Actualización parcial. Sólo se valida la estructura si viene en la
    /// actualización. Tras escribir se invalida la entrada de cache.
    pub fn update(&self, id: i32, changes: &MoleculeUpdate) -> Result<MoleculeRecord, MoleculeError> {
        if let Some(smiles) = &changes.smiles {
            self.ensure_valid(smiles)?;
        }
        let record = self.store.update(id, changes)?.ok_or(MoleculeError::NotFound(id))?;
        self.cache.invalidate(id);
        info!("Molécula actualizada {record}");
        Ok(record)
    }

    pub fn delete(&self, id: i32) -> Result<(), MoleculeError> {
        if !self.store.delete(id)? {
            return Err(MoleculeError::NotFound(id));
        }
        self.cache.invalidate(id);
        info!("Molécula {id} eliminada");
        Ok(())
    }

    /// Encola una búsqueda por subestructura. Si la cola no acepta el
    /// trabajo falla con `Unavailable`.
    pub fn submit_search(&self, query: &str) -> Result<SearchTicket, MoleculeError> {
        self.ensure_valid(query)?;
        let args = serde_json::to_value(SearchArgs { substructure_smiles: query.to_string() })
            .map_err(|e| MoleculeError::Unavailable(e.to_string()))?;
        let ticket = self.queue.submit(SEARCH_TASK_NAME, args)?;
        info!("Búsqueda '{query}' encolada como {}", ticket.job_id);
        Ok(ticket)
    }

    /// Estado de una búsqueda. Nunca falla: si la cola no responde se
    /// informa `PENDING` y el cliente vuelve a consultar.
    pub fn poll_search(&self, job_id: &str) -> SearchResult {
        let state = self.queue.status(job_id).unwrap_or_else(|e| {
                                                  error!("Error consultando el trabajo {job_id}: {e}");
                                                  JobState::pending()
                                              });
        SearchResult { job_id: job_id.to_string(), result: state.outcome(), status: state.status }
    }
}
