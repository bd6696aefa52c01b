//! Worker de búsquedas: reclama trabajos de la cola, los ejecuta y registra
//! su estado terminal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chem_domain::{QueueError, SearchArgs, SEARCH_TASK_NAME};
use chemengine::ChemEngine;
use log::{error, info, warn};

use crate::queue::{ClaimedJob, JobConsumer, JobOutcome};
use crate::search::run_substructure_search;
use crate::store::MoleculeStore;

pub struct SearchWorker {
    store: Arc<dyn MoleculeStore>,
    queue: Arc<dyn JobConsumer>,
    engine: ChemEngine,
    poll_interval: Duration,
}

impl SearchWorker {
    /// `store` debe ser propio del worker: no se comparte con el servicio.
    pub fn new(store: Arc<dyn MoleculeStore>, queue: Arc<dyn JobConsumer>) -> Self {
        Self { store, queue, engine: ChemEngine::new(), poll_interval: Duration::from_millis(500) }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Procesa como mucho un trabajo. `Ok(true)` si había uno.
    pub fn run_once(&self) -> Result<bool, QueueError> {
        let Some(job) = self.queue.claim_next(SEARCH_TASK_NAME)? else {
            return Ok(false);
        };
        info!("Ejecutando búsqueda {}", job.job_id);
        let outcome = self.execute(&job);
        match &outcome {
            Ok(matches) => info!("Búsqueda {} terminada: {} coincidencias", job.job_id, matches.len()),
            Err(e) => warn!("Búsqueda {} fallida: {e}", job.job_id),
        }
        // Sin resultado registrado el trabajo queda en STARTED: nadie lo
        // vuelve a reclamar.
        if let Err(e) = self.queue.complete(&job.job_id, &outcome) {
            error!("Trabajo {} huérfano en STARTED: no se pudo registrar su resultado: {e}", job.job_id);
            return Err(e);
        }
        Ok(true)
    }

    fn execute(&self, job: &ClaimedJob) -> JobOutcome {
        let args: SearchArgs = serde_json::from_value(job.args.clone()).map_err(|e| format!("Argumentos inválidos: {e}"))?;
        run_substructure_search(self.store.as_ref(), &self.engine, &args.substructure_smiles).map_err(|e| e.to_string())
    }

    /// Bucle hasta que `shutdown` pase a `true`. Duerme `poll_interval`
    /// cuando la cola está vacía o falla.
    pub fn run(&self, shutdown: &AtomicBool) {
        info!("Worker de búsquedas iniciado");
        while !shutdown.load(Ordering::Relaxed) {
            match self.run_once() {
                Ok(true) => {}
                Ok(false) => thread::sleep(self.poll_interval),
                Err(e) => {
                    error!("Error consultando la cola: {e}");
                    thread::sleep(self.poll_interval);
                }
            }
        }
        info!("Worker de búsquedas detenido");
    }

    /// Lanza el bucle en un hilo propio.
    pub fn spawn(self, shutdown: Arc<AtomicBool>) -> thread::JoinHandle<()> {
        thread::spawn(move || self.run(&shutdown))
    }
}
