use chem_domain::{JobState, QueueError, SearchTicket};
use serde_json::Value;

/// Resultado de ejecutar un trabajo: coincidencias o texto del error.
pub type JobOutcome = Result<Vec<String>, String>;

/// Trabajo reclamado por un worker; ya figura como `STARTED` en la cola.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimedJob {
    pub job_id: String,
    pub task_name: String,
    pub args: Value,
}

pub trait JobQueue: Send + Sync {
    /// Encola un trabajo y devuelve su id con el estado inicial.
    fn submit(&self, task_name: &str, args: Value) -> Result<SearchTicket, QueueError>;

    /// Estado actual. Un id desconocido se informa como `PENDING`.
    fn status(&self, job_id: &str) -> Result<JobState, QueueError>;
}

pub trait JobConsumer: Send + Sync {
    /// Reclama el trabajo pendiente más antiguo con ese nombre, si hay.
    fn claim_next(&self, task_name: &str) -> Result<Option<ClaimedJob>, QueueError>;

    /// Registra el estado terminal. No hay reintentos: un trabajo fallido
    /// queda fallido.
    fn complete(&self, job_id: &str, outcome: &JobOutcome) -> Result<(), QueueError>;
}
