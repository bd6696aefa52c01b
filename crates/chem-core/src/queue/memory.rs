use std::collections::VecDeque;
use std::sync::Mutex;

use chem_domain::{JobState, JobStatus, QueueError, SearchTicket};
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use super::{ClaimedJob, JobConsumer, JobOutcome, JobQueue};

struct Entry {
    task_name: String,
    args: Value,
    state: JobState,
}

/// Cola en proceso: broker y almacén de resultados a la vez.
///
/// Sirve al modo de desarrollo (`STORAGE_BACKEND=memory`) junto con un
/// `SearchWorker` en un hilo propio.
#[derive(Default)]
pub struct InMemoryJobQueue {
    jobs: DashMap<String, Entry>,
    pending: Mutex<VecDeque<String>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trabajos aún sin reclamar.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl JobQueue for InMemoryJobQueue {
    fn submit(&self, task_name: &str, args: Value) -> Result<SearchTicket, QueueError> {
        let job_id = Uuid::new_v4().to_string();
        let state = JobState::pending();
        let status = state.status.clone();
        self.jobs.insert(job_id.clone(), Entry { task_name: task_name.to_string(), args, state });
        self.pending
            .lock()
            .map_err(|_| QueueError::Backend("lock envenenado".into()))?
            .push_back(job_id.clone());
        Ok(SearchTicket { job_id, status })
    }

    fn status(&self, job_id: &str) -> Result<JobState, QueueError> {
        Ok(self.jobs.get(job_id).map(|e| e.state.clone()).unwrap_or_else(JobState::pending))
    }
}

impl JobConsumer for InMemoryJobQueue {
    fn claim_next(&self, task_name: &str) -> Result<Option<ClaimedJob>, QueueError> {
        let mut pending = self.pending.lock().map_err(|_| QueueError::Backend("lock envenenado".into()))?;
        let position = pending.iter()
                              .position(|id| self.jobs.get(id).is_some_and(|e| e.task_name == task_name));
        let Some(job_id) = position.and_then(|p| pending.remove(p)) else {
            return Ok(None);
        };
        drop(pending);
        let Some(mut entry) = self.jobs.get_mut(&job_id) else {
            return Ok(None);
        };
        entry.state = JobState::in_progress(JobStatus::Started);
        Ok(Some(ClaimedJob { job_id, task_name: entry.task_name.clone(), args: entry.args.clone() }))
    }

    fn complete(&self, job_id: &str, outcome: &JobOutcome) -> Result<(), QueueError> {
        let mut entry = self.jobs
                            .get_mut(job_id)
                            .ok_or_else(|| QueueError::Backend(format!("trabajo desconocido: {job_id}")))?;
        entry.state = match outcome {
            Ok(matches) => JobState::succeeded(matches.clone()),
            Err(error) => JobState::failed(error.clone()),
        };
        Ok(())
    }
}
