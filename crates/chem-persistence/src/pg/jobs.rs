use chem_core::{ClaimedJob, JobConsumer, JobOutcome, JobQueue};
use chem_domain::{JobState, JobStatus, QueueError, SearchTicket};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::{debug, info, warn};
use serde_json::Value;
use uuid::Uuid;

use super::{with_retry, ConnectionProvider};
use crate::error::PersistenceError;
use crate::schema::search_jobs;

/// Fila de la tabla `search_jobs`.
#[derive(Queryable, Debug, Clone)]
pub struct JobRow {
    pub id: Uuid,
    pub task_name: String,
    pub payload: Value,
    pub status: String,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobRow {
    /// Traduce la fila al estado que ve el servicio.
    pub fn state(&self) -> JobState {
        match self.status.parse::<JobStatus>() {
            Ok(JobStatus::Success) => {
                let matches = self.result
                                  .clone()
                                  .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok())
                                  .unwrap_or_default();
                JobState::succeeded(matches)
            }
            Ok(JobStatus::Failure) => JobState::failed(self.error.clone().unwrap_or_default()),
            Ok(other) => JobState::in_progress(other),
            Err(_) => {
                warn!("Estado desconocido '{}' en el trabajo {}", self.status, self.id);
                JobState { status: self.status.clone(), ready: false, failed: false, matches: None, error: None }
            }
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = search_jobs)]
struct NewJobRow<'a> {
    id: Uuid,
    task_name: &'a str,
    payload: &'a Value,
    status: &'a str,
}

/// Cola de trabajos sobre Postgres: el servicio encola y consulta, los
/// workers reclaman y completan.
///
/// El reclamo usa `FOR UPDATE SKIP LOCKED`, de modo que varios workers (hilos
/// o procesos) pueden compartir la tabla sin tomar el mismo trabajo.
pub struct PgJobQueue<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> PgJobQueue<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Fila completa de un trabajo, si existe.
    pub fn find(&self, job_id: Uuid) -> Result<Option<JobRow>, PersistenceError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            Ok(search_jobs::table.find(job_id).first::<JobRow>(&mut conn).optional()?)
        })
    }
}

impl<P: ConnectionProvider> JobQueue for PgJobQueue<P> {
    fn submit(&self, task_name: &str, args: Value) -> Result<SearchTicket, QueueError> {
        let id = Uuid::new_v4();
        let status = JobStatus::Pending.as_str();
        let mut conn = with_retry(|| self.provider.connection())?;
        diesel::insert_into(search_jobs::table).values(NewJobRow { id, task_name, payload: &args, status })
                                               .execute(&mut conn)
                                               .map_err(PersistenceError::from)?;
        info!("Trabajo {id} encolado ({task_name})");
        Ok(SearchTicket { job_id: id.to_string(), status: status.to_string() })
    }

    fn status(&self, job_id: &str) -> Result<JobState, QueueError> {
        // Un id que ni siquiera es UUID no puede existir: se informa como pendiente.
        let Ok(id) = Uuid::parse_str(job_id) else {
            debug!("Id de trabajo no UUID: {job_id}");
            return Ok(JobState::pending());
        };
        Ok(self.find(id)?.map(|row| row.state()).unwrap_or_else(JobState::pending))
    }
}

impl<P: ConnectionProvider> JobConsumer for PgJobQueue<P> {
    fn claim_next(&self, task_name: &str) -> Result<Option<ClaimedJob>, QueueError> {
        let claimed = with_retry(|| {
            let mut conn = self.provider.connection()?;
            conn.transaction::<_, PersistenceError, _>(|tx| {
                    let next = search_jobs::table.select((search_jobs::id, search_jobs::payload))
                                                 .filter(search_jobs::task_name.eq(task_name))
                                                 .filter(search_jobs::status.eq(JobStatus::Pending.as_str()))
                                                 .order(search_jobs::created_at.asc())
                                                 .for_update()
                                                 .skip_locked()
                                                 .first::<(Uuid, Value)>(tx)
                                                 .optional()?;
                    let Some((id, payload)) = next else {
                        return Ok(None);
                    };
                    diesel::update(search_jobs::table.find(id))
                        .set((search_jobs::status.eq(JobStatus::Started.as_str()),
                              search_jobs::started_at.eq(Utc::now())))
                        .execute(tx)?;
                    Ok(Some((id, payload)))
                })
        })?;
        Ok(claimed.map(|(id, args)| ClaimedJob { job_id: id.to_string(), task_name: task_name.to_string(), args }))
    }

    fn complete(&self, job_id: &str, outcome: &JobOutcome) -> Result<(), QueueError> {
        let id = Uuid::parse_str(job_id).map_err(|e| QueueError::Backend(format!("id de trabajo inválido: {e}")))?;
        let (status, result, error) = match outcome {
            Ok(matches) => (JobStatus::Success, Some(serde_json::to_value(matches)?), None),
            Err(error) => (JobStatus::Failure, None, Some(error.as_str())),
        };
        let updated = with_retry(|| {
            let mut conn = self.provider.connection()?;
            Ok(diesel::update(search_jobs::table.find(id))
                   .set((search_jobs::status.eq(status.as_str()),
                         search_jobs::result.eq(result.clone()),
                         search_jobs::error.eq(error),
                         search_jobs::finished_at.eq(Utc::now())))
                   .execute(&mut conn)?)
        })?;
        if updated == 0 {
            return Err(QueueError::Backend(format!("trabajo desconocido: {job_id}")));
        }
        debug!("Trabajo {job_id} terminado con {status}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(status: &str, result: Option<Value>, error: Option<&str>) -> JobRow {
        JobRow { id: Uuid::nil(),
                 task_name: "t".into(),
                 payload: json!({}),
                 status: status.into(),
                 result,
                 error: error.map(str::to_string),
                 created_at: Utc::now(),
                 started_at: None,
                 finished_at: None }
    }

    #[test]
    fn row_state_mapping() {
        assert_eq!(row("PENDING", None, None).state(), JobState::pending());
        assert_eq!(row("STARTED", None, None).state(), JobState::in_progress(JobStatus::Started));
        assert_eq!(row("SUCCESS", Some(json!(["CCO"])), None).state(), JobState::succeeded(vec!["CCO".into()]));
        assert_eq!(row("FAILURE", None, Some("boom")).state(), JobState::failed("boom"));
        let odd = row("REVOKED", None, None).state();
        assert_eq!(odd.status, "REVOKED");
        assert!(!odd.ready);
    }
}
