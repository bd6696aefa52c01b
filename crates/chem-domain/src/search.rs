// search.rs
//! Vocabulario de los trabajos de búsqueda por subestructura.
//!
//! Los estados siguen el vocabulario de la cola (`PENDING`, `STARTED`,
//! `SUCCESS`, `FAILURE`) y se transportan como cadenas opacas: el servicio
//! los devuelve tal cual sin interpretarlos.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nombre con el que se encola la búsqueda; los workers sólo reclaman
/// trabajos con este nombre.
pub const SEARCH_TASK_NAME: &str = "molecules.run_substructure_search";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Started,
    Success,
    Failure,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Started => "STARTED",
            JobStatus::Success => "SUCCESS",
            JobStatus::Failure => "FAILURE",
        }
    }

    /// Estado terminal (el resultado ya está disponible).
    pub fn is_ready(&self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failure)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "STARTED" => Ok(JobStatus::Started),
            "SUCCESS" => Ok(JobStatus::Success),
            "FAILURE" => Ok(JobStatus::Failure),
            other => Err(format!("estado de trabajo desconocido: {other}")),
        }
    }
}

/// Argumentos de una búsqueda. Es a la vez el cuerpo de la petición HTTP y
/// la carga útil que viaja por la cola.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchArgs {
    pub substructure_smiles: String,
}

/// Resultado expuesto al consultar un trabajo terminado: la lista de
/// coincidencias o, si falló, el texto del error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Matches(Vec<String>),
    Error(String),
}

/// Estado de un trabajo tal como lo informa la cola.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobState {
    pub status: String,
    pub ready: bool,
    pub failed: bool,
    pub matches: Option<Vec<String>>,
    pub error: Option<String>,
}

impl JobState {
    /// Estado de un trabajo aún no visto (o desconocido).
    pub fn pending() -> Self {
        Self::in_progress(JobStatus::Pending)
    }

    pub fn in_progress(status: JobStatus) -> Self {
        Self { status: status.as_str().to_string(), ready: false, failed: false, matches: None, error: None }
    }

    pub fn succeeded(matches: Vec<String>) -> Self {
        Self { status: JobStatus::Success.as_str().to_string(),
               ready: true,
               failed: false,
               matches: Some(matches),
               error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { status: JobStatus::Failure.as_str().to_string(),
               ready: true,
               failed: true,
               matches: None,
               error: Some(error.into()) }
    }

    /// Resultado visible: `None` mientras no esté listo.
    pub fn outcome(&self) -> Option<SearchOutcome> {
        if !self.ready {
            return None;
        }
        if self.failed {
            let detail = self.error.clone().unwrap_or_else(|| self.status.clone());
            return Some(SearchOutcome::Error(detail));
        }
        Some(SearchOutcome::Matches(self.matches.clone().unwrap_or_default()))
    }
}

/// Respuesta al encolar una búsqueda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTicket {
    #[serde(rename = "task_id")]
    pub job_id: String,
    pub status: String,
}

/// Respuesta al consultar una búsqueda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "task_id")]
    pub job_id: String,
    pub status: String,
    pub result: Option<SearchOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_str() {
        for s in [JobStatus::Pending, JobStatus::Started, JobStatus::Success, JobStatus::Failure] {
            assert_eq!(s.as_str().parse::<JobStatus>().unwrap(), s);
        }
        assert!("RETRY".parse::<JobStatus>().is_err());
        assert!(!JobStatus::Started.is_ready());
    }

    #[test]
    fn outcome_only_when_ready() {
        assert_eq!(JobState::pending().outcome(), None);
        assert_eq!(JobState::in_progress(JobStatus::Started).outcome(), None);
        assert_eq!(JobState::succeeded(vec!["CCO".into()]).outcome(),
                   Some(SearchOutcome::Matches(vec!["CCO".into()])));
        assert_eq!(JobState::failed("Invalid substructure: x").outcome(),
                   Some(SearchOutcome::Error("Invalid substructure: x".into())));
    }

    #[test]
    fn result_json_shape() {
        let done = SearchResult { job_id: "abc".into(),
                                  status: "SUCCESS".into(),
                                  result: Some(SearchOutcome::Matches(vec!["c1ccccc1".into()])) };
        assert_eq!(serde_json::to_value(&done).unwrap(),
                   json!({"task_id": "abc", "status": "SUCCESS", "result": ["c1ccccc1"]}));
        let pending = SearchResult { job_id: "abc".into(), status: "PENDING".into(), result: None };
        assert_eq!(serde_json::to_value(&pending).unwrap(),
                   json!({"task_id": "abc", "status": "PENDING", "result": null}));
        let failed = SearchResult { job_id: "abc".into(),
                                    status: "FAILURE".into(),
                                    result: Some(SearchOutcome::Error("boom".into())) };
        assert_eq!(serde_json::to_value(&failed).unwrap()["result"], json!("boom"));
    }
}
