//! Handlers de `/molecules`.
//!
//! El servicio es síncrono (pool r2d2, Redis bloqueante), así que cada
//! handler lo ejecuta en `spawn_blocking` para no ocupar el runtime.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chem_core::constants::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use chem_core::MoleculeService;
use chem_domain::{MoleculeError, MoleculeRecord, MoleculeUpdate, NewMolecule, SearchArgs, SearchResult, SearchTicket};
use log::info;
use serde::Deserialize;

use super::error::ApiError;
use crate::state::AppState;

async fn blocking<T, F>(service: MoleculeService, f: F) -> Result<T, ApiError>
    where F: FnOnce(&MoleculeService) -> Result<T, MoleculeError> + Send + 'static,
          T: Send + 'static
{
    tokio::task::spawn_blocking(move || f(&service)).await
                                                    .map_err(|e| ApiError::Internal(format!("tarea bloqueante: {e}")))?
                                                    .map_err(ApiError::from)
}

pub async fn create(State(state): State<AppState>,
                    Json(body): Json<NewMolecule>)
                    -> Result<(StatusCode, Json<MoleculeRecord>), ApiError> {
    let record = blocking(state.service, move |s| s.create(&body)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<MoleculeRecord>, ApiError> {
    Ok(Json(blocking(state.service, move |s| s.get(id)).await?))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

impl ListParams {
    fn check(&self) -> Result<(), ApiError> {
        if self.skip < 0 {
            return Err(ApiError::BadRequest("skip must be >= 0".into()));
        }
        if !(1..=MAX_LIST_LIMIT).contains(&self.limit) {
            return Err(ApiError::BadRequest(format!("limit must be between 1 and {MAX_LIST_LIMIT}")));
        }
        Ok(())
    }
}

pub async fn list(State(state): State<AppState>,
                  Query(params): Query<ListParams>)
                  -> Result<Json<Vec<MoleculeRecord>>, ApiError> {
    params.check()?;
    let ListParams { skip, limit } = params;
    Ok(Json(blocking(state.service, move |s| s.list(skip, limit)).await?))
}

pub async fn update(State(state): State<AppState>,
                    Path(id): Path<i32>,
                    Json(changes): Json<MoleculeUpdate>)
                    -> Result<Json<MoleculeRecord>, ApiError> {
    Ok(Json(blocking(state.service, move |s| s.update(id, &changes)).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    blocking(state.service, move |s| s.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn start_search(State(state): State<AppState>,
                          Json(args): Json<SearchArgs>)
                          -> Result<(StatusCode, Json<SearchTicket>), ApiError> {
    let ticket = blocking(state.service, move |s| s.submit_search(&args.substructure_smiles)).await?;
    Ok((StatusCode::ACCEPTED, Json(ticket)))
}

pub async fn search_result(State(state): State<AppState>,
                           Path(task_id): Path<String>)
                           -> Result<Json<SearchResult>, ApiError> {
    let result = blocking(state.service, move |s| Ok(s.poll_search(&task_id))).await?;
    info!("Consulta de búsqueda {} -> {}", result.job_id, result.status);
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_bounds() {
        assert!(ListParams { skip: 0, limit: 100 }.check().is_ok());
        assert!(ListParams { skip: 5, limit: 1000 }.check().is_ok());
        assert!(ListParams { skip: -1, limit: 10 }.check().is_err());
        assert!(ListParams { skip: 0, limit: 0 }.check().is_err());
        assert!(ListParams { skip: 0, limit: 1001 }.check().is_err());
    }
}
