//! Traducción de errores del servicio a respuestas HTTP `{"detail": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chem_domain::MoleculeError;
use log::error;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Service(MoleculeError),
    BadRequest(String),
    Internal(String),
}

impl From<MoleculeError> for ApiError {
    fn from(e: MoleculeError) -> Self {
        ApiError::Service(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(MoleculeError::InvalidStructure(_)) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(MoleculeError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(MoleculeError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Service(MoleculeError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Service(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Service(MoleculeError::Conflict(_)) => "A molecule with this SMILES already exists.".to_string(),
            ApiError::Service(MoleculeError::Unavailable(_)) => "Search queue unavailable, retry later.".to_string(),
            ApiError::Service(MoleculeError::Store(_) | MoleculeError::JobFailure(_)) | ApiError::Internal(_) => {
                "Internal server error".to_string()
            }
            ApiError::Service(e) => e.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Petición fallida ({status}): {self:?}");
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_per_error_kind() {
        assert_eq!(ApiError::from(MoleculeError::InvalidStructure("X".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(MoleculeError::NotFound(7)).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(MoleculeError::Conflict("CCO".into())).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(MoleculeError::Unavailable("down".into())).status(),
                   StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::from(MoleculeError::Store("boom".into())).status(),
                   StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let detail = ApiError::from(MoleculeError::Store("password=secret".into())).detail();
        assert_eq!(detail, "Internal server error");
        let detail = ApiError::from(MoleculeError::InvalidStructure("C1CC".into())).detail();
        assert_eq!(detail, "The SMILES string 'C1CC' is invalid.");
    }
}
