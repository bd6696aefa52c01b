//! Taxonomía de errores del dominio de moléculas.
//!
//! - `MoleculeError`: errores de negocio que cruzan la frontera del servicio.
//! - `StoreError`, `CacheError`, `QueueError`: errores de los colaboradores
//!   (persistencia relacional, cache clave-valor, cola de trabajos).

use thiserror::Error;

/// Errores del servicio de moléculas, uno por categoría de la taxonomía.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoleculeError {
    /// La estructura no parsea (error de usuario, clase 400).
    #[error("The SMILES string '{0}' is invalid.")]
    InvalidStructure(String),
    /// No existe fila con ese id (clase 404).
    #[error("Molecule with ID/SMILES '{0}' not found.")]
    NotFound(i32),
    /// Violación de unicidad sobre `smiles_string` (clase 409).
    #[error("Molecule with SMILES '{0}' already exists.")]
    Conflict(String),
    /// Cache o cola no disponibles. La cache nunca lo propaga; la cola sólo al
    /// encolar, cuando no hay forma de degradar.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    /// Fallo al ejecutar una búsqueda; se expone como campo de resultado.
    #[error("{0}")]
    JobFailure(String),
    /// Cualquier otro fallo del almacén (clase 500).
    #[error("Store error: {0}")]
    Store(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unique violation: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store error: {0}")]
    Backend(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache payload error: {0}")]
    Payload(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue unavailable: {0}")]
    Unavailable(String),
    #[error("queue error: {0}")]
    Backend(String),
    #[error("queue payload error: {0}")]
    Payload(String),
}

impl From<StoreError> for MoleculeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => MoleculeError::Conflict(msg),
            other => MoleculeError::Store(other.to_string()),
        }
    }
}

impl From<QueueError> for MoleculeError {
    fn from(e: QueueError) -> Self {
        MoleculeError::Unavailable(e.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Payload(e.to_string())
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(e: serde_json::Error) -> Self {
        QueueError::Payload(e.to_string())
    }
}
