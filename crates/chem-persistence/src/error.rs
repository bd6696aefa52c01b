//! Errores de persistencia.
//! Mapea errores de Diesel / conexión a variantes semánticas y de ahí a los
//! errores de los puertos del core (`StoreError`, `QueueError`).

use chem_domain::{QueueError, StoreError};
use thiserror::Error;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unique violation: {0}")] 
    UniqueViolation(String),
    #[error("check violation: {0}")] 
    CheckViolation(String),
    #[error("foreign key violation: {0}")] 
    ForeignKeyViolation(String),
    #[error("not found")] 
    NotFound,
    #[error("serialization conflict (retryable)")] 
    SerializationConflict,
    #[error("transient IO / connection pool error: {0}")] 
    TransientIo(String),
    #[error("invalid configuration: {0}")] 
    Config(String),
    #[error("unknown database error: {0}")] 
    Unknown(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => match kind {
                        DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(info.message().to_string()),
                        DatabaseErrorKind::CheckViolation => Self::CheckViolation(info.message().to_string()),
                        DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(info.message().to_string()),
                        DatabaseErrorKind::SerializationFailure => Self::SerializationConflict,
                        other => Self::Unknown(format!("db error kind {:?}: {}", other, info.message())),
                    },
            DieselError::DeserializationError(e) => Self::Unknown(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::AlreadyInTransaction => Self::Unknown("already in transaction".into()),
            DieselError::RollbackErrorOnCommit { rollback_error, commit_error } => Self::Unknown(format!("rollback={rollback_error}; commit={commit_error}")),
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::QueryBuilderError(e) => Self::Unknown(format!("query builder: {e}")),
            DieselError::InvalidCString(e) => Self::Unknown(format!("invalid cstring: {e}")),
            DieselError::RollbackTransaction => Self::Unknown("rollback transaction".into()),
            DieselError::NotInTransaction => Self::Unknown("not in transaction".into()),
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::UniqueViolation(msg) => StoreError::Conflict(msg),
            PersistenceError::TransientIo(msg) => StoreError::Unavailable(msg),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl From<PersistenceError> for QueueError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::TransientIo(msg) => QueueError::Unavailable(msg),
            other => QueueError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_store_conflict() {
        let e: StoreError = PersistenceError::UniqueViolation("uq_molecules_smiles_string".into()).into();
        assert_eq!(e, StoreError::Conflict("uq_molecules_smiles_string".into()));
    }

    #[test]
    fn pool_errors_are_unavailable() {
        let e: StoreError = PersistenceError::TransientIo("pool error: timed out".into()).into();
        assert!(matches!(e, StoreError::Unavailable(_)));
        let e: QueueError = PersistenceError::TransientIo("pool error: timed out".into()).into();
        assert!(matches!(e, QueueError::Unavailable(_)));
        let e: QueueError = PersistenceError::NotFound.into();
        assert_eq!(e, QueueError::Backend("not found".into()));
    }

    #[test]
    fn diesel_not_found_maps() {
        assert!(matches!(PersistenceError::from(DieselError::NotFound), PersistenceError::NotFound));
    }
}
