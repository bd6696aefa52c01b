use chem_infra::InfraError;
use chem_persistence::PersistenceError;
use thiserror::Error;

/// Errores de arranque y de ciclo de vida del servidor.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error interno: {0}")]
    Internal(String),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Error de infraestructura: {0}")]
    Infra(#[from] InfraError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_variant_format() {
        let err = AppError::Internal("no se pudo crear el runtime tokio: sin hilos".into());
        assert_eq!(err.to_string(), "Error interno: no se pudo crear el runtime tokio: sin hilos");
    }

    #[test]
    fn test_config_variant_format() {
        let err = AppError::Config("mala configuración".into());
        assert_eq!(err.to_string(), "Error de configuración: mala configuración");
    }

    #[test]
    fn test_io_variant_from() {
        let io_err = std::io::Error::other("falló IO");
        let err: AppError = io_err.into();
        assert_eq!(err.to_string(), "Error en IO: falló IO");
    }

    #[test]
    fn test_infra_variant_from() {
        let err: AppError = InfraError::Config("sin REDIS_HOST".into()).into();
        assert!(err.to_string().contains("sin REDIS_HOST"));
    }
}
