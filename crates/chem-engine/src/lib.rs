//! chemengine
//!
//! Capacidad química del sistema sobre RDKit (crate `rdkit`): validación de
//! SMILES y búsqueda de subestructuras. El resto del workspace sólo ve
//! `ChemEngine` (`parse`, `is_valid`, `substructure_search`).

use log::debug;
use thiserror::Error;

pub mod core;

pub use crate::core::Molecule;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("SMILES inválido '{smiles}': {reason}")]
    Parse { smiles: String, reason: String },
    #[error("Invalid substructure: {0}")]
    InvalidQuery(String),
}

impl EngineError {
    pub(crate) fn parse(smiles: &str, reason: impl Into<String>) -> Self {
        EngineError::Parse { smiles: smiles.to_string(), reason: reason.into() }
    }
}

/// Fachada sin estado sobre RDKit.
///
/// Se mantiene como tipo para que los consumidores inyecten la capacidad
/// química en lugar de llamar funciones libres. Las moléculas se crean y
/// se descartan dentro de cada llamada, así que la fachada es `Send + Sync`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChemEngine {
    _private: (),
}

impl ChemEngine {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Parsea un SMILES; error si RDKit no produce una molécula sanitizada.
    pub fn parse(&self, input: &str) -> Result<Molecule, EngineError> {
        Molecule::from_smiles(input)
    }

    pub fn is_valid(&self, input: &str) -> bool {
        self.parse(input).is_ok()
    }

    /// Devuelve, en el orden de entrada, los candidatos que contienen la
    /// subestructura `query`.
    ///
    /// - La consulta se parsea primero: si es inválida falla con
    ///   `EngineError::InvalidQuery`, aunque no haya candidatos.
    /// - Los candidatos que no parsean se descartan en silencio.
    pub fn substructure_search<I, S>(&self, candidates: I, query: &str) -> Result<Vec<String>, EngineError>
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        let query_mol = self.parse(query).map_err(|e| EngineError::InvalidQuery(e.to_string()))?;
        let mut matches = Vec::new();
        let mut skipped = 0usize;
        for candidate in candidates {
            let candidate: String = candidate.into();
            match self.parse(&candidate) {
                Ok(mol) if mol.has_substructure(&query_mol) => matches.push(candidate),
                Ok(_) => {}
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("substructure_search: {skipped} candidatos inválidos omitidos");
        }
        Ok(matches)
    }
}
