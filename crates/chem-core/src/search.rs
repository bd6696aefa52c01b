//! Unidad de trabajo de la búsqueda por subestructura.

use chem_domain::{MoleculeError, StoreError};
use chemengine::ChemEngine;
use log::{debug, info};

use crate::store::MoleculeStore;

/// Recorre todas las estructuras del almacén y devuelve las que contienen
/// `query`, en orden ascendente de id.
///
/// - Almacén vacío: lista vacía sin invocar al matcher (aunque la consulta
///   sea inválida).
/// - Cualquier fallo al leer o al comparar termina en
///   `MoleculeError::JobFailure` con la descripción del error; no hay
///   resultados parciales.
pub fn run_substructure_search(store: &dyn MoleculeStore,
                               engine: &ChemEngine,
                               query: &str)
                               -> Result<Vec<String>, MoleculeError> {
    let mut rows = store.stream_structures()
                        .map_err(|e| MoleculeError::JobFailure(e.to_string()))?
                        .peekable();
    if rows.peek().is_none() {
        debug!("Búsqueda de '{query}' sobre un almacén vacío");
        return Ok(Vec::new());
    }

    let mut stream_error: Option<StoreError> = None;
    let candidates = rows.map_while(|row| match row {
                             Ok(smiles) => Some(smiles),
                             Err(e) => {
                                 stream_error = Some(e);
                                 None
                             }
                         });
    let matches = engine.substructure_search(candidates, query);
    if let Some(e) = stream_error {
        return Err(MoleculeError::JobFailure(e.to_string()));
    }
    let matches = matches.map_err(|e| MoleculeError::JobFailure(e.to_string()))?;
    info!("Búsqueda de '{query}': {} coincidencias", matches.len());
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryMoleculeStore, StructureStream};
    use chem_domain::{MoleculeRecord, MoleculeUpdate, NewMolecule};

    const SCENARIO: [&str; 5] = ["CCO", "c1ccccc1", "CC(=O)O", "CC(=O)Oc1ccccc1C(=O)O", "C[C@H](O)C(=O)O"];

    fn seeded() -> InMemoryMoleculeStore {
        let store = InMemoryMoleculeStore::new();
        for s in SCENARIO {
            store.add(&NewMolecule::new(s, None)).unwrap();
        }
        store
    }

    /// Almacén cuyo stream falla tras la primera fila.
    struct FlakyStore;

    impl MoleculeStore for FlakyStore {
        fn add(&self, _new: &NewMolecule) -> Result<MoleculeRecord, StoreError> {
            unimplemented!()
        }
        fn get_by_id(&self, _id: i32) -> Result<Option<MoleculeRecord>, StoreError> {
            unimplemented!()
        }
        fn get_by_structure(&self, _smiles: &str) -> Result<Option<MoleculeRecord>, StoreError> {
            unimplemented!()
        }
        fn list(&self, _skip: i64, _limit: i64) -> Result<Vec<MoleculeRecord>, StoreError> {
            unimplemented!()
        }
        fn stream_structures(&self) -> Result<StructureStream<'_>, StoreError> {
            let rows = vec![Ok("c1ccccc1".to_string()), Err(StoreError::Unavailable("connection reset".into()))];
            Ok(Box::new(rows.into_iter()))
        }
        fn update(&self, _id: i32, _changes: &MoleculeUpdate) -> Result<Option<MoleculeRecord>, StoreError> {
            unimplemented!()
        }
        fn delete(&self, _id: i32) -> Result<bool, StoreError> {
            unimplemented!()
        }
    }

    #[test]
    fn benzene_scenario() {
        let matches = run_substructure_search(&seeded(), &ChemEngine::new(), "c1ccccc1").unwrap();
        assert_eq!(matches, vec!["c1ccccc1", "CC(=O)Oc1ccccc1C(=O)O"]);
    }

    #[test]
    fn carboxylic_acid_scenario() {
        let matches = run_substructure_search(&seeded(), &ChemEngine::new(), "C(=O)O").unwrap();
        assert_eq!(matches, vec!["CC(=O)O", "CC(=O)Oc1ccccc1C(=O)O", "C[C@H](O)C(=O)O"]);
    }

    #[test]
    fn fluorine_scenario_is_empty() {
        assert!(run_substructure_search(&seeded(), &ChemEngine::new(), "F").unwrap().is_empty());
    }

    #[test]
    fn invalid_query_fails() {
        let err = run_substructure_search(&seeded(), &ChemEngine::new(), "invalid-smiles").unwrap_err();
        match err {
            MoleculeError::JobFailure(msg) => assert!(msg.starts_with("Invalid substructure")),
            other => panic!("error inesperado: {other:?}"),
        }
    }

    #[test]
    fn empty_store_skips_matcher() {
        // Con el almacén vacío ni siquiera se parsea la consulta
        let store = InMemoryMoleculeStore::new();
        assert_eq!(run_substructure_search(&store, &ChemEngine::new(), "invalid-smiles").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn stream_error_fails_the_job_without_partial_results() {
        let err = run_substructure_search(&FlakyStore, &ChemEngine::new(), "c1ccccc1").unwrap_err();
        assert_eq!(err, MoleculeError::JobFailure("store unavailable: connection reset".into()));
    }
}
