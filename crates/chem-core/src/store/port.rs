use chem_domain::{MoleculeRecord, MoleculeUpdate, NewMolecule, StoreError};

/// Secuencia perezosa de estructuras en orden ascendente de id.
///
/// Se consume una sola vez y hacia adelante; cada elemento puede fallar por
/// separado (p. ej. al pedir la siguiente página al backend).
pub type StructureStream<'a> = Box<dyn Iterator<Item = Result<String, StoreError>> + Send + 'a>;

/// CRUD sobre la tabla de moléculas, con unicidad sobre la estructura.
///
/// Los límites de paginación (`skip >= 0`, `1 <= limit <= 1000`) se validan en
/// la frontera HTTP; el almacén acepta lo que recibe.
pub trait MoleculeStore: Send + Sync {
    /// Inserta un registro nuevo. Una estructura repetida falla con
    /// `StoreError::Conflict`.
    fn add(&self, new: &NewMolecule) -> Result<MoleculeRecord, StoreError>;

    fn get_by_id(&self, id: i32) -> Result<Option<MoleculeRecord>, StoreError>;

    fn get_by_structure(&self, smiles: &str) -> Result<Option<MoleculeRecord>, StoreError>;

    /// Registros ordenados por id ascendente.
    fn list(&self, skip: i64, limit: i64) -> Result<Vec<MoleculeRecord>, StoreError>;

    /// Todas las estructuras, ascendente por id, sin materializar la tabla.
    fn stream_structures(&self) -> Result<StructureStream<'_>, StoreError>;

    /// Actualización parcial. `Ok(None)` si el id no existe; una
    /// actualización vacía devuelve el registro actual sin escribir.
    fn update(&self, id: i32, changes: &MoleculeUpdate) -> Result<Option<MoleculeRecord>, StoreError>;

    /// `true` sii existía la fila y se borró.
    fn delete(&self, id: i32) -> Result<bool, StoreError>;
}
