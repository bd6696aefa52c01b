use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chem_domain::{MoleculeRecord, MoleculeUpdate, NewMolecule, StoreError};

use super::{MoleculeStore, StructureStream};

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: BTreeMap<i32, MoleculeRecord>,
}

impl Inner {
    fn smiles_taken(&self, smiles: &str, except: Option<i32>) -> bool {
        self.rows.values().any(|r| r.smiles == smiles && Some(r.id) != except)
    }
}

/// Almacén en memoria para desarrollo local y tests. Ids desde 1, igual que
/// una columna SERIAL.
#[derive(Default)]
pub struct InMemoryMoleculeStore {
    inner: RwLock<Inner>,
}

impl InMemoryMoleculeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Backend("lock envenenado".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Backend("lock envenenado".into()))
    }
}

impl MoleculeStore for InMemoryMoleculeStore {
    fn add(&self, new: &NewMolecule) -> Result<MoleculeRecord, StoreError> {
        let mut inner = self.write()?;
        if inner.smiles_taken(&new.smiles, None) {
            return Err(StoreError::Conflict(new.smiles.clone()));
        }
        inner.next_id += 1;
        let record = MoleculeRecord { id: inner.next_id, smiles: new.smiles.clone(), name: new.name.clone() };
        inner.rows.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_by_id(&self, id: i32) -> Result<Option<MoleculeRecord>, StoreError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    fn get_by_structure(&self, smiles: &str) -> Result<Option<MoleculeRecord>, StoreError> {
        Ok(self.read()?.rows.values().find(|r| r.smiles == smiles).cloned())
    }

    fn list(&self, skip: i64, limit: i64) -> Result<Vec<MoleculeRecord>, StoreError> {
        let skip = usize::try_from(skip.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(self.read()?.rows.values().skip(skip).take(limit).cloned().collect())
    }

    fn stream_structures(&self) -> Result<StructureStream<'_>, StoreError> {
        let snapshot: Vec<String> = self.read()?.rows.values().map(|r| r.smiles.clone()).collect();
        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }

    fn update(&self, id: i32, changes: &MoleculeUpdate) -> Result<Option<MoleculeRecord>, StoreError> {
        if changes.is_empty() {
            return self.get_by_id(id);
        }
        let mut inner = self.write()?;
        if let Some(smiles) = &changes.smiles {
            if inner.smiles_taken(smiles, Some(id)) {
                return Err(StoreError::Conflict(smiles.clone()));
            }
        }
        Ok(inner.rows.get_mut(&id).map(|record| {
                                      changes.apply_to(record);
                                      record.clone()
                                  }))
    }

    fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.write()?.rows.remove(&id).is_some())
    }
}
