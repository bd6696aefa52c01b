//! Almacén de registros de moléculas (trait MoleculeStore) y su variante
//! en memoria.

mod memory;
mod port;

pub use memory::InMemoryMoleculeStore;
pub use port::{MoleculeStore, StructureStream};
