//! Cache clave-valor (trait KeyValueCache) y la política de lectura a
//! través / invalidación al escribir para registros de moléculas.

mod memory;
mod policy;
mod port;

pub use memory::InMemoryCache;
pub use policy::MoleculeCache;
pub use port::KeyValueCache;
