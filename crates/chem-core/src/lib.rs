//! chem-core: núcleo del API de moléculas.
//!
//! Define los puertos hacia los colaboradores externos (almacén, cache,
//! cola), sus variantes en memoria, la política de cache, la búsqueda por
//! subestructura, el worker y el servicio que orquesta todo.
pub mod cache;
pub mod constants;
pub mod queue;
pub mod search;
pub mod service;
pub mod store;
pub mod worker;

pub use cache::{InMemoryCache, KeyValueCache, MoleculeCache};
pub use queue::{ClaimedJob, InMemoryJobQueue, JobConsumer, JobOutcome, JobQueue};
pub use search::run_substructure_search;
pub use service::MoleculeService;
pub use store::{InMemoryMoleculeStore, MoleculeStore, StructureStream};
pub use worker::SearchWorker;
