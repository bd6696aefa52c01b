// chem-domain library entry point
pub mod error;
pub mod molecule;
pub mod search;
pub mod validator;

pub use error::{CacheError, MoleculeError, QueueError, StoreError};
pub use molecule::{MoleculeRecord, MoleculeUpdate, NewMolecule};
pub use search::{JobState, JobStatus, SearchArgs, SearchOutcome, SearchResult, SearchTicket, SEARCH_TASK_NAME};
pub use validator::StructureValidator;
