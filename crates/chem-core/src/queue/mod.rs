//! Cola de trabajos: la cara del productor (`JobQueue`, usada por el
//! servicio) y la del consumidor (`JobConsumer`, usada por los workers).

mod memory;
mod port;

pub use memory::InMemoryJobQueue;
pub use port::{ClaimedJob, JobConsumer, JobOutcome, JobQueue};
