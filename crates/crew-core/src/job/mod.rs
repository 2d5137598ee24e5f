//! Job records y el contrato del job store.

pub mod memory;
pub mod record;
pub mod status;
pub mod store;

pub use memory::{InMemoryJobStore, StatusWrite};
pub use record::{JobRecord, JobResult};
pub use status::JobStatus;
pub use store::JobStore;
