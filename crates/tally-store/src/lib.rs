//! Persistence for tally
//!
//! This crate provides the stores the evaluation engine reads from and
//! writes to:
//! - run records with validated status transitions
//! - append-only sample result logs with paginated reads
//! - registered models and datasets
//!
//! Two backends are included: [`MemoryStore`] and the JSON-file [`LocalStore`].

mod error;
mod local;
mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use traits::{
    DEFAULT_PAGE_LIMIT, DatasetStore, ModelConfigStore, PageRequest, ResultLog, ResultPage,
    ResultSink, RunStore, StoreHandles,
};
