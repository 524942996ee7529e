//! Error types for tally
//!
//! Every crate in the workspace funnels its failures into [`TallyError`].
//! The variants mirror the failure classes an evaluation run can hit:
//! - configuration problems (missing run, model or dataset)
//! - dataset problems (unreadable file, malformed line)
//! - request problems against the model endpoint
//! - persistence problems in a store backend

mod constructors;
mod conversions;
mod types;

pub use types::{TallyError, TallyResult};
