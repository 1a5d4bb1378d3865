//! Repository layer
//!
//! Repositories are stateless adapters over the workflow API. They expose
//! only the three calls relay makes, bound to one target workflow, without
//! any business logic.
//!
//! The trait exists so the state machine can be driven by scripted fakes in
//! tests.

mod workflows;

pub use workflows::HttpWorkflowRepository;
pub use workflows::WorkflowRepository;

#[cfg(test)]
pub mod fake;
