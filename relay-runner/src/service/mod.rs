//! Service layer
//!
//! Services contain the business logic of a relay. They orchestrate the
//! repository and the polling scheduler and publish results.

pub mod output;
pub mod relay;

pub use output::{OutputName, OutputSink};
pub use relay::Relay;
