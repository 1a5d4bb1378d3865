//! Scheduler layer
//!
//! Bounded polling for the two waiting stages of a relay: finding the run a
//! dispatch created, then waiting for that run to finish. Both stages share
//! the same engine and differ only in policy and check.

pub mod correlator;
pub mod engine;
pub mod watcher;

pub use correlator::correlate;
pub use engine::{Attempt, PollError, PollOutcome};
pub use watcher::watch;
