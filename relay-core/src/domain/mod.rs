//! Core domain types
//!
//! The structures shared between the API client (which decodes them) and the
//! runner (which reasons about them).

pub mod policy;
pub mod run;
pub mod trigger;
