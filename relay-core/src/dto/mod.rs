//! Data Transfer Objects for the workflow API
//!
//! Wire shapes of requests sent to and responses received from the API.
//! Domain types are embedded directly where the wire format already matches.

pub mod dispatch;
pub mod run;
