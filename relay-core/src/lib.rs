//! Relay Core
//!
//! Core types shared by the relay workspace.
//!
//! This crate contains:
//! - Domain types: triggers, workflow runs and polling policies
//! - DTOs: request and response bodies of the workflow API

pub mod domain;
pub mod dto;
