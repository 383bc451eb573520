//! Core policy-compilation and execution-orchestration logic
//!
//! - [`policy`]: record-to-mutation compilation with the ordering contract
//! - [`docker`]: container bridge network resolution
//! - [`engine`]: sequential mutation application (dry/live)
//! - [`reset`]: confirmation-gated firewall reset
//! - [`error`]: fatal error types

pub mod docker;
pub mod engine;
pub mod error;
pub mod policy;
pub mod reset;
