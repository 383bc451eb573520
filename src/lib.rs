//! rufw - declarative ufw policy compiler
//!
//! Compiles a declarative network-access policy (named local networks,
//! publicly exposed ports, and locally-restricted services) into an ordered
//! sequence of ufw rule additions, with validation, confirmation gating,
//! dry-run preview, and Docker bridge integration.
//!
//! # Architecture
//!
//! - [`core`] - Policy compilation, bridge resolution, execution engine
//! - [`records`] - Record file loading (networks, open ports, services)
//! - [`validators`] - Syntactic address-range validation
//! - [`elevation`] - Privilege escalation for ufw invocations
//! - [`prompt`] - Interactive confirmation gate
//! - [`audit`] - Audit trail of privileged operations
//!
//! # Failure semantics
//!
//! Malformed record rows and invalid network ranges are warnings, not
//! errors. A failed live ufw invocation aborts the run immediately with no
//! rollback: the already-applied prefix of mutations stays in effect.

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]

pub mod audit;
pub mod config;
pub mod core;
pub mod elevation;
pub mod prompt;
pub mod records;
pub mod utils;
pub mod validators;

// Re-export commonly used types
pub use core::error::{Error, Result};
pub use core::policy::{FirewallMutation, MutationAction, Protocol};
