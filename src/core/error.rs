use std::path::PathBuf;
use thiserror::Error;

/// Core error types for rufw
///
/// Only fatal conditions live here. Recoverable ones (malformed record rows,
/// invalid address ranges, Docker detection failures) are warnings that never
/// abort the run.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required record file is absent or unreadable
    #[error("missing record file: {}", path.display())]
    MissingRecords { path: PathBuf },

    /// The rules directory could not be resolved
    #[error("no rules directory: {0}")]
    NoRulesDir(String),

    /// A privileged ufw invocation failed during live application
    ///
    /// Fatal by policy: the run stops at the first failure and already
    /// applied mutations stay in effect. No rollback is attempted.
    #[error("ufw invocation failed: {command}")]
    ControlPlane {
        command: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    /// Privilege escalation unavailable or misconfigured
    #[error("elevation error: {0}")]
    Elevation(#[from] crate::elevation::ElevationError),
}

pub type Result<T> = std::result::Result<T, Error>;
