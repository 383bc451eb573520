//! Privilege elevation for ufw invocations
//!
//! rufw runs as an unprivileged user and elevates only when issuing ufw
//! commands. Dry runs never spawn a process at all.
//!
//! # Elevation Strategy
//!
//! - **Preferred**: `run0` when available (systemd v256+, no SUID)
//! - **Terminal fallback**: `sudo`
//! - **Non-interactive fallback**: `pkexec`
//!
//! # Environment Variables
//!
//! - `RUFW_ELEVATION_METHOD`: force a specific method (`sudo`, `run0`, or
//!   `pkexec`). Useful with sudoers NOPASSWD rules.
//! - `RUFW_TEST_NO_ELEVATION`: bypass elevation entirely (testing only).
//! - `RUFW_UFW_COMMAND`: substitute the ufw binary (tests point this at a
//!   mock script).

use std::io;
use tokio::process::Command;

/// Error type for privilege elevation operations
#[derive(Debug, thiserror::Error)]
pub enum ElevationError {
    /// pkexec binary not found in PATH
    #[error("pkexec not found - please install PolicyKit")]
    PkexecNotFound,

    /// Requested elevation method is not available (binary not found)
    #[error("elevation method '{0}' is not available (binary not found)")]
    MethodNotAvailable(String),

    /// Invalid value for `RUFW_ELEVATION_METHOD`
    #[error("invalid RUFW_ELEVATION_METHOD '{0}'. Valid options: sudo, run0, pkexec")]
    InvalidMethod(String),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The ufw binary to invoke, honoring the test override.
pub fn control_plane_program() -> String {
    std::env::var("RUFW_UFW_COMMAND").unwrap_or_else(|_| "ufw".to_string())
}

/// Checks if a binary exists in PATH
fn binary_exists(name: &str) -> bool {
    std::env::var_os("PATH")
        .and_then(|paths| {
            std::env::split_paths(&paths).find_map(|dir| {
                let full_path = dir.join(name);
                if full_path.is_file() { Some(full_path) } else { None }
            })
        })
        .is_some()
}

/// Creates an elevated `ufw` command with the specified arguments.
///
/// Arguments are passed directly without shell interpretation, preventing
/// command injection. Callers validate arguments before this point.
///
/// # Errors
///
/// Returns `Err` if the requested or autodetected elevation helper is not
/// available.
pub fn create_elevated_ufw_command(args: &[String]) -> Result<Command, ElevationError> {
    use std::os::fd::AsFd;

    let program = control_plane_program();

    // 1. Strict test mode override (highest priority)
    if std::env::var("RUFW_TEST_NO_ELEVATION").is_ok() {
        let mut cmd = Command::new(&program);
        cmd.args(args);
        return Ok(cmd);
    }

    // 2. Direct root execution (no prompt needed)
    if nix::unistd::getuid().is_root() {
        let mut cmd = Command::new(&program);
        cmd.args(args);
        return Ok(cmd);
    }

    // 3. Explicit elevation method override
    if let Ok(method) = std::env::var("RUFW_ELEVATION_METHOD") {
        let method = method.to_lowercase();
        if !method.is_empty() {
            return match method.as_str() {
                "sudo" | "run0" | "pkexec" => {
                    if !binary_exists(&method) {
                        return Err(ElevationError::MethodNotAvailable(method));
                    }
                    let mut cmd = Command::new(&method);
                    cmd.arg(&program).args(args);
                    Ok(cmd)
                }
                _ => Err(ElevationError::InvalidMethod(method)),
            };
        }
    }

    // 4. Automatic detection - prefer run0 (modern, no SUID), then sudo/pkexec
    if binary_exists("run0") {
        let mut cmd = Command::new("run0");
        cmd.arg(&program).args(args);
        return Ok(cmd);
    }

    let is_atty = nix::unistd::isatty(std::io::stdin().as_fd()).unwrap_or(false);

    if is_atty {
        let mut cmd = Command::new("sudo");
        cmd.arg(&program).args(args);
        Ok(cmd)
    } else {
        if !binary_exists("pkexec") {
            return Err(ElevationError::PkexecNotFound);
        }
        let mut cmd = Command::new("pkexec");
        cmd.arg(&program).args(args);
        Ok(cmd)
    }
}
