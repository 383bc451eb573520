//! Run configuration
//!
//! All invocation flags live in one immutable [`RunConfig`] value constructed
//! in `main` and threaded explicitly through every component entry point. No
//! component consults global state to decide its behavior.

use crate::core::error::{Error, Result};
use std::path::PathBuf;

/// Resolved parameters for a single run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Render mutations instead of applying them
    pub dry_run: bool,
    /// Skip interactive confirmation prompts
    pub force_yes: bool,
    /// Disable and clear the existing rule set before compiling
    pub reset_requested: bool,
    /// Include the Docker bridge network as a trusted local network
    pub docker_enabled: bool,
    /// Explicit bridge CIDR, bypassing live detection
    pub docker_cidr_override: Option<String>,
    /// Directory holding the three record files
    pub rules_dir: PathBuf,
}

impl RunConfig {
    /// Resolves the rules directory: explicit flag, else the XDG config dir.
    ///
    /// # Errors
    ///
    /// Returns `Err` when no directory was given and the platform config
    /// directory cannot be determined.
    pub fn resolve_rules_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = explicit {
            return Ok(dir);
        }
        crate::utils::get_config_dir().ok_or_else(|| {
            Error::NoRulesDir(
                "no --rules-dir given and the platform config directory is unavailable".into(),
            )
        })
    }
}
