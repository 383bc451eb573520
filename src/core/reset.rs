//! Firewall reset orchestration
//!
//! Disables ufw and clears its existing rule set, gated by an interactive
//! confirmation. Both steps go through the engine's dry/live behavior exactly
//! like policy mutations, so `--dry-run --reset` previews the reset without
//! side effects.

use crate::config::RunConfig;
use crate::core::engine::{self, ApplyMode};
use crate::core::error::Result;
use crate::prompt;
use tracing::info;

/// How a reset request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Operator declined the confirmation; the whole run must terminate
    /// cleanly with a success status, with no side effects.
    Declined,
    Completed,
}

/// Confirms on stdin, disables the firewall, then clears its rule set.
///
/// # Errors
///
/// A failed step is fatal to the run, consistent with the engine's
/// abort-on-first-failure policy.
pub async fn reset(config: &RunConfig) -> Result<ResetOutcome> {
    reset_from(config, std::io::stdin().lock()).await
}

/// [`reset`] with an explicit confirmation answer source.
pub async fn reset_from(
    config: &RunConfig,
    input: impl std::io::BufRead,
) -> Result<ResetOutcome> {
    let proceed = prompt::confirm_from(
        input,
        "This will disable the firewall and erase every existing rule. Continue?",
        config.force_yes,
    )?;
    if !proceed {
        info!("reset declined by operator");
        return Ok(ResetOutcome::Declined);
    }

    let mode = if config.dry_run {
        ApplyMode::DryRun
    } else {
        ApplyMode::Live
    };

    engine::run_step(&["disable"], "disable the firewall", mode).await?;
    engine::run_step(&["--force", "reset"], "clear the existing rule set", mode).await?;

    Ok(ResetOutcome::Completed)
}
