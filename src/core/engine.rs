//! Mutation application against the ufw control plane
//!
//! Mutations are applied strictly sequentially, in compiled order. A failed
//! invocation is fatal to the entire run: execution stops immediately and
//! already-applied mutations stay in effect (abort on first failure, state
//! may be partially applied, no rollback). Dry-run mode renders the
//! exact invocation text instead and never spawns a process.

use crate::core::error::{Error, Result};
use crate::core::policy::FirewallMutation;
use tracing::{error, info};

/// Execution mode, threaded from the run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Render invocations without side effects
    DryRun,
    /// Issue privileged ufw calls
    Live,
}

impl ApplyMode {
    pub fn is_dry(self) -> bool {
        matches!(self, ApplyMode::DryRun)
    }
}

/// Outcome of an apply pass.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    pub total: usize,
    /// Mutations actually issued to ufw (always 0 in dry mode).
    pub applied: usize,
    /// Rendered invocation lines (dry mode only).
    pub previewed: Vec<String>,
}

/// Applies the compiled mutation sequence.
///
/// # Errors
///
/// In live mode, the first failed ufw invocation aborts the run with
/// `Error::ControlPlane`; the partial-application count is logged before
/// returning. Dry mode always succeeds.
pub async fn apply(mutations: &[FirewallMutation], mode: ApplyMode) -> Result<ApplyReport> {
    let mut report = ApplyReport {
        total: mutations.len(),
        ..ApplyReport::default()
    };

    for mutation in mutations {
        if mode.is_dry() {
            let line = mutation.to_string();
            println!("{line}");
            report.previewed.push(line);
            continue;
        }

        if let Err(e) = run_control_plane(&mutation.args()).await {
            error!(
                "aborting: {} of {} mutations applied; the firewall may be partially configured",
                report.applied, report.total
            );
            return Err(e);
        }
        info!("applied: {mutation}");
        report.applied += 1;
    }

    Ok(report)
}

/// Runs a single orchestration step (used by reset), honoring dry mode.
///
/// # Errors
///
/// Fatal on a failed live invocation, like policy mutations.
pub async fn run_step(args: &[&str], annotation: &str, mode: ApplyMode) -> Result<()> {
    let args: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();

    if mode.is_dry() {
        println!("ufw {}    # {annotation}", args.join(" "));
        return Ok(());
    }

    run_control_plane(&args).await?;
    info!("ufw {} ({annotation})", args.join(" "));
    Ok(())
}

/// Issues one privileged ufw invocation and maps a non-zero exit to a fatal
/// error carrying the command text, stderr, and exit code.
async fn run_control_plane(args: &[String]) -> Result<()> {
    let command_text = format!("ufw {}", args.join(" "));

    let output = crate::elevation::create_elevated_ufw_command(args)?
        .output()
        .await?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(Error::ControlPlane {
            command: command_text,
            stderr: if stderr.is_empty() { None } else { Some(stderr) },
            exit_code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::{MutationAction, Protocol};

    fn sample_mutation() -> FirewallMutation {
        FirewallMutation {
            action: MutationAction::AllowFrom,
            source_range: Some("192.168.1.0/24".to_string()),
            port: 22,
            protocol: Protocol::Tcp,
            annotation: "SSH (Home)".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dry_run_renders_without_side_effects() {
        let mutations = vec![sample_mutation()];

        let report = apply(&mutations, ApplyMode::DryRun).await.unwrap();

        assert_eq!(report.total, 1);
        assert_eq!(report.applied, 0);
        assert_eq!(report.previewed.len(), 1);
        assert_eq!(
            report.previewed[0],
            "ufw allow from 192.168.1.0/24 to any port 22 proto tcp    # SSH (Home)"
        );
    }

    #[tokio::test]
    async fn test_dry_run_empty_sequence() {
        let report = apply(&[], ApplyMode::DryRun).await.unwrap();
        assert_eq!(report.total, 0);
        assert!(report.previewed.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_step_renders() {
        // Dry steps never spawn a process, so this cannot touch a real ufw.
        run_step(&["disable"], "disable the firewall", ApplyMode::DryRun)
            .await
            .unwrap();
    }
}
