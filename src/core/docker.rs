//! Docker bridge network resolution
//!
//! When Docker integration is enabled, the bridge subnet participates in the
//! policy as one more trusted local network. Resolution order: explicit CLI
//! override, live detection from the Docker daemon, fixed fallback. Detection
//! failures are never fatal: containers on the stock bridge still get a
//! usable rule via the fallback range.

use tokio::process::Command;
use tracing::{info, warn};

/// The stock Docker bridge subnet, used when live detection fails.
pub const FALLBACK_BRIDGE_RANGE: &str = "172.17.0.0/16";

/// How the bridge range was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeOrigin {
    /// Operator-supplied CIDR override
    Explicit,
    /// Queried live from the Docker daemon
    Detected,
    /// Fixed default after a detection failure
    Fallback,
}

/// The container bridge network's address range, synthesized per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeNetwork {
    pub range: String,
    pub origin: BridgeOrigin,
}

/// Resolves the bridge network range.
///
/// Returns `None` when Docker integration is disabled; otherwise always
/// produces a usable result. The returned range is validated like any other
/// network range at compile time, not here.
pub async fn resolve(enabled: bool, override_cidr: Option<&str>) -> Option<BridgeNetwork> {
    if !enabled {
        return None;
    }

    if let Some(cidr) = override_cidr {
        info!("using explicit Docker bridge range {cidr}");
        return Some(BridgeNetwork {
            range: cidr.to_string(),
            origin: BridgeOrigin::Explicit,
        });
    }

    match detect_bridge_subnet().await {
        Ok(subnet) => {
            info!("detected Docker bridge range {subnet}");
            Some(BridgeNetwork {
                range: subnet,
                origin: BridgeOrigin::Detected,
            })
        }
        Err(reason) => {
            warn!("Docker bridge detection failed ({reason}); falling back to {FALLBACK_BRIDGE_RANGE}");
            Some(BridgeNetwork {
                range: FALLBACK_BRIDGE_RANGE.to_string(),
                origin: BridgeOrigin::Fallback,
            })
        }
    }
}

/// Queries the Docker daemon for the bridge network subnet.
///
/// The docker binary is overridable with `RUFW_DOCKER_COMMAND` for tests.
/// Any failure mode (binary absent, daemon down, empty output) is reported
/// as a plain reason string for the caller's warning.
async fn detect_bridge_subnet() -> Result<String, String> {
    let program =
        std::env::var("RUFW_DOCKER_COMMAND").unwrap_or_else(|_| "docker".to_string());

    let output = Command::new(&program)
        .args([
            "network",
            "inspect",
            "bridge",
            "--format",
            "{{range .IPAM.Config}}{{.Subnet}}{{end}}",
        ])
        .output()
        .await
        .map_err(|e| format!("failed to run {program}: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "docker exited with {}: {}",
            output.status,
            stderr.trim()
        ));
    }

    let subnet = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if subnet.is_empty() {
        return Err("docker returned an empty bridge subnet".to_string());
    }

    Ok(subnet)
}
