//! Policy compilation: declarative records to ordered firewall mutations
//!
//! [`compile`] maps the three record categories plus the resolved Docker
//! bridge network into an ordered list of [`FirewallMutation`]s. The ordering
//! is an external contract, since ufw rule precedence depends on it:
//!
//! 1. One allow-any mutation per well-formed external rule.
//! 2. Per local network in load order, one allow-from mutation per
//!    well-formed local service in load order.
//! 3. The bridge network, if present, acts as one more local network named
//!    "Docker", appended after all configured networks.
//!
//! Compilation is a pure function of its inputs. Malformed rows and invalid
//! network ranges are skipped with a warning; they never abort the run.

use crate::core::docker::BridgeNetwork;
use crate::records::{LocalNetwork, RawServiceRule};
use crate::validators::validate_range;
use std::fmt;
use tracing::warn;

/// Network protocol accepted in service rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Protocol {
    #[strum(serialize = "tcp")]
    Tcp,
    #[strum(serialize = "udp")]
    Udp,
}

impl Protocol {
    /// Lowercase protocol name as ufw expects it on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

/// What a single mutation does when issued to the control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    /// Open a port to any source (publicly exposed service)
    AllowAny,
    /// Open a port to one source range only (locally restricted service)
    AllowFrom,
}

/// One atomic rule-addition instruction issued to ufw.
///
/// Immutable once produced; the ordered sequence of these is the compiler's
/// sole output and the engine consumes it exactly once, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallMutation {
    pub action: MutationAction,
    /// Source range for `AllowFrom`; always a range that passed the
    /// address validator. `None` for `AllowAny`.
    pub source_range: Option<String>,
    pub port: u16,
    pub protocol: Protocol,
    /// Human-readable description, logged for audit. ufw does not persist
    /// it; a documented compatibility limitation.
    pub annotation: String,
}

impl FirewallMutation {
    /// The ufw argument vector for this mutation.
    pub fn args(&self) -> Vec<String> {
        match (&self.action, &self.source_range) {
            (MutationAction::AllowFrom, Some(range)) => vec![
                "allow".into(),
                "from".into(),
                range.clone(),
                "to".into(),
                "any".into(),
                "port".into(),
                self.port.to_string(),
                "proto".into(),
                self.protocol.as_str().into(),
            ],
            _ => vec![
                "allow".into(),
                format!("{}/{}", self.port, self.protocol.as_str()),
            ],
        }
    }
}

impl fmt::Display for FirewallMutation {
    /// Renders the exact control-plane invocation text plus the annotation,
    /// as shown in dry-run previews.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ufw {}    # {}", self.args().join(" "), self.annotation)
    }
}

/// Compiles the records into the ordered mutation sequence.
///
/// Pure: identical inputs always yield an identical sequence. Zero records
/// in any category yields zero mutations for that category without error.
pub fn compile(
    external_rules: &[RawServiceRule],
    local_networks: &[LocalNetwork],
    local_services: &[RawServiceRule],
    bridge: Option<&BridgeNetwork>,
) -> Vec<FirewallMutation> {
    let mut mutations = Vec::new();

    // 1. Publicly exposed ports, one allow-any each.
    for row in external_rules {
        let Some((port, protocol)) = parse_service_fields(row, "external rule") else {
            continue;
        };
        mutations.push(FirewallMutation {
            action: MutationAction::AllowAny,
            source_range: None,
            port,
            protocol,
            annotation: row.description.clone(),
        });
    }

    // 2. Local networks in load order, services in load order within each.
    for network in local_networks {
        compile_network_services(&mut mutations, network, local_services);
    }

    // 3. Docker bridge, appended after all configured networks.
    if let Some(bridge) = bridge {
        let docker_network = LocalNetwork {
            name: "Docker".to_string(),
            range: bridge.range.clone(),
        };
        compile_network_services(&mut mutations, &docker_network, local_services);
    }

    mutations
}

/// Emits the local-service cross-product for one network. An invalid range
/// skips the whole network; malformed service rows are skipped individually.
fn compile_network_services(
    mutations: &mut Vec<FirewallMutation>,
    network: &LocalNetwork,
    local_services: &[RawServiceRule],
) {
    if network.name.is_empty() || network.range.is_empty() {
        warn!(
            "skipping network record with missing field(s): name={:?} range={:?}",
            network.name, network.range
        );
        return;
    }

    if validate_range(&network.range).is_none() {
        warn!(
            "skipping network '{}': invalid address range {:?}",
            network.name, network.range
        );
        return;
    }

    for row in local_services {
        let Some((port, protocol)) = parse_service_fields(row, "local service") else {
            continue;
        };
        mutations.push(FirewallMutation {
            action: MutationAction::AllowFrom,
            source_range: Some(network.range.clone()),
            port,
            protocol,
            annotation: format!("{} ({})", row.description, network.name),
        });
    }
}

/// Checks a service row for the three required fields and parses port and
/// protocol. Returns `None` (after a warning) for any malformed row.
fn parse_service_fields(row: &RawServiceRule, category: &str) -> Option<(u16, Protocol)> {
    if row.port.is_empty() || row.protocol.is_empty() || row.description.is_empty() {
        warn!(
            "skipping {category} row with missing field(s): port={:?} protocol={:?} description={:?}",
            row.port, row.protocol, row.description
        );
        return None;
    }

    let Ok(port) = row.port.parse::<u16>() else {
        warn!("skipping {category} row: invalid port {:?}", row.port);
        return None;
    };
    if port == 0 {
        warn!("skipping {category} row: port must be between 1 and 65535");
        return None;
    }

    let Ok(protocol) = row.protocol.parse::<Protocol>() else {
        warn!(
            "skipping {category} row: unknown protocol {:?} (use tcp or udp)",
            row.protocol
        );
        return None;
    };

    Some((port, protocol))
}
