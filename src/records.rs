//! Declarative policy record files
//!
//! The policy is described by three plain-text files inside a rules
//! directory:
//!
//! - `networks.conf`: `name;range` per line, the trusted local networks
//! - `open-ports.conf`: `port;protocol;description` per line, the publicly
//!   reachable services
//! - `services.conf`: `port;protocol;description` per line, the services
//!   restricted to the local networks
//!
//! Blank lines and `#` comments are ignored. The loader is deliberately
//! lenient: rows with missing fields are loaded with empty strings and it is
//! the compiler's job to skip them with a warning. A missing file, on the
//! other hand, is fatal before any mutation is attempted.

use crate::core::error::{Error, Result};
use std::path::Path;
use tracing::info;

pub const NETWORKS_FILE: &str = "networks.conf";
pub const OPEN_PORTS_FILE: &str = "open-ports.conf";
pub const SERVICES_FILE: &str = "services.conf";

/// A trusted network permitted to reach local-only services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNetwork {
    pub name: String,
    /// CIDR-style range, kept as a string and validated only syntactically.
    pub range: String,
}

/// One service row, either publicly exposed or locally restricted.
///
/// Fields stay strings at this layer; the compiler parses and skips
/// malformed rows individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawServiceRule {
    pub port: String,
    pub protocol: String,
    pub description: String,
}

/// The three record collections, loaded once per run and never mutated.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub external_rules: Vec<RawServiceRule>,
    pub local_networks: Vec<LocalNetwork>,
    pub local_services: Vec<RawServiceRule>,
}

/// Loads all three record files from the rules directory.
///
/// # Errors
///
/// Returns `Err` if any of the three files is absent or unreadable. An empty
/// file is fine (it compiles to zero mutations for that category).
pub async fn load_records(rules_dir: &Path) -> Result<RecordSet> {
    let networks = read_record_file(rules_dir, NETWORKS_FILE).await?;
    let open_ports = read_record_file(rules_dir, OPEN_PORTS_FILE).await?;
    let services = read_record_file(rules_dir, SERVICES_FILE).await?;

    let records = RecordSet {
        external_rules: open_ports.iter().map(|f| parse_service_row(f)).collect(),
        local_networks: networks.iter().map(|f| parse_network_row(f)).collect(),
        local_services: services.iter().map(|f| parse_service_row(f)).collect(),
    };

    info!(
        "loaded {} external rule(s), {} network(s), {} local service(s) from {}",
        records.external_rules.len(),
        records.local_networks.len(),
        records.local_services.len(),
        rules_dir.display()
    );

    Ok(records)
}

/// Reads one record file and returns its data lines (comments and blank
/// lines stripped).
async fn read_record_file(rules_dir: &Path, name: &str) -> Result<Vec<String>> {
    let path = rules_dir.join(name);

    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|_| Error::MissingRecords { path: path.clone() })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

fn parse_network_row(line: &str) -> LocalNetwork {
    let mut fields = line.splitn(2, ';').map(str::trim);
    LocalNetwork {
        name: fields.next().unwrap_or("").to_string(),
        range: fields.next().unwrap_or("").to_string(),
    }
}

fn parse_service_row(line: &str) -> RawServiceRule {
    let mut fields = line.splitn(3, ';').map(str::trim);
    RawServiceRule {
        port: fields.next().unwrap_or("").to_string(),
        protocol: fields.next().unwrap_or("").to_string(),
        description: fields.next().unwrap_or("").to_string(),
    }
}
