//! rufw - declarative ufw policy compiler
//!
//! Reads three record files (trusted networks, publicly open ports, locally
//! restricted services), compiles them into an ordered sequence of ufw rule
//! additions, and applies or previews them.
//!
//! # Usage
//!
//! ```bash
//! # Preview the compiled policy without touching the firewall
//! rufw --dry-run
//!
//! # Apply the policy
//! rufw
//!
//! # Wipe existing rules first (prompts unless --yes)
//! rufw --reset
//!
//! # Pin the Docker bridge range instead of detecting it
//! rufw --docker-cidr 172.20.0.0/16
//! ```
//!
//! Exit status: 0 on a completed run, help/version display, or a declined
//! confirmation; 1 on missing record files, a failed ufw invocation, or bad
//! invocation parameters; 130 on interruption.

use clap::Parser;
use rufw::config::RunConfig;
use rufw::core::docker;
use rufw::core::engine::{self, ApplyMode};
use rufw::core::policy;
use rufw::core::reset::{self, ResetOutcome};
use rufw::{audit, records};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

#[derive(Parser)]
#[command(name = "rufw")]
#[command(version)]
#[command(about = "Declarative ufw policy compiler", long_about = None)]
struct Cli {
    /// Render the compiled mutations without applying them
    #[arg(long)]
    dry_run: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long = "yes")]
    yes: bool,

    /// Disable the firewall and clear existing rules before applying
    #[arg(long)]
    reset: bool,

    /// Skip Docker bridge network integration
    #[arg(long)]
    no_docker: bool,

    /// Explicit Docker bridge CIDR (skips live detection)
    #[arg(long, value_name = "CIDR")]
    docker_cidr: Option<String>,

    /// Directory holding networks.conf, open-ports.conf and services.conf
    #[arg(long, value_name = "DIR")]
    rules_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    // try_parse instead of parse: help/version are successful outcomes,
    // unknown parameters are a plain failure, not clap's usage exit code.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            let success = matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
            let _ = e.print();
            return if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _ = rufw::utils::ensure_dirs();

    let rules_dir = match RunConfig::resolve_rules_dir(cli.rules_dir) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = RunConfig {
        dry_run: cli.dry_run,
        force_yes: cli.yes,
        reset_requested: cli.reset,
        docker_enabled: !cli.no_docker,
        docker_cidr_override: cli.docker_cidr,
        rules_dir,
    };

    // Everything is sequential; a current-thread runtime is all the process
    // spawning and audit I/O need.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: RunConfig) -> rufw::Result<()> {
    // Interruption gets a warning, not a cleanup: mutations already issued
    // stay in effect and the operator needs to know that.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted: the firewall may be left partially configured");
            std::process::exit(130);
        }
    });

    if config.reset_requested {
        match reset::reset(&config).await {
            Ok(ResetOutcome::Declined) => {
                // Clean cancellation: the whole run terminates with success
                // and no side effects.
                println!("Reset cancelled.");
                return Ok(());
            }
            Ok(ResetOutcome::Completed) => {
                if !config.dry_run {
                    audit::log_reset(true, None).await;
                }
            }
            Err(e) => {
                if !config.dry_run {
                    audit::log_reset(false, Some(e.to_string())).await;
                }
                return Err(e);
            }
        }
    }

    let records = records::load_records(&config.rules_dir).await?;

    let bridge = docker::resolve(
        config.docker_enabled,
        config.docker_cidr_override.as_deref(),
    )
    .await;

    let mutations = policy::compile(
        &records.external_rules,
        &records.local_networks,
        &records.local_services,
        bridge.as_ref(),
    );

    if mutations.is_empty() {
        warn!("policy compiled to zero mutations; nothing to do");
        return Ok(());
    }

    let mode = if config.dry_run {
        ApplyMode::DryRun
    } else {
        ApplyMode::Live
    };

    let annotations: Vec<String> = mutations.iter().map(|m| m.annotation.clone()).collect();

    match engine::apply(&mutations, mode).await {
        Ok(report) => {
            if mode.is_dry() {
                println!();
                println!(
                    "Dry run: {} mutation(s) previewed, none applied.",
                    report.total
                );
            } else {
                audit::log_apply(report.total, Some(report.applied), &annotations, true, None)
                    .await;
                println!("{} rule(s) applied.", report.applied);
            }
            Ok(())
        }
        Err(e) => {
            audit::log_apply(mutations.len(), None, &annotations, false, Some(e.to_string()))
                .await;
            Err(e)
        }
    }
}
