// SPDX-License-Identifier: MIT OR Apache-2.0
//! `fxramp` - ramp an effect parameter on the selected timeline event.
//!
//! Loads a project, finds the first selected event, attaches the configured
//! effect and writes a smooth two-point envelope from the event start to its
//! end on the configured parameter.

mod script;
mod settings;

use clap::Parser;
use settings::{Overrides, RampSettings};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "fxramp_core=debug,fxramp_cli=info";

#[derive(Parser)]
#[command(author, version, about = "Attach an effect and ramp one of its parameters")]
struct Cli {
    /// Project file (RON)
    #[arg(long)]
    project: PathBuf,
    /// Optional settings file (RON)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Effect to attach, matched ignoring case
    #[arg(long)]
    effect: Option<String>,
    /// Parameter to automate, matched exactly
    #[arg(long)]
    parameter: Option<String>,
    /// Effect chain slot
    #[arg(long)]
    slot: Option<usize>,
    /// Value at the event start
    #[arg(long)]
    start_value: Option<f64>,
    /// Value at the event end
    #[arg(long)]
    end_value: Option<f64>,
    /// Log the result without writing the project
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(e) = execute(cli) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let settings = RampSettings::load_or_default(cli.settings.as_deref())?.with_overrides(
        Overrides {
            effect: cli.effect,
            parameter: cli.parameter,
            slot: cli.slot,
            start_value: cli.start_value,
            end_value: cli.end_value,
            dry_run: cli.dry_run,
        },
    );
    tracing::debug!("Settings: {settings:?}");

    let report = script::run(&cli.project, &settings)?;
    tracing::info!(
        "Ramp written at slot {} ({} keyframes)",
        report.slot,
        report.keyframes.len()
    );
    Ok(())
}
