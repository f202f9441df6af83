use std::num::NonZeroUsize;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::types::VariationOverrides;

use super::parsers::{parse_delay_arg, parse_duration_arg, parse_schedule_arg};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Schedule-driven flow variation controller for Open Traffic Generator testbeds - ramps active synthetic flows per interval and keeps flow provisioning in step."
)]
pub struct FlowrampArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML/JSON). Defaults to ./flowramp.toml or ./flowramp.json if present.
    #[arg(long, global = true, env = "FLOWRAMP_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by FLOWRAMP_LOG/RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a flow variation over the configured schedule
    Run(RunArgs),
    /// Bring a single catalog flow up or down
    Flow(FlowArgs),
    /// Stop and de-provision every catalog flow
    StopAll,
}

#[derive(Debug, Args, Clone, Default)]
pub struct RunArgs {
    /// Active flow count per interval, comma separated (e.g. 3,5,2,0)
    #[arg(long, short = 's', value_parser = parse_schedule_arg)]
    pub schedule: Option<::std::vec::Vec<usize>>,

    /// Length of one schedule interval (supports ms/s/m/h)
    #[arg(long, short = 'i', value_parser = parse_duration_arg)]
    pub interval: Option<Duration>,

    /// Wait between provisioning and the first START (supports ms/s/m/h, 0 disables)
    #[arg(long = "initial-delay", value_parser = parse_delay_arg)]
    pub initial_delay: Option<Duration>,

    /// Log per-flow generator metrics at this period while the run is active
    #[arg(long = "metrics-interval", value_parser = parse_duration_arg)]
    pub metrics_interval: Option<Duration>,

    /// Skip uploading the flows manifest
    #[arg(long = "no-manifest")]
    pub no_manifest: bool,
}

impl RunArgs {
    #[must_use]
    pub fn overrides(&self) -> VariationOverrides {
        VariationOverrides {
            schedule: self.schedule.clone(),
            interval: self.interval,
            initial_delay: self.initial_delay,
            metrics_interval: self.metrics_interval,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct FlowArgs {
    #[command(subcommand)]
    pub action: FlowAction,
}

#[derive(Debug, Subcommand, Clone, Copy)]
pub enum FlowAction {
    /// Provision then start the flow at this 1-based catalog position
    Up { position: NonZeroUsize },
    /// Stop then de-provision the flow at this 1-based catalog position
    Down { position: NonZeroUsize },
}
