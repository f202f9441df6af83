use std::time::Duration;

use clap::Parser;

use super::*;
use crate::error::{AppError, AppResult};

#[test]
fn parse_run_with_overrides() -> AppResult<()> {
    let args = FlowrampArgs::try_parse_from([
        "flowramp",
        "run",
        "--schedule",
        "3,5,2,0",
        "--interval",
        "5s",
        "--initial-delay",
        "0",
        "--metrics-interval",
        "500ms",
        "--no-manifest",
    ])?;
    let Command::Run(run) = args.command else {
        return Err(AppError::validation("Expected run subcommand"));
    };
    if run.schedule.as_deref() != Some(&[3, 5, 2, 0][..]) {
        return Err(AppError::validation("Unexpected schedule"));
    }
    let overrides = run.overrides();
    if overrides.interval != Some(Duration::from_secs(5))
        || overrides.initial_delay != Some(Duration::ZERO)
        || overrides.metrics_interval != Some(Duration::from_millis(500))
        || !run.no_manifest
    {
        return Err(AppError::validation("Unexpected run overrides"));
    }
    Ok(())
}

#[test]
fn parse_run_defaults_to_config_values() -> AppResult<()> {
    let args = FlowrampArgs::try_parse_from(["flowramp", "run"])?;
    let Command::Run(run) = args.command else {
        return Err(AppError::validation("Expected run subcommand"));
    };
    let overrides = run.overrides();
    if overrides.schedule.is_some()
        || overrides.interval.is_some()
        || overrides.initial_delay.is_some()
        || run.no_manifest
    {
        return Err(AppError::validation("Expected no overrides"));
    }
    Ok(())
}

#[test]
fn parse_global_flags_after_subcommand() -> AppResult<()> {
    let args = FlowrampArgs::try_parse_from([
        "flowramp",
        "stop-all",
        "--config",
        "lab.toml",
        "--verbose",
        "--no-color",
    ])?;
    if !matches!(args.command, Command::StopAll) {
        return Err(AppError::validation("Expected stop-all subcommand"));
    }
    if args.config.as_deref() != Some("lab.toml") || !args.verbose || !args.no_color {
        return Err(AppError::validation("Unexpected global flags"));
    }
    Ok(())
}

#[test]
fn parse_flow_up_and_down() -> AppResult<()> {
    let up = FlowrampArgs::try_parse_from(["flowramp", "flow", "up", "3"])?;
    match up.command {
        Command::Flow(FlowArgs {
            action: FlowAction::Up { position },
        }) if position.get() == 3 => {}
        _ => return Err(AppError::validation("Expected flow up 3")),
    }
    let down = FlowrampArgs::try_parse_from(["flowramp", "flow", "down", "1"])?;
    match down.command {
        Command::Flow(FlowArgs {
            action: FlowAction::Down { position },
        }) if position.get() == 1 => Ok(()),
        _ => Err(AppError::validation("Expected flow down 1")),
    }
}

#[test]
fn rejects_invalid_values() -> Result<(), String> {
    let cases: [&[&str]; 5] = [
        &["flowramp", "flow", "up", "0"],
        &["flowramp", "run", "--schedule", "3,x"],
        &["flowramp", "run", "--schedule", ""],
        &["flowramp", "run", "--interval", "0s"],
        &["flowramp", "run", "--interval", "5d"],
    ];
    for case in cases {
        if FlowrampArgs::try_parse_from(case.iter().copied()).is_ok() {
            return Err(format!("Expected {:?} to be rejected", case));
        }
    }
    Ok(())
}

#[test]
fn subcommand_is_required() -> Result<(), String> {
    if FlowrampArgs::try_parse_from(["flowramp"]).is_ok() {
        return Err("Expected missing subcommand to fail".to_owned());
    }
    Ok(())
}
