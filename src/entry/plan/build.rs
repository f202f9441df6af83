use std::num::NonZeroUsize;
use std::ops::Range;

use flowramp::args::{Command, FlowAction, FlowrampArgs};
use flowramp::catalog::FlowCatalog;
use flowramp::config::types::VariationOverrides;
use flowramp::config::{apply_config, load_config};
use flowramp::error::{AppError, AppResult, ValidationError};

use super::types::{RunPlan, VariationPlan};

pub(crate) fn build_plan(args: FlowrampArgs) -> AppResult<RunPlan> {
    let overrides = match &args.command {
        Command::Run(run) => run.overrides(),
        Command::Flow(_) | Command::StopAll => VariationOverrides::default(),
    };
    let config = load_config(args.config.as_deref())?;
    let settings = apply_config(config, &overrides)?;

    match args.command {
        Command::Run(run) => {
            let schedule = settings.require_schedule()?;
            Ok(RunPlan::Variation(VariationPlan {
                settings,
                schedule,
                upload_manifest: !run.no_manifest,
            }))
        }
        Command::Flow(flow) => match flow.action {
            FlowAction::Up { position } => {
                let range = position_range(&settings.catalog, position)?;
                Ok(RunPlan::FlowUp { settings, range })
            }
            FlowAction::Down { position } => {
                let range = position_range(&settings.catalog, position)?;
                Ok(RunPlan::FlowDown { settings, range })
            }
        },
        Command::StopAll => Ok(RunPlan::StopAll(settings)),
    }
}

/// Catalog range of the single flow at a 1-based position.
fn position_range(catalog: &FlowCatalog, position: NonZeroUsize) -> AppResult<Range<usize>> {
    let end = position.get();
    if end > catalog.len() {
        return Err(AppError::validation(
            ValidationError::FlowPositionOutOfRange {
                position: end,
                catalog_len: catalog.len(),
            },
        ));
    }
    Ok(end.saturating_sub(1)..end)
}
