mod plan;

use clap::{CommandFactory, FromArgMatches};

use flowramp::args::FlowrampArgs;
use flowramp::error::AppResult;

use plan::{build_plan, execute_plan};

pub(crate) fn run() -> AppResult<()> {
    let matches = FlowrampArgs::command().get_matches();
    let args = FlowrampArgs::from_arg_matches(&matches)?;

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

async fn run_async(args: FlowrampArgs) -> AppResult<()> {
    let plan = build_plan(args)?;
    execute_plan(plan).await
}
