//! Command line tool keeping GenericConsumer lots in sync with entries files.

use anyhow::Result;
use argh::from_env;
use lotsync_common::logging;
use lotsync_config::Config;
use tokio::runtime;
use tracing::{error, info};

use crate::{
    args::{Args, Command},
    cmd::{
        collect::collect,
        decode::decode,
        keys::keys,
        plan::plan,
        remove::{remove_entry_cmd, remove_lot_cmd},
        sync::sync,
        validate::validate,
    },
    context::{init_logging, load_config_from_args},
    errors::InitError,
    output::print_json,
};

mod args;
mod cmd;
mod context;
mod errors;
mod output;
#[cfg(test)]
mod test_utils;

fn main() -> Result<()> {
    let args: Args = from_env();

    let config = load_config_from_args(&args)?;
    init_logging(&config)?;

    let rt = runtime::Builder::new_current_thread()
        .enable_all()
        .thread_name("lotsync-rt")
        .build()
        .map_err(InitError::RuntimeBuild)?;

    let command = args.cmd.name();
    let result = rt.block_on(run(args.cmd, &config));
    if let Err(e) = &result {
        let err = format!("{e:#}");
        error!(command, %err, "command failed");
    }

    logging::finalize();
    result
}

async fn run(cmd: Command, config: &Config) -> Result<()> {
    info!(command = cmd.name(), "running");
    match cmd {
        Command::Validate(args) => print_json(&validate(args, config)?),
        Command::Keys(args) => print_json(&keys(args, config)?),
        Command::Plan(args) => print_json(&plan(args, config).await?),
        Command::Sync(args) => print_json(&sync(args, config).await?),
        Command::RemoveLot(args) => print_json(&remove_lot_cmd(args, config).await?),
        Command::RemoveEntry(args) => print_json(&remove_entry_cmd(args, config).await?),
        Command::Decode(args) => print_json(&decode(args)?),
        Command::Collect(args) => print_json(&collect(args, config).await?),
    }
}
