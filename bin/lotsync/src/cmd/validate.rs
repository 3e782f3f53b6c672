use std::path::PathBuf;

use argh::FromArgs;
use lotsync_config::Config;
use serde::Serialize;
use tracing::info;

use crate::context::read_entries;

/// Checks an entries file without converting it
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "validate")]
pub(crate) struct ValidateArgs {
    #[argh(positional, description = "entries file (JSON)")]
    pub(crate) entries: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidateOutput {
    pub(crate) entries: usize,
    pub(crate) inactive: usize,
}

pub(crate) fn validate(args: ValidateArgs, config: &Config) -> anyhow::Result<ValidateOutput> {
    let entries = read_entries(&args.entries, config)?;
    let inactive = entries.iter().filter(|entry| entry.inactive).count();
    info!(entries = entries.len(), inactive, "entries are valid");
    Ok(ValidateOutput {
        entries: entries.len(),
        inactive,
    })
}
