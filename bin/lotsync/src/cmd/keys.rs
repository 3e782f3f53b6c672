use std::path::PathBuf;

use argh::FromArgs;
use lotsync_config::Config;
use lotsync_entries::convert_entries;
use lotsync_primitives::EntryKey;
use serde::Serialize;

use crate::context::read_entries;

/// Derives the key of every declared entry
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "keys")]
pub(crate) struct KeysArgs {
    #[argh(positional, description = "entries file (JSON)")]
    pub(crate) entries: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KeyOutput {
    /// Position of the winning declaration in the file.
    pub(crate) index: Option<usize>,
    pub(crate) key: EntryKey,
    pub(crate) job_name: Option<String>,
}

pub(crate) fn keys(args: KeysArgs, config: &Config) -> anyhow::Result<Vec<KeyOutput>> {
    let entries = read_entries(&args.entries, config)?;
    let local = convert_entries(&entries)?;

    Ok(local
        .keys()
        .map(|key| {
            let index = local.source_index(key);
            KeyOutput {
                index,
                key: *key,
                job_name: index
                    .and_then(|i| entries.get(i))
                    .map(|entry| entry.description.job_name.clone()),
            }
        })
        .collect())
}
