//! Command line arguments.

use std::path::PathBuf;

use argh::FromArgs;

use crate::cmd::{
    collect::CollectArgs,
    decode::DecodeArgs,
    keys::KeysArgs,
    plan::PlanArgs,
    remove::{RemoveEntryArgs, RemoveLotArgs},
    sync::SyncArgs,
    validate::ValidateArgs,
};

#[derive(Debug, FromArgs)]
#[argh(description = "manages the entries of a Chainlink GenericConsumer")]
pub(crate) struct Args {
    #[argh(option, short = 'c', description = "path to configuration")]
    pub(crate) config: Option<PathBuf>,

    /// Will be used, for example, as `-o sync.batch_size=20 -o consumer.chain_id=137`
    #[argh(option, short = 'o', description = "generic config overrides")]
    pub(crate) overrides: Vec<String>,

    #[argh(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Debug, PartialEq, FromArgs)]
#[argh(subcommand)]
pub(crate) enum Command {
    Validate(ValidateArgs),
    Keys(KeysArgs),
    Plan(PlanArgs),
    Sync(SyncArgs),
    RemoveLot(RemoveLotArgs),
    RemoveEntry(RemoveEntryArgs),
    Decode(DecodeArgs),
    Collect(CollectArgs),
}

impl Command {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Validate(_) => "validate",
            Self::Keys(_) => "keys",
            Self::Plan(_) => "plan",
            Self::Sync(_) => "sync",
            Self::RemoveLot(_) => "remove-lot",
            Self::RemoveEntry(_) => "remove-entry",
            Self::Decode(_) => "decode",
            Self::Collect(_) => "collect",
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["lotsync"], args).unwrap()
    }

    #[test]
    fn test_global_options_before_subcommand() {
        let args = parse(&[
            "-c",
            "lotsync.toml",
            "-o",
            "sync.batch=false",
            "-o",
            "consumer.chain_id=1",
            "validate",
            "entries.json",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("lotsync.toml")));
        assert_eq!(args.overrides, vec!["sync.batch=false", "consumer.chain_id=1"]);
        assert_eq!(args.cmd.name(), "validate");
    }

    #[test]
    fn test_sync_arguments() {
        let args = parse(&[
            "sync",
            "entries.json",
            "--state",
            "state.json",
            "--lot",
            "7",
            "--batch-size",
            "10",
        ]);
        let Command::Sync(sync) = args.cmd else {
            panic!("expected sync");
        };
        assert_eq!(sync.entries, PathBuf::from("entries.json"));
        assert_eq!(sync.lot, U256::from(7));
        assert_eq!(sync.batch_size, Some(10));
        assert!(!sync.single);
        assert!(!sync.dry_run);
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(Args::from_args(&["lotsync"], &["deploy"]).is_err());
    }
}
