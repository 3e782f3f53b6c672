use std::path::PathBuf;

use argh::FromArgs;
use lotsync_config::Config;
use lotsync_primitives::LotId;
use lotsync_sync::{sync_lot, SyncReport};
use tracing::{info, warn};

use crate::context::{assume_deployed, batch_mode, load_entries, open_store, save_store};

/// Makes the lot hold exactly the declared entries
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "sync")]
pub(crate) struct SyncArgs {
    #[argh(positional, description = "entries file (JSON)")]
    pub(crate) entries: PathBuf,

    #[argh(option, description = "consumer state file (JSON), updated in place")]
    pub(crate) state: PathBuf,

    #[argh(option, description = "lot to sync")]
    pub(crate) lot: LotId,

    #[argh(switch, description = "one call per entry instead of batches")]
    pub(crate) single: bool,

    #[argh(option, description = "entries per batch, 0 for a single batch")]
    pub(crate) batch_size: Option<usize>,

    #[argh(switch, description = "treat declared oracles and callbacks as deployed")]
    pub(crate) assume_deployed: bool,

    #[argh(switch, description = "leave the state file untouched")]
    pub(crate) dry_run: bool,
}

pub(crate) async fn sync(args: SyncArgs, config: &Config) -> anyhow::Result<SyncReport> {
    let local = load_entries(&args.entries, config)?;
    let mut store = open_store(&args.state, config)?;
    if args.assume_deployed {
        store = assume_deployed(store, &local);
    }
    let mode = batch_mode(config, args.single, args.batch_size);

    let result = sync_lot(&store, args.lot, &local, mode).await;

    // Calls accepted before a failure stay applied.
    if args.dry_run {
        info!(mutations = store.journal().len(), "dry run, state not saved");
    } else if result.is_ok() || !store.journal().is_empty() {
        save_store(&args.state, &store)?;
    }

    let report = result?;
    if report.calls() == 0 {
        info!(lot = %args.lot, "nothing to sync");
    } else if !report.diff.to_remove.is_empty() {
        warn!(lot = %args.lot, removed = report.diff.to_remove.len(), "removed undeclared entries");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use alloy_primitives::U256;
    use lotsync_store::StoreSnapshot;

    use super::*;
    use crate::test_utils::{entries_file, entries_file_with_interval, CONSUMER};

    fn config() -> Config {
        let mut config = Config::default();
        config.consumer.address = Some(CONSUMER);
        config
    }

    fn args(entries: PathBuf, state: PathBuf) -> SyncArgs {
        SyncArgs {
            entries,
            state,
            lot: U256::from(1),
            single: false,
            batch_size: None,
            assume_deployed: true,
            dry_run: false,
        }
    }

    fn read_state(path: &Path) -> StoreSnapshot {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_sync_writes_state() {
        let (dir, path) = entries_file(&["USD", "EUR", "GBP"]);
        let state = dir.path().join("state.json");

        let report = sync(args(path.clone(), state.clone()), &config()).await.unwrap();
        assert_eq!(report.diff.to_add.len(), 3);
        assert_eq!(report.calls(), 1);

        let snapshot = read_state(&state);
        assert_eq!(snapshot.lots.len(), 1);
        assert_eq!(snapshot.lots[0].entries.len(), 3);

        // A second run finds nothing to do.
        let report = sync(args(path, state), &config()).await.unwrap();
        assert!(report.diff.is_synced());
        assert_eq!(report.calls(), 0);
    }

    #[tokio::test]
    async fn test_sync_updates_and_removes() {
        let (dir, path) = entries_file(&["USD", "EUR"]);
        let state = dir.path().join("state.json");
        sync(args(path, state.clone()), &config()).await.unwrap();

        let (_other, changed) = entries_file_with_interval(&["USD"], 60);
        let mut single = args(changed, state.clone());
        single.single = true;
        let report = sync(single, &config()).await.unwrap();

        assert_eq!(report.diff.to_remove.len(), 1);
        assert_eq!(report.diff.to_update.len(), 1);
        assert_eq!(report.calls(), 2);

        let snapshot = read_state(&state);
        assert_eq!(snapshot.lots[0].entries.len(), 1);
        assert_eq!(snapshot.lots[0].entries[0].interval, U256::from(60));
    }

    #[tokio::test]
    async fn test_undeployed_oracle_fails_without_writing() {
        let (dir, path) = entries_file(&["USD"]);
        let state = dir.path().join("state.json");
        let mut args = args(path, state.clone());
        args.assume_deployed = false;

        let err = sync(args, &config()).await.unwrap_err();
        assert!(format!("{err:#}").to_lowercase().contains("oracle"));
        assert!(!state.exists());
    }

    #[tokio::test]
    async fn test_dry_run_leaves_state_untouched() {
        let (dir, path) = entries_file(&["USD"]);
        let state = dir.path().join("state.json");
        let mut args = args(path, state.clone());
        args.dry_run = true;

        let report = sync(args, &config()).await.unwrap();
        assert_eq!(report.diff.to_add.len(), 1);
        assert!(!state.exists());
    }
}
