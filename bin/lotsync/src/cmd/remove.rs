use std::path::{Path, PathBuf};

use argh::FromArgs;
use lotsync_config::Config;
use lotsync_primitives::{EntryKey, LotId};
use lotsync_store::{MemEntryStore, MutationReceipt};
use lotsync_sync::{remove_entry, remove_lot};

use crate::context::{open_store, save_store};

/// Removes every entry of a lot
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "remove-lot")]
pub(crate) struct RemoveLotArgs {
    #[argh(option, description = "consumer state file (JSON), updated in place")]
    pub(crate) state: PathBuf,

    #[argh(option, description = "lot to remove")]
    pub(crate) lot: LotId,

    #[argh(switch, description = "leave the state file untouched")]
    pub(crate) dry_run: bool,
}

/// Removes a single entry from a lot
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "remove-entry")]
pub(crate) struct RemoveEntryArgs {
    #[argh(option, description = "consumer state file (JSON), updated in place")]
    pub(crate) state: PathBuf,

    #[argh(option, description = "lot holding the entry")]
    pub(crate) lot: LotId,

    #[argh(option, description = "entry key (hex)")]
    pub(crate) key: EntryKey,

    #[argh(switch, description = "leave the state file untouched")]
    pub(crate) dry_run: bool,
}

pub(crate) async fn remove_lot_cmd(
    args: RemoveLotArgs,
    config: &Config,
) -> anyhow::Result<MutationReceipt> {
    let store = open_store(&args.state, config)?;
    let receipt = remove_lot(&store, args.lot).await?;
    persist(&args.state, &store, args.dry_run)?;
    Ok(receipt)
}

pub(crate) async fn remove_entry_cmd(
    args: RemoveEntryArgs,
    config: &Config,
) -> anyhow::Result<MutationReceipt> {
    let store = open_store(&args.state, config)?;
    let receipt = remove_entry(&store, args.lot, args.key).await?;
    persist(&args.state, &store, args.dry_run)?;
    Ok(receipt)
}

fn persist(path: &Path, store: &MemEntryStore, dry_run: bool) -> anyhow::Result<()> {
    if dry_run {
        return Ok(());
    }
    save_store(path, store)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{B256, U256};
    use lotsync_store::EntryStore;

    use super::*;
    use crate::{
        cmd::sync::{sync, SyncArgs},
        test_utils::{entries_file, CONSUMER},
    };

    fn config() -> Config {
        let mut config = Config::default();
        config.consumer.address = Some(CONSUMER);
        config
    }

    /// Syncs two entries into lot 1 and returns the state path and keys.
    async fn synced_state(dir: &Path, entries: PathBuf) -> (PathBuf, Vec<EntryKey>) {
        let state = dir.join("state.json");
        let report = sync(
            SyncArgs {
                entries,
                state: state.clone(),
                lot: U256::from(1),
                single: false,
                batch_size: None,
                assume_deployed: true,
                dry_run: false,
            },
            &config(),
        )
        .await
        .unwrap();
        (state, report.diff.to_add)
    }

    #[tokio::test]
    async fn test_remove_entry_then_lot() {
        let (dir, path) = entries_file(&["USD", "EUR"]);
        let (state, keys) = synced_state(dir.path(), path).await;

        let args = RemoveEntryArgs {
            state: state.clone(),
            lot: U256::from(1),
            key: keys[0],
            dry_run: false,
        };
        remove_entry_cmd(args, &config()).await.unwrap();

        let store = open_store(&state, &config()).unwrap();
        assert_eq!(store.entry_map_keys(U256::from(1)).await.unwrap(), vec![keys[1]]);

        let args = RemoveLotArgs {
            state: state.clone(),
            lot: U256::from(1),
            dry_run: false,
        };
        remove_lot_cmd(args, &config()).await.unwrap();

        let store = open_store(&state, &config()).unwrap();
        assert!(!store.lot_is_inserted(U256::from(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_unknown_entry_fails() {
        let (dir, path) = entries_file(&["USD"]);
        let (state, _) = synced_state(dir.path(), path).await;

        let args = RemoveEntryArgs {
            state,
            lot: U256::from(1),
            key: B256::repeat_byte(0x01),
            dry_run: false,
        };
        let err = remove_entry_cmd(args, &config()).await.unwrap_err();
        assert!(err.to_string().contains("is not inserted"));
    }

    #[tokio::test]
    async fn test_remove_missing_lot_fails() {
        let (dir, path) = entries_file(&["USD"]);
        let (state, _) = synced_state(dir.path(), path).await;

        let args = RemoveLotArgs {
            state,
            lot: U256::from(2),
            dry_run: true,
        };
        let err = remove_lot_cmd(args, &config()).await.unwrap_err();
        assert!(err.to_string().contains("lot 2 is not inserted"));
    }
}
