use std::path::PathBuf;

use argh::FromArgs;
use lotsync_config::Config;
use lotsync_primitives::{serde_helpers::u256_dec, EntryKey, LotId};
use lotsync_sync::{plan_lot, LotPlan};
use serde::Serialize;

use crate::context::{load_entries, open_store};

/// Shows what a sync of the lot would change, without writing
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "plan")]
pub(crate) struct PlanArgs {
    #[argh(positional, description = "entries file (JSON)")]
    pub(crate) entries: PathBuf,

    #[argh(option, description = "consumer state file (JSON)")]
    pub(crate) state: PathBuf,

    #[argh(option, description = "lot to reconcile")]
    pub(crate) lot: LotId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlanOutput {
    #[serde(with = "u256_dec")]
    pub(crate) lot: LotId,
    pub(crate) remote_entries: usize,
    pub(crate) to_add: Vec<EntryKey>,
    pub(crate) to_remove: Vec<EntryKey>,
    pub(crate) to_update: Vec<EntryKey>,
    pub(crate) unchanged: usize,
}

impl From<LotPlan> for PlanOutput {
    fn from(plan: LotPlan) -> Self {
        let unchanged = plan.diff.to_check.len() - plan.diff.to_update.len();
        Self {
            lot: plan.lot,
            remote_entries: plan.remote.len(),
            to_add: plan.diff.to_add,
            to_remove: plan.diff.to_remove,
            to_update: plan.diff.to_update,
            unchanged,
        }
    }
}

pub(crate) async fn plan(args: PlanArgs, config: &Config) -> anyhow::Result<PlanOutput> {
    let local = load_entries(&args.entries, config)?;
    let store = open_store(&args.state, config)?;
    Ok(plan_lot(&store, args.lot, &local).await?.into())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use alloy_primitives::U256;

    use super::*;
    use crate::test_utils::{entries_file, CONSUMER};

    #[tokio::test]
    async fn test_plan_against_empty_state() {
        let (dir, path) = entries_file(&["USD", "EUR"]);
        let state = dir.path().join("state.json");
        let mut config = Config::default();
        config.consumer.address = Some(CONSUMER);

        let args = PlanArgs {
            entries: path,
            state: state.clone(),
            lot: U256::from(1),
        };
        let output = plan(args, &config).await.unwrap();

        assert_eq!(output.remote_entries, 0);
        assert_eq!(output.to_add.len(), 2);
        assert!(output.to_remove.is_empty());
        assert!(!state.exists(), "planning must not write state");
    }

    #[tokio::test]
    async fn test_plan_reports_malformed_state() {
        let (dir, path) = entries_file(&["USD"]);
        let state = dir.path().join("state.json");
        fs::write(&state, "{\"address\": 1}").unwrap();

        let args = PlanArgs {
            entries: path,
            state,
            lot: U256::from(1),
        };
        let err = plan(args, &Config::default()).await.unwrap_err();
        assert!(format!("{err:#}").contains("parsing state"));
    }
}
