//! Config loading, logging setup and the inputs shared by commands.

use std::{fs, num::NonZeroUsize, path::Path};

use alloy_primitives::Address;
use anyhow::{bail, Context};
use lotsync_common::logging::{self, LoggingInitConfig};
use lotsync_config::{load_config, Config};
use lotsync_entries::{
    convert_entries, parse_entries_file, validate_entries, EntryDescription, ValidationContext,
};
use lotsync_primitives::EntryMap;
use lotsync_store::{MemEntryStore, StoreSnapshot};
use lotsync_sync::BatchMode;
use tracing::{debug, info};

use crate::{args::Args, errors::InitError};

const SERVICE_NAME: &str = "lotsync";

pub(crate) fn load_config_from_args(args: &Args) -> Result<Config, InitError> {
    Ok(load_config(args.config.as_deref(), &args.overrides)?)
}

pub(crate) fn init_logging(config: &Config) -> Result<(), InitError> {
    let logging = &config.logging;
    logging::init_logging_from_config(LoggingInitConfig {
        service_base_name: SERVICE_NAME,
        service_label: logging.service_label.as_deref(),
        filter: logging.filter.as_deref(),
        log_dir: logging.log_dir.as_ref(),
        log_file_prefix: logging.log_file_prefix.as_deref(),
        json_format: Some(logging.json_format),
        default_log_prefix: SERVICE_NAME,
    })?;
    Ok(())
}

pub(crate) fn validation_context(config: &Config) -> ValidationContext {
    ValidationContext {
        chain_id: config.consumer.chain_id,
        unique_job_ids: config.validation.unique_job_ids,
        extra_node_ids: config.validation.extra_node_ids.clone(),
    }
}

/// Mutation grouping from the config, with command line overrides.
pub(crate) fn batch_mode(config: &Config, single: bool, batch_size: Option<usize>) -> BatchMode {
    if single || (!config.sync.batch && batch_size.is_none()) {
        return BatchMode::Single;
    }
    BatchMode::Batched {
        chunk_size: NonZeroUsize::new(batch_size.unwrap_or(config.sync.batch_size)),
    }
}

/// Parses and validates an entries file.
pub(crate) fn read_entries(path: &Path, config: &Config) -> anyhow::Result<Vec<EntryDescription>> {
    let entries = parse_entries_file(path)
        .with_context(|| format!("reading entries from {}", path.display()))?;
    validate_entries(&entries, &validation_context(config))
        .with_context(|| format!("validating {}", path.display()))?;
    debug!(path = %path.display(), count = entries.len(), "entries file is valid");
    Ok(entries)
}

/// Parses, validates and converts an entries file.
pub(crate) fn load_entries(path: &Path, config: &Config) -> anyhow::Result<EntryMap> {
    let entries = read_entries(path, config)?;
    let local = convert_entries(&entries)?;
    info!(path = %path.display(), declared = entries.len(), keys = local.len(), "loaded entries");
    Ok(local)
}

/// Opens the captured consumer state at `path`.
///
/// A missing file starts an empty consumer at the configured address.
pub(crate) fn open_store(path: &Path, config: &Config) -> anyhow::Result<MemEntryStore> {
    if !path.exists() {
        let Some(address) = config.consumer.address else {
            bail!(
                "state file {} does not exist and no consumer address is configured",
                path.display()
            );
        };
        info!(path = %path.display(), %address, "starting from an empty consumer");
        return Ok(MemEntryStore::new(address));
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading state from {}", path.display()))?;
    let snapshot: StoreSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing state from {}", path.display()))?;

    if let Some(address) = config.consumer.address {
        if address != snapshot.address {
            bail!(
                "state file {} belongs to consumer {}, configured consumer is {address}",
                path.display(),
                snapshot.address
            );
        }
    }
    debug!(path = %path.display(), lots = snapshot.lots.len(), "opened state");
    Ok(MemEntryStore::from_snapshot(snapshot))
}

/// Marks the oracles and callbacks of `local` as deployed contracts.
pub(crate) fn assume_deployed(store: MemEntryStore, local: &EntryMap) -> MemEntryStore {
    let addresses: Vec<Address> = local
        .entries()
        .flat_map(|entry| [entry.oracle, entry.callback_addr])
        .collect();
    store.with_contracts(addresses)
}

/// Writes the state of `store` back to `path`.
pub(crate) fn save_store(path: &Path, store: &MemEntryStore) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(&store.snapshot())?;
    fs::write(path, raw).with_context(|| format!("writing state to {}", path.display()))?;
    info!(path = %path.display(), mutations = store.journal().len(), "saved state");
    Ok(())
}
