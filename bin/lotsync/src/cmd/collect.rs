use std::{path::PathBuf, sync::Arc};

use alloy_primitives::{Address, B256};
use anyhow::{bail, Context};
use argh::FromArgs;
use lotsync_collect::{BlockSelector, CollectRequest, CollectedRecord, Collector, MemLogSource};
use lotsync_config::Config;
use lotsync_decoders::DecoderRegistry;
use lotsync_primitives::Selector;
use tracing::info;

/// Collects and decodes the consumer's fulfillment events
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "collect")]
pub(crate) struct CollectArgs {
    #[argh(option, description = "exported logs (JSON array)")]
    pub(crate) logs: PathBuf,

    #[argh(option, description = "first block, inclusive (default 0)")]
    pub(crate) from_block: Option<u64>,

    #[argh(option, description = "last block, inclusive (default latest)")]
    pub(crate) to_block: Option<u64>,

    #[argh(option, description = "only this block, excludes a block range")]
    pub(crate) block_hash: Option<B256>,

    #[argh(option, description = "request id to match")]
    pub(crate) request_id: Vec<B256>,

    #[argh(option, description = "callback address to match")]
    pub(crate) callback_addr: Vec<Address>,

    #[argh(option, description = "callback selector to match")]
    pub(crate) selector: Vec<Selector>,

    #[argh(option, description = "callback to match, by signature or bare name")]
    pub(crate) name: Vec<String>,
}

impl CollectArgs {
    fn blocks(&self) -> anyhow::Result<BlockSelector> {
        match (self.block_hash, self.from_block, self.to_block) {
            (Some(hash), None, None) => Ok(BlockSelector::Hash(hash)),
            (Some(_), _, _) => bail!("--block-hash can't be combined with a block range"),
            (None, from, to) => {
                let from = from.unwrap_or_default();
                if to.is_some_and(|to| to < from) {
                    bail!("block range ends before it starts");
                }
                Ok(BlockSelector::Range { from, to })
            }
        }
    }
}

pub(crate) async fn collect(
    args: CollectArgs,
    config: &Config,
) -> anyhow::Result<Vec<CollectedRecord>> {
    let blocks = args.blocks()?;
    let mut source = MemLogSource::from_file(&args.logs)
        .with_context(|| format!("loading logs from {}", args.logs.display()))?;
    if let Some(consumer) = config.consumer.address {
        source = source.with_consumer(consumer);
    }

    let registry = Arc::new(DecoderRegistry::builtin().context("building decoder registry")?);
    let collector = Collector::new(source, registry);
    let request = CollectRequest {
        blocks,
        request_ids: args.request_id,
        callback_addrs: args.callback_addr,
        selectors: args.selector,
        names: args.name,
    };

    let records = collector.collect(&request).await?;
    let decoded = records.iter().filter(|r| r.decoded.is_some()).count();
    info!(events = records.len(), decoded, "collection done");
    Ok(records)
}
