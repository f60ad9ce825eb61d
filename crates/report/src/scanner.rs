//! Block window scanner.
//!
//! Walks the chain backward from the head in `blockchain` pages. Each page
//! asks only for heights below the lowest one already seen, so pages stitch
//! into one contiguous range even while the head keeps moving.

use crate::address::{canonicalize_address, Address};
use crate::error::ReportResult;
use crate::source::ChainSource;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};
use valstat_config::{ScanSettings, DEFAULT_PAGES, DEFAULT_PAGE_SIZE};

/// How far back a scan goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Number of header pages to request
    pub pages: u32,
    pub page_size: u32,
    /// Stop once this many blocks have been counted
    pub max_blocks: Option<u64>,
    /// Lowest height the source can serve
    pub floor_height: u64,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            pages: DEFAULT_PAGES,
            page_size: DEFAULT_PAGE_SIZE,
            max_blocks: None,
            floor_height: 1,
        }
    }
}

impl From<&ScanSettings> for ScanLimits {
    fn from(settings: &ScanSettings) -> Self {
        Self {
            pages: settings.pages,
            page_size: settings.page_size,
            max_blocks: settings.max_blocks,
            floor_height: 1,
        }
    }
}

/// Number of blocks proposed per validator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposerTally {
    counts: HashMap<Address, u64>,
}

impl ProposerTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, proposer: &Address) {
        *self.counts.entry(proposer.clone()).or_insert(0) += 1;
    }

    pub fn count(&self, proposer: &Address) -> u64 {
        self.counts.get(proposer).copied().unwrap_or(0)
    }

    /// Sum over all proposers; equals the number of blocks recorded
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, u64)> {
        self.counts.iter().map(|(address, count)| (address, *count))
    }
}

/// One scanned block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub height: u64,
    pub proposer: Address,
    pub tx_count: u64,
    pub gas_used: i64,
    pub gas_wanted: i64,
}

/// Height range covered by a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub chain_height_at_start: u64,
    /// `chain_height_at_start + 1` until the first block is counted
    pub lowest_height_seen: u64,
    pub blocks_scanned: u64,
    pub pages_requested: u32,
}

impl ScanWindow {
    pub fn new(chain_height_at_start: u64) -> Self {
        Self {
            chain_height_at_start,
            lowest_height_seen: chain_height_at_start.saturating_add(1),
            blocks_scanned: 0,
            pages_requested: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks_scanned == 0
    }
}

impl fmt::Display for ScanWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total blocks scanned: {} (from {} to {})",
            self.blocks_scanned, self.chain_height_at_start, self.lowest_height_seen
        )
    }
}

/// Everything a scan produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockScan {
    pub tally: ProposerTally,
    /// Most recent first
    pub summaries: Vec<BlockSummary>,
    pub window: ScanWindow,
}

/// Scans backward from `current_height` until the page count, the block
/// budget or the bottom of the chain is reached.
pub async fn scan<S>(source: &S, current_height: u64, limits: &ScanLimits) -> ReportResult<BlockScan>
where
    S: ChainSource + ?Sized,
{
    let floor = limits.floor_height.max(1);
    let page_size = u64::from(limits.page_size.max(1));
    let budget_spent =
        |window: &ScanWindow| limits.max_blocks.is_some_and(|max| window.blocks_scanned >= max);

    let mut window = ScanWindow::new(current_height);
    let mut tally = ProposerTally::new();
    let mut summaries = Vec::new();
    let mut top = window.lowest_height_seen;

    for page in 0..limits.pages {
        if top <= floor {
            debug!(target: "valstat", top, floor, "reached the lowest available height");
            break;
        }
        if budget_spent(&window) {
            break;
        }

        let max_height = top - 1;
        let min_height = top.saturating_sub(page_size).max(floor);
        let headers = source.block_headers(min_height, max_height).await?;
        window.pages_requested += 1;
        debug!(
            target: "valstat",
            page,
            min_height,
            max_height,
            received = headers.len(),
            "header page received"
        );

        if headers.is_empty() {
            break;
        }

        for header in headers {
            // Pages are most recent first, so anything at or above the lowest
            // counted height is either out of range or a repeat.
            if header.height >= top {
                warn!(
                    target: "valstat",
                    height = header.height,
                    bound = top,
                    "header above the requested range, skipping"
                );
                continue;
            }
            if header.height >= window.lowest_height_seen {
                warn!(
                    target: "valstat",
                    height = header.height,
                    lowest = window.lowest_height_seen,
                    "header already counted, skipping"
                );
                continue;
            }
            if budget_spent(&window) {
                break;
            }

            let proposer = canonicalize_address(&header.proposer_address);
            let (gas_used, gas_wanted) = source
                .block_gas(header.height)
                .await?
                .iter()
                .fold((0i64, 0i64), |(used, wanted), tx| {
                    (used.saturating_add(tx.gas_used), wanted.saturating_add(tx.gas_wanted))
                });

            tally.record(&proposer);
            window.lowest_height_seen = window.lowest_height_seen.min(header.height);
            window.blocks_scanned += 1;
            summaries.push(BlockSummary {
                height: header.height,
                proposer,
                tx_count: header.num_txs,
                gas_used,
                gas_wanted,
            });
        }

        if window.lowest_height_seen >= top {
            warn!(target: "valstat", top, "header page made no progress, stopping");
            break;
        }
        top = window.lowest_height_seen;
    }

    info!(
        target: "valstat",
        blocks = window.blocks_scanned,
        pages = window.pages_requested,
        from = window.chain_height_at_start,
        to = window.lowest_height_seen,
        "block scan finished"
    );

    Ok(BlockScan {
        tally,
        summaries,
        window,
    })
}
