//! Validator proposer and gas report.
//!
//! Builds the report from a [`ChainSource`]: a backward scan over block
//! headers ([`scanner`]), a forward scan over the bonded validator set
//! ([`fetcher`]) and a join of both against the validator set at the starting
//! height ([`assembler`]). Output goes through a [`ReportWriter`].

pub mod address;
pub mod assembler;
mod error;
pub mod fetcher;
mod rpc_source;
pub mod scanner;
pub mod source;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use address::{
    canonicalize_address, derive_consensus_address, Address, AddressError, ConsensusPubKey,
};
pub use assembler::{assemble, omitted_proposers, ReportRow, ValidatorSnapshot, UNKNOWN_OPERATOR};
pub use error::{ReportError, ReportResult};
pub use fetcher::{fetch_bonded_validators, FetchOptions, ValidatorIdentities};
pub use scanner::{scan, BlockScan, BlockSummary, ProposerTally, ScanLimits, ScanWindow};
pub use source::{
    ChainSource, ChainStatus, HeaderMeta, SnapshotValidator, StakingValidator, TxGas,
    ValidatorPage,
};
pub use writer::{ReportWriter, BLOCK_CSV_HEADER, VALIDATOR_PAGE_PROGRESS};

use std::io::Write;
use tracing::{info, warn};
use valstat_config::ReportConfig;

/// Settings of one report run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub scan: ScanLimits,
    pub fetch: FetchOptions,
    /// Run the block scan and the validator fetch at the same time
    pub concurrent: bool,
}

impl From<&ReportConfig> for RunOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            scan: ScanLimits::from(&config.scan),
            fetch: FetchOptions::from(&config.validators),
            concurrent: config.concurrent,
        }
    }
}

/// What a finished run covered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub chain_height: u64,
    pub window: ScanWindow,
    pub rows: usize,
    pub validators_mapped: usize,
    /// Proposers seen in the window but absent from the validator set
    pub omitted_proposers: Vec<Address>,
    /// Operators left out because their key could not be mapped
    pub skipped_validators: Vec<String>,
}

/// Produces the complete report for the chain behind `source`.
///
/// The block table is written once the scan completes, followed by the
/// validator fetch progress, the scan summary line and the validator table.
/// The order is the same whether or not the scans run concurrently.
pub async fn run_report<S, O, D>(
    source: &S,
    options: &RunOptions,
    writer: &mut ReportWriter<O, D>,
) -> ReportResult<ReportSummary>
where
    S: ChainSource + ?Sized,
    O: Write,
    D: Write,
{
    let status = source.chain_status().await?;
    let chain_height = status.latest_height;
    let limits = ScanLimits {
        floor_height: options.scan.floor_height.max(status.earliest_height),
        ..options.scan
    };
    info!(
        target: "valstat",
        chain_height,
        earliest_height = status.earliest_height,
        concurrent = options.concurrent,
        "starting report"
    );

    writer.write_block_header()?;
    let (scan, identities) = if options.concurrent {
        let mut pages = 0u32;
        let (scan, identities) = tokio::try_join!(
            scanner::scan(source, chain_height, &limits),
            fetch_bonded_validators(source, &options.fetch, |_| {
                pages += 1;
                Ok(())
            }),
        )?;
        write_blocks(writer, &scan)?;
        for _ in 0..pages {
            writer.diagnostic(VALIDATOR_PAGE_PROGRESS)?;
        }
        (scan, identities)
    } else {
        let scan = scanner::scan(source, chain_height, &limits).await?;
        write_blocks(writer, &scan)?;
        let identities = fetch_bonded_validators(source, &options.fetch, |_| {
            writer.diagnostic(VALIDATOR_PAGE_PROGRESS)
        })
        .await?;
        (scan, identities)
    };
    writer.diagnostic(&scan.window.to_string())?;

    let snapshot: Vec<ValidatorSnapshot> = source
        .validator_set(chain_height)
        .await?
        .iter()
        .map(ValidatorSnapshot::from)
        .collect();
    let rows = assemble(&snapshot, &scan.tally, &identities);
    for row in &rows {
        writer.write_validator_row(row)?;
    }

    let omitted = omitted_proposers(&snapshot, &scan.tally);
    if !omitted.is_empty() {
        warn!(
            target: "valstat",
            count = omitted.len(),
            height = chain_height,
            "proposers missing from the validator set"
        );
        writer.diagnostic(&format!(
            "Proposers not in validator set at height {chain_height}: {}",
            omitted.len()
        ))?;
    }
    writer.flush()?;

    Ok(ReportSummary {
        chain_height,
        window: scan.window,
        rows: rows.len(),
        validators_mapped: identities.len(),
        omitted_proposers: omitted,
        skipped_validators: identities.skipped().to_vec(),
    })
}

fn write_blocks<O: Write, D: Write>(
    writer: &mut ReportWriter<O, D>,
    scan: &BlockScan,
) -> std::io::Result<()> {
    for block in &scan.summaries {
        writer.write_block(block)?;
    }
    Ok(())
}
