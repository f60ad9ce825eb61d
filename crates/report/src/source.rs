//! The chain data a report is built from.
//!
//! [`ChainSource`] is the seam between the report logic and the transport.
//! The RPC client implements it in [`crate::rpc_source`]; tests use scripted
//! in-memory sources.

use async_trait::async_trait;
use valstat_rpc_client::models::staking::Any;
use valstat_rpc_client::ClientRpcError;

/// Heights served by the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStatus {
    pub latest_height: u64,
    /// Lowest height with data; 1 unless the node is pruned
    pub earliest_height: u64,
}

/// Header fields of one block, as listed by the `blockchain` method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMeta {
    pub height: u64,
    pub proposer_address: Vec<u8>,
    pub num_txs: u64,
}

/// Gas figures of one executed transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxGas {
    pub gas_used: i64,
    pub gas_wanted: i64,
}

/// Staking module view of a bonded validator
#[derive(Debug, Clone, PartialEq)]
pub struct StakingValidator {
    pub operator_address: String,
    pub consensus_pubkey: Option<Any>,
}

/// One page of the bonded validator set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatorPage {
    pub validators: Vec<StakingValidator>,
    /// Cursor for the next page; `None` or empty on the last one
    pub next_key: Option<Vec<u8>>,
}

/// Consensus-level validator entry at a given height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotValidator {
    pub address: Vec<u8>,
    pub voting_power: i64,
}

/// Read access to a chain, one request per call.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Latest and earliest available heights
    async fn chain_status(&self) -> Result<ChainStatus, ClientRpcError>;

    /// Headers with heights in `[min_height, max_height]`, most recent first.
    ///
    /// `min_height` is a hint: the source decides how many headers it
    /// returns.
    async fn block_headers(
        &self,
        min_height: u64,
        max_height: u64,
    ) -> Result<Vec<HeaderMeta>, ClientRpcError>;

    /// Per-transaction gas of the block at `height`, empty for blocks
    /// without transactions
    async fn block_gas(&self, height: u64) -> Result<Vec<TxGas>, ClientRpcError>;

    /// One page of bonded validators, starting at `cursor` (`None` for the
    /// first page)
    async fn bonded_validators_page(
        &self,
        cursor: Option<&[u8]>,
        limit: u64,
    ) -> Result<ValidatorPage, ClientRpcError>;

    /// The full consensus validator set at `height`, in source order
    async fn validator_set(&self, height: u64) -> Result<Vec<SnapshotValidator>, ClientRpcError>;
}
