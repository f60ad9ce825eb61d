use super::serde_helpers::{nullable, quoted};
use serde::{Deserialize, Serialize};

/// Result of the `block_results` method.
///
/// Tendermint does not expose aggregate gas for a block (see
/// tendermint/tendermint#9555), so consumers sum the per-transaction values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcBlockResults {
    #[serde(with = "quoted")]
    pub height: u64,

    #[serde(default, deserialize_with = "nullable")]
    pub txs_results: Vec<RpcTxResult>,
}

/// Execution result of one transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcTxResult {
    #[serde(default)]
    pub code: u32,

    #[serde(default)]
    pub codespace: String,

    /// Omitted from the JSON when zero
    #[serde(default, with = "quoted")]
    pub gas_wanted: i64,

    /// Omitted from the JSON when zero
    #[serde(default, with = "quoted")]
    pub gas_used: i64,
}
