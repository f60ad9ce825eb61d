use super::serde_helpers::{hex_bytes, nullable, quoted};
use serde::{Deserialize, Serialize};

/// One page of the `validators` method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcValidatorSet {
    #[serde(with = "quoted")]
    pub block_height: u64,

    #[serde(default, deserialize_with = "nullable")]
    pub validators: Vec<RpcValidator>,

    #[serde(with = "quoted")]
    pub count: u64,

    #[serde(with = "quoted")]
    pub total: u64,
}

/// Consensus-level validator entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcValidator {
    #[serde(with = "hex_bytes")]
    pub address: Vec<u8>,

    #[serde(with = "quoted")]
    pub voting_power: i64,

    #[serde(default, with = "quoted")]
    pub proposer_priority: i64,
}
