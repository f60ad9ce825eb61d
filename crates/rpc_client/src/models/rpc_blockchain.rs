use super::serde_helpers::{hex_bytes, nullable, quoted};
use serde::{Deserialize, Serialize};

/// Result of the `blockchain` method: block metadata, most recent first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcBlockchainInfo {
    #[serde(with = "quoted")]
    pub last_height: u64,

    #[serde(default, deserialize_with = "nullable")]
    pub block_metas: Vec<RpcBlockMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcBlockMeta {
    #[serde(default, with = "quoted")]
    pub block_size: u64,

    pub header: RpcHeader,

    #[serde(with = "quoted")]
    pub num_txs: u64,
}

/// The header fields the report needs; everything else is ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcHeader {
    #[serde(default)]
    pub chain_id: String,

    #[serde(with = "quoted")]
    pub height: u64,

    #[serde(default)]
    pub time: String,

    #[serde(with = "hex_bytes")]
    pub proposer_address: Vec<u8>,
}
