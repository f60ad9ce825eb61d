use super::serde_helpers::quoted;
use serde::{Deserialize, Serialize};

/// Result of the `status` method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcStatus {
    #[serde(default)]
    pub node_info: RpcNodeInfo,

    pub sync_info: RpcSyncInfo,
}

/// Identity of the node answering the request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcNodeInfo {
    /// Chain ID
    #[serde(default)]
    pub network: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub moniker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcSyncInfo {
    #[serde(with = "quoted")]
    pub latest_block_height: u64,

    #[serde(default)]
    pub latest_block_time: String,

    /// Lowest height the node still serves. Zero on nodes that predate the
    /// field, which means "everything since genesis".
    #[serde(default, with = "quoted")]
    pub earliest_block_height: u64,

    #[serde(default)]
    pub catching_up: bool,
}
