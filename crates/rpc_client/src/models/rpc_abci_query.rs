use super::serde_helpers::{nullable, quoted};
use crate::error::ClientRpcError;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Result of the `abci_query` method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcAbciQuery {
    pub response: RpcAbciResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcAbciResponse {
    /// Zero on success
    #[serde(default)]
    pub code: u32,

    #[serde(default)]
    pub log: String,

    #[serde(default)]
    pub info: String,

    #[serde(default)]
    pub codespace: String,

    /// Base64 encoded protobuf payload
    #[serde(default, deserialize_with = "nullable")]
    pub value: String,

    #[serde(default, with = "quoted")]
    pub height: u64,
}

impl RpcAbciResponse {
    /// Decodes the base64 payload.
    pub fn value_bytes(&self) -> Result<Vec<u8>, ClientRpcError> {
        general_purpose::STANDARD
            .decode(self.value.trim())
            .map_err(|err| ClientRpcError::decode("abci_query value", err))
    }
}
