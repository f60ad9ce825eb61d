use crate::error::ClientRpcError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: String,

    #[serde(default)]
    pub id: Option<Value>,

    #[serde(default)]
    pub result: Option<Value>,

    #[serde(default)]
    pub error: Option<RpcResponseError>,
}

/// Error object carried by a failed JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponseError {
    pub code: i64,

    pub message: String,

    /// Tendermint puts the useful detail here, usually as a plain string
    #[serde(default)]
    pub data: Option<Value>,
}

impl RpcResponseError {
    fn data_text(&self) -> Option<String> {
        match &self.data {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

impl RpcResponse {
    /// Converts the envelope into the typed result of `method`.
    pub fn into_result<T: DeserializeOwned>(self, method: &str) -> Result<T, ClientRpcError> {
        if let Some(error) = self.error {
            let data = error.data_text();
            let message = match &data {
                Some(detail) if !detail.is_empty() => format!("{} ({detail})", error.message),
                _ => error.message.clone(),
            };
            return Err(ClientRpcError::Rpc {
                method: method.to_string(),
                code: error.code,
                message,
                data,
            });
        }

        let result = self
            .result
            .ok_or_else(|| ClientRpcError::decode(method, "no result returned"))?;
        serde_json::from_value(result)
            .map_err(|err| ClientRpcError::decode(format!("{method} result"), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_object_becomes_rpc_error() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32603,"message":"Internal error","data":"height 99 must be less than or equal to the current blockchain height 10"}}"#,
        )
        .unwrap();

        match response.into_result::<Value>("block_results") {
            Err(ClientRpcError::Rpc {
                method,
                code,
                message,
                data,
            }) => {
                assert_eq!(method, "block_results");
                assert_eq!(code, -32603);
                assert!(message.starts_with("Internal error (height 99"));
                assert!(data.is_some());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_result_is_a_decode_error() {
        let response: RpcResponse = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        let err = response.into_result::<Value>("status").unwrap_err();
        assert!(matches!(err, ClientRpcError::Decode { .. }));
    }
}
