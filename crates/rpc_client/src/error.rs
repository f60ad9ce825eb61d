//! Error types for RPC client operations.

use thiserror::Error;

/// JSON-RPC "internal error" code, used for failures on our side of the wire.
pub const INTERNAL_ERROR_CODE: i64 = -32603;
/// JSON-RPC "parse error" code.
pub const PARSE_ERROR_CODE: i64 = -32700;

/// Errors that can occur while talking to a Tendermint RPC endpoint.
///
/// None of these are retried by the client.
#[derive(Error, Debug)]
pub enum ClientRpcError {
    /// The HTTP client could not be configured.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// The HTTP request could not be completed.
    #[error("HTTP error calling {method}: {source}")]
    Http {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status and no JSON-RPC body.
    #[error("{method} returned HTTP status {status}")]
    Status { method: String, status: u16 },

    /// The endpoint answered with a JSON-RPC error object.
    #[error("RPC error {code} from {method}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
        data: Option<String>,
    },

    /// A response or payload could not be decoded.
    #[error("failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    /// The application rejected an ABCI query.
    #[error("abci query {path} failed with code {code}: {log}")]
    AbciQuery { path: String, code: u32, log: String },
}

impl ClientRpcError {
    /// Creates a decode error.
    pub fn decode<C: Into<String>, M: ToString>(context: C, message: M) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// JSON-RPC style error code, used in request logs.
    pub fn code(&self) -> i64 {
        match self {
            Self::Rpc { code, .. } => *code,
            Self::Decode { .. } => PARSE_ERROR_CODE,
            _ => INTERNAL_ERROR_CODE,
        }
    }
}
