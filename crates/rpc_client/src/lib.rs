//! Tendermint RPC Client Library
//!
//! JSON-RPC 2.0 client for Tendermint/CometBFT nodes, covering the methods a
//! validator report needs: `status`, `blockchain`, `block_results`,
//! `validators` and `abci_query`. The Cosmos SDK staking `Validators` query
//! is sent through `abci_query` with its protobuf request and response
//! messages declared in [`models::staking`].

mod error;
pub mod models;
mod rpc_client;

pub use error::{ClientRpcError, INTERNAL_ERROR_CODE, PARSE_ERROR_CODE};
pub use rpc_client::{RpcClient, RpcClientBuilder, DEFAULT_HTTP_TIMEOUT, VALIDATORS_PER_PAGE};

// Re-export commonly used types
pub use models::{
    RpcBlockMeta, RpcBlockResults, RpcBlockchainInfo, RpcRequest, RpcResponse, RpcResponseError,
    RpcStatus, RpcValidator,
};
