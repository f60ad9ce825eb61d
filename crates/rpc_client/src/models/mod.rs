//! RPC Models
//!
//! JSON models for the Tendermint RPC methods used by the report, and the
//! protobuf messages carried inside `abci_query` for the staking module.

pub mod rpc_abci_query;
pub mod rpc_block_results;
pub mod rpc_blockchain;
pub mod rpc_request;
pub mod rpc_response;
pub mod rpc_status;
pub mod rpc_validators;
pub mod serde_helpers;
pub mod staking;

pub use rpc_abci_query::{RpcAbciQuery, RpcAbciResponse};
pub use rpc_block_results::{RpcBlockResults, RpcTxResult};
pub use rpc_blockchain::{RpcBlockMeta, RpcBlockchainInfo, RpcHeader};
pub use rpc_request::RpcRequest;
pub use rpc_response::{RpcResponse, RpcResponseError};
pub use rpc_status::{RpcNodeInfo, RpcStatus, RpcSyncInfo};
pub use rpc_validators::{RpcValidator, RpcValidatorSet};
