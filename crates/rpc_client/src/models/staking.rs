//! Protobuf messages of the Cosmos SDK staking `Validators` query.
//!
//! Only the fields the report reads are declared; prost skips the rest of
//! each message when decoding.

/// gRPC method path, queried through `abci_query`
pub const VALIDATORS_QUERY_PATH: &str = "/cosmos.staking.v1beta1.Query/Validators";

/// Status filter for validators in the active set
pub const BOND_STATUS_BONDED: &str = "BOND_STATUS_BONDED";

/// `google.protobuf.Any`
#[derive(Clone, PartialEq, prost::Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// Single key payload shared by `cosmos.crypto.{ed25519,secp256k1,sr25519}.PubKey`
#[derive(Clone, PartialEq, prost::Message)]
pub struct PubKey {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
}

/// `cosmos.base.query.v1beta1.PageRequest`
#[derive(Clone, PartialEq, prost::Message)]
pub struct PageRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub offset: u64,
    #[prost(uint64, tag = "3")]
    pub limit: u64,
    #[prost(bool, tag = "4")]
    pub count_total: bool,
    #[prost(bool, tag = "5")]
    pub reverse: bool,
}

/// `cosmos.base.query.v1beta1.PageResponse`
#[derive(Clone, PartialEq, prost::Message)]
pub struct PageResponse {
    /// Empty when there are no more pages
    #[prost(bytes = "vec", tag = "1")]
    pub next_key: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub total: u64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryValidatorsRequest {
    #[prost(string, tag = "1")]
    pub status: String,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryValidatorsResponse {
    #[prost(message, repeated, tag = "1")]
    pub validators: Vec<Validator>,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageResponse>,
}

/// `cosmos.staking.v1beta1.Validator`, trimmed
#[derive(Clone, PartialEq, prost::Message)]
pub struct Validator {
    #[prost(string, tag = "1")]
    pub operator_address: String,
    #[prost(message, optional, tag = "2")]
    pub consensus_pubkey: Option<Any>,
    #[prost(bool, tag = "3")]
    pub jailed: bool,
    #[prost(int32, tag = "4")]
    pub status: i32,
    #[prost(string, tag = "5")]
    pub tokens: String,
}

impl QueryValidatorsResponse {
    /// Continuation cursor, `None` once the last page has been served.
    pub fn next_key(&self) -> Option<&[u8]> {
        self.pagination
            .as_ref()
            .map(|page| page.next_key.as_slice())
            .filter(|key| !key.is_empty())
    }
}
