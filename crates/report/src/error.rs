//! Error types for report generation.

use crate::address::AddressError;
use thiserror::Error;
use valstat_rpc_client::ClientRpcError;

/// Errors that abort a report run.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The chain source failed. Transport errors are never retried.
    #[error(transparent)]
    Source(#[from] ClientRpcError),

    /// A bonded validator record carried no consensus key.
    #[error("validator {operator} has no consensus public key")]
    MissingConsensusKey { operator: String },

    #[error("validator {operator}: {source}")]
    UnsupportedKeyType {
        operator: String,
        #[source]
        source: AddressError,
    },

    /// The key has a supported type but its bytes do not form a key.
    #[error("validator {operator} has an invalid consensus key: {source}")]
    InvalidConsensusKey {
        operator: String,
        #[source]
        source: AddressError,
    },

    #[error("bonded validator set did not end after {pages} pages")]
    PaginationLimit { pages: u32 },

    #[error("staking query returned the cursor it was given ({cursor}) on page {page}")]
    CursorLoop { page: u32, cursor: String },

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
