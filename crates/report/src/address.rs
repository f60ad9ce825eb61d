//! Consensus address codec.
//!
//! Tendermint identifies a validator in block headers and in the consensus
//! validator set by a 20-byte address derived from its consensus public key.
//! The staking module only knows the key itself, so the join between the
//! two datasets goes through [`derive_consensus_address`]. All addresses are
//! kept as uppercase hex so map lookups on both sides agree.

use prost::Message;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;
use valstat_rpc_client::models::staking::{Any, PubKey};

pub const ED25519_TYPE_URL: &str = "/cosmos.crypto.ed25519.PubKey";
pub const SECP256K1_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";
pub const SR25519_TYPE_URL: &str = "/cosmos.crypto.sr25519.PubKey";
pub const MULTISIG_TYPE_URL: &str = "/cosmos.crypto.multisig.LegacyAminoPubKey";

/// Length of a Tendermint address in bytes
pub const ADDRESS_LENGTH: usize = 20;

const ED25519_KEY_LENGTH: usize = 32;
const SR25519_KEY_LENGTH: usize = 32;
const SECP256K1_KEY_LENGTH: usize = 33;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Multisig/threshold or unknown key types have no single address.
    #[error("unsupported consensus key type {type_url}")]
    UnsupportedKeyType { type_url: String },

    #[error("{type_url} key must be {expected} bytes, got {actual}")]
    InvalidKeyLength {
        type_url: String,
        expected: usize,
        actual: usize,
    },

    #[error("malformed {type_url} key: {message}")]
    MalformedKey { type_url: String, message: String },

    #[error("invalid hex address '{value}'")]
    InvalidHex { value: String },
}

/// Canonical (uppercase hex) validator address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    /// Parses a hex address in any case.
    pub fn from_hex(value: &str) -> Result<Self, AddressError> {
        let bytes = hex::decode(value.trim()).map_err(|_| AddressError::InvalidHex {
            value: value.to_string(),
        })?;
        Ok(canonicalize_address(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A consensus public key unwrapped from its `Any` envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusPubKey {
    Ed25519(Vec<u8>),
    Secp256k1(Vec<u8>),
    Sr25519(Vec<u8>),
    /// Threshold key; kept so the caller can report it by type
    Multisig,
    Unknown(String),
}

impl ConsensusPubKey {
    /// Unwraps the protobuf `Any` carried by staking validator records.
    pub fn from_any(any: &Any) -> Result<Self, AddressError> {
        let single = |wrap: fn(Vec<u8>) -> ConsensusPubKey| {
            PubKey::decode(any.value.as_slice())
                .map(|key| wrap(key.key))
                .map_err(|err| AddressError::MalformedKey {
                    type_url: any.type_url.clone(),
                    message: err.to_string(),
                })
        };

        match any.type_url.as_str() {
            ED25519_TYPE_URL => single(ConsensusPubKey::Ed25519),
            SECP256K1_TYPE_URL => single(ConsensusPubKey::Secp256k1),
            SR25519_TYPE_URL => single(ConsensusPubKey::Sr25519),
            MULTISIG_TYPE_URL => Ok(ConsensusPubKey::Multisig),
            other => Ok(ConsensusPubKey::Unknown(other.to_string())),
        }
    }

    pub fn type_url(&self) -> &str {
        match self {
            ConsensusPubKey::Ed25519(_) => ED25519_TYPE_URL,
            ConsensusPubKey::Secp256k1(_) => SECP256K1_TYPE_URL,
            ConsensusPubKey::Sr25519(_) => SR25519_TYPE_URL,
            ConsensusPubKey::Multisig => MULTISIG_TYPE_URL,
            ConsensusPubKey::Unknown(type_url) => type_url,
        }
    }
}

/// Derives the Tendermint address of a single consensus key.
///
/// ed25519 and sr25519 use the first 20 bytes of SHA-256 over the key;
/// secp256k1 uses RIPEMD-160 over SHA-256 of the compressed key.
pub fn derive_consensus_address(key: &ConsensusPubKey) -> Result<Address, AddressError> {
    match key {
        ConsensusPubKey::Ed25519(bytes) => {
            check_length(key, bytes, ED25519_KEY_LENGTH)?;
            Ok(truncated_sha256(bytes))
        }
        ConsensusPubKey::Sr25519(bytes) => {
            check_length(key, bytes, SR25519_KEY_LENGTH)?;
            Ok(truncated_sha256(bytes))
        }
        ConsensusPubKey::Secp256k1(bytes) => {
            check_length(key, bytes, SECP256K1_KEY_LENGTH)?;
            let digest = Ripemd160::digest(Sha256::digest(bytes));
            Ok(canonicalize_address(&digest))
        }
        ConsensusPubKey::Multisig | ConsensusPubKey::Unknown(_) => {
            Err(AddressError::UnsupportedKeyType {
                type_url: key.type_url().to_string(),
            })
        }
    }
}

/// Uppercase hex encoding of raw address bytes.
pub fn canonicalize_address(raw: &[u8]) -> Address {
    Address(hex::encode_upper(raw))
}

fn truncated_sha256(bytes: &[u8]) -> Address {
    let digest = Sha256::digest(bytes);
    canonicalize_address(&digest[..ADDRESS_LENGTH])
}

fn check_length(key: &ConsensusPubKey, bytes: &[u8], expected: usize) -> Result<(), AddressError> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(AddressError::InvalidKeyLength {
            type_url: key.type_url().to_string(),
            expected,
            actual: bytes.len(),
        })
    }
}
