//! Scripted in-memory chain used by the unit tests.

use crate::source::{
    ChainSource, ChainStatus, HeaderMeta, SnapshotValidator, StakingValidator, TxGas,
    ValidatorPage,
};
use async_trait::async_trait;
use prost::Message;
use std::collections::HashMap;
use std::sync::Mutex;
use valstat_rpc_client::models::staking::{Any, PubKey};
use valstat_rpc_client::ClientRpcError;

pub(crate) const ED25519: &str = "/cosmos.crypto.ed25519.PubKey";

pub(crate) fn ed25519_any(seed: u8) -> Any {
    Any {
        type_url: ED25519.to_string(),
        value: PubKey { key: vec![seed; 32] }.encode_to_vec(),
    }
}

pub(crate) fn staking(operator: &str, key: Option<Any>) -> StakingValidator {
    StakingValidator {
        operator_address: operator.to_string(),
        consensus_pubkey: key,
    }
}

/// A chain of `latest - earliest + 1` blocks whose proposers rotate through
/// `proposers` by height. Header pages are capped at `page_cap` entries,
/// most recent first, like the `blockchain` RPC method.
pub(crate) struct ScriptedChain {
    pub latest: u64,
    pub earliest: u64,
    pub page_cap: usize,
    pub proposers: Vec<Vec<u8>>,
    pub gas: HashMap<u64, Vec<TxGas>>,
    /// Staking pages keyed by the cursor that requests them
    pub staking_pages: HashMap<Option<Vec<u8>>, ValidatorPage>,
    pub snapshot: Vec<SnapshotValidator>,
    /// Headers returned verbatim instead of the generated ones, keyed by
    /// request upper bound
    pub header_overrides: HashMap<u64, Vec<HeaderMeta>>,
    /// Generated pages lead with a header above the requested range and
    /// repeat every header
    pub noisy_pages: bool,
    /// Height whose `block_results` fails
    pub failing_gas_height: Option<u64>,
    pub header_requests: Mutex<Vec<(u64, u64)>>,
    pub staking_requests: Mutex<Vec<Option<Vec<u8>>>>,
}

impl ScriptedChain {
    pub fn new(latest: u64) -> Self {
        Self {
            latest,
            earliest: 1,
            page_cap: 20,
            proposers: vec![vec![0xaa; 20], vec![0xbb; 20], vec![0xcc; 20]],
            gas: HashMap::new(),
            staking_pages: HashMap::new(),
            snapshot: Vec::new(),
            header_overrides: HashMap::new(),
            noisy_pages: false,
            failing_gas_height: None,
            header_requests: Mutex::new(Vec::new()),
            staking_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn proposer_at(&self, height: u64) -> Vec<u8> {
        self.proposers[(height % self.proposers.len() as u64) as usize].clone()
    }

    pub fn header_requests(&self) -> Vec<(u64, u64)> {
        self.header_requests.lock().unwrap().clone()
    }

    pub fn staking_requests(&self) -> Vec<Option<Vec<u8>>> {
        self.staking_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainSource for ScriptedChain {
    async fn chain_status(&self) -> Result<ChainStatus, ClientRpcError> {
        Ok(ChainStatus {
            latest_height: self.latest,
            earliest_height: self.earliest,
        })
    }

    async fn block_headers(
        &self,
        min_height: u64,
        max_height: u64,
    ) -> Result<Vec<HeaderMeta>, ClientRpcError> {
        self.header_requests
            .lock()
            .unwrap()
            .push((min_height, max_height));

        if let Some(headers) = self.header_overrides.get(&max_height) {
            return Ok(headers.clone());
        }

        let upper = max_height.min(self.latest);
        let lower = min_height.max(self.earliest);
        if upper < lower {
            return Ok(Vec::new());
        }
        let header = |height: u64| HeaderMeta {
            height,
            proposer_address: self.proposer_at(height),
            num_txs: self.gas.get(&height).map_or(0, |txs| txs.len() as u64),
        };
        let heights = (lower..=upper).rev().take(self.page_cap);
        if !self.noisy_pages {
            return Ok(heights.map(header).collect());
        }

        let mut headers = vec![header(max_height + 1)];
        for height in heights {
            headers.push(header(height));
            headers.push(header(height));
        }
        Ok(headers)
    }

    async fn block_gas(&self, height: u64) -> Result<Vec<TxGas>, ClientRpcError> {
        if self.failing_gas_height == Some(height) {
            return Err(ClientRpcError::Rpc {
                method: "block_results".to_string(),
                code: -32603,
                message: "Internal error".to_string(),
                data: Some(format!("could not find results for height #{height}")),
            });
        }
        Ok(self.gas.get(&height).cloned().unwrap_or_default())
    }

    async fn bonded_validators_page(
        &self,
        cursor: Option<&[u8]>,
        _limit: u64,
    ) -> Result<ValidatorPage, ClientRpcError> {
        let key = cursor.map(<[u8]>::to_vec);
        self.staking_requests.lock().unwrap().push(key.clone());
        Ok(self.staking_pages.get(&key).cloned().unwrap_or_default())
    }

    async fn validator_set(&self, _height: u64) -> Result<Vec<SnapshotValidator>, ClientRpcError> {
        Ok(self.snapshot.clone())
    }
}
