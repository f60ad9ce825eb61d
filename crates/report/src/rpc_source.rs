//! [`ChainSource`] over the Tendermint JSON-RPC client.

use crate::source::{
    ChainSource, ChainStatus, HeaderMeta, SnapshotValidator, StakingValidator, TxGas,
    ValidatorPage,
};
use async_trait::async_trait;
use valstat_rpc_client::models::staking::BOND_STATUS_BONDED;
use valstat_rpc_client::{ClientRpcError, RpcClient};

#[async_trait]
impl ChainSource for RpcClient {
    async fn chain_status(&self) -> Result<ChainStatus, ClientRpcError> {
        let status = self.status().await?;
        Ok(ChainStatus {
            latest_height: status.sync_info.latest_block_height,
            earliest_height: status.sync_info.earliest_block_height.max(1),
        })
    }

    async fn block_headers(
        &self,
        min_height: u64,
        max_height: u64,
    ) -> Result<Vec<HeaderMeta>, ClientRpcError> {
        let info = self.blockchain(min_height, max_height).await?;
        Ok(info
            .block_metas
            .into_iter()
            .map(|meta| HeaderMeta {
                height: meta.header.height,
                proposer_address: meta.header.proposer_address,
                num_txs: meta.num_txs,
            })
            .collect())
    }

    async fn block_gas(&self, height: u64) -> Result<Vec<TxGas>, ClientRpcError> {
        let results = self.block_results(height).await?;
        Ok(results
            .txs_results
            .into_iter()
            .map(|tx| TxGas {
                gas_used: tx.gas_used,
                gas_wanted: tx.gas_wanted,
            })
            .collect())
    }

    async fn bonded_validators_page(
        &self,
        cursor: Option<&[u8]>,
        limit: u64,
    ) -> Result<ValidatorPage, ClientRpcError> {
        let response = self
            .staking_validators(BOND_STATUS_BONDED, cursor, limit)
            .await?;
        let next_key = response.next_key().map(<[u8]>::to_vec);
        Ok(ValidatorPage {
            validators: response
                .validators
                .into_iter()
                .map(|validator| StakingValidator {
                    operator_address: validator.operator_address,
                    consensus_pubkey: validator.consensus_pubkey,
                })
                .collect(),
            next_key,
        })
    }

    async fn validator_set(&self, height: u64) -> Result<Vec<SnapshotValidator>, ClientRpcError> {
        Ok(self
            .validators_all(height)
            .await?
            .into_iter()
            .map(|validator| SnapshotValidator {
                address: validator.address,
                voting_power: validator.voting_power,
            })
            .collect())
    }
}
