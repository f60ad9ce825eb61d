//! Bonded validator set fetcher.
//!
//! Pages forward through the staking module's bonded validators with its
//! opaque cursor and maps each consensus address to the operator address.

use crate::address::{derive_consensus_address, Address, AddressError, ConsensusPubKey};
use crate::error::{ReportError, ReportResult};
use crate::source::{ChainSource, StakingValidator};
use std::collections::HashMap;
use std::io;
use tracing::{debug, info, warn};
use valstat_config::{KeyPolicy, ValidatorSettings};

/// Paging and key handling for [`fetch_bonded_validators`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Validators requested per page
    pub page_limit: u64,
    /// Pages fetched before giving up with [`ReportError::PaginationLimit`]
    pub max_pages: u32,
    pub key_policy: KeyPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&ValidatorSettings::default())
    }
}

impl From<&ValidatorSettings> for FetchOptions {
    fn from(settings: &ValidatorSettings) -> Self {
        Self {
            page_limit: settings.page_limit,
            max_pages: settings.max_pages,
            key_policy: settings.key_policy,
        }
    }
}

/// Consensus address to operator address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorIdentities {
    operators: HashMap<Address, String>,
    /// Validators left out under [`KeyPolicy::SkipAndWarn`]
    skipped: Vec<String>,
}

impl ValidatorIdentities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an identity. A later record for the same address replaces
    /// the earlier one.
    pub fn insert(&mut self, address: Address, operator: String) {
        self.operators.insert(address, operator);
    }

    pub fn operator(&self, address: &Address) -> Option<&str> {
        self.operators.get(address).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Operators whose keys could not be mapped to an address
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

enum Cursor {
    Start,
    Next(Vec<u8>),
}

impl Cursor {
    fn key(&self) -> Option<&[u8]> {
        match self {
            Cursor::Start => None,
            Cursor::Next(key) => Some(key),
        }
    }
}

/// Fetches the whole bonded validator set.
///
/// `progress` is called with the 1-based page number before each request.
pub async fn fetch_bonded_validators<S, F>(
    source: &S,
    options: &FetchOptions,
    mut progress: F,
) -> ReportResult<ValidatorIdentities>
where
    S: ChainSource + ?Sized,
    F: FnMut(u32) -> io::Result<()>,
{
    let mut identities = ValidatorIdentities::new();
    let mut cursor = Cursor::Start;
    let mut page = 0u32;

    loop {
        if page >= options.max_pages {
            return Err(ReportError::PaginationLimit { pages: page });
        }
        page += 1;
        progress(page)?;

        let response = source
            .bonded_validators_page(cursor.key(), options.page_limit)
            .await?;
        debug!(
            target: "valstat",
            page,
            validators = response.validators.len(),
            "bonded validator page received"
        );

        for validator in &response.validators {
            record_identity(&mut identities, validator, options.key_policy)?;
        }

        match response.next_key.filter(|key| !key.is_empty()) {
            None => break,
            Some(next) if cursor.key() == Some(next.as_slice()) => {
                return Err(ReportError::CursorLoop {
                    page,
                    cursor: hex::encode(next),
                });
            }
            Some(next) => cursor = Cursor::Next(next),
        }
    }

    info!(
        target: "valstat",
        validators = identities.len(),
        skipped = identities.skipped.len(),
        pages = page,
        "bonded validator set loaded"
    );
    Ok(identities)
}

fn record_identity(
    identities: &mut ValidatorIdentities,
    validator: &StakingValidator,
    policy: KeyPolicy,
) -> ReportResult<()> {
    let operator = &validator.operator_address;
    let any = validator
        .consensus_pubkey
        .as_ref()
        .ok_or_else(|| ReportError::MissingConsensusKey {
            operator: operator.clone(),
        })?;

    let derived = ConsensusPubKey::from_any(any).and_then(|key| derive_consensus_address(&key));
    match derived {
        Ok(address) => {
            identities.insert(address, operator.clone());
            Ok(())
        }
        Err(err) if policy == KeyPolicy::SkipAndWarn => {
            warn!(target: "valstat", operator = %operator, error = %err, "skipping validator");
            identities.skipped.push(operator.clone());
            Ok(())
        }
        Err(source @ AddressError::UnsupportedKeyType { .. }) => {
            Err(ReportError::UnsupportedKeyType {
                operator: operator.clone(),
                source,
            })
        }
        Err(source) => Err(ReportError::InvalidConsensusKey {
            operator: operator.clone(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::MULTISIG_TYPE_URL;
    use crate::source::ValidatorPage;
    use crate::test_support::{ed25519_any, staking, ScriptedChain};
    use valstat_rpc_client::models::staking::Any;

    fn page(validators: Vec<StakingValidator>, next_key: Option<Vec<u8>>) -> ValidatorPage {
        ValidatorPage {
            validators,
            next_key,
        }
    }

    fn address_of(seed: u8) -> Address {
        let key = ConsensusPubKey::from_any(&ed25519_any(seed)).unwrap();
        derive_consensus_address(&key).unwrap()
    }

    fn multisig() -> Any {
        Any {
            type_url: MULTISIG_TYPE_URL.to_string(),
            value: vec![0x08, 0x01],
        }
    }

    #[tokio::test]
    async fn follows_cursor_until_exhausted() {
        let mut chain = ScriptedChain::new(1);
        chain.staking_pages.insert(
            None,
            page(vec![staking("opA", Some(ed25519_any(1)))], Some(vec![0x01])),
        );
        chain.staking_pages.insert(
            Some(vec![0x01]),
            page(vec![staking("opB", Some(ed25519_any(2)))], Some(vec![])),
        );

        let mut pages_seen = Vec::new();
        let identities = fetch_bonded_validators(&chain, &FetchOptions::default(), |page| {
            pages_seen.push(page);
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(pages_seen, vec![1, 2]);
        assert_eq!(chain.staking_requests(), vec![None, Some(vec![0x01])]);
        assert_eq!(identities.len(), 2);
        assert_eq!(identities.operator(&address_of(1)), Some("opA"));
        assert_eq!(identities.operator(&address_of(2)), Some("opB"));
    }

    #[tokio::test]
    async fn repeated_validator_yields_one_entry() {
        let mut chain = ScriptedChain::new(1);
        chain.staking_pages.insert(
            None,
            page(vec![staking("opA", Some(ed25519_any(1)))], Some(vec![0x01])),
        );
        chain.staking_pages.insert(
            Some(vec![0x01]),
            page(
                vec![
                    staking("opA", Some(ed25519_any(1))),
                    staking("opB", Some(ed25519_any(2))),
                ],
                None,
            ),
        );

        let identities = fetch_bonded_validators(&chain, &FetchOptions::default(), |_| Ok(()))
            .await
            .unwrap();
        assert_eq!(identities.len(), 2);
    }

    #[tokio::test]
    async fn later_record_for_same_key_wins() {
        let mut chain = ScriptedChain::new(1);
        chain.staking_pages.insert(
            None,
            page(vec![staking("opOld", Some(ed25519_any(1)))], Some(vec![0x01])),
        );
        chain.staking_pages.insert(
            Some(vec![0x01]),
            page(vec![staking("opNew", Some(ed25519_any(1)))], None),
        );

        let identities = fetch_bonded_validators(&chain, &FetchOptions::default(), |_| Ok(()))
            .await
            .unwrap();
        assert_eq!(identities.len(), 1);
        assert_eq!(identities.operator(&address_of(1)), Some("opNew"));
    }

    #[tokio::test]
    async fn missing_key_is_fatal() {
        let mut chain = ScriptedChain::new(1);
        chain
            .staking_pages
            .insert(None, page(vec![staking("opX", None)], None));

        let err = fetch_bonded_validators(&chain, &FetchOptions::default(), |_| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::MissingConsensusKey { ref operator } if operator == "opX"));
    }

    #[tokio::test]
    async fn multisig_key_aborts_by_default() {
        let mut chain = ScriptedChain::new(1);
        chain
            .staking_pages
            .insert(None, page(vec![staking("opM", Some(multisig()))], None));

        let err = fetch_bonded_validators(&chain, &FetchOptions::default(), |_| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedKeyType { .. }));
    }

    #[tokio::test]
    async fn multisig_key_is_skipped_when_allowed() {
        let mut chain = ScriptedChain::new(1);
        chain.staking_pages.insert(
            None,
            page(
                vec![
                    staking("opM", Some(multisig())),
                    staking("opA", Some(ed25519_any(1))),
                ],
                None,
            ),
        );
        let options = FetchOptions {
            key_policy: KeyPolicy::SkipAndWarn,
            ..FetchOptions::default()
        };

        let identities = fetch_bonded_validators(&chain, &options, |_| Ok(()))
            .await
            .unwrap();
        assert_eq!(identities.len(), 1);
        assert_eq!(identities.skipped(), ["opM".to_string()]);
    }

    #[tokio::test]
    async fn repeated_cursor_is_a_loop() {
        let mut chain = ScriptedChain::new(1);
        chain
            .staking_pages
            .insert(None, page(vec![], Some(vec![0x07])));
        chain
            .staking_pages
            .insert(Some(vec![0x07]), page(vec![], Some(vec![0x07])));

        let err = fetch_bonded_validators(&chain, &FetchOptions::default(), |_| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::CursorLoop { page: 2, .. }));
    }

    #[tokio::test]
    async fn page_cap_stops_runaway_pagination() {
        let mut chain = ScriptedChain::new(1);
        chain
            .staking_pages
            .insert(None, page(vec![], Some(vec![1])));
        chain
            .staking_pages
            .insert(Some(vec![1]), page(vec![], Some(vec![2])));
        chain
            .staking_pages
            .insert(Some(vec![2]), page(vec![], Some(vec![1])));
        let options = FetchOptions {
            max_pages: 5,
            ..FetchOptions::default()
        };

        let err = fetch_bonded_validators(&chain, &options, |_| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::PaginationLimit { pages: 5 }));
        assert_eq!(chain.staking_requests().len(), 5);
    }

    #[tokio::test]
    async fn progress_failure_stops_fetch() {
        let chain = ScriptedChain::new(1);
        let err = fetch_bonded_validators(&chain, &FetchOptions::default(), |_| {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ReportError::Io(_)));
        assert!(chain.staking_requests().is_empty());
    }
}
