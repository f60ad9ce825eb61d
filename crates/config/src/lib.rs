//! valstat Configuration Module
//!
//! This module provides the configuration types for a report run: the RPC
//! endpoint, the block window to scan, how the bonded validator set is paged
//! and where diagnostics are written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable holding the RPC endpoint
pub const ENDPOINT_ENV: &str = "ENDPOINT";

/// Number of header pages scanned by default.
/// Every page of the `blockchain` RPC method holds at most 20 headers.
pub const DEFAULT_PAGES: u32 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size requested from the staking module
pub const DEFAULT_VALIDATOR_PAGE_LIMIT: u64 = 100;
/// Upper bound on staking pages before the fetch is considered runaway
pub const DEFAULT_MAX_VALIDATOR_PAGES: u32 = 10_000;

/// HTTP timeout per RPC request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors. All of them are fatal and reported before any
/// request is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ENDPOINT must be set (pass --endpoint or export ENDPOINT)")]
    MissingEndpoint,

    #[error("invalid endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },

    #[error("invalid {name}: {reason}")]
    InvalidLimit { name: &'static str, reason: String },
}

/// What to do with a bonded validator whose consensus key cannot be turned
/// into a single address (multisig or unknown key types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeyPolicy {
    /// Abort the run
    #[default]
    Abort,
    /// Log a warning and leave the validator out of the identity map
    SkipAndWarn,
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPolicy::Abort => write!(f, "abort"),
            KeyPolicy::SkipAndWarn => write!(f, "skip"),
        }
    }
}

impl FromStr for KeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" | "fail" => Ok(KeyPolicy::Abort),
            "skip" | "warn" | "skip-and-warn" => Ok(KeyPolicy::SkipAndWarn),
            _ => Err(format!("Unknown key policy: {}", s)),
        }
    }
}

/// Block window settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    pub pages: u32,
    pub page_size: u32,
    pub max_blocks: Option<u64>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            pages: DEFAULT_PAGES,
            page_size: DEFAULT_PAGE_SIZE,
            max_blocks: None,
        }
    }
}

/// Bonded validator set settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSettings {
    pub page_limit: u64,
    pub max_pages: u32,
    pub key_policy: KeyPolicy,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_VALIDATOR_PAGE_LIMIT,
            max_pages: DEFAULT_MAX_VALIDATOR_PAGES,
            key_policy: KeyPolicy::Abort,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Write diagnostic lines into the CSV stream instead of a separate one
    pub inline_diagnostics: bool,
}

/// Fully validated configuration of one report run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub endpoint: Url,
    pub timeout: Duration,
    pub scan: ScanSettings,
    pub validators: ValidatorSettings,
    pub output: OutputSettings,
    /// Run the block scan and the validator fetch concurrently
    pub concurrent: bool,
}

/// Collects raw settings (from flags, environment or defaults) and validates
/// them into a [`ReportConfig`].
#[derive(Debug, Clone, Default)]
pub struct ReportConfigBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    scan: ScanSettings,
    validators: ValidatorSettings,
    output: OutputSettings,
    concurrent: bool,
}

impl ReportConfigBuilder {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            ..Default::default()
        }
    }

    pub fn pages(mut self, pages: u32) -> Self {
        self.scan.pages = pages;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.scan.page_size = page_size;
        self
    }

    pub fn max_blocks(mut self, max_blocks: Option<u64>) -> Self {
        self.scan.max_blocks = max_blocks;
        self
    }

    pub fn validator_page_limit(mut self, limit: u64) -> Self {
        self.validators.page_limit = limit;
        self
    }

    pub fn max_validator_pages(mut self, max_pages: u32) -> Self {
        self.validators.max_pages = max_pages;
        self
    }

    pub fn key_policy(mut self, policy: KeyPolicy) -> Self {
        self.validators.key_policy = policy;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn inline_diagnostics(mut self, inline: bool) -> Self {
        self.output.inline_diagnostics = inline;
        self
    }

    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn build(self) -> Result<ReportConfig, ConfigError> {
        let raw = self
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        let endpoint = parse_endpoint(raw)?;

        if self.scan.pages == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "pages",
                reason: "at least one page must be scanned".to_string(),
            });
        }
        if self.scan.page_size == 0 || self.scan.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidLimit {
                name: "page size",
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }
        if self.scan.max_blocks == Some(0) {
            return Err(ConfigError::InvalidLimit {
                name: "max blocks",
                reason: "must be positive when set".to_string(),
            });
        }
        if self.validators.page_limit == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "validator page limit",
                reason: "must be positive".to_string(),
            });
        }
        if self.validators.max_pages == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "max validator pages",
                reason: "must be positive".to_string(),
            });
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if timeout.is_zero() {
            return Err(ConfigError::InvalidLimit {
                name: "timeout",
                reason: "must be positive".to_string(),
            });
        }

        Ok(ReportConfig {
            endpoint,
            timeout,
            scan: self.scan,
            validators: self.validators,
            output: self.output,
            concurrent: self.concurrent,
        })
    }
}

/// Parses an RPC endpoint. A bare `host:port` is taken as plain http, which
/// is how node operators usually hand out Tendermint RPC addresses.
pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    let url = Url::parse(&candidate).map_err(|err| ConfigError::InvalidEndpoint {
        value: raw.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}
