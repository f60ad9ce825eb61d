use clap::Parser;
use std::time::Duration;
use valstat_config::{
    ConfigError, KeyPolicy, ReportConfig, ReportConfigBuilder, DEFAULT_MAX_VALIDATOR_PAGES,
    DEFAULT_PAGES, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, DEFAULT_VALIDATOR_PAGE_LIMIT,
    ENDPOINT_ENV,
};

/// Command-line arguments for valstat
#[derive(Parser, Debug, Clone)]
#[command(
    name = "valstat",
    version = env!("CARGO_PKG_VERSION"),
    about = "Block proposal and gas report per validator for Tendermint/Cosmos SDK chains",
    long_about = "Scans the most recent blocks of a Tendermint RPC endpoint, counts the blocks each validator proposed and sums their gas, then joins the counts with the bonded validator set. The block table and the validator table are written to stdout as CSV."
)]
pub struct CliArgs {
    /// Tendermint RPC endpoint, e.g. http://localhost:26657
    #[arg(long, env = ENDPOINT_ENV, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Number of header pages to scan
    #[arg(long, env = "VALSTAT_PAGES", default_value_t = DEFAULT_PAGES, value_name = "N")]
    pub pages: u32,

    /// Headers requested per page
    #[arg(long, env = "VALSTAT_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE, value_name = "N")]
    pub page_size: u32,

    /// Stop after this many blocks
    #[arg(long, env = "VALSTAT_MAX_BLOCKS", value_name = "N")]
    pub max_blocks: Option<u64>,

    /// Bonded validators requested per staking query page
    #[arg(long, default_value_t = DEFAULT_VALIDATOR_PAGE_LIMIT, value_name = "N")]
    pub validator_page_limit: u64,

    /// Give up on the bonded validator set after this many pages
    #[arg(long, default_value_t = DEFAULT_MAX_VALIDATOR_PAGES, value_name = "N")]
    pub max_validator_pages: u32,

    /// HTTP timeout per request
    #[arg(long, env = "VALSTAT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECONDS")]
    pub timeout_secs: u64,

    /// Skip validators with multisig or unknown consensus keys instead of failing
    #[arg(long)]
    pub skip_unsupported_keys: bool,

    /// Run the block scan and the validator fetch concurrently
    #[arg(long)]
    pub concurrent: bool,

    /// Write progress lines into the CSV stream instead of stderr
    #[arg(long)]
    pub inline_diagnostics: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    pub fn key_policy(&self) -> KeyPolicy {
        if self.skip_unsupported_keys {
            KeyPolicy::SkipAndWarn
        } else {
            KeyPolicy::Abort
        }
    }

    /// Validates the arguments into a report configuration.
    pub fn to_config(&self) -> Result<ReportConfig, ConfigError> {
        ReportConfigBuilder::new(self.endpoint.clone())
            .pages(self.pages)
            .page_size(self.page_size)
            .max_blocks(self.max_blocks)
            .validator_page_limit(self.validator_page_limit)
            .max_validator_pages(self.max_validator_pages)
            .key_policy(self.key_policy())
            .timeout(Duration::from_secs(self.timeout_secs))
            .inline_diagnostics(self.inline_diagnostics)
            .concurrent(self.concurrent)
            .build()
    }
}
