//! # valstat
//!
//! Per-validator block proposal and gas report for Tendermint/CometBFT chains
//! running the Cosmos SDK staking module.
//!
//! The report is built from two independent scans against a node's RPC
//! endpoint:
//!
//! - a backward scan over block headers that tallies proposers and sums gas
//!   per block over a trailing window of the chain;
//! - a forward, cursor-paginated scan over the bonded validator set that maps
//!   consensus addresses to operator addresses.
//!
//! Both are joined against the validator set at the starting height.
//!
//! ## Architecture
//!
//! - [`config`] - defaults and validation for a report run
//! - [`rpc_client`] - JSON-RPC client for the Tendermint RPC endpoint
//! - [`report`] - address codec, scanners, assembler and CSV writer
//!
//! ## Example
//!
//! ```rust,no_run
//! use valstat::config::ReportConfigBuilder;
//! use valstat::report::{run_report, ReportWriter, RunOptions};
//! use valstat::rpc_client::RpcClient;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReportConfigBuilder::new(Some("http://localhost:26657".into())).build()?;
//! let client = RpcClient::builder(config.endpoint.clone())
//!     .timeout(config.timeout)
//!     .build()?;
//! let mut writer = ReportWriter::new(std::io::stdout(), Some(std::io::stderr()));
//! run_report(&client, &RunOptions::from(&config), &mut writer).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub use valstat_config as config;
pub use valstat_report as report;
pub use valstat_rpc_client as rpc_client;
