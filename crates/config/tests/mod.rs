//! Report configuration integration tests
//!
//! Exercises the builder the way the CLI drives it: raw values coming from
//! flags or the environment, validated into a `ReportConfig`.

use std::time::Duration;
use valstat_config::{ConfigError, KeyPolicy, ReportConfigBuilder, ENDPOINT_ENV};

#[test]
fn test_full_builder_chain() {
    let config = ReportConfigBuilder::new(Some("https://rpc.cosmos.example:443".into()))
        .pages(3)
        .page_size(5)
        .max_blocks(Some(12))
        .validator_page_limit(50)
        .max_validator_pages(7)
        .key_policy(KeyPolicy::SkipAndWarn)
        .timeout(Duration::from_secs(5))
        .inline_diagnostics(true)
        .concurrent(true)
        .build()
        .expect("valid configuration");

    assert_eq!(config.endpoint.scheme(), "https");
    assert_eq!(config.scan.pages, 3);
    assert_eq!(config.scan.page_size, 5);
    assert_eq!(config.scan.max_blocks, Some(12));
    assert_eq!(config.validators.page_limit, 50);
    assert_eq!(config.validators.max_pages, 7);
    assert_eq!(config.validators.key_policy, KeyPolicy::SkipAndWarn);
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert!(config.output.inline_diagnostics);
    assert!(config.concurrent);
}

#[test]
fn test_missing_endpoint_message_names_variable() {
    let err = ReportConfigBuilder::new(None).build().unwrap_err();
    assert_eq!(err, ConfigError::MissingEndpoint);
    assert!(err.to_string().contains(ENDPOINT_ENV));
}

#[test]
fn test_config_serializes_for_diagnostics() {
    let config = ReportConfigBuilder::new(Some("localhost:26657".into()))
        .build()
        .unwrap();
    let json = serde_json::to_value(&config).unwrap();

    assert_eq!(json["endpoint"], "http://localhost:26657/");
    assert_eq!(json["scan"]["pages"], 10);
    assert_eq!(json["validators"]["key_policy"], "Abort");
}
