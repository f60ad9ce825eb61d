use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use valstat_cli::args::CliArgs;
use valstat_cli::{EXIT_CONFIG_ERROR, EXIT_FAILURE};
use valstat_config::ReportConfig;
use valstat_report::{run_report, ReportWriter, RunOptions};
use valstat_rpc_client::RpcClient;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let config = match args.to_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "valstat", error = %format!("{err:#}"), "report failed");
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(config: &ReportConfig) -> Result<()> {
    let client = RpcClient::builder(config.endpoint.clone())
        .timeout(config.timeout)
        .build()
        .context("failed to create RPC client")?;
    info!(
        target: "valstat",
        endpoint = %client.base_address(),
        pages = config.scan.pages,
        page_size = config.scan.page_size,
        "connecting"
    );

    let diagnostics = (!config.output.inline_diagnostics).then(io::stderr);
    let mut writer = ReportWriter::new(io::stdout(), diagnostics);
    let summary = run_report(&client, &RunOptions::from(config), &mut writer)
        .await
        .with_context(|| format!("report against {} failed", client.base_address()))?;

    info!(
        target: "valstat",
        blocks = summary.window.blocks_scanned,
        validators = summary.rows,
        mapped = summary.validators_mapped,
        skipped = summary.skipped_validators.len(),
        "report written"
    );
    Ok(())
}

fn init_tracing(json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,valstat=info"));
    let builder = fmt().with_env_filter(env_filter).with_writer(io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
