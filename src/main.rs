use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use serde_json::Value;

use mt7_rpc_client::{ClientOptions, RpcCaller};

/// Perform a single MT7 JSON-RPC call and print the normalized result.
#[derive(Parser)]
#[clap(name = "mt7-call", version)]
struct Cli {
    /// RPC method name, e.g. Login
    method: String,

    /// Method parameters as a JSON object
    params: Option<String>,

    /// JSON file with client options, applied over MT7_* environment variables
    #[clap(long)]
    options: Option<PathBuf>,

    /// Print the result using the configured response field mapping
    #[clap(long)]
    mapped: bool,
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut options = ClientOptions::from_env().context("Failed to read MT7_* environment")?;
    if let Some(path) = &cli.options {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?;
        options = options.overlay(ClientOptions::from_json_str(&raw)?);
    }

    let params = cli
        .params
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("PARAMS must be valid JSON")?;

    let caller = RpcCaller::new(options).context("Failed to initialize RPC caller")?;
    let result = caller.call(&cli.method, params);

    let output = if cli.mapped {
        result.render(&caller.config().response)
    } else {
        serde_json::to_value(&result)?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
