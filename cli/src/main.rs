//! steemrpc CLI — send a JSON-RPC call through the failover client.
//!
//! Usage:
//! ```bash
//! # Query the default public node
//! steemrpc call --method condenser_api.get_dynamic_global_properties
//!
//! # Positional params, two endpoints tried in order, traces on
//! steemrpc call --method condenser_api.get_accounts --params '[["steemit"]]' \
//!     --url https://api.steemit.com --url https://api.steemitdev.com --debug
//!
//! # Options from a JSON document
//! steemrpc endpoints --config steemrpc.json
//! ```

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use steemrpc_core::{ClientConfig, ClientOptions, TracingSink, WebserviceUrl};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "call" => cmd_call(&args[2..]).await,
        "endpoints" => cmd_endpoints(&args[2..]),
        "version" | "--version" | "-V" => {
            println!("steemrpc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("steemrpc {}", env!("CARGO_PKG_VERSION"));
    println!("Send JSON-RPC calls to Steem API nodes with endpoint failover\n");
    println!("USAGE:");
    println!("    steemrpc <COMMAND>\n");
    println!("COMMANDS:");
    println!("    call       Send one JSON-RPC call and print its result");
    println!("    endpoints  Print the resolved endpoint list");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("CALL FLAGS:");
    println!("    --method <NAME>    Remote procedure name  [required]");
    println!("    --params <JSON>    Params array or object  [default: []]");
    println!("    --url <URL>        Endpoint, repeat for failover order");
    println!("    --config <FILE>    JSON options document");
    println!("    --debug            Print Request/Result traces");
    println!("    --log              Send traces to the tracing log instead of stdout");
    println!("    --abort            Exit immediately on failure instead of reporting an error");
}

/// Merge `--config`, `--url`, `--debug` and `--abort` into client options.
fn load_options(args: &[String]) -> anyhow::Result<ClientOptions> {
    let mut options = match parse_flag(args, "--config") {
        Some(path) => ClientOptions::from_json_file(&path)?,
        None => ClientOptions {
            throw_exception: true,
            ..Default::default()
        },
    };

    let urls = parse_all(args, "--url");
    if !urls.is_empty() {
        options.webservice_url = WebserviceUrl::Many(urls);
    }
    if has_flag(args, "--debug") {
        options.debug = true;
    }
    if has_flag(args, "--abort") {
        options.throw_exception = false;
    }
    Ok(options)
}

async fn cmd_call(args: &[String]) -> anyhow::Result<()> {
    let method = parse_flag(args, "--method").ok_or_else(|| anyhow!("--method is required"))?;
    let params = parse_flag(args, "--params")
        .map(|p| serde_json::from_str::<serde_json::Value>(&p))
        .transpose()
        .context("--params is not valid JSON")?;

    let options = load_options(args)?;
    let mut config = ClientConfig::from_options(options)?;
    if has_flag(args, "--log") {
        config = config.with_sink(Arc::new(TracingSink));
    }

    let client = steemrpc_http::connect_config(config)?;
    let outcome = client
        .call_with_report(&method, params)
        .await
        .with_context(|| format!("{method} failed"))?;

    tracing::info!(
        endpoint = outcome.report.endpoint.as_deref().unwrap_or("-"),
        status = ?outcome.report.status,
        attempts = outcome.report.attempts,
        "call completed"
    );
    println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    Ok(())
}

fn cmd_endpoints(args: &[String]) -> anyhow::Result<()> {
    let config = ClientConfig::from_options(load_options(args)?)?;
    for (i, url) in config.endpoints().iter().enumerate() {
        println!("{:>3}  {url}", i + 1);
    }
    println!("policy: {}", config.failure_policy());
    Ok(())
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}

fn parse_all(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .collect()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
