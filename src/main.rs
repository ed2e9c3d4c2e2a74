use std::future::Future;

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use steamlookup::{ClientConfig, LookupError, SteamId64, SteamLookup};

#[derive(Parser)]
#[command(
    name = "steamlookup",
    about = "Steam identity resolution, profile aggregation and ban-status lookups."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Upstream request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Disable the in-process result cache
    #[arg(long, global = true, default_value_t = false)]
    no_cache: bool,

    /// Log raw upstream payloads and echo ids into reputation records
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    /// Maximum lookups in flight at once
    #[arg(long, global = true, default_value_t = 4)]
    concurrency: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Ban status for one or more identifiers
    Reputation {
        /// SteamID64, SteamID3, SteamID2 or vanity name
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Reconciled public profile for one or more identifiers
    Profile {
        /// SteamID64, SteamID3, SteamID2 or vanity name
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Resolve vanity names to SteamID64
    Vanity {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Convert any identifier form to SteamID64
    Resolve {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// One output line: the input echoed next to its record or error envelope.
#[derive(Serialize)]
struct Output<'a, T: Serialize> {
    input: &'a str,
    #[serde(flatten)]
    result: T,
}

#[derive(Serialize)]
struct Resolved {
    steamid64: SteamId64,
}

fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::load();

    if let Ok(key) = std::env::var("STEAM_API_KEY") {
        if !key.trim().is_empty() {
            config.credential = Some(key);
        }
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if cli.no_cache {
        config.cache_enabled = false;
    }
    if cli.debug {
        config.debug = true;
    }
    config
}

/// Run `op` over every input with bounded concurrency and print one JSON line
/// per input, in input order. Returns whether every lookup succeeded.
async fn run_all<F, Fut, T>(inputs: Vec<String>, concurrency: usize, op: F) -> Result<bool>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = std::result::Result<T, LookupError>>,
    T: Serialize,
{
    let results: Vec<(String, std::result::Result<T, LookupError>)> = stream::iter(inputs)
        .map(|input| {
            let lookup = op(input.clone());
            async move { (input, lookup.await) }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut all_ok = true;
    for (input, result) in results {
        let line = match result {
            Ok(value) => serde_json::to_string(&Output {
                input: &input,
                result: value,
            }),
            Err(e) => {
                all_ok = false;
                tracing::info!(input = %input, kind = e.kind(), "lookup failed");
                serde_json::to_string(&Output {
                    input: &input,
                    result: e.envelope(),
                })
            }
        };
        println!("{}", line.wrap_err("failed to encode result")?);
    }
    Ok(all_ok)
}

fn run(cli: Cli) -> Result<bool> {
    let config = client_config(&cli);
    tracing::debug!(?config, "client configuration");

    let client = SteamLookup::new(config).wrap_err("failed to build HTTP client")?;
    let client = &client;
    let concurrency = cli.concurrency;

    let rt = tokio::runtime::Runtime::new().wrap_err("failed to start runtime")?;
    rt.block_on(async move {
        match cli.command {
            Commands::Reputation { ids } => {
                run_all(ids, concurrency, |input| async move {
                    let id = client.to_canonical_identifier(&input).await?;
                    client.get_reputation(&id.to_string()).await
                })
                .await
            }
            Commands::Profile { ids } => {
                run_all(ids, concurrency, |input| async move {
                    let id = client.to_canonical_identifier(&input).await?;
                    client.get_profile(&id.to_string()).await
                })
                .await
            }
            Commands::Vanity { names } => {
                run_all(names, concurrency, |input| async move {
                    client
                        .resolve_vanity(&input)
                        .await
                        .map(|steamid64| Resolved { steamid64 })
                })
                .await
            }
            Commands::Resolve { ids } => {
                run_all(ids, concurrency, |input| async move {
                    client
                        .to_canonical_identifier(&input)
                        .await
                        .map(|steamid64| Resolved { steamid64 })
                })
                .await
            }
        }
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("steamlookup=info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:?}");
            std::process::exit(1);
        }
    }
}
