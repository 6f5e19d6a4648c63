//! placefind CLI: location lookups and the search proxy from the terminal.
//!
//! Calls `placefind-core` providers directly; `serve` hosts `placefind-http`.

use clap::{Parser, Subcommand};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use placefind_core::{load_config, Config, LocationProvider, Provider, ProviderKind};
use placefind_http::ApiState;

/// placefind CLI: geocode event venues from the terminal.
#[derive(Parser)]
#[command(name = "pf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding .placefind.toml (default: current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up candidate locations for a query
    Search {
        /// Free-text location query
        query: String,

        /// Maximum number of results (default: configured limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Provider override: nominatim or mapbox
        #[arg(long)]
        provider: Option<String>,
    },
    /// Run the HTTP location proxy
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8787")]
        port: u16,

        /// Listen on all interfaces instead of localhost only
        #[arg(long)]
        public: bool,
    },
    /// Show the effective configuration
    Config,
}

fn resolve_config(root: Option<PathBuf>) -> Config {
    let root = root.unwrap_or_else(|| PathBuf::from("."));
    load_config(&root)
}

fn listen_addr(port: u16, public: bool) -> SocketAddr {
    let ip = if public { Ipv4Addr::UNSPECIFIED } else { Ipv4Addr::LOCALHOST };
    SocketAddr::new(IpAddr::V4(ip), port)
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("placefind=warn".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = resolve_config(cli.root);

    match cli.command {
        Commands::Search { query, limit, provider } => {
            if let Some(name) = provider {
                config.provider = ProviderKind::parse(&name).unwrap_or_else(|e| fail(e));
            }
            if query.chars().count() < config.min_query_len {
                fail(format!(
                    "Query '{query}' is too short (minimum {} characters)",
                    config.min_query_len
                ));
            }
            let provider = Provider::from_config(&config).unwrap_or_else(|e| fail(e));
            let limit = limit.unwrap_or(config.limit).max(1);

            let results = match provider.search(&query, limit).await {
                Ok(results) => results,
                Err(e) => {
                    let name = provider.name();
                    warn!(provider = name, query = %query, "Location lookup failed: {e}");
                    fail(format!("Lookup failed: {e}"))
                }
            };

            if cli.json {
                let items: Vec<_> = results.iter().map(|c| c.to_selection()).collect();
                println!("{}", serde_json::to_string_pretty(&items).unwrap_or_default());
            } else {
                if results.is_empty() {
                    eprintln!("No locations for '{query}'");
                    std::process::exit(1);
                }
                for (i, c) in results.iter().enumerate() {
                    let coords = c
                        .coordinates
                        .map(|p| format!("{:>10.5} {:>11.5}", p.latitude, p.longitude))
                        .unwrap_or_else(|| format!("{:>22}", "(no coordinates)"));
                    println!("{:>2}. {:<32} {}", i + 1, c.primary_label, coords);
                    println!("    {}", c.secondary_label);
                }
                eprintln!("\n{} results from {}", results.len(), provider.name());
            }
        }
        Commands::Serve { port, public } => {
            let provider = Provider::from_config(&config).unwrap_or_else(|e| fail(e));
            let addr = listen_addr(port, public);
            let state = Arc::new(ApiState::new(provider, &config));
            if let Err(e) = placefind_http::serve(addr, state).await {
                warn!(%addr, "Proxy stopped: {e}");
                fail(format!("Server error: {e}"));
            }
        }
        Commands::Config => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config).unwrap_or_default());
            } else {
                let token = if config.mapbox_token.is_some() { "set" } else { "not set" };
                println!("Provider:       {:?}", config.provider);
                println!("Endpoint:       {}", config.endpoint());
                println!("User agent:     {}", config.user_agent);
                println!("Limit:          {}", config.limit);
                println!("Debounce:       {}ms", config.debounce_ms);
                println!("Min query len:  {}", config.min_query_len);
                println!("Timeout:        {}ms", config.timeout_ms);
                println!("Mapbox token:   {token}");
            }
        }
    }
}
