mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use wr_core::WireSlot;
use wr_store::RewardStore;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Parser)]
#[command(name = "wr", about = "Weekly rewards HTTP server and schedule tools")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the rewards HTTP API
    Serve {
        /// Listen address [env: WR_ADDR] [default: 127.0.0.1:3000]
        #[arg(long)]
        addr: Option<String>,
    },

    /// Print the reward week containing a timestamp
    Week {
        /// User identifier
        user: String,
        /// Any timestamp inside the week
        at: String,
    },
}

/// Listen address: flag, then `WR_ADDR`, then the default.
fn resolve_addr(flag: Option<&str>, env: Option<String>) -> String {
    flag.map(str::to_string)
        .or(env.filter(|addr| !addr.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_ADDR.to_string())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Serve { addr } => cmd_serve(addr.as_deref()).await,
        Commands::Week { user, at } => cmd_week(user, at),
    }
}

async fn cmd_serve(addr: Option<&str>) -> Result<()> {
    let addr = resolve_addr(addr, std::env::var("WR_ADDR").ok());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    let store = Arc::new(RewardStore::new());
    server::serve(listener, store, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("server stopped");
    Ok(())
}

fn cmd_week(user: &str, at: &str) -> Result<()> {
    let store = RewardStore::new();
    let week = store
        .generate_week(user, at)
        .context("failed to generate week")?;

    let data: Vec<WireSlot> = week.snapshot().iter().map(WireSlot::from).collect();
    let json = serde_json::to_string_pretty(&server::Data { data })
        .context("failed to serialize week")?;
    println!("{json}");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_addr_flag_wins() {
        let addr = resolve_addr(Some("0.0.0.0:8080"), Some("127.0.0.1:9000".into()));
        assert_eq!(addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_resolve_addr_env_fallback() {
        assert_eq!(resolve_addr(None, Some("127.0.0.1:9000".into())), "127.0.0.1:9000");
    }

    #[test]
    fn test_resolve_addr_default() {
        assert_eq!(resolve_addr(None, None), DEFAULT_ADDR);
        assert_eq!(resolve_addr(None, Some("  ".into())), DEFAULT_ADDR);
    }

    #[test]
    fn test_cli_parses_serve() {
        let cli = Cli::try_parse_from(["wr", "serve", "--addr", "127.0.0.1:0"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { addr: Some(ref a) } if a == "127.0.0.1:0"
        ));
    }
}
