//! StorePulse CLI
//!
//! Browses the product catalog of a fake-store API while timing every call
//! and reporting the timings to a StorePulse metrics relay.
//!
//! # Usage
//!
//! ```bash
//! storepulse --help
//! storepulse health
//! storepulse products --limit 5
//! storepulse product 3
//! ```

#![deny(unsafe_code)]

mod catalog;

use anyhow::bail;
use catalog::{format_product_detail, format_product_table, Catalog, DEFAULT_STORE_URL};
use clap::{Parser, Subcommand};
use shared::client::{ClientConfig, MetricsClient};
use shared::recorder::FlushOutcome;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// StorePulse CLI - instrumented product catalog browser
#[derive(Parser)]
#[command(name = "storepulse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Metrics relay URL
    #[arg(
        short,
        long,
        env = "STOREPULSE_RELAY_URL",
        default_value = "http://localhost:9090"
    )]
    relay_url: String,

    /// Product API URL
    #[arg(long, env = "STOREPULSE_STORE_URL", default_value = DEFAULT_STORE_URL)]
    store_url: String,

    /// Timeout for every outbound request, in milliseconds
    #[arg(long, env = "STOREPULSE_TIMEOUT_MS", default_value_t = 5000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check metrics relay health
    Health,
    /// List products
    Products {
        /// Show at most this many products
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one product
    Product {
        /// Product id
        id: u64,
    },
}

/// Flushes buffered metrics if the relay is up. Never fails the command.
async fn report(metrics: &MetricsClient) {
    match metrics.flush_if_healthy().await {
        Ok(FlushOutcome::Sent(count)) => tracing::info!(count, "Metrics sent to relay"),
        Ok(FlushOutcome::Rejected { sent, dropped }) => {
            tracing::warn!(sent, dropped, "Metrics relay rejected some metrics");
        }
        Ok(FlushOutcome::Skipped) => tracing::warn!("Metrics relay unavailable, metrics not sent"),
        Ok(FlushOutcome::Empty) => {}
        Err(e) => tracing::warn!(error = %e, "Could not send metrics"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let timeout = Duration::from_millis(cli.timeout_ms);
    let config = ClientConfig::new(&cli.relay_url)
        .with_request_timeout(timeout)
        .with_probe_timeout(timeout.min(Duration::from_secs(2)));
    let metrics = MetricsClient::new(config)?;

    match cli.command {
        Some(Commands::Health) => {
            println!("Checking health of metrics relay at {}...", cli.relay_url);
            if metrics.prober().is_healthy().await {
                println!("Relay is healthy");
            } else {
                bail!("relay at {} is not healthy", cli.relay_url);
            }
        }
        Some(Commands::Products { limit }) => {
            let catalog = Catalog::new(&cli.store_url, timeout)?;
            let result = catalog.products(&metrics).await;
            report(&metrics).await;

            let mut products = result?;
            if let Some(limit) = limit {
                products.truncate(limit);
            }
            print!("{}", format_product_table(&products));
        }
        Some(Commands::Product { id }) => {
            let catalog = Catalog::new(&cli.store_url, timeout)?;
            let result = catalog.product(&metrics, id).await;
            report(&metrics).await;

            print!("{}", format_product_detail(&result?));
        }
        None => {
            println!("StorePulse CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
