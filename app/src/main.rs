// In app/src/main.rs

use anyhow::Result;
use api_client::{ApiClient, KlineSource};
use clap::{Parser, Subcommand};
use core_types::Symbol;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use web_server::AppState;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A market analysis signal server.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the HTTP server that powers the analysis page.
    Serve,

    /// Fetches candles and prints a one-shot signal for a symbol.
    Analyze {
        /// The trading symbol to analyze (e.g., "BTCUSDT").
        #[arg(short, long)]
        symbol: String,

        /// The kline interval (e.g., "1m", "5m", "1h").
        #[arg(short, long, default_value = "1m")]
        interval: String,

        /// Number of most-recent candles to fetch.
        #[arg(short, long, default_value_t = 200)]
        lookback: u16,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let settings = app_config::load_settings()?;

    // --- Tracing Setup ---
    let level: tracing::Level = settings.app.log_level.parse().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    // Parse command-line arguments.
    let cli = Cli::parse();

    tracing::info!(environment = %settings.app.environment, "Starting Vantage");

    // Match on the parsed command and call the appropriate handler.
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let client = ApiClient::new(&settings.binance);
            let state = AppState { source: Arc::new(client) };
            web_server::run(settings.server, state).await?;
        }
        Commands::Analyze { symbol, interval, lookback } => {
            let client = ApiClient::new(&settings.binance);
            let symbol = Symbol(symbol);
            let series = client.fetch_series(&symbol, &interval, lookback).await?;
            let signal = analysis::analyze(&series)?;
            println!("{}: {}", symbol, signal.prediction());
        }
    }

    Ok(())
}
