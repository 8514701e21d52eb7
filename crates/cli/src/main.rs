//! Command Line Interface for the PioSwap ledger.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pioswap_api::{ApiServer, AppState, ServerConfig};
use pioswap_data::{Database, LedgerStore, MemoryStore};
use pioswap_domain::value_objects::Address;
use pioswap_ledger::{Ledger, LedgerConfig};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod seed;

#[derive(Parser)]
#[command(name = "pioswap")]
#[command(about = "PioSwap pool, position and swap ledger", long_about = None)]
struct Cli {
    /// PostgreSQL connection string; an in-memory store is used when unset
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Largest page size accepted by list endpoints
    #[arg(long, env = "PIOSWAP_MAX_PAGE_SIZE", default_value_t = 1000, global = true)]
    max_page_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "PIOSWAP_HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "PIOSWAP_PORT", default_value_t = 8001)]
        port: u16,

        /// Register the initial tokens and pools before serving
        #[arg(long)]
        seed: bool,
    },
    /// Apply the database schema
    Migrate,
    /// Register the initial tokens and pools
    Seed,
    /// Quote a swap
    Quote {
        /// Input token address
        #[arg(long)]
        token_in: String,

        /// Output token address
        #[arg(long)]
        token_out: String,

        /// Amount of the input token
        #[arg(short, long)]
        amount: Decimal,
    },
    /// Show protocol statistics
    Stats {
        /// Recompute before printing
        #[arg(long)]
        refresh: bool,
    },
}

/// Builds the ledger over the store selected by `DATABASE_URL`. The flag
/// tells whether that store outlives the process.
async fn open_ledger(database_url: Option<&str>, config: LedgerConfig) -> Result<(Ledger, bool)> {
    let store: Arc<dyn LedgerStore> = match database_url {
        Some(url) => {
            let database = Database::connect(url)
                .await
                .context("failed to connect to the database")?;
            database
                .migrate()
                .await
                .context("failed to apply the database schema")?;
            Arc::new(database)
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store");
            Arc::new(MemoryStore::new())
        }
    };
    Ok((Ledger::new(store, config), database_url.is_some()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = LedgerConfig {
        max_page_size: cli.max_page_size.max(1),
        ..LedgerConfig::default()
    };

    match cli.command {
        Commands::Migrate => {
            let url = cli
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for migrate")?;
            let database = Database::connect(url).await?;
            database.migrate().await?;
            println!("✅ Schema applied");
        }
        Commands::Serve { host, port, seed } => {
            let (ledger, _) = open_ledger(cli.database_url.as_deref(), config).await?;
            if seed {
                seed::seed(&ledger).await?;
            }
            let server = ApiServer::new(ServerConfig { host, port }, AppState::new(ledger));
            server.run().await?;
        }
        Commands::Seed => {
            let (ledger, _) = open_ledger(cli.database_url.as_deref(), config).await?;
            let report = seed::seed(&ledger).await?;
            println!(
                "🌱 Seeded {} tokens and {} pools",
                report.tokens, report.pools
            );
        }
        Commands::Quote {
            token_in,
            token_out,
            amount,
        } => {
            let (ledger, persistent) = open_ledger(cli.database_url.as_deref(), config).await?;
            if !persistent {
                seed::seed(&ledger).await?;
            }
            let token_in = Address::parse(&token_in)?;
            let token_out = Address::parse(&token_out)?;
            let quote = ledger.swaps().quote(&token_in, &token_out, amount).await?;

            println!("\n💱 Swap Quote");
            println!("════════════════════════════════════");
            println!("Amount In:        {}", quote.amount_in);
            println!("Exchange Rate:    {}", quote.exchange_rate);
            println!("Fee:              {} ({}%)", quote.fee, quote.fee_tier);
            println!("Amount Out:       {}", quote.amount_out);
            println!("Minimum Received: {}", quote.minimum_received);
            println!("Price Impact:     {}%", quote.price_impact);
            match quote.route.first() {
                Some(pool) => println!("Route:            pool {pool}"),
                None => println!("Route:            no pool (default fee)"),
            }
            println!("════════════════════════════════════");
        }
        Commands::Stats { refresh } => {
            let (ledger, persistent) = open_ledger(cli.database_url.as_deref(), config).await?;
            if !persistent {
                seed::seed(&ledger).await?;
            }
            let stats = if refresh {
                ledger.stats().refresh().await?
            } else {
                ledger.stats().get_stats().await?
            };

            println!("\n📊 Protocol Stats");
            println!("════════════════════════════════════");
            println!("TVL:              ${:.2}", stats.tvl);
            println!("Total Volume:     ${:.2}", stats.total_volume);
            println!("Volume (24h):     ${:.2}", stats.volume_24h);
            println!("Transactions:     {}", stats.transactions_24h);
            println!("Swappers:         {}", stats.total_swappers);
            println!("Active Pools:     {}", stats.active_pools);
            println!("════════════════════════════════════");
        }
    }

    info!("Done");
    Ok(())
}
