//! Fund Ratios CLI
//!
//! Usage:
//!   fund-ratios details <codes...> [--wait-secs N]
//!   fund-ratios indices [--force]
//!   fund-ratios funds [--popular | --top]
//!
//! Configuration comes from `FUND_RATIOS_*` and `RAPIDAPI_KEY` environment
//! variables. Results are printed to stdout as JSON, logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::SchemeCode;
use fund_ratios::{FundDetailsService, FundDetailsServiceImpl, FundRatiosConfig};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SERVICE_NAME: &str = "fund-ratios";
const DEFAULT_WAIT_SECS: u64 = 15;

#[derive(Parser)]
#[command(name = "fund-ratios")]
#[command(about = "Mutual fund details with placeholder and computed ratios")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print fund details, first with placeholder ratios, then computed ones
    Details {
        /// Scheme codes (e.g., 120465)
        #[arg(required = true)]
        codes: Vec<SchemeCode>,
        /// Seconds to wait for computed ratios; 0 prints placeholders only
        #[arg(long, default_value_t = DEFAULT_WAIT_SECS)]
        wait_secs: u64,
    },
    /// Print market index quotes
    Indices {
        /// Ignore the cached quotes
        #[arg(long)]
        force: bool,
    },
    /// Print the fund list
    Funds {
        /// Only the popular funds
        #[arg(long, conflicts_with = "top")]
        popular: bool,
        /// Only the top performing funds
        #[arg(long)]
        top: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = FundRatiosConfig::from_env().context("loading configuration")?;
    info!(
        "Starting {} v{} (benchmark {})",
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        config.benchmark_symbol
    );
    let service = FundDetailsServiceImpl::from_config(config)?;

    match cli.command {
        Commands::Details { codes, wait_secs } => show_details(&service, &codes, wait_secs).await?,
        Commands::Indices { force } => {
            let mut quotes = service.market_indices(force).await;
            if quotes.is_empty() {
                warn!("no live index quotes, showing fallback values");
                quotes = service.market().cached_or_default();
            }
            print_json(&quotes)?;
        }
        Commands::Funds { popular, top } => {
            let funds = if popular {
                service.popular_funds().await?
            } else if top {
                service.top_performing_funds().await?
            } else {
                service.all_funds().await?.as_ref().clone()
            };
            print_json(&funds)?;
        }
    }

    Ok(())
}

async fn show_details(
    service: &FundDetailsServiceImpl,
    codes: &[SchemeCode],
    wait_secs: u64,
) -> Result<()> {
    for &code in codes {
        let details = service
            .get_mutual_fund_details(code)
            .await
            .with_context(|| format!("fetching details for scheme {code}"))?;
        print_json(details.as_ref())?;
    }

    if wait_secs == 0 {
        return Ok(());
    }
    let within = Duration::from_secs(wait_secs);
    for &code in codes {
        match service.wait_for_confirmed(code, within).await {
            Some(details) => print_json(details.as_ref())?,
            None => warn!(scheme_code = %code, "computed ratios not available, placeholder stands"),
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", SERVICE_NAME.replace('-', "_")).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();
}
