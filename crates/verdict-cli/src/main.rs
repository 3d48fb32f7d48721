use analysis_core::{HeadlineProvider, WeightConfig};
use analysis_orchestrator::{
    compare_instruments, EngineOptions, InstrumentSnapshot, MarketScanner, UniverseCategory,
    VerdictEngine,
};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use position_planner::{DividendProjection, PositionPlanner};
use serde::Serialize;

mod config;
mod provider;

use config::CliConfig;
use provider::JsonFileProvider;

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  verdict-cli score SYMBOL                 Score one instrument");
    eprintln!("  verdict-cli compare SYMBOL SYMBOL        Score two instruments side by side");
    eprintln!("  verdict-cli scan [--symbols A B ...]     Scan snapshots");
    eprintln!("                                           (default: built-in universes)");
    eprintln!("  verdict-cli plan SYMBOL [--invest N] [--stop PCT] [--target PCT]");
    eprintln!("                                           Position and dividend plan");
    eprintln!("  verdict-cli headlines SYMBOL             List the stored headlines");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data DIR     Snapshot directory (overrides DATA_DIR)");
    eprintln!("  --min-score N  Scanner threshold (overrides SCAN_MIN_SCORE)");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> Result<T> {
    match flag_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid value for {}: {}", flag, raw)),
        None => Ok(default),
    }
}

/// Positional arguments after the command, stopping at the first flag
fn positionals(args: &[String]) -> Vec<String> {
    args.iter()
        .skip(2)
        .take_while(|a| !a.starts_with("--"))
        .cloned()
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn load(provider: &JsonFileProvider, symbol: &str) -> Result<InstrumentSnapshot> {
    provider
        .snapshot(symbol)
        .await
        .with_context(|| format!("Failed to load snapshot for {}", symbol))
}

#[derive(Serialize)]
struct PlanOutput {
    symbol: String,
    price: f64,
    position: position_planner::PositionPlan,
    dividend: DividendProjection,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1).map(|s| s.as_str()) else {
        print_usage();
        bail!("missing command");
    };

    let config = CliConfig::from_env()?;
    let weights: WeightConfig = config.load_weights().await?;
    let engine = VerdictEngine::with_options(EngineOptions {
        headline_limit: config.headline_limit,
        ..EngineOptions::default()
    })?;
    let data_dir = flag_value(&args, "--data").unwrap_or(&config.data_dir);
    let provider = JsonFileProvider::new(data_dir);

    tracing::info!(
        data_dir,
        budget = weights.budget_total(),
        headline_limit = config.headline_limit,
        "verdict-cli {}",
        command
    );

    match command {
        "score" => {
            let symbols = positionals(&args);
            let Some(symbol) = symbols.first() else {
                print_usage();
                bail!("score needs a symbol");
            };
            let snap = load(&provider, symbol).await?;
            let result = engine.score_instrument(
                &snap.prices,
                &snap.fundamentals,
                &snap.headlines,
                &weights,
            )?;
            print_json(&result)?;
        }
        "compare" => {
            let symbols = positionals(&args);
            if symbols.len() != 2 {
                print_usage();
                bail!("compare needs exactly two symbols");
            }
            let left = load(&provider, &symbols[0]).await?;
            let right = load(&provider, &symbols[1]).await?;
            let comparison = compare_instruments(&engine, &left, &right, &weights, Utc::now())?;
            print_json(&comparison)?;
        }
        "scan" => {
            let min_score = parse_flag(&args, "--min-score", config.scan_min_score)?;
            let symbols: Vec<String> = match args.iter().position(|a| a == "--symbols") {
                Some(idx) => args[idx + 1..]
                    .iter()
                    .take_while(|a| !a.starts_with("--"))
                    .cloned()
                    .collect(),
                None => UniverseCategory::all_symbols(),
            };

            let mut snapshots = Vec::with_capacity(symbols.len());
            for symbol in &symbols {
                match provider.snapshot(symbol).await {
                    Ok(snap) => snapshots.push(snap),
                    Err(e) => tracing::warn!("Skipping {}: {}", symbol, e),
                }
            }

            let report = MarketScanner::new(&engine)
                .with_min_score(min_score)
                .scan(&snapshots, &weights)?;
            print_json(&report)?;
        }
        "plan" => {
            let symbols = positionals(&args);
            let Some(symbol) = symbols.first() else {
                print_usage();
                bail!("plan needs a symbol");
            };
            let snap = load(&provider, symbol).await?;
            let Some(price) = snap.prices.last().map(|b| b.close) else {
                bail!("{} has no price history", symbol);
            };

            let invest = parse_flag(&args, "--invest", 2500.0)?;
            let stop = parse_flag(&args, "--stop", 5.0)?;
            let target = parse_flag(&args, "--target", 15.0)?;
            let planner = PositionPlanner::new(stop, target)?;
            let position = planner.plan(invest, price)?;
            let dividend = DividendProjection::project(
                snap.fundamentals.dividend_rate,
                snap.fundamentals.dividend_yield,
                price,
                position.shares,
            );

            print_json(&PlanOutput {
                symbol: snap.symbol,
                price,
                position,
                dividend,
            })?;
        }
        "headlines" => {
            let symbols = positionals(&args);
            let Some(symbol) = symbols.first() else {
                print_usage();
                bail!("headlines needs a symbol");
            };
            let headlines = provider.get_headlines(symbol).await?;
            print_json(&headlines)?;
        }
        other => {
            print_usage();
            bail!("unknown command: {}", other);
        }
    }

    Ok(())
}
