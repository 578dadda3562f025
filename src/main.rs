// Command-line front end for the airport engine.
//
// Configuration comes from FLIGHT_* environment variables, optionally layered
// over a TOML file passed with --config.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flight_compensation::{AirportConfig, AirportEngine};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flight-compensation")]
#[command(about = "Airport directory and flight compensation lookups", long_about = None)]
struct Args {
    /// TOML configuration file (environment variables still take precedence)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List airports from the directory, optionally filtered
    Airports {
        /// Code prefix or name/city fragment
        query: Option<String>,

        /// Maximum number of airports to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Quote compensation for a flight between two IATA codes
    Quote {
        origin: String,
        destination: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AirportConfig::load_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AirportConfig::from_env().context("Invalid FLIGHT_* environment")?,
    };

    let engine = AirportEngine::from_config(config).context("Failed to build airport engine")?;
    let result = run(&engine, args.command).await;

    // Always drain the reload worker, regardless of the command result
    let outcome = engine.shutdown().await;
    info!("Shutdown: {outcome:?}");

    result
}

async fn run(engine: &AirportEngine, command: Command) -> Result<()> {
    match command {
        Command::Airports { query, limit } => {
            let directory = engine
                .airports()
                .await
                .context("Airport directory unavailable")?;

            let matches: Vec<_> = match query.as_deref() {
                Some(q) => directory.search(q, limit),
                None => directory.iter().take(limit).collect(),
            };
            for airport in &matches {
                println!(
                    "{}  {} ({}, {})",
                    airport.code, airport.name, airport.city, airport.country
                );
            }
            println!("{} of {} airports", matches.len(), directory.len());
        }
        Command::Quote {
            origin,
            destination,
        } => {
            let quote = engine
                .quote(&origin, &destination)
                .await
                .with_context(|| format!("Failed to quote {origin} -> {destination}"))?;
            println!(
                "{} -> {}: {:.1} km, tier {}, compensation {}",
                quote.origin,
                quote.destination,
                quote.distance_km,
                quote.tier.as_str(),
                quote.amount
            );
        }
    }
    Ok(())
}
