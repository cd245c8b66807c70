//! Fairplay CLI
//!
//! Generates seed pairs, derives and verifies rounds, and runs simulations
//! against the same engine the library exposes. Results are printed as JSON.

use clap::{Parser, Subcommand};
use fairplay::{
    config::generate_sample_config,
    derive_hash,
    seeds::SeedTuple,
    verify_commitment, verify_result, ConfigLoader, FairResult, FairnessEngine, FairplayConfig,
    GameParams, RoundSeeds, Simulator, ValidationError,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Provably fair result engine
#[derive(Parser)]
#[command(name = "fairplay")]
#[command(about = "Derive, verify and simulate provably fair game rounds")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a seed pair and print it with its commitment
    Seeds {
        /// Use this client seed instead of a random one
        #[arg(long)]
        client_seed: Option<String>,
    },

    /// Print the round hash for a seed pair and nonce
    Hash {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: u64,
    },

    /// Derive one round and print the result
    Play {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: u64,
        /// Game parameters as JSON, e.g. '{"game":"dice","target":50,"is_under":true}'
        #[arg(long)]
        params: String,
    },

    /// Check a claimed round hash (and optionally the seed commitment)
    Verify {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: u64,
        /// Claimed round hash
        #[arg(long)]
        hash: String,
        /// Published SHA-256 of the server seed
        #[arg(long)]
        commitment: Option<String>,
    },

    /// Play many rounds on fresh seeds and report the observed return
    Simulate {
        /// Game parameters as JSON
        #[arg(long)]
        params: String,
        #[arg(short, long, default_value = "10000")]
        rounds: u64,
        #[arg(short, long, default_value = "1.0")]
        bet: f64,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a sample configuration file
    Init {
        #[arg(short, long, default_value = "fairplay.toml")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter_directive().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> FairResult<FairplayConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    loader.load()
}

fn run(command: Commands, config: &FairplayConfig) -> FairResult<ExitCode> {
    let engine = FairnessEngine::new(config.engine.clone())?;

    match command {
        Commands::Seeds { client_seed } => {
            let tuple = SeedTuple::generate(&config.seeds, client_seed)?;
            let seeds = tuple.round_seeds();
            print_json(&json!({
                "server_seed": seeds.server_seed,
                "commitment": tuple.commitment(),
            }))?;
        }

        Commands::Hash {
            server_seed,
            client_seed,
            nonce,
        } => {
            println!("{}", derive_hash(&server_seed, &client_seed, nonce)?);
        }

        Commands::Play {
            server_seed,
            client_seed,
            nonce,
            params,
        } => {
            let params = parse_params(&params)?;
            let round = engine.derive(&RoundSeeds::new(server_seed, client_seed, nonce), &params)?;
            print_json(&round)?;
        }

        Commands::Verify {
            server_seed,
            client_seed,
            nonce,
            hash,
            commitment,
        } => {
            let hash_ok = verify_result(&server_seed, &client_seed, nonce, &hash);
            let commitment_ok = commitment
                .as_deref()
                .map(|c| verify_commitment(&server_seed, c));

            print_json(&json!({
                "hash_verified": hash_ok,
                "commitment_verified": commitment_ok,
            }))?;

            if !hash_ok || commitment_ok == Some(false) {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Simulate { params, rounds, bet } => {
            let params = parse_params(&params)?;
            print_json(&simulate(config, &engine, &params, rounds, bet)?)?;
        }

        Commands::Config {
            command: ConfigCommands::Init { path },
        } => {
            let path = path.to_string_lossy();
            generate_sample_config(&path)?;
            info!(path = %path, "Wrote sample configuration");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Run on a fresh seed pair and include its server seed so the report can
/// be replayed.
fn simulate(
    config: &FairplayConfig,
    engine: &FairnessEngine,
    params: &GameParams,
    rounds: u64,
    bet: f64,
) -> FairResult<serde_json::Value> {
    let tuple = SeedTuple::generate(&config.seeds, None)?;
    let seeds = tuple.round_seeds();
    info!(
        game = %params.game_type(),
        rounds,
        server_seed_hash = %tuple.server_seed_hash(),
        "Starting simulation"
    );
    let report = Simulator::run(engine, &seeds, params, rounds, bet)?;
    Ok(json!({
        "server_seed": seeds.server_seed,
        "commitment": tuple.commitment(),
        "report": report,
    }))
}

fn parse_params(raw: &str) -> FairResult<GameParams> {
    serde_json::from_str(raw).map_err(|e| ValidationError::InvalidParams(e.to_string()).into())
}

fn print_json<T: Serialize>(value: &T) -> FairResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairplay::games::CoinChoice;

    #[test]
    fn test_simulation_output_is_replayable() {
        let config = FairplayConfig::default();
        let engine = FairnessEngine::default();
        let params = GameParams::CoinFlip {
            choice: CoinChoice::Heads,
        };

        let output = simulate(&config, &engine, &params, 200, 1.0).unwrap();
        let server_seed = output["server_seed"].as_str().unwrap();
        let client_seed = output["commitment"]["client_seed"].as_str().unwrap();
        let commitment = output["commitment"]["server_seed_hash"].as_str().unwrap();
        assert!(verify_commitment(server_seed, commitment));

        let seeds = RoundSeeds::new(server_seed, client_seed, 0);
        let replay = Simulator::run(&engine, &seeds, &params, 200, 1.0).unwrap();
        assert_eq!(output["report"], serde_json::to_value(&replay).unwrap());
    }

    #[test]
    fn test_bad_params_are_validation_errors() {
        assert!(parse_params("{\"game\":\"dice\"}").unwrap_err().is_validation());
    }
}
