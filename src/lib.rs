//! Fairplay - Provably Fair Result Engine
//!
//! Game outcomes are derived from `HMAC-SHA256(server_seed, "{client_seed}:{nonce}")`.
//! The server seed is committed to by its SHA-256 hash before play and
//! revealed after rotation, so any player can recompute every round.
//!
//! - [`fairness`]: hash derivation, integer/float extraction and verification
//! - [`games`]: per-game rules and the [`FairnessEngine`]
//! - [`seeds`]: seed generation, nonces, rotation and per-session storage

pub mod config;
pub mod errors;
pub mod fairness;
pub mod games;
pub mod seeds;

pub use config::{
    ConfigBuilder, ConfigLoader, EngineConfig, FairplayConfig, LoggingConfig, SeedConfig,
};
pub use errors::{ConfigurationError, FairError, FairResult, SeedError, ValidationError};
pub use fairness::{
    derive_hash, hash_server_seed, hash_to_float, hash_to_integer, verify_commitment,
    verify_result, DrawStream, RoundHash, RoundSeeds,
};
pub use games::{
    FairnessEngine, GameOutcome, GameParams, GameResult, GameType, RoundResult,
    SimulationReport, Simulator,
};
pub use seeds::{RevealedSeed, SeedCommitment, SeedManager, SeedStore, SeedTuple, SessionId};
