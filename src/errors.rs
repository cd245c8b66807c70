//! Error types for the fairplay engine
//!
//! Caller-side validation failures are kept apart from seed lifecycle,
//! configuration and internal errors so integrations can tell a bad request
//! from a fault in the engine.

use crate::games::types::GameType;
use thiserror::Error;

/// Root error type for all fairplay operations
#[derive(Debug, Error)]
pub enum FairError {
    /// Invalid input supplied by the caller
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Seed lifecycle errors
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Should not occur for well-formed inputs
    #[error("Internal fairness error: {0}")]
    Internal(String),
}

impl FairError {
    /// True when the caller sent something the engine refuses to play.
    pub fn is_validation(&self) -> bool {
        matches!(self, FairError::Validation(_))
    }
}

/// Rejected seeds, game parameters or bet amounts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("server seed must not be empty")]
    EmptyServerSeed,

    #[error("client seed must not be empty")]
    EmptyClientSeed,

    #[error("client seed is {len} characters long (max {max})")]
    ClientSeedTooLong { len: usize, max: usize },

    #[error("{field} for {game} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        game: GameType,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} for {game} must be one of {allowed:?}, got {value}")]
    NotAllowed {
        game: GameType,
        field: &'static str,
        value: u32,
        allowed: &'static [u32],
    },

    #[error("tile {tile} picked more than once")]
    DuplicatePick { tile: u8 },

    #[error("invalid roulette bet: {0}")]
    InvalidRouletteBet(String),

    #[error("bet amount must be a finite non-negative number, got {0}")]
    InvalidBetAmount(f64),

    #[error("invalid game parameters: {0}")]
    InvalidParams(String),

    #[error("unknown game type: {0}")]
    UnknownGameType(String),

    #[error("modulus must be non-zero")]
    ZeroModulus,

    #[error("invalid hash: {0}")]
    InvalidHash(String),
}

/// Seed lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("no active seed pair")]
    NoActiveSeeds,

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("nonce exhausted for seed pair {server_seed_hash}")]
    NonceExhausted { server_seed_hash: String },

    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error("session state poisoned: {0}")]
    Poisoned(String),
}

/// Configuration and validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

impl From<std::io::Error> for FairError {
    fn from(e: std::io::Error) -> Self {
        FairError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

impl From<serde_json::Error> for FairError {
    fn from(e: serde_json::Error) -> Self {
        FairError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

impl From<toml::de::Error> for FairError {
    fn from(e: toml::de::Error) -> Self {
        FairError::Configuration(ConfigurationError::LoadFailed(format!(
            "Failed to parse TOML: {}",
            e
        )))
    }
}

// Convenience type alias for Results
pub type FairResult<T> = Result<T, FairError>;
