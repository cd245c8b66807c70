use crate::config::SeedConfig;
use crate::errors::{FairResult, SeedError, ValidationError};
use crate::fairness::{hash_server_seed, RoundSeeds};
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex string of `len` bytes from the operating system RNG.
pub fn random_seed(len: usize) -> FairResult<String> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SeedError::Entropy(e.to_string()))?;
    Ok(hex::encode(bytes))
}

pub fn validate_client_seed(client_seed: &str, max_len: usize) -> Result<(), ValidationError> {
    if client_seed.is_empty() {
        return Err(ValidationError::EmptyClientSeed);
    }
    let len = client_seed.chars().count();
    if len > max_len {
        return Err(ValidationError::ClientSeedTooLong { len, max: max_len });
    }
    Ok(())
}

/// Active seed pair for one play context.
///
/// The server seed stays private until [`SeedTuple::reveal`] consumes the
/// tuple; `Debug` output redacts it and the type is not serializable.
#[derive(Clone)]
pub struct SeedTuple {
    server_seed: String,
    server_seed_hash: String,
    client_seed: String,
    nonce: u64,
    created_at: DateTime<Utc>,
}

impl SeedTuple {
    /// Fresh tuple at nonce 0. A random client seed is generated unless one is given.
    pub fn generate(config: &SeedConfig, client_seed: Option<String>) -> FairResult<Self> {
        let client_seed = match client_seed {
            Some(seed) => {
                validate_client_seed(&seed, config.max_client_seed_len)?;
                seed
            }
            None => random_seed(config.client_seed_bytes)?,
        };
        Ok(Self::from_parts(random_seed(config.server_seed_bytes)?, client_seed, 0))
    }

    /// Rebuild a tuple from known material, e.g. when replaying a session.
    pub fn from_parts(server_seed: String, client_seed: String, nonce: u64) -> Self {
        Self {
            server_seed_hash: hash_server_seed(&server_seed),
            server_seed,
            client_seed,
            nonce,
            created_at: Utc::now(),
        }
    }

    pub fn server_seed_hash(&self) -> &str {
        &self.server_seed_hash
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Seeds for the round at the current nonce.
    pub fn round_seeds(&self) -> RoundSeeds {
        RoundSeeds::new(self.server_seed.clone(), self.client_seed.clone(), self.nonce)
    }

    pub fn commitment(&self) -> SeedCommitment {
        SeedCommitment {
            server_seed_hash: self.server_seed_hash.clone(),
            client_seed: self.client_seed.clone(),
            nonce: self.nonce,
            created_at: self.created_at,
        }
    }

    pub(crate) fn advance(&mut self) -> Result<(), SeedError> {
        self.nonce = self.nonce.checked_add(1).ok_or_else(|| SeedError::NonceExhausted {
            server_seed_hash: self.server_seed_hash.clone(),
        })?;
        Ok(())
    }

    pub(crate) fn set_client_seed(&mut self, client_seed: String) {
        self.client_seed = client_seed;
    }

    /// Retire the tuple and disclose its server seed.
    pub fn reveal(self) -> RevealedSeed {
        RevealedSeed {
            server_seed: self.server_seed,
            server_seed_hash: self.server_seed_hash,
            client_seed: self.client_seed,
            final_nonce: self.nonce,
            created_at: self.created_at,
            revealed_at: Utc::now(),
        }
    }
}

impl fmt::Debug for SeedTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedTuple")
            .field("server_seed", &"<secret>")
            .field("server_seed_hash", &self.server_seed_hash)
            .field("client_seed", &self.client_seed)
            .field("nonce", &self.nonce)
            .finish()
    }
}

/// Public view of an active tuple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCommitment {
    pub server_seed_hash: String,
    pub client_seed: String,
    /// Nonce the next round will use
    pub nonce: u64,
    pub created_at: DateTime<Utc>,
}

/// Retired tuple with its server seed disclosed for verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedSeed {
    pub server_seed: String,
    pub server_seed_hash: String,
    pub client_seed: String,
    /// Rounds played on this tuple; nonces `0..final_nonce` were used
    pub final_nonce: u64,
    pub created_at: DateTime<Utc>,
    pub revealed_at: DateTime<Utc>,
}

impl RevealedSeed {
    pub fn matches_commitment(&self) -> bool {
        crate::fairness::verify_commitment(&self.server_seed, &self.server_seed_hash)
    }
}
