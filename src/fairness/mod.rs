//! Provably fair hash primitives
//!
//! Every game outcome starts from one value:
//! `HMAC-SHA256(key = server_seed, message = "{client_seed}:{nonce}")`.
//! The same functions back round generation and player-side verification,
//! so the two can never drift apart.

pub mod draws;

pub use draws::DrawStream;

use crate::errors::{FairError, FairResult, ValidationError};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

pub type HmacSha256 = Hmac<Sha256>;

/// Length of a round hash rendered as hex
pub const HASH_HEX_LEN: usize = 64;

pub(crate) const TWO_POW_32: f64 = 4_294_967_296.0;

/// Seed material for exactly one round
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSeeds {
    pub server_seed: String,
    pub client_seed: String,
    pub nonce: u64,
}

impl RoundSeeds {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    /// Same seeds, different round.
    pub fn with_nonce(&self, nonce: u64) -> Self {
        Self {
            server_seed: self.server_seed.clone(),
            client_seed: self.client_seed.clone(),
            nonce,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_seeds(&self.server_seed, &self.client_seed)
    }

    pub fn round_hash(&self) -> FairResult<RoundHash> {
        derive_round_hash(&self.server_seed, &self.client_seed, self.nonce)
    }
}

impl fmt::Debug for RoundSeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundSeeds")
            .field("server_seed", &"<secret>")
            .field("client_seed", &self.client_seed)
            .field("nonce", &self.nonce)
            .finish()
    }
}

/// 256-bit round hash
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundHash([u8; 32]);

impl RoundHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a 64 character hex digest (either case).
    pub fn from_hex(hex_str: &str) -> FairResult<Self> {
        let bytes = hex::decode(hex_str).map_err(|e| ValidationError::InvalidHash(e.to_string()))?;
        let array: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            ValidationError::InvalidHash(format!("expected 32 bytes, got {}", b.len()))
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First four bytes as a big-endian integer.
    pub fn leading_u32(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Big-endian `u32` at word `index` (0..8).
    pub fn word(&self, index: usize) -> Option<u32> {
        let start = index.checked_mul(4)?;
        let end = start.checked_add(4)?;
        let bytes: [u8; 4] = self.0.get(start..end)?.try_into().ok()?;
        Some(u32::from_be_bytes(bytes))
    }
}

impl fmt::Display for RoundHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for RoundHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoundHash({})", self.to_hex())
    }
}

/// Reject empty seed material before anything is hashed.
pub fn validate_seeds(server_seed: &str, client_seed: &str) -> Result<(), ValidationError> {
    if server_seed.is_empty() {
        return Err(ValidationError::EmptyServerSeed);
    }
    if client_seed.is_empty() {
        return Err(ValidationError::EmptyClientSeed);
    }
    Ok(())
}

pub(crate) fn hmac_digest(key: &str, message: &str) -> FairResult<RoundHash> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| FairError::Internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(RoundHash(mac.finalize().into_bytes().into()))
}

/// `"{client_seed}:{nonce}"`; the separator and field order are part of the
/// verification contract.
pub fn round_message(client_seed: &str, nonce: u64) -> String {
    format!("{}:{}", client_seed, nonce)
}

pub fn derive_round_hash(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
) -> FairResult<RoundHash> {
    validate_seeds(server_seed, client_seed)?;
    hmac_digest(server_seed, &round_message(client_seed, nonce))
}

/// Round hash as 64 lowercase hex characters.
pub fn derive_hash(server_seed: &str, client_seed: &str, nonce: u64) -> FairResult<String> {
    Ok(derive_round_hash(server_seed, client_seed, nonce)?.to_hex())
}

/// Commitment published before play: SHA-256 of the server seed string.
pub fn hash_server_seed(server_seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(server_seed.as_bytes());
    hex::encode(hasher.finalize())
}

/// First 4 bytes of the hash modulo `modulus`.
///
/// Non power-of-two moduli carry a small modulo bias. It is kept so that
/// historical rounds stay verifiable bit for bit.
pub fn hash_to_integer(hash: &RoundHash, modulus: u32) -> FairResult<u32> {
    if modulus == 0 {
        return Err(ValidationError::ZeroModulus.into());
    }
    Ok(hash.leading_u32() % modulus)
}

/// `hash_to_integer` for auditors holding only the hex digest.
pub fn hash_hex_to_integer(hash_hex: &str, modulus: u32) -> FairResult<u32> {
    if modulus == 0 {
        return Err(ValidationError::ZeroModulus.into());
    }
    let prefix = hash_hex
        .get(..8)
        .filter(|p| p.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| {
            ValidationError::InvalidHash(format!(
                "need 8 leading hex characters, got {:?}",
                hash_hex
            ))
        })?;
    let value = u32::from_str_radix(prefix, 16)
        .map_err(|e| ValidationError::InvalidHash(format!("{}: {}", prefix, e)))?;
    Ok(value % modulus)
}

/// First 4 bytes of the hash scaled into [0, 1).
pub fn hash_to_float(hash: &RoundHash) -> f64 {
    hash.leading_u32() as f64 / TWO_POW_32
}

/// Recompute the round hash and compare it with a claimed one.
///
/// Mismatches, malformed claims and empty seeds all come back `false`.
pub fn verify_result(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    expected_hash: &str,
) -> bool {
    let Ok(expected) = RoundHash::from_hex(expected_hash) else {
        return false;
    };
    match derive_round_hash(server_seed, client_seed, nonce) {
        Ok(actual) => actual == expected,
        Err(_) => false,
    }
}

/// Check a revealed server seed against its published commitment.
pub fn verify_commitment(server_seed: &str, server_seed_hash: &str) -> bool {
    !server_seed.is_empty() && hash_server_seed(server_seed).eq_ignore_ascii_case(server_seed_hash)
}
