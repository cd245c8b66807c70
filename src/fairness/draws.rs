//! Successive draws from one round's seed material
//!
//! Block 0 is the round hash itself, so the first draw equals what
//! `hash_to_integer` reads. Block `k >= 1` is
//! `HMAC-SHA256(server_seed, "{client_seed}:{nonce}:{k}")`. Each block yields
//! eight big-endian `u32` words.

use super::{hmac_digest, round_message, RoundHash, RoundSeeds, TWO_POW_32};
use crate::errors::{FairError, FairResult};

const WORDS_PER_BLOCK: usize = 8;

pub struct DrawStream<'a> {
    seeds: &'a RoundSeeds,
    round_hash: RoundHash,
    block: RoundHash,
    block_index: u64,
    word: usize,
}

impl<'a> DrawStream<'a> {
    /// `round_hash` must be the hash derived from `seeds`.
    pub fn new(seeds: &'a RoundSeeds, round_hash: RoundHash) -> Self {
        Self {
            seeds,
            round_hash,
            block: round_hash,
            block_index: 0,
            word: 0,
        }
    }

    pub fn from_seeds(seeds: &'a RoundSeeds) -> FairResult<Self> {
        let round_hash = seeds.round_hash()?;
        Ok(Self::new(seeds, round_hash))
    }

    pub fn round_hash(&self) -> &RoundHash {
        &self.round_hash
    }

    pub fn next_u32(&mut self) -> FairResult<u32> {
        if self.word == WORDS_PER_BLOCK {
            self.block_index += 1;
            let message = format!(
                "{}:{}",
                round_message(&self.seeds.client_seed, self.seeds.nonce),
                self.block_index
            );
            self.block = hmac_digest(&self.seeds.server_seed, &message)?;
            self.word = 0;
        }

        let value = self
            .block
            .word(self.word)
            .ok_or_else(|| FairError::Internal(format!("draw word {} out of range", self.word)))?;
        self.word += 1;
        Ok(value)
    }

    /// Next draw scaled into [0, 1).
    pub fn next_float(&mut self) -> FairResult<f64> {
        Ok(self.next_u32()? as f64 / TWO_POW_32)
    }

    /// `floor(next_float() * bound)`, computed in integers.
    pub fn next_index(&mut self, bound: usize) -> FairResult<usize> {
        let draw = self.next_u32()? as u64;
        Ok(((draw * bound as u64) >> 32) as usize)
    }
}
