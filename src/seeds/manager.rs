use crate::config::SeedConfig;
use crate::errors::{FairResult, SeedError};
use crate::fairness::RoundSeeds;
use crate::seeds::tuple::{
    random_seed, validate_client_seed, RevealedSeed, SeedCommitment, SeedTuple,
};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Seed lifecycle for one play context: at most one active tuple plus a
/// bounded history of revealed ones.
///
/// Not synchronized on its own. Shared use goes through
/// [`SeedStore`](crate::seeds::SeedStore), which serializes every call per
/// session.
#[derive(Debug)]
pub struct SeedManager {
    config: SeedConfig,
    current: Option<SeedTuple>,
    revealed: VecDeque<RevealedSeed>,
}

impl SeedManager {
    pub fn new(config: SeedConfig) -> Self {
        Self {
            config,
            current: None,
            revealed: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Activate a fresh tuple with a random client seed. Any active tuple is
    /// revealed into history first.
    pub fn generate_new_seeds(&mut self) -> FairResult<&SeedTuple> {
        let tuple = SeedTuple::generate(&self.config, None)?;
        Ok(self.activate(tuple))
    }

    /// Same as [`generate_new_seeds`](Self::generate_new_seeds) with a
    /// player-chosen client seed.
    pub fn generate_new_seeds_with_client_seed(
        &mut self,
        client_seed: impl Into<String>,
    ) -> FairResult<&SeedTuple> {
        let tuple = SeedTuple::generate(&self.config, Some(client_seed.into()))?;
        Ok(self.activate(tuple))
    }

    fn activate(&mut self, tuple: SeedTuple) -> &SeedTuple {
        self.retire();
        info!(server_seed_hash = %tuple.server_seed_hash(), "Generated new seed pair");
        self.current.insert(tuple)
    }

    pub fn get_current_seeds(&self) -> Option<&SeedTuple> {
        self.current.as_ref()
    }

    pub fn commitment(&self) -> Option<SeedCommitment> {
        self.current.as_ref().map(SeedTuple::commitment)
    }

    /// Advance the active nonce by one.
    pub fn increment_nonce(&mut self) -> FairResult<()> {
        let tuple = self.current.as_mut().ok_or(SeedError::NoActiveSeeds)?;
        tuple.advance()?;
        Ok(())
    }

    /// Replace the client seed for rounds that have not been played yet.
    pub fn update_client_seed(&mut self, client_seed: impl Into<String>) -> FairResult<()> {
        let client_seed = client_seed.into();
        validate_client_seed(&client_seed, self.config.max_client_seed_len)?;

        let tuple = self.current.as_mut().ok_or(SeedError::NoActiveSeeds)?;
        tuple.set_client_seed(client_seed);
        debug!(server_seed_hash = %tuple.server_seed_hash(), "Client seed updated");
        Ok(())
    }

    /// True once the active tuple has served its round budget.
    pub fn should_rotate_seeds(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|tuple| tuple.nonce() >= self.config.rotation_round_budget)
    }

    /// Reveal the active tuple and replace it with a fresh server seed that
    /// keeps the current client seed.
    pub fn rotate_seeds(&mut self) -> FairResult<RevealedSeed> {
        let client_seed = self
            .current
            .as_ref()
            .map(|tuple| tuple.client_seed().to_string())
            .ok_or(SeedError::NoActiveSeeds)?;
        let server_seed = random_seed(self.config.server_seed_bytes)?;
        let replacement = SeedTuple::from_parts(server_seed, client_seed, 0);

        let revealed = self.retire().ok_or(SeedError::NoActiveSeeds)?;
        info!(
            retired = %revealed.server_seed_hash,
            rounds = revealed.final_nonce,
            next = %replacement.server_seed_hash(),
            "Rotated seed pair"
        );
        self.current = Some(replacement);
        Ok(revealed)
    }

    /// Deactivate the current tuple, if any, and reveal it.
    ///
    /// Reveals pushed out of the bounded history are logged with their
    /// server seed, since nothing else holds them afterwards.
    pub fn retire(&mut self) -> Option<RevealedSeed> {
        let revealed = self.current.take()?.reveal();
        self.revealed.push_back(revealed.clone());
        while self.revealed.len() > self.config.revealed_history_limit {
            if let Some(evicted) = self.revealed.pop_front() {
                info!(
                    server_seed = %evicted.server_seed,
                    server_seed_hash = %evicted.server_seed_hash,
                    client_seed = %evicted.client_seed,
                    rounds = evicted.final_nonce,
                    "Evicted revealed seed pair from history"
                );
            }
        }
        Some(revealed)
    }

    /// Snapshot the seeds for the next round and consume its nonce.
    ///
    /// Generates a tuple when none is active and rotates an exhausted one
    /// first, so the returned nonce is always within the round budget. When
    /// that rotation happens the retired tuple's reveal is returned too.
    pub fn reserve_round(&mut self) -> FairResult<(RoundSeeds, Option<RevealedSeed>)> {
        let mut rotated = None;
        if self.current.is_none() {
            self.generate_new_seeds()?;
        } else if self.should_rotate_seeds() {
            rotated = Some(self.rotate_seeds()?);
        }

        let tuple = self.current.as_mut().ok_or(SeedError::NoActiveSeeds)?;
        let seeds = tuple.round_seeds();
        tuple.advance()?;
        Ok((seeds, rotated))
    }

    /// Revealed tuples, oldest first
    pub fn revealed_seeds(&self) -> impl Iterator<Item = &RevealedSeed> {
        self.revealed.iter()
    }

    pub fn find_revealed(&self, server_seed_hash: &str) -> Option<&RevealedSeed> {
        self.revealed
            .iter()
            .find(|seed| seed.server_seed_hash.eq_ignore_ascii_case(server_seed_hash))
    }
}

impl Default for SeedManager {
    fn default() -> Self {
        Self::new(SeedConfig::default())
    }
}
