use crate::config::SeedConfig;
use crate::errors::{FairResult, SeedError};
use crate::fairness::RoundSeeds;
use crate::games::{FairnessEngine, GameParams, RoundResult};
use crate::seeds::manager::SeedManager;
use crate::seeds::tuple::{RevealedSeed, SeedCommitment};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Seed managers keyed by session.
///
/// Each session sits behind its own mutex, so rounds on one session are
/// serialized and never share a nonce while separate sessions run in
/// parallel. Cloning the store clones the handle, not the sessions.
#[derive(Clone)]
pub struct SeedStore {
    config: SeedConfig,
    sessions: Arc<DashMap<SessionId, Arc<Mutex<SeedManager>>>>,
}

impl SeedStore {
    pub fn new(config: SeedConfig) -> Self {
        Self {
            config,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Start a session with a fresh seed pair and return its public commitment.
    pub fn open_session(
        &self,
        client_seed: Option<String>,
    ) -> FairResult<(SessionId, SeedCommitment)> {
        let mut manager = SeedManager::new(self.config.clone());
        let commitment = match client_seed {
            Some(seed) => manager.generate_new_seeds_with_client_seed(seed)?.commitment(),
            None => manager.generate_new_seeds()?.commitment(),
        };

        let id = SessionId::new();
        self.sessions.insert(id, Arc::new(Mutex::new(manager)));
        info!(
            session = %id,
            server_seed_hash = %commitment.server_seed_hash,
            "Opened session"
        );
        Ok((id, commitment))
    }

    // The map guard is dropped before the session lock is taken.
    fn session(&self, id: SessionId) -> FairResult<Arc<Mutex<SeedManager>>> {
        self.sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SeedError::SessionNotFound(id.to_string()).into())
    }

    fn with_session<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut SeedManager) -> FairResult<T>,
    ) -> FairResult<T> {
        let session = self.session(id)?;
        let mut manager = lock(&session, id)?;
        f(&mut *manager)
    }

    pub fn commitment(&self, id: SessionId) -> FairResult<SeedCommitment> {
        self.with_session(id, |manager| {
            manager.commitment().ok_or_else(|| SeedError::NoActiveSeeds.into())
        })
    }

    /// Seeds for the session's next round; the nonce is consumed.
    ///
    /// Also returns the reveal of a tuple that was rotated out to make room.
    pub fn reserve_round(
        &self,
        id: SessionId,
    ) -> FairResult<(RoundSeeds, Option<RevealedSeed>)> {
        self.with_session(id, SeedManager::reserve_round)
    }

    /// Validate `params`, reserve a nonce and derive the round.
    ///
    /// Rejected parameters never consume a nonce. A tuple rotated out on the
    /// way stays in the session's reveal history.
    pub fn play(
        &self,
        id: SessionId,
        engine: &FairnessEngine,
        params: &GameParams,
    ) -> FairResult<RoundResult> {
        if let Err(e) = engine.validate_params(params) {
            warn!(
                session = %id,
                game = %params.game_type(),
                error = %e,
                "Rejected round parameters"
            );
            return Err(e.into());
        }
        let (seeds, _) = self.reserve_round(id)?;
        engine.derive(&seeds, params)
    }

    pub fn update_client_seed(
        &self,
        id: SessionId,
        client_seed: impl Into<String>,
    ) -> FairResult<()> {
        let client_seed = client_seed.into();
        self.with_session(id, |manager| manager.update_client_seed(client_seed))
            .map_err(|e| {
                warn!(session = %id, error = %e, "Client seed update rejected");
                e
            })
    }

    pub fn rotate(&self, id: SessionId) -> FairResult<RevealedSeed> {
        self.with_session(id, SeedManager::rotate_seeds)
    }

    pub fn revealed_seeds(&self, id: SessionId) -> FairResult<Vec<RevealedSeed>> {
        self.with_session(id, |manager| Ok(manager.revealed_seeds().cloned().collect()))
    }

    /// Remove the session and reveal its active tuple.
    pub fn close_session(&self, id: SessionId) -> FairResult<Option<RevealedSeed>> {
        let (_, session) = self
            .sessions
            .remove(&id)
            .ok_or_else(|| SeedError::SessionNotFound(id.to_string()))?;
        let revealed = lock(&session, id)?.retire();
        info!(session = %id, "Closed session");
        Ok(revealed)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SeedStore {
    fn default() -> Self {
        Self::new(SeedConfig::default())
    }
}

fn lock(session: &Mutex<SeedManager>, id: SessionId) -> FairResult<MutexGuard<'_, SeedManager>> {
    session
        .lock()
        .map_err(|_| SeedError::Poisoned(id.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FairError;
    use crate::fairness::verify_commitment;
    use crate::games::CoinChoice;

    #[test]
    fn test_session_lifecycle() {
        let store = SeedStore::default();
        let (id, commitment) = store.open_session(Some("player".to_string())).unwrap();
        assert_eq!(commitment.nonce, 0);
        assert_eq!(commitment.client_seed, "player");
        assert_eq!(store.session_count(), 1);

        let (seeds, rotated) = store.reserve_round(id).unwrap();
        assert_eq!(seeds.nonce, 0);
        assert!(rotated.is_none());
        assert_eq!(store.commitment(id).unwrap().nonce, 1);

        let revealed = store.close_session(id).unwrap().unwrap();
        assert_eq!(revealed.server_seed, seeds.server_seed);
        assert!(verify_commitment(&revealed.server_seed, &commitment.server_seed_hash));
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_unknown_session() {
        let store = SeedStore::default();
        let missing = SessionId::new();
        assert!(matches!(
            store.reserve_round(missing),
            Err(FairError::Seed(SeedError::SessionNotFound(_)))
        ));
        assert!(store.close_session(missing).is_err());
    }

    #[test]
    fn test_play_consumes_nonce_only_when_valid() {
        let store = SeedStore::default();
        let engine = FairnessEngine::default();
        let (id, _) = store.open_session(None).unwrap();

        let bad = GameParams::Limbo { target: 0.5 };
        assert!(store.play(id, &engine, &bad).unwrap_err().is_validation());
        assert_eq!(store.commitment(id).unwrap().nonce, 0);

        let good = GameParams::CoinFlip {
            choice: CoinChoice::Heads,
        };
        let round = store.play(id, &engine, &good).unwrap();
        assert_eq!(round.nonce, 0);
        assert_eq!(store.commitment(id).unwrap().nonce, 1);
    }

    #[test]
    fn test_rotate_and_history() {
        let store = SeedStore::default();
        let (id, commitment) = store.open_session(None).unwrap();
        store.reserve_round(id).unwrap();

        let revealed = store.rotate(id).unwrap();
        assert_eq!(revealed.server_seed_hash, commitment.server_seed_hash);
        assert_eq!(store.revealed_seeds(id).unwrap(), vec![revealed]);
        assert_ne!(store.commitment(id).unwrap().server_seed_hash, commitment.server_seed_hash);
    }

    #[test]
    fn test_client_seed_update() {
        let store = SeedStore::default();
        let (id, _) = store.open_session(None).unwrap();
        store.update_client_seed(id, "fresh").unwrap();
        assert_eq!(store.reserve_round(id).unwrap().0.client_seed, "fresh");
        assert!(store.update_client_seed(id, "").is_err());
    }
}
