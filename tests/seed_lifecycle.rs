//! Seed lifecycle across the manager and the session store

use fairplay::config::SeedConfig;
use fairplay::fairness::{hash_server_seed, verify_commitment, verify_result};
use fairplay::games::{CoinChoice, GameParams};
use fairplay::seeds::{SeedManager, SeedStore};
use fairplay::FairnessEngine;
use proptest::prelude::*;
use std::collections::HashSet;
use std::thread;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn nonce_counts_increments(k in 0u64..500) {
        let mut manager = SeedManager::default();
        manager.generate_new_seeds().unwrap();
        for _ in 0..k {
            manager.increment_nonce().unwrap();
        }
        prop_assert_eq!(manager.get_current_seeds().unwrap().nonce(), k);
    }
}

#[test]
fn rotation_due_at_one_hundred_rounds() {
    let mut manager = SeedManager::default();
    manager.generate_new_seeds().unwrap();

    for _ in 0..100 {
        assert!(!manager.should_rotate_seeds());
        manager.increment_nonce().unwrap();
    }
    assert_eq!(manager.get_current_seeds().unwrap().nonce(), 100);
    assert!(manager.should_rotate_seeds());
}

#[test]
fn reserve_round_never_exceeds_budget() {
    let mut manager = SeedManager::default();
    let mut server_seeds = HashSet::new();

    for round in 0..250u64 {
        let (seeds, _) = manager.reserve_round().unwrap();
        assert_eq!(seeds.nonce, round % 100);
        server_seeds.insert(seeds.server_seed);
    }
    assert_eq!(server_seeds.len(), 3);
    assert_eq!(manager.revealed_seeds().count(), 2);
}

#[test]
fn rotated_seeds_outlive_the_history_limit() {
    let mut manager = SeedManager::default();
    let history_limit = manager.config().revealed_history_limit;
    let budget = manager.config().rotation_round_budget;
    let total_rounds = budget * (history_limit as u64 + 10) + 1;

    let mut first_server_seed = None;
    let mut reveals = Vec::new();
    for _ in 0..total_rounds {
        let (seeds, rotated) = manager.reserve_round().unwrap();
        first_server_seed.get_or_insert(seeds.server_seed);
        reveals.extend(rotated);
    }

    assert_eq!(reveals.len(), history_limit + 10);
    assert_eq!(manager.revealed_seeds().count(), history_limit);

    let first_server_seed = first_server_seed.unwrap();
    let first = &reveals[0];
    assert_eq!(first.server_seed, first_server_seed);
    assert!(first.matches_commitment());
    assert!(manager.find_revealed(&first.server_seed_hash).is_none());
}

#[test]
fn revealed_seed_matches_published_commitment() {
    let engine = FairnessEngine::default();
    let store = SeedStore::default();
    let (session, commitment) = store.open_session(Some("my-lucky-seed".to_string())).unwrap();

    let params = GameParams::CoinFlip {
        choice: CoinChoice::Tails,
    };
    let rounds: Vec<_> = (0..5)
        .map(|_| store.play(session, &engine, &params).unwrap())
        .collect();

    let revealed = store.rotate(session).unwrap();
    assert_eq!(revealed.server_seed_hash, commitment.server_seed_hash);
    assert_eq!(hash_server_seed(&revealed.server_seed), commitment.server_seed_hash);
    assert!(verify_commitment(&revealed.server_seed, &commitment.server_seed_hash));
    assert_eq!(revealed.final_nonce, 5);

    for (nonce, round) in rounds.iter().enumerate() {
        assert_eq!(round.nonce, nonce as u64);
        assert!(verify_result(
            &revealed.server_seed,
            &revealed.client_seed,
            round.nonce,
            &round.raw_hash
        ));
    }
}

#[test]
fn client_seed_change_leaves_past_rounds_verifiable() {
    let store = SeedStore::default();
    let (session, _) = store.open_session(None).unwrap();

    let (before, _) = store.reserve_round(session).unwrap();
    let before_hash =
        fairplay::derive_hash(&before.server_seed, &before.client_seed, before.nonce).unwrap();

    store.update_client_seed(session, "new-client-seed").unwrap();
    let (after, _) = store.reserve_round(session).unwrap();
    assert_eq!(after.client_seed, "new-client-seed");
    assert_eq!(after.nonce, 1);

    let revealed = store.close_session(session).unwrap().unwrap();
    assert!(verify_result(&revealed.server_seed, &before.client_seed, 0, &before_hash));
}

#[test]
fn concurrent_rounds_get_distinct_nonces() {
    const THREADS: usize = 8;
    const ROUNDS_PER_THREAD: usize = 100;

    let config = SeedConfig {
        rotation_round_budget: 10_000,
        ..SeedConfig::default()
    };
    let store = SeedStore::new(config);
    let (session, commitment) = store.open_session(None).unwrap();

    let reserved: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = store.clone();
                scope.spawn(move || {
                    (0..ROUNDS_PER_THREAD)
                        .map(|_| store.reserve_round(session).unwrap().0)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    let mut nonces: Vec<u64> = reserved.iter().map(|s| s.nonce).collect();
    nonces.sort_unstable();
    let expected: Vec<u64> = (0..(THREADS * ROUNDS_PER_THREAD) as u64).collect();
    assert_eq!(nonces, expected);

    assert!(reserved
        .iter()
        .all(|s| hash_server_seed(&s.server_seed) == commitment.server_seed_hash));
}

#[test]
fn sessions_are_independent() {
    let store = SeedStore::default();
    let (a, commitment_a) = store.open_session(None).unwrap();
    let (b, commitment_b) = store.open_session(None).unwrap();
    assert_ne!(commitment_a.server_seed_hash, commitment_b.server_seed_hash);

    for _ in 0..3 {
        store.reserve_round(a).unwrap();
    }
    assert_eq!(store.commitment(a).unwrap().nonce, 3);
    assert_eq!(store.commitment(b).unwrap().nonce, 0);
    assert_eq!(store.session_count(), 2);
}
