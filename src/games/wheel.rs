//! Wheel: `segments` slots banded by risk level.
//!
//! Every table averages to the player's share after the house edge.

use crate::config::EngineConfig;
use crate::errors::{FairResult, ValidationError};
use crate::fairness::{RoundHash, TWO_POW_32};
use crate::games::engine::Derivation;
use crate::games::types::{GameOutcome, GameResult, GameType, WheelRisk};

pub const SEGMENT_CHOICES: [u32; 5] = [10, 20, 30, 40, 50];

// Both bands sum to 9.9 per ten segments (0.99 mean at a 1% edge).
const LOW_BAND: [f64; 10] = [1.5, 1.2, 1.2, 1.2, 0.0, 1.2, 1.2, 1.2, 1.2, 0.0];
const MEDIUM_BAND: [f64; 10] = [0.0, 1.9, 0.0, 1.5, 0.0, 2.0, 0.0, 1.5, 0.0, 3.0];
const BAND_EDGE_PERCENT: f64 = 1.0;

pub fn validate(segments: u8) -> Result<(), ValidationError> {
    if !SEGMENT_CHOICES.contains(&(segments as u32)) {
        return Err(ValidationError::NotAllowed {
            game: GameType::Wheel,
            field: "segments",
            value: segments as u32,
            allowed: &SEGMENT_CHOICES,
        });
    }
    Ok(())
}

/// Multiplier of every segment, in wheel order.
pub fn segment_multipliers(segments: u8, risk: WheelRisk, rules: &EngineConfig) -> Vec<f64> {
    let segments = segments as usize;
    let scale = (100.0 - rules.house_edge_percent) / (100.0 - BAND_EDGE_PERCENT);

    match risk {
        WheelRisk::Low => LOW_BAND.iter().cycle().take(segments).map(|m| m * scale).collect(),
        WheelRisk::Medium => MEDIUM_BAND.iter().cycle().take(segments).map(|m| m * scale).collect(),
        WheelRisk::High => {
            let mut table = vec![0.0; segments];
            if let Some(jackpot) = table.last_mut() {
                *jackpot = rules.edge_factor() * segments as f64;
            }
            table
        }
    }
}

/// `floor(hash_to_float(hash) * segments)`
pub fn spin(hash: &RoundHash, segments: u8) -> u8 {
    ((hash.leading_u32() as u64 * segments as u64) >> 32) as u8
}

pub(crate) fn derive(
    hash: &RoundHash,
    segments: u8,
    risk: WheelRisk,
    rules: &EngineConfig,
) -> FairResult<Derivation> {
    let segment = spin(hash, segments);
    let segment_multiplier = segment_multipliers(segments, risk, rules)
        .get(segment as usize)
        .copied()
        .unwrap_or(0.0);

    Ok(Derivation {
        outcome_value: hash.leading_u32() as f64 / TWO_POW_32 * segments as f64,
        outcome: GameOutcome::from_win(segment_multiplier > 0.0),
        multiplier: segment_multiplier,
        game_result: GameResult::Wheel {
            segments,
            risk,
            segment,
            segment_multiplier,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fairness::derive_round_hash;

    fn mean(table: &[f64]) -> f64 {
        table.iter().sum::<f64>() / table.len() as f64
    }

    #[test]
    fn test_tables_match_edge() {
        let rules = EngineConfig::default();
        for segments in [10u8, 20, 30, 40, 50] {
            for risk in [WheelRisk::Low, WheelRisk::Medium, WheelRisk::High] {
                let table = segment_multipliers(segments, risk, &rules);
                assert_eq!(table.len(), segments as usize);
                assert!((mean(&table) - 0.99).abs() < 1e-9, "{:?} {}", risk, segments);
            }
        }
    }

    #[test]
    fn test_tables_follow_configured_edge() {
        let rules = EngineConfig {
            house_edge_percent: 3.0,
            ..EngineConfig::default()
        };
        let table = segment_multipliers(20, WheelRisk::Medium, &rules);
        assert!((mean(&table) - 0.97).abs() < 1e-9);
    }

    #[test]
    fn test_golden_spin() {
        let hash = derive_round_hash(&"a".repeat(64), "bbbb", 0).unwrap();
        assert_eq!(spin(&hash, 10), 3);

        let round = derive(&hash, 10, WheelRisk::Low, &EngineConfig::default()).unwrap();
        assert_eq!(round.multiplier, 1.2);
        assert_eq!(round.outcome, GameOutcome::Win);

        let round = derive(&hash, 10, WheelRisk::High, &EngineConfig::default()).unwrap();
        assert_eq!(round.outcome, GameOutcome::Loss);
    }

    #[test]
    fn test_spin_stays_on_wheel() {
        let max = RoundHash::from_bytes([0xff; 32]);
        assert_eq!(spin(&max, 50), 49);
        assert!(validate(25).is_err());
        assert!(validate(40).is_ok());
    }
}
