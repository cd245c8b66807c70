use crate::errors::{FairResult, ValidationError};
use crate::fairness::{hash_to_integer, RoundHash};
use crate::games::engine::Derivation;
use crate::games::types::{GameOutcome, GameResult, GameType};

pub const LIMBO_MODULUS: u32 = 1_000_000;
pub const MIN_TARGET: f64 = 1.01;
pub const MAX_TARGET: f64 = 99.99;

pub fn validate(target: f64) -> Result<(), ValidationError> {
    if !(MIN_TARGET..=MAX_TARGET).contains(&target) {
        return Err(ValidationError::OutOfRange {
            game: GameType::Limbo,
            field: "target",
            value: target,
            min: MIN_TARGET,
            max: MAX_TARGET,
        });
    }
    Ok(())
}

/// `max(1.00, hash_to_integer(hash, 1_000_000) / 10000)`
///
/// A target `t` wins with probability `(100 - t) / 100`, so the expected
/// return is `t(100 - t) / 100`: 1.96 at 2x. This favors the player.
pub fn result(hash: &RoundHash) -> FairResult<f64> {
    Ok((hash_to_integer(hash, LIMBO_MODULUS)? as f64 / 10_000.0).max(1.0))
}

pub(crate) fn derive(hash: &RoundHash, target: f64) -> FairResult<Derivation> {
    let result = result(hash)?;
    let win = result >= target;

    Ok(Derivation {
        outcome_value: result,
        outcome: GameOutcome::from_win(win),
        multiplier: if win { target } else { 0.0 },
        game_result: GameResult::Limbo { result, target },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fairness::derive_round_hash;

    #[test]
    fn test_golden_result() {
        let hash = derive_round_hash(&"a".repeat(64), "bbbb", 0).unwrap();
        assert_eq!(result(&hash).unwrap(), 23.4417);

        let hit = derive(&hash, 23.44).unwrap();
        assert_eq!(hit.outcome, GameOutcome::Win);
        assert_eq!(hit.multiplier, 23.44);

        let miss = derive(&hash, 23.45).unwrap();
        assert_eq!(miss.outcome, GameOutcome::Loss);
    }

    #[test]
    fn test_floor_of_one() {
        assert_eq!(result(&RoundHash::from_bytes([0u8; 32])).unwrap(), 1.0);
    }

    #[test]
    fn test_target_bounds() {
        assert!(validate(1.01).is_ok());
        assert!(validate(99.99).is_ok());
        assert!(validate(1.0).is_err());
        assert!(validate(100.0).is_err());
    }
}
