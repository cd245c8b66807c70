//! Dice: a roll in [0, 99.99] against a player-chosen target.

use crate::config::EngineConfig;
use crate::errors::{FairResult, ValidationError};
use crate::fairness::{hash_to_integer, RoundHash};
use crate::games::engine::Derivation;
use crate::games::types::{GameOutcome, GameResult, GameType};

pub const DICE_MODULUS: u32 = 10_000;
pub const MIN_TARGET: f64 = 1.0;
pub const MAX_TARGET: f64 = 99.0;

pub fn validate(target: f64) -> Result<(), ValidationError> {
    if !(MIN_TARGET..=MAX_TARGET).contains(&target) {
        return Err(ValidationError::OutOfRange {
            game: GameType::Dice,
            field: "target",
            value: target,
            min: MIN_TARGET,
            max: MAX_TARGET,
        });
    }
    Ok(())
}

/// `hash_to_integer(hash, 10000) / 100`
pub fn roll(hash: &RoundHash) -> FairResult<f64> {
    Ok(hash_to_integer(hash, DICE_MODULUS)? as f64 / 100.0)
}

/// Win chance in percent.
pub fn win_chance(target: f64, is_under: bool) -> f64 {
    if is_under {
        target
    } else {
        100.0 - target
    }
}

pub fn win_multiplier(house_edge_percent: f64, win_chance: f64) -> f64 {
    (100.0 - house_edge_percent) / win_chance
}

pub(crate) fn derive(
    hash: &RoundHash,
    target: f64,
    is_under: bool,
    rules: &EngineConfig,
) -> FairResult<Derivation> {
    let roll = roll(hash)?;
    let win = if is_under { roll < target } else { roll > target };
    let chance = win_chance(target, is_under);
    let multiplier = if win {
        win_multiplier(rules.house_edge_percent, chance)
    } else {
        0.0
    };

    Ok(Derivation {
        outcome_value: roll,
        outcome: GameOutcome::from_win(win),
        multiplier,
        game_result: GameResult::Dice {
            roll,
            target,
            is_under,
            win_chance: chance,
        },
    })
}
