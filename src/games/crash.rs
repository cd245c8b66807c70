//! Crash: exponential crash-point generator.
//!
//! With `h` the leading `u32` of the hash and `e = 2^32`,
//! `crash = floor((100e - h) / (e - h)) / 100`, clamped to [1.00, ceiling].
//! `P(crash >= m) = 99 / (100m - 1)`, so a cash-out at `m` returns
//! `99m / (100m - 1)`: 0.9999 at 1.01x, 0.995 at 2x, 0.991 at 10x. The edge
//! only approaches 1% for high cash-outs.

use crate::config::EngineConfig;
use crate::errors::{FairResult, ValidationError};
use crate::fairness::RoundHash;
use crate::games::engine::Derivation;
use crate::games::types::{GameOutcome, GameResult, GameType};

pub const MIN_CRASH_POINT: f64 = 1.0;
pub const MIN_CASH_OUT: f64 = 1.01;

const E: u128 = 1 << 32;

pub fn validate(cash_out: f64, rules: &EngineConfig) -> Result<(), ValidationError> {
    if !(MIN_CASH_OUT..=rules.crash_max_multiplier).contains(&cash_out) {
        return Err(ValidationError::OutOfRange {
            game: GameType::Crash,
            field: "cash_out",
            value: cash_out,
            min: MIN_CASH_OUT,
            max: rules.crash_max_multiplier,
        });
    }
    Ok(())
}

pub fn crash_point(hash: &RoundHash, ceiling: f64) -> f64 {
    let h = hash.leading_u32() as u128;
    // e - h >= 1 because h < 2^32
    let hundredths = (100 * E - h) / (E - h);
    (hundredths as f64 / 100.0).clamp(MIN_CRASH_POINT, ceiling.max(MIN_CRASH_POINT))
}

pub(crate) fn derive(
    hash: &RoundHash,
    cash_out: f64,
    rules: &EngineConfig,
) -> FairResult<Derivation> {
    let point = crash_point(hash, rules.crash_max_multiplier);
    let win = cash_out <= point;

    Ok(Derivation {
        outcome_value: point,
        outcome: GameOutcome::from_win(win),
        multiplier: if win { cash_out } else { 0.0 },
        game_result: GameResult::Crash {
            crash_point: point,
            cash_out,
        },
    })
}
