use crate::config::EngineConfig;
use crate::errors::FairResult;
use crate::fairness::{hash_to_integer, RoundHash};
use crate::games::engine::Derivation;
use crate::games::types::{CoinChoice, GameOutcome, GameResult};

/// 0 is heads, 1 is tails
pub fn flip(hash: &RoundHash) -> FairResult<CoinChoice> {
    Ok(match hash_to_integer(hash, 2)? {
        0 => CoinChoice::Heads,
        _ => CoinChoice::Tails,
    })
}

/// Even-money payout less the house edge (1.98 at 1%).
pub fn win_multiplier(rules: &EngineConfig) -> f64 {
    2.0 * (100.0 - rules.house_edge_percent) / 100.0
}

pub(crate) fn derive(
    hash: &RoundHash,
    choice: CoinChoice,
    rules: &EngineConfig,
) -> FairResult<Derivation> {
    let result = flip(hash)?;
    let win = result == choice;

    Ok(Derivation {
        outcome_value: match result {
            CoinChoice::Heads => 0.0,
            CoinChoice::Tails => 1.0,
        },
        outcome: GameOutcome::from_win(win),
        multiplier: if win { win_multiplier(rules) } else { 0.0 },
        game_result: GameResult::CoinFlip { choice, result },
    })
}
