//! European single-zero roulette. The edge comes from the zero pocket, so
//! the configured house edge does not apply here.

use crate::errors::{FairResult, ValidationError};
use crate::fairness::RoundHash;
use crate::games::engine::Derivation;
use crate::games::types::{GameOutcome, GameResult, PocketColor, RouletteBet};

pub const POCKETS: u8 = 37;

const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

pub fn validate(bet: &RouletteBet) -> Result<(), ValidationError> {
    match *bet {
        RouletteBet::Straight { number } if number >= POCKETS => {
            Err(ValidationError::InvalidRouletteBet(format!(
                "straight number {} is not on the wheel",
                number
            )))
        }
        RouletteBet::Dozen { dozen } if !(1..=3).contains(&dozen) => {
            Err(ValidationError::InvalidRouletteBet(format!(
                "dozen must be 1, 2 or 3, got {}",
                dozen
            )))
        }
        RouletteBet::Column { column } if !(1..=3).contains(&column) => {
            Err(ValidationError::InvalidRouletteBet(format!(
                "column must be 1, 2 or 3, got {}",
                column
            )))
        }
        _ => Ok(()),
    }
}

/// `floor(hash_to_float(hash) * 37)`
pub fn spin(hash: &RoundHash) -> u8 {
    ((hash.leading_u32() as u64 * POCKETS as u64) >> 32) as u8
}

pub fn pocket_color(pocket: u8) -> PocketColor {
    if pocket == 0 {
        PocketColor::Green
    } else if RED_NUMBERS.contains(&pocket) {
        PocketColor::Red
    } else {
        PocketColor::Black
    }
}

pub fn bet_wins(bet: &RouletteBet, pocket: u8) -> bool {
    if pocket == 0 {
        return matches!(bet, RouletteBet::Straight { number: 0 });
    }

    match *bet {
        RouletteBet::Straight { number } => number == pocket,
        RouletteBet::Red => pocket_color(pocket) == PocketColor::Red,
        RouletteBet::Black => pocket_color(pocket) == PocketColor::Black,
        RouletteBet::Odd => pocket % 2 == 1,
        RouletteBet::Even => pocket % 2 == 0,
        RouletteBet::Low => pocket <= 18,
        RouletteBet::High => pocket >= 19,
        RouletteBet::Dozen { dozen } => (pocket - 1) / 12 + 1 == dozen,
        RouletteBet::Column { column } => (pocket - 1) % 3 + 1 == column,
    }
}

/// Stake returned on a win, including the stake itself.
pub fn win_multiplier(bet: &RouletteBet) -> f64 {
    match bet {
        RouletteBet::Straight { .. } => 36.0,
        RouletteBet::Dozen { .. } | RouletteBet::Column { .. } => 3.0,
        _ => 2.0,
    }
}

pub(crate) fn derive(hash: &RoundHash, bet: RouletteBet) -> FairResult<Derivation> {
    let pocket = spin(hash);
    let win = bet_wins(&bet, pocket);

    Ok(Derivation {
        outcome_value: pocket as f64,
        outcome: GameOutcome::from_win(win),
        multiplier: if win { win_multiplier(&bet) } else { 0.0 },
        game_result: GameResult::Roulette {
            pocket,
            color: pocket_color(pocket),
            bet,
        },
    })
}
