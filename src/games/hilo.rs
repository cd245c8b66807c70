//! Hi-Lo: a start card, then one fresh draw per higher/lower guess.
//!
//! Draws come from an infinite deck (every card is drawn independently).
//! Ties win for both directions.

use crate::config::EngineConfig;
use crate::errors::{FairError, FairResult, ValidationError};
use crate::fairness::DrawStream;
use crate::games::engine::Derivation;
use crate::games::types::{Card, GameOutcome, GameResult, GameType, HiLoGuess, HiLoStep};

pub const MAX_GUESSES: usize = 51;

pub fn validate(guesses: &[HiLoGuess]) -> Result<(), ValidationError> {
    if guesses.is_empty() || guesses.len() > MAX_GUESSES {
        return Err(ValidationError::OutOfRange {
            game: GameType::HiLo,
            field: "guesses",
            value: guesses.len() as f64,
            min: 1.0,
            max: MAX_GUESSES as f64,
        });
    }
    Ok(())
}

pub fn draw_card(draws: &mut DrawStream<'_>) -> FairResult<Card> {
    let index = draws.next_index(Card::DECK_SIZE)?;
    u8::try_from(index)
        .ok()
        .and_then(Card::from_index)
        .ok_or_else(|| FairError::Internal(format!("card index {} outside the deck", index)))
}

/// Chance that `guess` wins from a card of `rank`.
pub fn win_probability(rank: u8, guess: HiLoGuess) -> f64 {
    let rank = rank as f64;
    match guess {
        HiLoGuess::Higher => (14.0 - rank) / 13.0,
        HiLoGuess::Lower => rank / 13.0,
    }
}

pub fn is_correct(current: &Card, next: &Card, guess: HiLoGuess) -> bool {
    match guess {
        HiLoGuess::Higher => next.rank >= current.rank,
        HiLoGuess::Lower => next.rank <= current.rank,
    }
}

pub(crate) fn derive(
    draws: &mut DrawStream<'_>,
    guesses: &[HiLoGuess],
    rules: &EngineConfig,
) -> FairResult<Derivation> {
    let start_card = draw_card(draws)?;
    let mut current = start_card;
    let mut multiplier = 1.0;
    let mut steps = Vec::with_capacity(guesses.len());

    for &guess in guesses {
        let card = draw_card(draws)?;
        let correct = is_correct(&current, &card, guess);
        if correct {
            multiplier *= rules.edge_factor() / win_probability(current.rank, guess);
        }
        steps.push(HiLoStep {
            guess,
            card,
            correct,
            multiplier: if correct { multiplier } else { 0.0 },
        });
        if !correct {
            break;
        }
        current = card;
    }

    let win = steps.len() == guesses.len() && steps.iter().all(|step| step.correct);

    Ok(Derivation {
        outcome_value: start_card.index as f64,
        outcome: GameOutcome::from_win(win),
        multiplier: if win { multiplier } else { 0.0 },
        game_result: GameResult::HiLo { start_card, steps },
    })
}
