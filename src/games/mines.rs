//! Mines: `mine_count` distinct positions on a board of `tiles`.
//!
//! Positions come from a partial Fisher-Yates shuffle of `0..tiles`, one
//! stream draw per mine, so exactly `mine_count` unique tiles are chosen and
//! any revealed server seed reproduces the board.

use crate::config::EngineConfig;
use crate::errors::{FairResult, ValidationError};
use crate::fairness::DrawStream;
use crate::games::engine::Derivation;
use crate::games::types::{GameOutcome, GameResult, GameType};

pub const DEFAULT_TILES: u8 = 25;
pub const MIN_TILES: u8 = 2;
pub const MAX_TILES: u8 = 64;

pub fn validate(tiles: u8, mine_count: u8, picks: &[u8]) -> Result<(), ValidationError> {
    if !(MIN_TILES..=MAX_TILES).contains(&tiles) {
        return Err(out_of_range("tiles", tiles as f64, MIN_TILES as f64, MAX_TILES as f64));
    }

    if mine_count == 0 || mine_count >= tiles {
        return Err(out_of_range("mine_count", mine_count as f64, 1.0, (tiles - 1) as f64));
    }

    let safe_tiles = (tiles - mine_count) as usize;
    if picks.is_empty() || picks.len() > safe_tiles {
        return Err(out_of_range("picks", picks.len() as f64, 1.0, safe_tiles as f64));
    }

    let mut seen = [false; MAX_TILES as usize];
    for &tile in picks {
        if tile >= tiles {
            return Err(out_of_range("pick", tile as f64, 0.0, (tiles - 1) as f64));
        }
        if seen[tile as usize] {
            return Err(ValidationError::DuplicatePick { tile });
        }
        seen[tile as usize] = true;
    }

    Ok(())
}

fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> ValidationError {
    ValidationError::OutOfRange {
        game: GameType::Mines,
        field,
        value,
        min,
        max,
    }
}

/// Mines in selection order.
pub fn select_mines(draws: &mut DrawStream<'_>, tiles: u8, mine_count: u8) -> FairResult<Vec<u8>> {
    let mut board: Vec<u8> = (0..tiles).collect();
    let mine_count = (mine_count as usize).min(board.len());

    for i in 0..mine_count {
        let j = i + draws.next_index(board.len() - i)?;
        board.swap(i, j);
    }

    board.truncate(mine_count);
    Ok(board)
}

/// `edge × C(tiles, picks) / C(tiles - mines, picks)`
pub fn win_multiplier(tiles: u8, mine_count: u8, picks: usize, rules: &EngineConfig) -> f64 {
    let tiles = tiles as f64;
    let safe = tiles - mine_count as f64;
    let fair = (0..picks).fold(1.0, |acc, k| acc * (tiles - k as f64) / (safe - k as f64));
    fair * rules.edge_factor()
}

pub(crate) fn derive(
    draws: &mut DrawStream<'_>,
    tiles: u8,
    mine_count: u8,
    picks: &[u8],
    rules: &EngineConfig,
) -> FairResult<Derivation> {
    let selected = select_mines(draws, tiles, mine_count)?;
    let first_selected = selected.first().copied().unwrap_or_default();

    let mut mine_positions = selected;
    mine_positions.sort_unstable();

    let hit = picks
        .iter()
        .copied()
        .find(|pick| mine_positions.binary_search(pick).is_ok());
    let win = hit.is_none();

    Ok(Derivation {
        outcome_value: first_selected as f64,
        outcome: GameOutcome::from_win(win),
        multiplier: if win {
            win_multiplier(tiles, mine_count, picks.len(), rules)
        } else {
            0.0
        },
        game_result: GameResult::Mines {
            tiles,
            mine_positions,
            picks: picks.to_vec(),
            hit,
        },
    })
}
