use crate::errors::{FairResult, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported game types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Dice,
    CoinFlip,
    Crash,
    Limbo,
    Mines,
    Wheel,
    HiLo,
    Roulette,
}

impl GameType {
    pub const ALL: [GameType; 8] = [
        GameType::Dice,
        GameType::CoinFlip,
        GameType::Crash,
        GameType::Limbo,
        GameType::Mines,
        GameType::Wheel,
        GameType::HiLo,
        GameType::Roulette,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Dice => "dice",
            GameType::CoinFlip => "coinflip",
            GameType::Crash => "crash",
            GameType::Limbo => "limbo",
            GameType::Mines => "mines",
            GameType::Wheel => "wheel",
            GameType::HiLo => "hilo",
            GameType::Roulette => "roulette",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ValidationError;

    /// Case-insensitive; `coin_flip`, `hi-lo` and friends are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        GameType::ALL
            .into_iter()
            .find(|game| game.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownGameType(s.to_string()))
    }
}

/// Coin flip side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoinChoice {
    Heads,
    Tails,
}

impl fmt::Display for CoinChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinChoice::Heads => write!(f, "heads"),
            CoinChoice::Tails => write!(f, "tails"),
        }
    }
}

/// Game outcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    Win,
    Loss,
}

impl GameOutcome {
    pub fn from_win(win: bool) -> Self {
        if win {
            GameOutcome::Win
        } else {
            GameOutcome::Loss
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WheelRisk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HiLoGuess {
    /// Next card ranks the same or higher
    Higher,
    /// Next card ranks the same or lower
    Lower,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Diamonds,
    Hearts,
    Spades,
    Clubs,
}

/// Card drawn from a 52 card deck; index `i` has rank `i % 13 + 1`
/// (Ace low) and suit `i / 13`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub index: u8,
    pub rank: u8,
    pub suit: Suit,
}

impl Card {
    pub const DECK_SIZE: usize = 52;

    pub fn from_index(index: u8) -> Option<Self> {
        let suit = match index / 13 {
            0 => Suit::Diamonds,
            1 => Suit::Hearts,
            2 => Suit::Spades,
            3 => Suit::Clubs,
            _ => return None,
        };
        Some(Self {
            index,
            rank: index % 13 + 1,
            suit,
        })
    }
}

/// One resolved hi-lo guess
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HiLoStep {
    pub guess: HiLoGuess,
    pub card: Card,
    pub correct: bool,
    /// Running multiplier after this guess
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PocketColor {
    Green,
    Red,
    Black,
}

/// European roulette bet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RouletteBet {
    Straight { number: u8 },
    Red,
    Black,
    Odd,
    Even,
    Low,
    High,
    Dozen { dozen: u8 },
    Column { column: u8 },
}

fn default_tiles() -> u8 {
    crate::games::mines::DEFAULT_TILES
}

/// Player-chosen parameters for one round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameParams {
    Dice {
        target: f64,
        is_under: bool,
    },
    CoinFlip {
        choice: CoinChoice,
    },
    Crash {
        cash_out: f64,
    },
    Limbo {
        target: f64,
    },
    Mines {
        #[serde(default = "default_tiles")]
        tiles: u8,
        mine_count: u8,
        picks: Vec<u8>,
    },
    Wheel {
        segments: u8,
        risk: WheelRisk,
    },
    HiLo {
        guesses: Vec<HiLoGuess>,
    },
    Roulette {
        bet: RouletteBet,
    },
}

impl GameParams {
    pub fn game_type(&self) -> GameType {
        match self {
            GameParams::Dice { .. } => GameType::Dice,
            GameParams::CoinFlip { .. } => GameType::CoinFlip,
            GameParams::Crash { .. } => GameType::Crash,
            GameParams::Limbo { .. } => GameType::Limbo,
            GameParams::Mines { .. } => GameType::Mines,
            GameParams::Wheel { .. } => GameType::Wheel,
            GameParams::HiLo { .. } => GameType::HiLo,
            GameParams::Roulette { .. } => GameType::Roulette,
        }
    }
}

/// Game-specific result (discriminated union)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameResult {
    Dice {
        roll: f64,
        target: f64,
        is_under: bool,
        win_chance: f64,
    },
    CoinFlip {
        choice: CoinChoice,
        result: CoinChoice,
    },
    Crash {
        crash_point: f64,
        cash_out: f64,
    },
    Limbo {
        result: f64,
        target: f64,
    },
    Mines {
        tiles: u8,
        mine_positions: Vec<u8>,
        picks: Vec<u8>,
        /// First pick that landed on a mine
        hit: Option<u8>,
    },
    Wheel {
        segments: u8,
        risk: WheelRisk,
        segment: u8,
        segment_multiplier: f64,
    },
    HiLo {
        start_card: Card,
        steps: Vec<HiLoStep>,
    },
    Roulette {
        pocket: u8,
        color: PocketColor,
        bet: RouletteBet,
    },
}

impl GameResult {
    pub fn game_type(&self) -> GameType {
        match self {
            GameResult::Dice { .. } => GameType::Dice,
            GameResult::CoinFlip { .. } => GameType::CoinFlip,
            GameResult::Crash { .. } => GameType::Crash,
            GameResult::Limbo { .. } => GameType::Limbo,
            GameResult::Mines { .. } => GameType::Mines,
            GameResult::Wheel { .. } => GameType::Wheel,
            GameResult::HiLo { .. } => GameType::HiLo,
            GameResult::Roulette { .. } => GameType::Roulette,
        }
    }
}

/// Everything a round produced, returned to the caller for persistence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundResult {
    pub game_type: GameType,
    pub nonce: u64,
    /// Hex HMAC digest the outcome was read from
    pub raw_hash: String,
    /// Value extracted from `raw_hash` in the game's outcome space
    pub outcome_value: f64,
    pub outcome: GameOutcome,
    /// Payout multiplier, 0 on loss
    pub multiplier: f64,
    pub game_result: GameResult,
}

impl RoundResult {
    pub fn is_win(&self) -> bool {
        self.outcome == GameOutcome::Win
    }

    /// Amount returned to the player for `bet_amount`.
    pub fn payout(&self, bet_amount: f64) -> FairResult<f64> {
        validate_bet_amount(bet_amount)?;
        Ok(bet_amount * self.multiplier)
    }
}

pub fn validate_bet_amount(bet_amount: f64) -> Result<(), ValidationError> {
    if !bet_amount.is_finite() || bet_amount < 0.0 {
        return Err(ValidationError::InvalidBetAmount(bet_amount));
    }
    Ok(())
}
