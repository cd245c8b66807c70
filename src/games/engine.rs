//! Round derivation for every game
//!
//! `FairnessEngine` only holds house rules. Given the same seeds and
//! parameters it always produces the same `RoundResult`, so the replay done by
//! a player during verification goes through exactly this code.

use crate::config::EngineConfig;
use crate::errors::{FairResult, ValidationError};
use crate::fairness::{DrawStream, RoundSeeds};
use crate::games::types::{GameOutcome, GameParams, GameResult, RoundResult};
use crate::games::{coinflip, crash, dice, hilo, limbo, mines, roulette, wheel};
use tracing::debug;

/// What a game module hands back before the engine attaches hash and nonce
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Derivation {
    pub outcome_value: f64,
    pub outcome: GameOutcome,
    pub multiplier: f64,
    pub game_result: GameResult,
}

#[derive(Debug, Clone, Default)]
pub struct FairnessEngine {
    config: EngineConfig,
}

impl FairnessEngine {
    pub fn new(config: EngineConfig) -> FairResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check player parameters without touching any seed material.
    pub fn validate_params(&self, params: &GameParams) -> Result<(), ValidationError> {
        match params {
            GameParams::Dice { target, .. } => dice::validate(*target),
            GameParams::CoinFlip { .. } => Ok(()),
            GameParams::Crash { cash_out } => crash::validate(*cash_out, &self.config),
            GameParams::Limbo { target } => limbo::validate(*target),
            GameParams::Mines {
                tiles,
                mine_count,
                picks,
            } => mines::validate(*tiles, *mine_count, picks),
            GameParams::Wheel { segments, .. } => wheel::validate(*segments),
            GameParams::HiLo { guesses } => hilo::validate(guesses),
            GameParams::Roulette { bet } => roulette::validate(bet),
        }
    }

    /// Derive the full round for `seeds` and `params`.
    pub fn derive(&self, seeds: &RoundSeeds, params: &GameParams) -> FairResult<RoundResult> {
        seeds.validate()?;
        self.validate_params(params)?;

        let round_hash = seeds.round_hash()?;
        let hash = &round_hash;
        let rules = &self.config;

        let derivation = match params {
            GameParams::Dice { target, is_under } => dice::derive(hash, *target, *is_under, rules)?,
            GameParams::CoinFlip { choice } => coinflip::derive(hash, *choice, rules)?,
            GameParams::Crash { cash_out } => crash::derive(hash, *cash_out, rules)?,
            GameParams::Limbo { target } => limbo::derive(hash, *target)?,
            GameParams::Mines {
                tiles,
                mine_count,
                picks,
            } => {
                let mut draws = DrawStream::new(seeds, round_hash);
                mines::derive(&mut draws, *tiles, *mine_count, picks, rules)?
            }
            GameParams::Wheel { segments, risk } => wheel::derive(hash, *segments, *risk, rules)?,
            GameParams::HiLo { guesses } => {
                let mut draws = DrawStream::new(seeds, round_hash);
                hilo::derive(&mut draws, guesses, rules)?
            }
            GameParams::Roulette { bet } => roulette::derive(hash, *bet)?,
        };

        debug!(
            game = %params.game_type(),
            nonce = seeds.nonce,
            outcome = ?derivation.outcome,
            multiplier = derivation.multiplier,
            "Derived round"
        );

        Ok(RoundResult {
            game_type: params.game_type(),
            nonce: seeds.nonce,
            raw_hash: round_hash.to_hex(),
            outcome_value: derivation.outcome_value,
            outcome: derivation.outcome,
            multiplier: derivation.multiplier,
            game_result: derivation.game_result,
        })
    }

    pub fn derive_from_parts(
        &self,
        server_seed: &str,
        client_seed: &str,
        nonce: u64,
        params: &GameParams,
    ) -> FairResult<RoundResult> {
        self.derive(&RoundSeeds::new(server_seed, client_seed, nonce), params)
    }

    /// Replay a round from revealed seeds and compare it with a claimed result.
    ///
    /// Any failure to replay counts as a mismatch.
    pub fn verify_round(
        &self,
        seeds: &RoundSeeds,
        params: &GameParams,
        claimed: &RoundResult,
    ) -> bool {
        let Ok(replayed) = self.derive(seeds, params) else {
            return false;
        };

        replayed.raw_hash.eq_ignore_ascii_case(&claimed.raw_hash)
            && replayed.nonce == claimed.nonce
            && replayed.game_type == claimed.game_type
            && replayed.outcome == claimed.outcome
            && replayed.multiplier == claimed.multiplier
            && replayed.game_result == claimed.game_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FairError;
    use crate::games::types::{CoinChoice, GameType, HiLoGuess, RouletteBet, WheelRisk};

    const GOLDEN_HASH: &str = "4e92a9313bc9e0c69bbf2277779f2938e1fca5a632738e4f98805cfb3dc31c1a";

    fn golden() -> RoundSeeds {
        RoundSeeds::new("a".repeat(64), "bbbb", 0)
    }

    fn every_game() -> Vec<GameParams> {
        vec![
            GameParams::Dice {
                target: 50.0,
                is_under: true,
            },
            GameParams::CoinFlip {
                choice: CoinChoice::Tails,
            },
            GameParams::Crash { cash_out: 1.5 },
            GameParams::Limbo { target: 2.0 },
            GameParams::Mines {
                tiles: 25,
                mine_count: 3,
                picks: vec![0, 1, 2],
            },
            GameParams::Wheel {
                segments: 20,
                risk: WheelRisk::Medium,
            },
            GameParams::HiLo {
                guesses: vec![HiLoGuess::Higher, HiLoGuess::Lower],
            },
            GameParams::Roulette {
                bet: RouletteBet::Red,
            },
        ]
    }

    #[test]
    fn test_golden_dice_round() {
        let engine = FairnessEngine::default();
        let params = GameParams::Dice {
            target: 50.0,
            is_under: true,
        };
        let round = engine.derive(&golden(), &params).unwrap();

        assert_eq!(round.game_type, GameType::Dice);
        assert_eq!(round.raw_hash, GOLDEN_HASH);
        assert_eq!(round.outcome_value, 44.17);
        assert!(round.is_win());
        assert_eq!(round.multiplier, 99.0 / 50.0);
        assert_eq!(round.payout(10.0).unwrap(), 10.0 * 99.0 / 50.0);
    }

    #[test]
    fn test_every_game_shares_the_round_hash() {
        let engine = FairnessEngine::default();
        for params in every_game() {
            let round = engine.derive(&golden(), &params).unwrap();
            assert_eq!(round.raw_hash, GOLDEN_HASH);
            assert_eq!(round.game_type, params.game_type());
            assert_eq!(round.game_result.game_type(), params.game_type());
            assert_eq!(round.is_win(), round.multiplier > 0.0, "{:?}", params);
        }
    }

    #[test]
    fn test_verify_round() {
        let engine = FairnessEngine::default();
        let seeds = golden();
        for params in every_game() {
            let round = engine.derive(&seeds, &params).unwrap();
            assert!(engine.verify_round(&seeds, &params, &round));

            let mut forged = round.clone();
            forged.multiplier += 1.0;
            assert!(!engine.verify_round(&seeds, &params, &forged));

            assert!(!engine.verify_round(&seeds.with_nonce(1), &params, &round));
        }
    }

    #[test]
    fn test_invalid_params_rejected_before_hashing() {
        let engine = FairnessEngine::default();
        let err = engine
            .derive(&golden(), &GameParams::Dice {
                target: 0.5,
                is_under: true,
            })
            .unwrap_err();
        assert!(err.is_validation());

        let err = engine
            .derive(&RoundSeeds::new("", "bbbb", 0), &GameParams::Limbo { target: 2.0 })
            .unwrap_err();
        assert!(matches!(err, FairError::Validation(ValidationError::EmptyServerSeed)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            house_edge_percent: 50.0,
            ..EngineConfig::default()
        };
        assert!(FairnessEngine::new(config).is_err());
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<FairnessEngine>();
    }
}
