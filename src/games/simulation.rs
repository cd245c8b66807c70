//! Monte-Carlo replay of one seed pair over consecutive nonces.
//!
//! Used to check the statistical behaviour of each game and to report the
//! return-to-player a parameter set really delivers.

use crate::errors::{FairResult, SeedError};
use crate::fairness::{hash_server_seed, RoundSeeds};
use crate::games::engine::FairnessEngine;
use crate::games::types::{validate_bet_amount, GameParams, GameType};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationReport {
    pub game_type: GameType,
    pub rounds: u64,
    pub wins: u64,
    pub win_rate: f64,
    pub total_wagered: f64,
    pub total_returned: f64,
    /// Returned / wagered
    pub rtp: f64,
    pub house_edge: f64,
    /// Standard error of the mean net result per round
    pub net_stderr: f64,
}

#[derive(Default)]
struct Stats {
    rounds: u64,
    wins: u64,
    total_wagered: f64,
    total_returned: f64,
    total_net: f64,
    total_net_sq: f64,
}

impl Stats {
    fn add(&mut self, wagered: f64, returned: f64, win: bool) {
        let net = returned - wagered;
        self.rounds += 1;
        if win {
            self.wins += 1;
        }
        self.total_wagered += wagered;
        self.total_returned += returned;
        self.total_net += net;
        self.total_net_sq += net * net;
    }

    fn mean_net(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.total_net / self.rounds as f64
        }
    }

    fn stderr(&self) -> f64 {
        if self.rounds <= 1 {
            return 0.0;
        }
        let mean = self.mean_net();
        let var = (self.total_net_sq / self.rounds as f64 - mean * mean).max(0.0);
        (var / self.rounds as f64).sqrt()
    }

    fn report(&self, game_type: GameType) -> SimulationReport {
        let ratio = |num: f64, den: f64| if den == 0.0 { 0.0 } else { num / den };
        let rtp = ratio(self.total_returned, self.total_wagered);

        SimulationReport {
            game_type,
            rounds: self.rounds,
            wins: self.wins,
            win_rate: ratio(self.wins as f64, self.rounds as f64),
            total_wagered: self.total_wagered,
            total_returned: self.total_returned,
            rtp,
            house_edge: if self.total_wagered == 0.0 { 0.0 } else { 1.0 - rtp },
            net_stderr: self.stderr(),
        }
    }
}

pub struct Simulator;

impl Simulator {
    /// Play `rounds` rounds of `params` on nonces `seeds.nonce..seeds.nonce + rounds`.
    pub fn run(
        engine: &FairnessEngine,
        seeds: &RoundSeeds,
        params: &GameParams,
        rounds: u64,
        bet: f64,
    ) -> FairResult<SimulationReport> {
        validate_bet_amount(bet)?;
        seeds.validate()?;
        engine.validate_params(params)?;

        let mut stats = Stats::default();
        for offset in 0..rounds {
            let nonce = seeds.nonce.checked_add(offset).ok_or_else(|| SeedError::NonceExhausted {
                server_seed_hash: hash_server_seed(&seeds.server_seed),
            })?;
            let round = engine.derive(&seeds.with_nonce(nonce), params)?;
            stats.add(bet, round.payout(bet)?, round.is_win());
        }

        let report = stats.report(params.game_type());
        info!(
            game = %report.game_type,
            rounds = report.rounds,
            rtp = report.rtp,
            "Simulation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::types::CoinChoice;

    fn seeds() -> RoundSeeds {
        RoundSeeds::new("a".repeat(64), "bbbb", 0)
    }

    #[test]
    fn test_report_totals() {
        let engine = FairnessEngine::default();
        let params = GameParams::CoinFlip {
            choice: CoinChoice::Heads,
        };
        let report = Simulator::run(&engine, &seeds(), &params, 1_000, 2.0).unwrap();

        assert_eq!(report.rounds, 1_000);
        assert_eq!(report.total_wagered, 2_000.0);
        assert!((report.total_returned - report.wins as f64 * 2.0 * 1.98).abs() < 1e-6);
        assert!((report.rtp + report.house_edge - 1.0).abs() < 1e-12);
        assert!(report.net_stderr > 0.0);
    }

    #[test]
    fn test_zero_rounds() {
        let engine = FairnessEngine::default();
        let params = GameParams::Limbo { target: 2.0 };
        let report = Simulator::run(&engine, &seeds(), &params, 0, 1.0).unwrap();

        assert_eq!(report.rounds, 0);
        assert_eq!(report.win_rate, 0.0);
        assert_eq!(report.rtp, 0.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let engine = FairnessEngine::default();
        let params = GameParams::Limbo { target: 2.0 };
        assert!(Simulator::run(&engine, &seeds(), &params, 10, -1.0).is_err());
        let bad = GameParams::Limbo { target: 0.5 };
        assert!(Simulator::run(&engine, &seeds(), &bad, 10, 1.0).is_err());
    }

    #[test]
    fn test_nonce_overflow() {
        let engine = FairnessEngine::default();
        let params = GameParams::Limbo { target: 2.0 };
        let near_end = seeds().with_nonce(u64::MAX);
        assert!(Simulator::run(&engine, &near_end, &params, 1, 1.0).is_ok());
        assert!(Simulator::run(&engine, &near_end, &params, 2, 1.0).is_err());
    }
}
