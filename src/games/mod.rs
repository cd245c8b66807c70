//! Game rules and the engine that turns a round hash into a result

pub mod coinflip;
pub mod crash;
pub mod dice;
pub mod engine;
pub mod hilo;
pub mod limbo;
pub mod mines;
pub mod roulette;
pub mod simulation;
pub mod types;
pub mod wheel;

pub use engine::FairnessEngine;
pub use simulation::{SimulationReport, Simulator};
pub use types::*;
