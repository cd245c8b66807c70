//! Seed lifecycle: generation, nonces, client seed updates, rotation and reveal

pub mod manager;
pub mod store;
pub mod tuple;

pub use manager::SeedManager;
pub use store::{SeedStore, SessionId};
pub use tuple::{validate_client_seed, RevealedSeed, SeedCommitment, SeedTuple};
