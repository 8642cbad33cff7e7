//! Testing infrastructure for packetline tests.
//!
//! - `packets`: builders for raw packets in both envelope shapes
//! - `fixtures`: packet log files in every supported format
//! - `assertions`: checks over snapshot JSON
//! - `TestWorld`: isolated temp environment for CLI runs

pub mod assertions;
pub mod fixtures;
pub mod packets;
pub mod world;

pub use world::{CliResult, TestWorld};
