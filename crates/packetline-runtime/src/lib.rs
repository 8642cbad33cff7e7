// Runtime layer - drives the engine from stored logs and live node updates

pub mod config;
pub mod discover;
pub mod error;
pub mod log;
pub mod registry;
pub mod replay;

pub use config::{Config, ReplayConfig, ReplayMode, ScanConfig, resolve_config_path};
pub use discover::{LogSummary, discover_logs};
pub use error::{Error, Result};
pub use log::{LogFormat, PacketLog};
pub use registry::StreamRegistry;
pub use replay::{replay, replay_modes_agree};
