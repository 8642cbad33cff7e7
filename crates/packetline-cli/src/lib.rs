// NOTE: CLI layering
//
// The binary only parses arguments and prints. Loading logs, replaying and
// discovery live in packetline-runtime; grouping lives in packetline-engine.
// Every subcommand writes machine-readable output to stdout and logs to
// stderr, so `packetline replay log.jsonl | jq` always works.

mod args;
mod commands;
mod handlers;
pub mod views;

pub use args::{Cli, Commands, LogLevel, OutputFormat};
pub use commands::run;
