use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "packetline")]
#[command(about = "Replay and inspect stored agent packet streams", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to PACKETLINE_CONFIG, then the system config directory)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fold a packet log and print the final stream snapshot
    Replay {
        file: PathBuf,

        /// Feed the log one packet at a time and check it matches a batch replay
        #[arg(long)]
        incremental: bool,

        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Print every packet of a log in normalized form, one JSON object per line
    Normalize { file: PathBuf },

    /// Strip sandbox and session prefixes from paths
    Sanitize {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Find packet logs under a directory
    Scan {
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_replay_defaults() {
        let cli = Cli::parse_from(["packetline", "replay", "session.jsonl"]);
        assert_eq!(cli.log_level, LogLevel::Warn);
        match cli.command {
            Commands::Replay {
                file,
                incremental,
                format,
            } => {
                assert_eq!(file, PathBuf::from("session.jsonl"));
                assert!(!incremental);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "packetline",
            "scan",
            "logs",
            "--config",
            "alt.toml",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.config.as_deref(), Some("alt.toml"));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_sanitize_requires_a_path() {
        assert!(Cli::try_parse_from(["packetline", "sanitize"]).is_err());
    }
}
