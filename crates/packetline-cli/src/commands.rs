use super::args::{Cli, Commands, LogLevel};
use super::handlers;
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use packetline_runtime::{Config, resolve_config_path};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let config_path = resolve_config_path(cli.config.as_deref())?;
    let config = Config::load_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    debug!(path = %config_path.display(), "config loaded");

    match cli.command {
        Commands::Replay {
            file,
            incremental,
            format,
        } => handlers::replay::handle(&file, &config, incremental, format),
        Commands::Normalize { file } => handlers::normalize::handle(&file),
        Commands::Sanitize { paths } => handlers::sanitize::handle(&paths),
        Commands::Scan { dir, format } => handlers::scan::handle(&dir, &config, format),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--log-level` when it parses.
fn init_logging(level: LogLevel) {
    let default_level = level.to_string();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&default_level))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
