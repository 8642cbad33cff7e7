use crate::args::OutputFormat;
use crate::views::render_scan;
use anyhow::{Result, bail};
use is_terminal::IsTerminal;
use packetline_runtime::{Config, discover_logs};
use std::path::Path;

pub fn handle(dir: &Path, config: &Config, format: OutputFormat) -> Result<()> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let summaries = discover_logs(dir, config)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Text => print!(
            "{}",
            render_scan(&summaries, std::io::stdout().is_terminal())
        ),
    }

    Ok(())
}
