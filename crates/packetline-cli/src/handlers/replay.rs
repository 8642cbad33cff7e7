use crate::args::OutputFormat;
use crate::views::{LogInfo, ReplayReport, render_replay};
use anyhow::{Context, Result, bail};
use is_terminal::IsTerminal;
use packetline_runtime::{Config, PacketLog, ReplayMode, replay, replay_modes_agree};
use std::path::Path;
use tracing::debug;

pub fn handle(file: &Path, config: &Config, incremental: bool, format: OutputFormat) -> Result<()> {
    let log = PacketLog::load(file)
        .with_context(|| format!("failed to read packet log {}", file.display()))?;

    let mode = if incremental {
        ReplayMode::Incremental
    } else {
        config.replay.mode
    };

    if mode == ReplayMode::Incremental && !replay_modes_agree(&log.packets) {
        bail!(
            "incremental and batch replay of {} produced different snapshots",
            file.display()
        );
    }

    let snapshot = replay(&log.packets, mode);
    debug!(
        packets = log.len(),
        tool_groups = snapshot.tool_groups.len(),
        display_groups = snapshot.display_groups.len(),
        "replayed"
    );

    let report = ReplayReport::new(
        LogInfo {
            path: file,
            format: log.format,
            packet_count: log.len(),
            skipped: log.skipped,
        },
        mode,
        snapshot,
        config.replay.include_packets,
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!(
            "{}",
            render_replay(&report, std::io::stdout().is_terminal())
        ),
    }

    Ok(())
}
