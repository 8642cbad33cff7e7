use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::{Config, ReplayMode};
use crate::log::{LogFormat, PacketLog};
use crate::replay::replay;
use crate::Result;

/// Summary of one packet log found on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogSummary {
    pub path: PathBuf,
    pub format: LogFormat,
    pub packet_count: usize,
    pub skipped: usize,
    pub stream_ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    pub tool_names: Vec<String>,
}

impl LogSummary {
    pub fn from_log(path: &Path, log: &PacketLog) -> Self {
        let snapshot = replay(&log.packets, ReplayMode::Batch);
        Self {
            path: path.to_path_buf(),
            format: log.format,
            packet_count: log.len(),
            skipped: log.skipped,
            stream_ended: snapshot.stream_ended,
            stop_reason: snapshot.stop_reason,
            tool_names: snapshot.unique_tool_names,
        }
    }
}

/// Find packet logs under `root` (files with a configured extension), sorted by path.
///
/// Files that hold no packets, or cannot be parsed at all, are skipped with a warning.
pub fn discover_logs(root: &Path, config: &Config) -> Result<Vec<LogSummary>> {
    let mut summaries = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !config.is_log_file(path) {
            continue;
        }

        match PacketLog::load(path) {
            Ok(log) if log.is_empty() => {
                warn!(path = %path.display(), "no packets found, skipping");
            }
            Ok(log) => summaries.push(LogSummary::from_log(path, &log)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable packet log, skipping");
            }
        }
    }

    Ok(summaries)
}
