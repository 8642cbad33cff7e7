//! Packet log fixtures.
//!
//! Writes packet sequences to disk in each format the loader accepts:
//! a JSON array, JSON lines, or server-sent events (`data:` lines).

use anyhow::Result;
use packetline_types::Packet;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    JsonArray,
    JsonLines,
    Sse,
}

impl LogFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::JsonArray => "json",
            Self::JsonLines => "jsonl",
            Self::Sse => "log",
        }
    }
}

/// Serialize packets in the wrapped envelope shape.
pub fn packet_values(packets: &[Packet]) -> Result<Vec<Value>> {
    packets
        .iter()
        .map(|packet| Ok(serde_json::to_value(packet)?))
        .collect()
}

/// Render raw packet values in `format`.
pub fn render_log(values: &[Value], format: LogFormat) -> Result<String> {
    let rendered = match format {
        LogFormat::JsonArray => serde_json::to_string_pretty(values)?,
        LogFormat::JsonLines => values
            .iter()
            .map(serde_json::to_string)
            .collect::<serde_json::Result<Vec<_>>>()?
            .join("\n"),
        LogFormat::Sse => values
            .iter()
            .map(|value| Ok(format!("event: packet\ndata: {}\n", serde_json::to_string(value)?)))
            .collect::<Result<Vec<_>>>()?
            .join("\n"),
    };
    Ok(rendered)
}

/// Write `values` as `<dir>/<stem>.<ext>` and return the path.
pub fn write_log_values(
    dir: &Path,
    stem: &str,
    values: &[Value],
    format: LogFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.{}", format.extension()));
    fs::write(&path, render_log(values, format)?)?;
    Ok(path)
}

pub fn write_packet_log(
    dir: &Path,
    stem: &str,
    packets: &[Packet],
    format: LogFormat,
) -> Result<PathBuf> {
    write_log_values(dir, stem, &packet_values(packets)?, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets;

    #[test]
    fn test_jsonl_has_one_packet_per_line() {
        let values = packet_values(&packets::scenario_packets()).unwrap();
        let rendered = render_log(&values, LogFormat::JsonLines).unwrap();
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn test_sse_prefixes_data() {
        let values = packet_values(&packets::scenario_packets()).unwrap();
        let rendered = render_log(&values, LogFormat::Sse).unwrap();
        assert_eq!(
            rendered.lines().filter(|l| l.starts_with("data: ")).count(),
            3
        );
    }
}
