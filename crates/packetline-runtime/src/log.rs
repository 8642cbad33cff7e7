use packetline_types::Packet;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::{Error, Result};

/// On-disk shape of a stored packet log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// `[packet, packet, ...]`, or `{"packets": [...]}`
    JsonArray,
    /// One packet per line
    JsonLines,
    /// Server-sent events, one packet per `data:` line
    Sse,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::JsonArray => "json",
            LogFormat::JsonLines => "jsonl",
            LogFormat::Sse => "sse",
        };
        f.write_str(name)
    }
}

/// A stored packet sequence, loaded in order.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketLog {
    pub path: Option<PathBuf>,
    pub format: LogFormat,
    pub packets: Vec<Packet>,
    /// Entries that could not be read as packets
    pub skipped: usize,
}

impl PacketLog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut log = Self::parse(&content)?;
        log.path = Some(path.to_path_buf());
        Ok(log)
    }

    /// Parse log text. JSON array documents must be well formed as a whole; in
    /// line formats each malformed line is skipped and counted.
    pub fn parse(content: &str) -> Result<Self> {
        let trimmed = content.trim_start();

        if trimmed.starts_with('[') {
            let document = serde_json::from_str(content).map_err(parse_error)?;
            return from_document(document);
        }

        // Text that parses whole as one object is a `{"packets": [...]}` wrapper
        // or a single packet. Anything else is read line by line.
        if trimmed.starts_with('{')
            && let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(content)
        {
            if value.get("packets").is_some() {
                return from_document(value);
            }
            let mut log = Self::empty(LogFormat::JsonLines);
            log.push_value(1, Ok(value));
            return Ok(log);
        }

        let format = if content
            .lines()
            .any(|line| line.trim_start().starts_with("data:"))
        {
            LogFormat::Sse
        } else {
            LogFormat::JsonLines
        };

        let mut log = Self::empty(format);
        for (index, line) in content.lines().enumerate() {
            let Some(payload) = line_payload(line, format) else {
                continue;
            };
            log.push_value(index + 1, serde_json::from_str(payload));
        }
        Ok(log)
    }

    fn empty(format: LogFormat) -> Self {
        Self {
            path: None,
            format,
            packets: Vec::new(),
            skipped: 0,
        }
    }

    fn push_value(&mut self, line: usize, parsed: serde_json::Result<Value>) {
        match parsed {
            Ok(value @ Value::Object(_)) => self.packets.push(Packet::from_value(value)),
            Ok(_) => {
                warn!(line, "skipping packet log entry that is not an object");
                self.skipped += 1;
            }
            Err(err) => {
                warn!(line, error = %err, "skipping malformed packet log line");
                self.skipped += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}

fn parse_error(err: serde_json::Error) -> Error {
    Error::Parse {
        line: err.line(),
        message: err.to_string(),
    }
}

fn from_document(document: Value) -> Result<PacketLog> {
    let entries = match document {
        Value::Array(entries) => Some(entries),
        Value::Object(mut map) => match map.remove("packets") {
            Some(Value::Array(entries)) => Some(entries),
            _ => None,
        },
        _ => None,
    }
    .ok_or_else(|| Error::Parse {
        line: 1,
        message: "expected a packet array or an object with a \"packets\" array".to_string(),
    })?;

    let mut log = PacketLog::empty(LogFormat::JsonArray);
    for (index, entry) in entries.into_iter().enumerate() {
        log.push_value(index + 1, Ok(entry));
    }
    Ok(log)
}

/// JSON text carried by one line, or `None` for lines without a packet
/// (blank lines, SSE comments and non-data fields, the `[DONE]` sentinel).
fn line_payload(line: &str, format: LogFormat) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let payload = match format {
        LogFormat::Sse => line.strip_prefix("data:")?.trim(),
        _ => line,
    };

    (payload != "[DONE]" && !payload.is_empty()).then_some(payload)
}
