//! Output shapes for the CLI: serializable reports for `--format json` and
//! plain-text renderers for `--format text`.

use owo_colors::OwoColorize;
use packetline_engine::{PacketGroup, StreamSnapshot, tool_start_name};
use packetline_runtime::{LogFormat, LogSummary, ReplayMode};
use packetline_types::{
    Artifact, Citation, ErrorPayload, NormalizedPacket, Packet, SearchDoc, TodoItem,
    TodoStatus, ToolCallProgress, ToolStatus,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

const TEXT_PREVIEW_CHARS: usize = 80;

/// One group of a replayed stream, summarized for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub turn_index: usize,
    pub tab_index: usize,
    pub complete: bool,
    pub packet_count: usize,
    /// Display name of the tool that opened the group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallProgress>,
    /// Text and thinking chunks, concatenated
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packets: Option<Vec<Packet>>,
}

impl GroupView {
    pub fn from_group(group: &PacketGroup, include_packets: bool) -> Self {
        let tool_name = group
            .packets
            .first()
            .and_then(|first| tool_start_name(&first.packet_type(), &first.obj));

        let text = group
            .normalized()
            .into_iter()
            .filter_map(|packet| match packet {
                NormalizedPacket::Text(chunk) => Some(chunk.text),
                NormalizedPacket::Thinking(chunk) => Some(chunk.text),
                _ => None,
            })
            .collect();

        Self {
            turn_index: group.turn_index,
            tab_index: group.tab_index,
            complete: group.is_complete(),
            packet_count: group.packets.len(),
            tool_name,
            tool_calls: group.tool_calls(),
            text,
            packets: include_packets.then(|| group.packets.clone()),
        }
    }
}

/// Final state of a replayed packet log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub path: PathBuf,
    pub format: LogFormat,
    pub mode: ReplayMode,
    pub packet_count: usize,
    pub skipped: usize,
    pub tool_groups: Vec<GroupView>,
    pub display_groups: Vec<GroupView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub message_groups: Vec<GroupView>,
    pub unique_tool_names: Vec<String>,
    pub citations: Vec<Citation>,
    pub documents: BTreeMap<String, SearchDoc>,
    pub final_answer_coming: bool,
    pub stream_ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub todos: Vec<TodoItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorPayload>,
}

pub struct LogInfo<'a> {
    pub path: &'a Path,
    pub format: LogFormat,
    pub packet_count: usize,
    pub skipped: usize,
}

impl ReplayReport {
    pub fn new(
        log: LogInfo<'_>,
        mode: ReplayMode,
        snapshot: StreamSnapshot,
        include_packets: bool,
    ) -> Self {
        let views = |groups: &[PacketGroup]| -> Vec<GroupView> {
            groups
                .iter()
                .map(|group| GroupView::from_group(group, include_packets))
                .collect()
        };

        Self {
            path: log.path.to_path_buf(),
            format: log.format,
            mode,
            packet_count: log.packet_count,
            skipped: log.skipped,
            tool_groups: views(&snapshot.tool_groups),
            display_groups: views(&snapshot.display_groups),
            message_groups: views(&snapshot.message_groups),
            unique_tool_names: snapshot.unique_tool_names,
            citations: snapshot.citations,
            documents: snapshot.documents,
            final_answer_coming: snapshot.final_answer_coming,
            stream_ended: snapshot.stream_ended,
            stop_reason: snapshot.stop_reason,
            todos: snapshot.todos,
            artifacts: snapshot.artifacts,
            errors: snapshot.errors,
        }
    }
}

/// Applies a style only when color output is enabled.
fn paint(color: bool, text: &str, style: fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

fn status_style(status: ToolStatus) -> fn(&str) -> String {
    match status {
        ToolStatus::Completed => |s: &str| s.green().to_string(),
        ToolStatus::Failed => |s: &str| s.red().to_string(),
        ToolStatus::InProgress => |s: &str| s.yellow().to_string(),
        ToolStatus::Pending => |s: &str| s.dimmed().to_string(),
    }
}

fn status_label(status: ToolStatus) -> &'static str {
    match status {
        ToolStatus::Completed => "completed",
        ToolStatus::Failed => "failed",
        ToolStatus::InProgress => "in progress",
        ToolStatus::Pending => "pending",
    }
}

/// Truncate and flatten to a single line, respecting char boundaries.
fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let truncated: String = flat.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}

pub fn render_replay(report: &ReplayReport, color: bool) -> String {
    let mut out = String::new();
    let header = format!(
        "{} ({}, {} packets, {})",
        report.path.display(),
        report.format,
        report.packet_count,
        match report.mode {
            ReplayMode::Batch => "batch",
            ReplayMode::Incremental => "incremental",
        }
    );
    let _ = writeln!(out, "{}", paint(color, &header, |s| s.bold().to_string()));
    if report.skipped > 0 {
        let _ = writeln!(
            out,
            "{}",
            paint(
                color,
                &format!("{} malformed entries skipped", report.skipped),
                |s| s.yellow().to_string()
            )
        );
    }

    if !report.unique_tool_names.is_empty() {
        let _ = writeln!(
            out,
            "Tools: {}",
            paint(color, &report.unique_tool_names.join(", "), |s| s
                .cyan()
                .to_string())
        );
    }

    if !report.tool_groups.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Tool groups:");
        for group in &report.tool_groups {
            render_tool_group(&mut out, group, color);
        }
    }

    for (heading, groups) in [
        ("Display groups:", &report.display_groups),
        ("Messages:", &report.message_groups),
    ] {
        if groups.is_empty() {
            continue;
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", heading);
        for group in groups {
            render_text_group(&mut out, group);
        }
    }

    if !report.citations.is_empty() {
        let cited: Vec<String> = report
            .citations
            .iter()
            .map(|c| format!("[{}] {}", c.citation_number, c.document_id))
            .collect();
        let _ = writeln!(out);
        let _ = writeln!(out, "Citations: {}", cited.join(", "));
    }

    if !report.todos.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Todos:");
        for todo in &report.todos {
            let mark = match todo.status {
                TodoStatus::Completed => "[x]",
                TodoStatus::InProgress => "[~]",
                TodoStatus::Pending => "[ ]",
            };
            let _ = writeln!(out, "  {} {}", mark, todo.content);
        }
    }

    for error in &report.errors {
        let _ = writeln!(
            out,
            "{} {}",
            paint(color, "Error:", |s| s.red().bold().to_string()),
            error.message
        );
    }

    let _ = writeln!(out);
    let state = match (report.stream_ended, &report.stop_reason) {
        (true, Some(reason)) => paint(color, &format!("ended ({})", reason), |s| {
            s.green().to_string()
        }),
        (true, None) => paint(color, "ended", |s| s.green().to_string()),
        (false, _) => paint(color, "open", |s| s.yellow().to_string()),
    };
    let _ = writeln!(out, "Stream: {}", state);

    out
}

fn render_text_group(out: &mut String, group: &GroupView) {
    let mut line = format!(
        "  [{}.{}] {} packets",
        group.turn_index, group.tab_index, group.packet_count
    );
    if !group.complete {
        line.push_str(" (open)");
    }
    let _ = writeln!(out, "{}", line);
    if !group.text.is_empty() {
        let _ = writeln!(out, "        {}", preview(&group.text, TEXT_PREVIEW_CHARS));
    }
}

fn render_tool_group(out: &mut String, group: &GroupView, color: bool) {
    let name = group.tool_name.as_deref().unwrap_or("tool");
    let _ = writeln!(
        out,
        "  [{}.{}] {}",
        group.turn_index,
        group.tab_index,
        paint(color, name, |s| s.cyan().to_string())
    );

    for call in &group.tool_calls {
        let _ = writeln!(
            out,
            "        {}  {}",
            call.title,
            paint(color, status_label(call.status), status_style(call.status))
        );
        if !call.description.is_empty() {
            let _ = writeln!(out, "          {}", preview(&call.description, TEXT_PREVIEW_CHARS));
        }
        if !call.output.is_empty() {
            let _ = writeln!(out, "          > {}", preview(&call.output, TEXT_PREVIEW_CHARS));
        }
    }
}

pub fn render_scan(summaries: &[LogSummary], color: bool) -> String {
    if summaries.is_empty() {
        return "No packet logs found.\n".to_string();
    }

    let mut out = String::new();
    for summary in summaries {
        let state = if summary.stream_ended {
            paint(color, "ended", |s| s.green().to_string())
        } else {
            paint(color, "open", |s| s.yellow().to_string())
        };
        let _ = write!(
            out,
            "{}  {}  {} packets  {}",
            summary.path.display(),
            summary.format,
            summary.packet_count,
            state
        );
        if !summary.tool_names.is_empty() {
            let _ = write!(out, "  [{}]", summary.tool_names.join(", "));
        }
        let _ = writeln!(out);
    }
    out
}
