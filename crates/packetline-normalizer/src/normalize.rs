use packetline_types::{
    Artifact, DiffContent, ErrorPayload, NormalizedPacket, Packet, PacketType, PromptResponse,
    TextChunk, ThinkingChunk, TodoItem, ToolCallProgress, ToolCallStart, UnknownPacket,
};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::describe::{tool_description, tool_title};
use crate::diff::extract_diff;
use crate::fields::{self, pick_str};
use crate::sanitize::{sanitize_path, sanitize_text};
use crate::todos::extract_todos;
use crate::tools::{ResolvedTool, resolve_tool};

static TASK_METADATA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<task_metadata>.*?(?:</task_metadata>|$)").unwrap());

/// Normalize one raw packet into its typed variant. Never fails: anything
/// unrecognized becomes `NormalizedPacket::Unknown`.
pub fn normalize_packet(packet: &Packet) -> NormalizedPacket {
    normalize_payload(&packet.obj)
}

/// Normalize a bare packet payload (the `obj` part of a packet).
pub fn normalize_payload(obj: &Value) -> NormalizedPacket {
    let packet_type = PacketType::parse(obj.get("type").and_then(Value::as_str).unwrap_or(""));

    match packet_type {
        PacketType::AgentMessageChunk | PacketType::AgentMessage | PacketType::MessageDelta => {
            NormalizedPacket::Text(TextChunk {
                text: chunk_text(obj),
            })
        }
        PacketType::AgentThoughtChunk | PacketType::AgentThought | PacketType::ReasoningDelta => {
            NormalizedPacket::Thinking(ThinkingChunk {
                text: chunk_text(obj),
            })
        }
        PacketType::ToolCallStart => NormalizedPacket::ToolCallStart(normalize_tool_start(obj)),
        PacketType::ToolCallProgress => {
            NormalizedPacket::ToolCallProgress(normalize_tool_progress(obj))
        }
        PacketType::PromptResponse | PacketType::Stop => {
            NormalizedPacket::PromptResponse(PromptResponse {
                stop_reason: fields::stop_reason(obj),
            })
        }
        PacketType::ArtifactCreated => NormalizedPacket::ArtifactCreated(artifact(obj)),
        PacketType::Error => NormalizedPacket::Error(error_payload(obj)),
        other => NormalizedPacket::Unknown(UnknownPacket {
            packet_type: other.as_str().to_string(),
        }),
    }
}

fn chunk_text(obj: &Value) -> String {
    fields::pick(obj, &["content", "text", "reasoning", "delta"])
        .map(fields::content_text)
        .unwrap_or_default()
}

pub fn normalize_tool_start(obj: &Value) -> ToolCallStart {
    let tool = resolve_tool(obj);
    let input = fields::input(obj);
    let diff = diff_for(&tool, obj, input);
    let todos = todos_for(&tool, obj, input);

    ToolCallStart {
        tool_call_id: fields::tool_call_id(obj),
        title: tool_title(&tool, obj, diff.as_ref()),
        description: tool_description(&tool, obj, input, diff.as_ref(), &todos),
        tool_name: tool.name,
        kind: tool.kind,
    }
}

pub fn normalize_tool_progress(obj: &Value) -> ToolCallProgress {
    let tool = resolve_tool(obj);
    let input = fields::input(obj);
    let diff = diff_for(&tool, obj, input);
    let todos = todos_for(&tool, obj, input);

    let command = if tool.name == "bash" {
        fields::command(obj, input)
            .map(|cmd| sanitize_text(&cmd))
            .unwrap_or_default()
    } else {
        String::new()
    };

    let mut output = output_text(obj);
    if tool.name == "task" {
        output = strip_task_metadata(&output);
    }

    let file_path = fields::file_path(obj, input)
        .or_else(|| diff.as_ref().and_then(|d| d.path.as_deref()))
        .map(sanitize_path);

    ToolCallProgress {
        tool_call_id: fields::tool_call_id(obj),
        status: fields::status(obj),
        title: tool_title(&tool, obj, diff.as_ref()),
        description: tool_description(&tool, obj, input, diff.as_ref(), &todos),
        command,
        output,
        file_path,
        subagent_type: fields::subagent_type(input).map(str::to_string),
        diff: diff.map(sanitize_diff_path),
        todos,
        tool_name: tool.name,
        kind: tool.kind,
    }
}

/// Todo items carried by a todo-write tool call; empty for every other tool.
pub fn tool_call_todos(obj: &Value) -> Vec<TodoItem> {
    let tool = resolve_tool(obj);
    todos_for(&tool, obj, fields::input(obj))
}

fn todos_for(tool: &ResolvedTool, obj: &Value, input: &Value) -> Vec<TodoItem> {
    if !tool.is_todo_write() {
        return Vec::new();
    }
    fields::todos(obj, input)
        .map(extract_todos)
        .unwrap_or_default()
}

fn diff_for(tool: &ResolvedTool, obj: &Value, input: &Value) -> Option<DiffContent> {
    matches!(tool.name.as_str(), "edit" | "write")
        .then(|| extract_diff(obj, input))
        .flatten()
}

fn sanitize_diff_path(mut diff: DiffContent) -> DiffContent {
    diff.path = diff.path.as_deref().map(sanitize_path);
    diff
}

/// Display text of a tool's output, sanitized.
///
/// Plain string output is used as is. Structured output contributes its
/// `output`, `stdout` (+ `stderr`), `content` or `result` field. Without raw
/// output, the text blocks of the payload content are joined line by line.
fn output_text(obj: &Value) -> String {
    let text = match fields::output(obj) {
        Some(Value::String(s)) => s.clone(),
        Some(structured @ Value::Object(_)) => structured_output(structured),
        _ => content_blocks_text(obj),
    };
    sanitize_text(&text)
}

fn structured_output(output: &Value) -> String {
    if let Some(text) = pick_str(output, &["output"]) {
        return text.to_string();
    }
    if let Some(stdout) = output.get("stdout").and_then(Value::as_str) {
        return match pick_str(output, &["stderr"]) {
            Some(stderr) if stdout.is_empty() => stderr.to_string(),
            Some(stderr) => format!("{stdout}\n{stderr}"),
            None => stdout.to_string(),
        };
    }
    fields::pick(output, &["content", "result"])
        .map(fields::content_text)
        .unwrap_or_default()
}

fn content_blocks_text(obj: &Value) -> String {
    obj.get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter(|block| block.get("type").and_then(Value::as_str) != Some("diff"))
                .map(fields::content_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

fn strip_task_metadata(output: &str) -> String {
    TASK_METADATA_REGEX.replace_all(output, "").trim().to_string()
}

fn artifact(obj: &Value) -> Artifact {
    let source = obj.get("artifact").filter(|a| a.is_object()).unwrap_or(obj);
    let text = |keys: &[&str]| pick_str(source, keys).map(str::to_string);

    Artifact {
        id: text(&["id", "artifact_id", "artifactId"]),
        artifact_type: text(&["artifact_type", "artifactType"]),
        path: text(&["path"]),
        name: text(&["name", "filename"]),
    }
}

fn error_payload(obj: &Value) -> ErrorPayload {
    let message = pick_str(obj, &["message"])
        .or_else(|| match obj.get("error") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            Some(nested) => pick_str(nested, &["message"]),
            None => None,
        })
        .or_else(|| pick_str(obj, &["exception"]))
        .unwrap_or("Unknown error")
        .to_string();

    ErrorPayload {
        message,
        code: obj.get("code").and_then(Value::as_i64),
    }
}
