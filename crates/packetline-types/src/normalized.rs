use serde::{Deserialize, Serialize};

use crate::document::Artifact;
use crate::tool::{DiffContent, TodoItem, ToolKind, ToolStatus};

/// Closed set of packet shapes produced by the normalizer.
///
/// Every raw packet maps to exactly one variant; `Unknown` is the catch-all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum NormalizedPacket {
    Text(TextChunk),
    Thinking(ThinkingChunk),
    ToolCallStart(ToolCallStart),
    ToolCallProgress(ToolCallProgress),
    /// The agent finished processing the prompt (turn complete)
    PromptResponse(PromptResponse),
    ArtifactCreated(Artifact),
    Error(ErrorPayload),
    Unknown(UnknownPacket),
}

impl NormalizedPacket {
    /// Resolved tool name for tool-call variants
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::ToolCallStart(start) => Some(&start.tool_name),
            Self::ToolCallProgress(progress) => Some(&progress.tool_name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingChunk {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallStart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Canonical lowercase tool name (`bash`, `read`, `edit`, ...), `unknown` when unresolvable
    pub tool_name: String,
    pub kind: ToolKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallProgress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    pub tool_name: String,
    pub kind: ToolKind,
    pub status: ToolStatus,
    pub title: String,
    pub description: String,
    /// Sanitized command text (execute tools), empty otherwise
    pub command: String,
    /// Sanitized output text, empty when none
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub todos: Vec<TodoItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subagent_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownPacket {
    pub packet_type: String,
}
