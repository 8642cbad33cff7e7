//! Packet builders.
//!
//! Chat-protocol packets are built wrapped (`{placement, obj}`), agent
//! protocol packets flat, the way each arrives from the backend.

use packetline_types::{Packet, Placement};
use serde_json::{Value, json};

/// Wrapped packet at (turn, tab).
pub fn at(turn: usize, tab: usize, obj: Value) -> Packet {
    Packet::new(Placement::new(turn, tab), obj)
}

pub fn message_start(turn: usize) -> Packet {
    at(turn, 0, json!({"type": "message_start", "final_documents": null}))
}

pub fn message_delta(turn: usize, content: &str) -> Packet {
    at(turn, 0, json!({"type": "message_delta", "content": content}))
}

pub fn reasoning_start(turn: usize) -> Packet {
    at(turn, 0, json!({"type": "reasoning_start"}))
}

pub fn section_end(turn: usize, tab: usize) -> Packet {
    at(turn, tab, json!({"type": "section_end"}))
}

pub fn stop(turn: usize, reason: &str) -> Packet {
    at(turn, 0, json!({"type": "stop", "stop_reason": reason}))
}

pub fn citation(turn: usize, number: u32, document_id: &str) -> Packet {
    at(
        turn,
        0,
        json!({"type": "citation_info", "citation_number": number, "document_id": document_id}),
    )
}

pub fn search_start(turn: usize, tab: usize, internet: bool) -> Packet {
    at(
        turn,
        tab,
        json!({"type": "search_tool_start", "is_internet_search": internet}),
    )
}

pub fn search_documents(turn: usize, tab: usize, document_ids: &[&str]) -> Packet {
    let documents: Vec<Value> = document_ids
        .iter()
        .map(|id| json!({"document_id": id, "semantic_identifier": format!("Doc {id}")}))
        .collect();
    at(
        turn,
        tab,
        json!({"type": "search_tool_documents_delta", "documents": documents}),
    )
}

pub fn branching(turn: usize, branches: u32) -> Packet {
    at(
        turn,
        0,
        json!({"type": "top_level_branching", "num_parallel_branches": branches}),
    )
}

pub fn error(turn: usize, message: &str) -> Packet {
    at(turn, 0, json!({"type": "error", "error": message}))
}

pub fn tool_call_start(turn: usize, tab: usize, id: &str, kind: &str) -> Packet {
    at(
        turn,
        tab,
        json!({"type": "tool_call_start", "toolCallId": id, "kind": kind}),
    )
}

pub fn tool_call_progress(
    turn: usize,
    tab: usize,
    id: &str,
    status: &str,
    output: &str,
) -> Packet {
    at(
        turn,
        tab,
        json!({
            "type": "tool_call_progress",
            "toolCallId": id,
            "status": status,
            "rawOutput": output
        }),
    )
}

/// Tool call start / completed progress in the turn's tab 0, followed by the
/// final message in the next turn.
pub fn scenario_packets() -> Vec<Packet> {
    vec![
        tool_call_start(0, 0, "call_1", "execute"),
        tool_call_progress(0, 0, "call_1", "completed", "ok"),
        message_start(1),
    ]
}

/// A full chat session: parallel searches, citations, an answer and a stop.
pub fn chat_session() -> Vec<Packet> {
    vec![
        branching(0, 2),
        search_start(0, 0, false),
        search_documents(0, 0, &["doc-a", "doc-b"]),
        section_end(0, 0),
        search_start(0, 1, true),
        search_documents(0, 1, &["doc-c"]),
        reasoning_start(1),
        at(1, 0, json!({"type": "reasoning_delta", "reasoning": "Comparing sources"})),
        message_start(2),
        message_delta(2, "Revenue grew [1][2]"),
        citation(2, 1, "doc-a"),
        citation(2, 2, "doc-a"),
        citation(2, 3, "doc-c"),
        stop(2, "finished"),
    ]
}

/// An agent build session in the flat event shape, as raw JSON values.
pub fn agent_session_values() -> Vec<Value> {
    vec![
        json!({
            "type": "agent_thought_chunk",
            "turn_index": 0,
            "content": {"type": "text", "text": "Planning the app"}
        }),
        json!({
            "type": "tool_call_start",
            "turn_index": 1,
            "toolCallId": "t1",
            "kind": "edit",
            "title": "Write",
            "rawInput": {"file_path": "/data/sandboxes/sb1/sessions/s1/outputs/web/page.tsx"}
        }),
        json!({
            "type": "tool_call_progress",
            "turn_index": 1,
            "toolCallId": "t1",
            "status": "completed",
            "content": [{
                "type": "diff",
                "path": "/data/sandboxes/sb1/sessions/s1/outputs/web/page.tsx",
                "oldText": "",
                "newText": "export default function Page() {}"
            }]
        }),
        json!({
            "type": "artifact_created",
            "turn_index": 1,
            "artifact": {"id": "web-app", "artifactType": "web_app", "path": "outputs/web"}
        }),
        json!({
            "type": "agent_message_chunk",
            "turn_index": 2,
            "content": {"type": "text", "text": "Your app is ready."}
        }),
        json!({"type": "prompt_response", "turn_index": 2, "stopReason": "end_turn"}),
    ]
}

pub fn agent_session() -> Vec<Packet> {
    agent_session_values()
        .into_iter()
        .map(Packet::from_value)
        .collect()
}
