use packetline_types::{Packet, PacketType, ToolCallProgress};
use serde_json::{Map, Value};

use crate::fields;
use crate::normalize::normalize_tool_progress;

struct PendingCall {
    id: Option<String>,
    payload: Map<String, Value>,
}

/// Collapse the tool-call packets of one group into one view per call.
///
/// Start and progress payloads sharing a tool call id are overlaid in arrival
/// order (non-null fields replace earlier ones) and the result is normalized as
/// progress. Packets without an id attach to the most recent call unless they
/// are a start. Calls are returned in first-seen order.
pub fn merge_tool_calls(packets: &[Packet]) -> Vec<ToolCallProgress> {
    let mut calls: Vec<PendingCall> = Vec::new();

    for packet in packets {
        let packet_type = packet.packet_type();
        if !matches!(
            packet_type,
            PacketType::ToolCallStart | PacketType::ToolCallProgress
        ) {
            continue;
        }
        let Value::Object(payload) = &packet.obj else {
            continue;
        };

        let id = fields::tool_call_id(&packet.obj);
        let existing = match &id {
            Some(id) => calls
                .iter()
                .position(|call| call.id.as_deref() == Some(id.as_str())),
            None if packet_type == PacketType::ToolCallProgress => calls.len().checked_sub(1),
            None => None,
        };

        match existing {
            Some(index) => overlay(&mut calls[index].payload, payload),
            None => calls.push(PendingCall {
                id,
                payload: payload.clone(),
            }),
        }
    }

    calls
        .into_iter()
        .map(|call| normalize_tool_progress(&Value::Object(call.payload)))
        .collect()
}

fn overlay(target: &mut Map<String, Value>, update: &Map<String, Value>) {
    for (key, value) in update {
        if !value.is_null() {
            target.insert(key.clone(), value.clone());
        }
    }
}
