use std::collections::{BTreeMap, BTreeSet};

use packetline_normalizer::{merge_tool_calls, normalize_packet};
use packetline_types::{
    Artifact, Citation, ErrorPayload, GroupKey, NormalizedPacket, Packet, PacketType, SearchDoc,
    TodoItem, ToolCallProgress,
};
use serde::Serialize;

use crate::context::ProcessingContext;

/// One renderable group: the packets of a (turn, tab) pair in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketGroup {
    pub turn_index: usize,
    pub tab_index: usize,
    pub packets: Vec<Packet>,
}

impl PacketGroup {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.turn_index, self.tab_index)
    }

    /// Whether the group reached an end marker (explicit or synthetic), a stop or an error.
    pub fn is_complete(&self) -> bool {
        self.packets.iter().any(|packet| {
            let packet_type = packet.packet_type();
            packet_type.is_terminal_marker() || packet_type.is_stop() || packet_type.is_error()
        })
    }

    /// One merged view per tool call in the group.
    pub fn tool_calls(&self) -> Vec<ToolCallProgress> {
        merge_tool_calls(&self.packets)
    }

    pub fn normalized(&self) -> Vec<NormalizedPacket> {
        self.packets.iter().map(normalize_packet).collect()
    }
}

/// Renderable state derived from a processing context.
///
/// Every field is a fresh copy; building never mutates the context and never
/// hands out shared collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamSnapshot {
    pub tool_groups: Vec<PacketGroup>,
    pub display_groups: Vec<PacketGroup>,
    /// Groups outside both classes that still carry message or thinking text,
    /// such as agent message chunks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub message_groups: Vec<PacketGroup>,
    pub unique_tool_names: Vec<String>,
    pub citations: Vec<Citation>,
    pub citation_map: BTreeMap<u32, String>,
    pub documents: BTreeMap<String, SearchDoc>,
    pub final_answer_coming: bool,
    pub stream_ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub todos: Vec<TodoItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
    /// Error packets, in group order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorPayload>,
}

pub fn build_snapshot(ctx: &ProcessingContext) -> StreamSnapshot {
    StreamSnapshot {
        tool_groups: build_groups(ctx, &ctx.tool_group_keys),
        display_groups: build_groups(ctx, &ctx.display_group_keys),
        message_groups: build_message_groups(ctx),
        unique_tool_names: ctx.unique_tool_names.clone(),
        citations: ctx.citations.clone(),
        citation_map: ctx.citation_map.clone(),
        documents: ctx.documents.clone(),
        final_answer_coming: ctx.final_answer_coming,
        stream_ended: ctx.stream_ended,
        stop_reason: ctx.stop_reason.clone(),
        todos: ctx.latest_todos.clone(),
        artifacts: ctx.artifacts.clone(),
        errors: collect_errors(ctx),
    }
}

/// Groups for `keys` that hold at least one content-bearing packet, sorted by
/// turn then tab.
fn build_groups(ctx: &ProcessingContext, keys: &BTreeSet<GroupKey>) -> Vec<PacketGroup> {
    // BTreeSet iteration is already (turn, tab) ascending
    keys.iter()
        .filter_map(|key| {
            let packets = ctx.grouped_packets.get(key)?;
            packets
                .iter()
                .any(|packet| packet.packet_type().is_content_bearing())
                .then(|| PacketGroup {
                    turn_index: key.turn_index,
                    tab_index: key.tab_index,
                    packets: packets.clone(),
                })
        })
        .collect()
}

fn build_message_groups(ctx: &ProcessingContext) -> Vec<PacketGroup> {
    ctx.grouped_packets
        .iter()
        .filter(|(key, _)| {
            !ctx.tool_group_keys.contains(key) && !ctx.display_group_keys.contains(key)
        })
        .filter(|(_, packets)| {
            packets.iter().any(|packet| {
                matches!(
                    normalize_packet(packet),
                    NormalizedPacket::Text(_) | NormalizedPacket::Thinking(_)
                )
            })
        })
        .map(|(key, packets)| PacketGroup {
            turn_index: key.turn_index,
            tab_index: key.tab_index,
            packets: packets.clone(),
        })
        .collect()
}

fn collect_errors(ctx: &ProcessingContext) -> Vec<ErrorPayload> {
    ctx.grouped_packets
        .values()
        .flatten()
        .filter(|packet| packet.packet_type() == PacketType::Error)
        .filter_map(|packet| match normalize_packet(packet) {
            NormalizedPacket::Error(error) => Some(error),
            _ => None,
        })
        .collect()
}
