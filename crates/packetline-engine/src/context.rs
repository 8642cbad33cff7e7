use std::collections::{BTreeMap, BTreeSet, HashSet};

use packetline_normalizer::{fields, normalize_payload, tool_call_todos};
use packetline_types::{
    Artifact, Citation, GroupKey, NormalizedPacket, Packet, PacketType, SearchDoc, TodoItem,
};
use serde_json::Value;
use tracing::{debug, trace};

use crate::classify::classify_first_packet;

/// Mutable processing state for one displayed unit of conversation.
///
/// Invariants:
/// - every key in `grouped_packets` is in `seen_groups`
/// - every key in `closed_groups` is in `grouped_packets`
/// - `citations` holds at most one entry per document id, while `citation_map`
///   keeps every citation number
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingContext {
    /// Number of packets of the driving sequence already folded in
    pub last_processed_index: usize,
    pub grouped_packets: BTreeMap<GroupKey, Vec<Packet>>,
    pub closed_groups: BTreeSet<GroupKey>,
    pub seen_groups: BTreeSet<GroupKey>,
    /// Declared parallel branch count per turn (metadata only)
    pub expected_branches: BTreeMap<usize, u32>,

    pub citations: Vec<Citation>,
    pub seen_citation_doc_ids: HashSet<String>,
    pub citation_map: BTreeMap<u32, String>,
    pub documents: BTreeMap<String, SearchDoc>,

    pub tool_group_keys: BTreeSet<GroupKey>,
    pub display_group_keys: BTreeSet<GroupKey>,
    pub unique_tool_names: Vec<String>,

    pub final_answer_coming: bool,
    pub stream_ended: bool,
    pub stop_reason: Option<String>,

    /// Most recent todo list written by a todo-write tool call
    pub latest_todos: Vec<TodoItem>,
    pub artifacts: Vec<Artifact>,
}

impl ProcessingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every packet of `packets` not yet seen.
    ///
    /// `packets` is the full current sequence. When it is shorter than what was
    /// already folded, it replaced the earlier sequence: the context starts over.
    pub fn fold_sequence(&mut self, packets: &[Packet]) {
        if packets.len() < self.last_processed_index {
            debug!(
                previous = self.last_processed_index,
                current = packets.len(),
                "packet sequence shrank, resetting processing context"
            );
            *self = Self::default();
        }

        for packet in &packets[self.last_processed_index..] {
            self.fold(packet);
        }
        self.last_processed_index = packets.len();
    }

    /// Fold a single packet. Does not touch `last_processed_index`.
    pub fn fold(&mut self, packet: &Packet) {
        let packet_type = packet.packet_type();

        if packet_type.is_branching() {
            if let Some(branches) = packet
                .obj
                .get("num_parallel_branches")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
            {
                self.expected_branches
                    .insert(packet.placement.turn_index, branches);
            }
            return;
        }

        if packet_type.is_stop() && self.stream_ended {
            return;
        }

        let key = packet.group_key();

        if !self.seen_groups.is_empty()
            && !self
                .seen_groups
                .iter()
                .any(|seen| seen.turn_index == key.turn_index)
        {
            self.close_open_groups("turn transition");
        }

        let is_first_packet = self.seen_groups.insert(key);

        if packet_type.is_terminal_marker() || packet_type.is_error() {
            self.closed_groups.insert(key);
        }

        self.grouped_packets
            .entry(key)
            .or_default()
            .push(packet.clone());

        if is_first_packet {
            self.classify_group(key, packet);
        }

        match &packet_type {
            PacketType::CitationInfo => self.record_citation(&packet.obj),
            PacketType::SearchToolDocumentsDelta | PacketType::OpenUrlDocuments => {
                self.merge_documents(packet.obj.get("documents"));
            }
            PacketType::MessageStart => {
                self.merge_documents(packet.obj.get("final_documents"));
            }
            PacketType::ToolCallStart | PacketType::ToolCallProgress => {
                let todos = tool_call_todos(&packet.obj);
                if !todos.is_empty() {
                    self.latest_todos = todos;
                }
            }
            PacketType::ArtifactCreated => {
                if let NormalizedPacket::ArtifactCreated(artifact) = normalize_payload(&packet.obj)
                {
                    self.record_artifact(artifact);
                }
            }
            PacketType::Unknown(raw) => {
                trace!(packet_type = %raw, group = %key, "unknown packet type");
            }
            _ => {}
        }

        if packet_type.signals_final_answer() {
            self.final_answer_coming = true;
        }

        if packet_type.is_stop() {
            self.stream_ended = true;
            self.stop_reason = fields::stop_reason(&packet.obj);
            debug!(
                stop_reason = self.stop_reason.as_deref().unwrap_or("none"),
                "stream ended"
            );
            self.close_open_groups("stream end");
        }

        if self.final_answer_coming
            && !self.stream_ended
            && packet_type.is_tool_activity()
            && !packet_type.is_thinking()
        {
            debug!(
                packet_type = %packet_type,
                group = %key,
                "tool activity after message, answer not final"
            );
            self.final_answer_coming = false;
        }
    }

    /// Append a synthetic end marker to every seen group that is still open.
    fn close_open_groups(&mut self, reason: &str) {
        let open: Vec<GroupKey> = self
            .seen_groups
            .difference(&self.closed_groups)
            .copied()
            .collect();

        for key in open {
            debug!(group = %key, reason, "closing group with synthetic end marker");
            self.grouped_packets
                .entry(key)
                .or_default()
                .push(Packet::synthetic_section_end(key));
            self.closed_groups.insert(key);
        }
    }

    fn classify_group(&mut self, key: GroupKey, packet: &Packet) {
        let class = classify_first_packet(packet);

        if class.is_tool_group {
            self.tool_group_keys.insert(key);
            if let Some(name) = class.tool_name
                && !self.unique_tool_names.contains(&name)
            {
                self.unique_tool_names.push(name);
            }
        }
        if class.is_display_group {
            self.display_group_keys.insert(key);
        }
    }

    fn record_citation(&mut self, obj: &Value) {
        let Some(number) = obj
            .get("citation_number")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
        else {
            return;
        };
        let Some(document_id) = obj.get("document_id").and_then(Value::as_str) else {
            return;
        };

        self.citation_map.insert(number, document_id.to_string());
        if self.seen_citation_doc_ids.insert(document_id.to_string()) {
            self.citations.push(Citation {
                citation_number: number,
                document_id: document_id.to_string(),
            });
        }
    }

    fn merge_documents(&mut self, documents: Option<&Value>) {
        let Some(documents) = documents.and_then(Value::as_array) else {
            return;
        };
        for raw in documents {
            match serde_json::from_value::<SearchDoc>(raw.clone()) {
                Ok(doc) => {
                    self.documents.insert(doc.document_id.clone(), doc);
                }
                Err(err) => trace!(error = %err, "skipping document without id"),
            }
        }
    }

    fn record_artifact(&mut self, artifact: Artifact) {
        let duplicate = artifact.identity().is_some_and(|id| {
            self.artifacts
                .iter()
                .any(|known| known.identity() == Some(id))
        });
        if !duplicate {
            self.artifacts.push(artifact);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packetline_types::Placement;
    use serde_json::json;

    fn packet(turn: usize, tab: usize, obj: Value) -> Packet {
        Packet::new(Placement::new(turn, tab), obj)
    }

    #[test]
    fn test_branching_is_metadata_only() {
        let mut ctx = ProcessingContext::new();
        ctx.fold(&packet(
            1,
            0,
            json!({"type": "top_level_branching", "num_parallel_branches": 3}),
        ));

        assert_eq!(ctx.expected_branches.get(&1), Some(&3));
        assert!(ctx.grouped_packets.is_empty());
        assert!(ctx.seen_groups.is_empty());
    }

    #[test]
    fn test_out_of_range_branch_count_is_ignored() {
        let mut ctx = ProcessingContext::new();
        ctx.fold(&packet(
            2,
            0,
            json!({"type": "top_level_branching", "num_parallel_branches": u64::MAX}),
        ));

        assert!(ctx.expected_branches.is_empty());
        assert!(ctx.grouped_packets.is_empty());
    }

    #[test]
    fn test_section_end_closes_only_its_group() {
        let mut ctx = ProcessingContext::new();
        ctx.fold(&packet(0, 0, json!({"type": "message_start"})));
        ctx.fold(&packet(0, 1, json!({"type": "reasoning_start"})));
        ctx.fold(&packet(0, 0, json!({"type": "section_end"})));

        assert!(ctx.closed_groups.contains(&GroupKey::new(0, 0)));
        assert!(!ctx.closed_groups.contains(&GroupKey::new(0, 1)));
    }

    #[test]
    fn test_error_packet_closes_group() {
        let mut ctx = ProcessingContext::new();
        ctx.fold(&packet(0, 0, json!({"type": "error", "message": "boom"})));

        assert!(ctx.closed_groups.contains(&GroupKey::new(0, 0)));
        assert!(!ctx.stream_ended);
        assert!(ctx.tool_group_keys.is_empty());
        assert!(ctx.display_group_keys.is_empty());
    }

    #[test]
    fn test_same_turn_new_tab_does_not_close() {
        let mut ctx = ProcessingContext::new();
        ctx.fold(&packet(2, 0, json!({"type": "search_tool_start"})));
        ctx.fold(&packet(2, 1, json!({"type": "search_tool_start"})));

        assert!(ctx.closed_groups.is_empty());
        assert_eq!(ctx.unique_tool_names, vec!["Internal Search".to_string()]);
    }

    #[test]
    fn test_documents_last_write_wins() {
        let mut ctx = ProcessingContext::new();
        ctx.fold(&packet(
            0,
            0,
            json!({"type": "search_tool_documents_delta", "documents": [
                {"document_id": "d1", "semantic_identifier": "old"},
                {"semantic_identifier": "no id"}
            ]}),
        ));
        ctx.fold(&packet(
            0,
            0,
            json!({"type": "open_url_documents", "documents": [
                {"document_id": "d1", "semantic_identifier": "new"},
                {"document_id": "d2"}
            ]}),
        ));
        ctx.fold(&packet(
            1,
            0,
            json!({"type": "message_start", "final_documents": [{"document_id": "d3"}]}),
        ));

        assert_eq!(ctx.documents.len(), 3);
        assert_eq!(
            ctx.documents["d1"].semantic_identifier.as_deref(),
            Some("new")
        );
    }

    #[test]
    fn test_recovery_ignores_thinking() {
        let mut ctx = ProcessingContext::new();
        ctx.fold(&packet(0, 0, json!({"type": "agent_message_chunk", "content": "Here"})));
        ctx.fold(&packet(0, 0, json!({"type": "agent_thought_chunk", "content": "hmm"})));
        assert!(ctx.final_answer_coming);

        ctx.fold(&packet(1, 0, json!({"type": "tool_call_start", "kind": "read"})));
        assert!(!ctx.final_answer_coming);
    }

    #[test]
    fn test_latest_todos_and_artifacts() {
        let mut ctx = ProcessingContext::new();
        ctx.fold(&packet(
            0,
            0,
            json!({"type": "tool_call_start", "rawInput": {"todos": [{"content": "a"}]}}),
        ));
        ctx.fold(&packet(
            0,
            0,
            json!({"type": "tool_call_progress", "rawInput": {"todos": [{"content": "a"}, {"content": "b"}]}}),
        ));
        for _ in 0..2 {
            ctx.fold(&packet(
                0,
                0,
                json!({"type": "artifact_created", "artifact": {"id": "web-1", "path": "outputs/web"}}),
            ));
        }

        assert_eq!(ctx.latest_todos.len(), 2);
        assert_eq!(ctx.artifacts.len(), 1);
        assert!(ctx.tool_group_keys.is_empty());
    }
}
