use std::collections::HashMap;

use packetline_engine::{ProcessingContext, StreamSnapshot, build_snapshot, process_packets};
use packetline_types::Packet;

/// One processing context per conversational node being displayed.
///
/// The driver hands over each node's full current packet sequence; contexts are
/// created on first sight and reset by the engine when a sequence shrinks.
#[derive(Debug, Default)]
pub struct StreamRegistry {
    contexts: HashMap<String, ProcessingContext>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the unseen tail of `packets` into the node's context and return a
    /// fresh snapshot.
    pub fn update(&mut self, node_id: &str, packets: &[Packet]) -> StreamSnapshot {
        let ctx = self.contexts.entry(node_id.to_string()).or_default();
        process_packets(ctx, packets);
        build_snapshot(ctx)
    }

    pub fn get(&self, node_id: &str) -> Option<&ProcessingContext> {
        self.contexts.get(node_id)
    }

    /// Drop a node's context (the node is no longer displayed).
    pub fn remove(&mut self, node_id: &str) -> Option<ProcessingContext> {
        self.contexts.remove(node_id)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
