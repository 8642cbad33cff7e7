// Engine module - stream grouping and snapshot building
// Sits between raw packets (types) and the driving runtime / CLI

mod classify;
pub mod context;
pub mod output;

pub use classify::{GroupClass, tool_start_name};
pub use context::ProcessingContext;
pub use output::{PacketGroup, StreamSnapshot, build_snapshot};

use packetline_types::Packet;

// Façade API - stable interface for drivers

/// Fold a single packet into the context.
///
/// Does not advance `last_processed_index`; drivers replaying a growing
/// sequence should use [`process_packets`].
pub fn process_packet(ctx: &mut ProcessingContext, packet: &Packet) {
    ctx.fold(packet);
}

/// Fold the unseen tail of `packets` (the full current sequence) into the context,
/// resetting it first when the sequence shrank.
pub fn process_packets(ctx: &mut ProcessingContext, packets: &[Packet]) {
    ctx.fold_sequence(packets);
}
