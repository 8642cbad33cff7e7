use packetline_engine::{ProcessingContext, StreamSnapshot, build_snapshot, process_packets};
use packetline_types::Packet;

use crate::config::ReplayMode;

/// Replay a stored sequence and return the final snapshot.
///
/// `Incremental` feeds one growing prefix per packet, the way a live stream
/// delivers it; `Batch` folds everything in one call.
pub fn replay(packets: &[Packet], mode: ReplayMode) -> StreamSnapshot {
    let mut ctx = ProcessingContext::new();
    match mode {
        ReplayMode::Batch => process_packets(&mut ctx, packets),
        ReplayMode::Incremental => {
            for end in 1..=packets.len() {
                process_packets(&mut ctx, &packets[..end]);
            }
        }
    }
    build_snapshot(&ctx)
}

/// Whether incremental and batch replay agree on `packets`.
pub fn replay_modes_agree(packets: &[Packet]) -> bool {
    replay(packets, ReplayMode::Batch) == replay(packets, ReplayMode::Incremental)
}
