use anyhow::{Context, Result};
use packetline_normalizer::normalize_packet;
use packetline_runtime::PacketLog;
use packetline_types::NormalizedPacket;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct NormalizedLine {
    turn_index: usize,
    tab_index: usize,
    #[serde(flatten)]
    packet: NormalizedPacket,
}

pub fn handle(file: &Path) -> Result<()> {
    let log = PacketLog::load(file)
        .with_context(|| format!("failed to read packet log {}", file.display()))?;

    for packet in &log.packets {
        let line = NormalizedLine {
            turn_index: packet.placement.turn_index,
            tab_index: packet.placement.tab_index,
            packet: normalize_packet(packet),
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(())
}
