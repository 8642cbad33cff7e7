use packetline_normalizer::{normalize_tool_start, resolve_tool, tool_display_name};
use packetline_types::{Packet, PacketType};
use serde_json::Value;

/// How a group is classified, decided once from its first packet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupClass {
    pub is_tool_group: bool,
    pub is_display_group: bool,
    /// Human-facing tool name to list, when one can be derived
    pub tool_name: Option<String>,
}

pub fn classify_first_packet(packet: &Packet) -> GroupClass {
    let packet_type = packet.packet_type();

    let is_tool_group = packet_type.is_tool_start()
        && !(packet_type == PacketType::ToolCallStart && resolve_tool(&packet.obj).is_todo_write());

    GroupClass {
        is_tool_group,
        is_display_group: packet_type.is_content_start(),
        tool_name: is_tool_group
            .then(|| tool_start_name(&packet_type, &packet.obj))
            .flatten(),
    }
}

/// Display name for a tool start packet.
pub fn tool_start_name(packet_type: &PacketType, obj: &Value) -> Option<String> {
    let name = match packet_type {
        PacketType::ToolCallStart => {
            return tool_display_name(&normalize_tool_start(obj).tool_name);
        }
        PacketType::SearchToolStart => {
            if obj
                .get("is_internet_search")
                .and_then(Value::as_bool)
                .unwrap_or(false)
            {
                "Web Search"
            } else {
                "Internal Search"
            }
        }
        PacketType::OpenUrlStart => "Open URL",
        PacketType::PythonToolStart => "Code Interpreter",
        PacketType::ImageGenerationStart => "Image Generation",
        PacketType::ResearchAgentStart => "Research Agent",
        PacketType::CustomToolStart => {
            return obj
                .get("tool_name")
                .and_then(Value::as_str)
                .filter(|name| !name.trim().is_empty())
                .map(str::to_string);
        }
        _ => return None,
    };
    Some(name.to_string())
}
