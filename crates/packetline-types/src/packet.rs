use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

use super::packet_type::PacketType;

/// Where a packet belongs in the conversation: a turn, and optionally one of
/// several parallel branches (tabs) inside that turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Placement {
    pub turn_index: usize,
    #[serde(default)]
    pub tab_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_turn_index: Option<usize>,
}

impl Placement {
    pub fn new(turn_index: usize, tab_index: usize) -> Self {
        Self {
            turn_index,
            tab_index,
            sub_turn_index: None,
        }
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.turn_index, self.tab_index)
    }
}

/// Identity of a group: one (turn, tab) pair.
///
/// Orders by turn first, tab second, which is also the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub turn_index: usize,
    pub tab_index: usize,
}

impl GroupKey {
    pub fn new(turn_index: usize, tab_index: usize) -> Self {
        Self {
            turn_index,
            tab_index,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.turn_index, self.tab_index)
    }
}

/// One event from the agent.
///
/// The payload stays loosely typed (`obj` always carries a `type` field when well formed);
/// typed views are produced on demand by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub placement: Placement,
    pub obj: Value,
}

impl Packet {
    pub fn new(placement: Placement, obj: Value) -> Self {
        Self { placement, obj }
    }

    /// Build a packet from either envelope shape:
    /// - wrapped: `{"placement": {...}, "obj": {"type": ...}}`
    /// - flat: `{"type": ..., "turn_index": 0, ...}` as forwarded from the agent protocol
    ///
    /// Missing placement resolves to turn 0, tab 0.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::new(Placement::default(), Value::Null);
        };

        let placement = map
            .remove("placement")
            .and_then(|raw| serde_json::from_value::<Placement>(raw).ok())
            .unwrap_or_else(|| flat_placement(&map));

        let obj = match map.remove("obj") {
            Some(obj @ Value::Object(_)) => obj,
            Some(other) => {
                map.insert("obj".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        };

        Self::new(placement, obj)
    }

    /// Group-closing marker injected when the upstream stream never sent one.
    pub fn synthetic_section_end(key: GroupKey) -> Self {
        Self::new(
            Placement::new(key.turn_index, key.tab_index),
            json!({ "type": PacketType::SectionEnd.as_str(), "synthetic": true }),
        )
    }

    pub fn type_str(&self) -> &str {
        self.obj.get("type").and_then(Value::as_str).unwrap_or("")
    }

    pub fn packet_type(&self) -> PacketType {
        PacketType::parse(self.type_str())
    }

    pub fn group_key(&self) -> GroupKey {
        self.placement.group_key()
    }

    pub fn is_synthetic(&self) -> bool {
        self.obj
            .get("synthetic")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

fn flat_placement(map: &Map<String, Value>) -> Placement {
    let index = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| map.get(*key).and_then(Value::as_u64))
            .map(|v| v as usize)
    };

    Placement {
        turn_index: index(&["turn_index", "turnIndex"]).unwrap_or(0),
        tab_index: index(&["tab_index", "tabIndex"]).unwrap_or(0),
        sub_turn_index: index(&["sub_turn_index", "subTurnIndex"]),
    }
}
