// Field resolution for agent packet payloads.
//
// The same logical field arrives under several names depending on which agent
// and which serializer produced the packet (camelCase from the protocol layer,
// snake_case from persisted logs, bare names from older backends). Every lookup
// goes through the tables below, most specific name first. Call sites never
// reach into payloads directly.

use packetline_types::ToolStatus;
use serde_json::Value;

const TOOL_CALL_ID: &[&str] = &["toolCallId", "tool_call_id", "id"];
const TOOL_NAME: &[&str] = &["toolName", "tool_name", "name"];
const INPUT: &[&str] = &["rawInput", "raw_input", "input"];
const OUTPUT: &[&str] = &["rawOutput", "raw_output", "output"];
const STATUS: &[&str] = &["status", "state"];
const DESCRIPTION: &[&str] = &["description", "desc"];
const COMMAND: &[&str] = &["command", "cmd"];
const FILE_PATH: &[&str] = &["filePath", "file_path", "path", "filename"];
const SUBAGENT_TYPE: &[&str] = &["subagent_type", "subagentType"];
const PATCH_TEXT: &[&str] = &["patchText", "patch_text", "patch", "diff"];
const OLD_TEXT: &[&str] = &["oldText", "old_text", "oldString", "old_string"];
const NEW_TEXT: &[&str] = &["newText", "new_text", "newString", "new_string"];
const PATTERN: &[&str] = &["pattern", "query", "glob", "url"];
const STOP_REASON: &[&str] = &["stopReason", "stop_reason"];
const TODOS: &[&str] = &["todos"];

/// First non-null value among `keys`.
pub(crate) fn pick<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| obj.get(key).filter(|value| !value.is_null()))
}

/// First non-empty string among `keys`.
pub(crate) fn pick_str<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        obj.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    })
}

pub fn tool_call_id(obj: &Value) -> Option<String> {
    pick_str(obj, TOOL_CALL_ID).map(str::to_string)
}

/// Explicit tool name, if the payload carries one.
pub fn explicit_tool_name(obj: &Value) -> Option<&str> {
    pick_str(obj, TOOL_NAME)
}

pub fn title(obj: &Value) -> Option<&str> {
    pick_str(obj, &["title"])
}

pub fn backend_kind(obj: &Value) -> Option<&str> {
    pick_str(obj, &["kind"])
}

/// Tool input arguments; `Value::Null` when absent.
pub fn input(obj: &Value) -> &Value {
    pick(obj, INPUT).unwrap_or(&Value::Null)
}

pub fn output(obj: &Value) -> Option<&Value> {
    pick(obj, OUTPUT)
}

pub fn status(obj: &Value) -> ToolStatus {
    pick_str(obj, STATUS)
        .map(ToolStatus::parse)
        .unwrap_or_default()
}

/// Freeform description: input first, then the payload itself.
pub fn description<'a>(obj: &'a Value, input: &'a Value) -> Option<&'a str> {
    pick_str(input, DESCRIPTION).or_else(|| pick_str(obj, DESCRIPTION))
}

/// Command text. Argument vectors are joined with spaces.
pub fn command(obj: &Value, input: &Value) -> Option<String> {
    let value = pick(input, COMMAND).or_else(|| pick(obj, COMMAND))?;
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(parts) => {
            let joined = parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            (!joined.trim().is_empty()).then_some(joined)
        }
        _ => None,
    }
}

/// Target file path: input arguments, then the first reported location.
pub fn file_path<'a>(obj: &'a Value, input: &'a Value) -> Option<&'a str> {
    pick_str(input, FILE_PATH).or_else(|| {
        obj.get("locations")
            .and_then(Value::as_array)
            .and_then(|locations| locations.first())
            .and_then(|location| pick_str(location, FILE_PATH))
    })
}

pub fn subagent_type(input: &Value) -> Option<&str> {
    pick_str(input, SUBAGENT_TYPE)
}

pub fn patch_text(input: &Value) -> Option<&str> {
    pick_str(input, PATCH_TEXT)
}

pub fn old_text(obj: &Value) -> Option<&str> {
    pick(obj, OLD_TEXT).and_then(Value::as_str)
}

pub fn new_text(obj: &Value) -> Option<&str> {
    pick(obj, NEW_TEXT).and_then(Value::as_str)
}

/// Search pattern / query / fetched url
pub fn pattern(input: &Value) -> Option<&str> {
    pick_str(input, PATTERN)
}

/// Todo list carried by the tool input, if any
pub fn input_todos(input: &Value) -> Option<&Value> {
    pick(input, TODOS)
}

/// Todo list: input, then output (directly or under `metadata`), then the payload.
pub fn todos<'a>(obj: &'a Value, input: &'a Value) -> Option<&'a Value> {
    let output = output(obj);
    input_todos(input)
        .or_else(|| output.and_then(|out| pick(out, TODOS)))
        .or_else(|| {
            output
                .and_then(|out| out.get("metadata"))
                .and_then(|meta| pick(meta, TODOS))
        })
        .or_else(|| pick(obj, TODOS))
}

pub fn stop_reason(obj: &Value) -> Option<String> {
    pick_str(obj, STOP_REASON).map(str::to_string)
}

/// Concatenated text of a content value: plain string, `{type: "text", text}` block,
/// nested `{content: ...}` wrapper, or an array of blocks.
pub fn content_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks.iter().map(content_text).collect(),
        Value::Object(map) => {
            if let Some(text) = map.get("text").and_then(Value::as_str) {
                text.to_string()
            } else if let Some(inner) = map.get("content") {
                content_text(inner)
            } else {
                String::new()
            }
        }
        _ => String::new(),
    }
}
