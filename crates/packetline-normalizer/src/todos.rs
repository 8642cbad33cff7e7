use packetline_types::{TodoItem, TodoStatus};
use serde_json::Value;

use crate::fields::pick_str;

/// Normalize a raw todo list.
///
/// Accepts an array of todo objects or a JSON string encoding one. Entries
/// without any text are dropped; unknown statuses become `pending`; a missing
/// active form falls back to the content.
pub fn extract_todos(raw: &Value) -> Vec<TodoItem> {
    match raw {
        Value::Array(items) => items.iter().filter_map(todo_item).collect(),
        Value::String(encoded) => serde_json::from_str::<Value>(encoded)
            .ok()
            .filter(Value::is_array)
            .map(|decoded| extract_todos(&decoded))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn todo_item(raw: &Value) -> Option<TodoItem> {
    let content = pick_str(raw, &["content", "text", "title"])?.trim().to_string();
    let status = pick_str(raw, &["status", "state"])
        .map(TodoStatus::parse)
        .unwrap_or_default();
    let active_form = pick_str(raw, &["activeForm", "active_form"])
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| content.clone());

    Some(TodoItem {
        content,
        status,
        active_form,
    })
}

/// One-line summary of a todo list: the in-progress item (or the first item),
/// followed by the number of remaining entries.
pub(crate) fn summarize_todos(todos: &[TodoItem]) -> String {
    let Some(lead) = todos
        .iter()
        .find(|todo| todo.status == TodoStatus::InProgress)
        .or_else(|| todos.first())
    else {
        return String::new();
    };

    let text = if lead.status == TodoStatus::InProgress {
        &lead.active_form
    } else {
        &lead.content
    };

    match todos.len() - 1 {
        0 => text.clone(),
        more => format!("{text} (+{more} more)"),
    }
}
