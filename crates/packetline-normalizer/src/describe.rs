use packetline_types::{DiffContent, TodoItem};
use serde_json::Value;

use crate::fields;
use crate::sanitize::{sanitize_path, sanitize_text};
use crate::todos::summarize_todos;
use crate::tools::ResolvedTool;

const GENERIC_TITLE: &str = "Running tool";

/// Display title for a tool call.
///
/// Edits are "Writing" when the diff shows a new file and "Editing" otherwise.
pub fn tool_title(tool: &ResolvedTool, obj: &Value, diff: Option<&DiffContent>) -> String {
    let title = match tool.name.as_str() {
        "bash" => "Running command",
        "read" => "Reading file",
        "edit" if diff.is_some_and(|d| d.is_new_file) => "Writing file",
        "edit" => "Editing file",
        "write" => "Writing file",
        "glob" => "Finding files",
        "grep" => "Searching files",
        "list" => "Listing files",
        "webfetch" => "Fetching web page",
        "websearch" => "Searching the web",
        "task" => "Running task",
        "todowrite" => "Updating todos",
        "todoread" => "Reading todos",
        _ => {
            return fields::title(obj)
                .map(sanitize_text)
                .unwrap_or_else(|| GENERIC_TITLE.to_string());
        }
    };
    title.to_string()
}

/// One-line description for a tool call.
///
/// - read / edit / write: sanitized target path
/// - bash: sanitized freeform description
/// - search and fetch tools: pattern, query or url
/// - task: subagent description
/// - todowrite: current todo summary
pub fn tool_description(
    tool: &ResolvedTool,
    obj: &Value,
    input: &Value,
    diff: Option<&DiffContent>,
    todos: &[TodoItem],
) -> String {
    match tool.name.as_str() {
        "read" | "edit" | "write" => fields::file_path(obj, input)
            .or_else(|| diff.and_then(|d| d.path.as_deref()))
            .map(sanitize_path)
            .unwrap_or_default(),
        "glob" | "grep" | "list" | "webfetch" | "websearch" => fields::pattern(input)
            .or_else(|| fields::file_path(obj, input))
            .map(sanitize_text)
            .unwrap_or_default(),
        "todowrite" => summarize_todos(todos),
        _ => fields::description(obj, input)
            .map(sanitize_text)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packetline_types::ToolKind;
    use serde_json::json;

    fn tool(name: &str) -> ResolvedTool {
        ResolvedTool {
            name: name.to_string(),
            kind: ToolKind::Other,
        }
    }

    fn diff(is_new_file: bool) -> DiffContent {
        DiffContent {
            path: Some("/w/sessions/s1/outputs/app.tsx".to_string()),
            old_text: String::new(),
            new_text: "x".to_string(),
            is_new_file,
        }
    }

    #[test]
    fn test_edit_title_follows_diff() {
        let obj = json!({});
        assert_eq!(tool_title(&tool("edit"), &obj, Some(&diff(true))), "Writing file");
        assert_eq!(tool_title(&tool("edit"), &obj, Some(&diff(false))), "Editing file");
        assert_eq!(tool_title(&tool("edit"), &obj, None), "Editing file");
    }

    #[test]
    fn test_unknown_tool_title_fallbacks() {
        assert_eq!(
            tool_title(&tool("unknown"), &json!({"title": "Consulting oracle"}), None),
            "Consulting oracle"
        );
        assert_eq!(tool_title(&tool("unknown"), &json!({}), None), "Running tool");
    }

    #[test]
    fn test_edit_description_uses_diff_path() {
        let description = tool_description(
            &tool("edit"),
            &json!({}),
            &Value::Null,
            Some(&diff(true)),
            &[],
        );
        assert_eq!(description, "outputs/app.tsx");
    }

    #[test]
    fn test_search_description_is_pattern() {
        let input = json!({"pattern": "fn main", "path": "src"});
        assert_eq!(
            tool_description(&tool("grep"), &json!({}), &input, None, &[]),
            "fn main"
        );
    }

    #[test]
    fn test_execute_description_is_sanitized() {
        let input = json!({"description": "List /srv/sessions/s9/outputs/", "command": "ls"});
        assert_eq!(
            tool_description(&tool("bash"), &json!({}), &input, None, &[]),
            "List outputs/"
        );
    }
}
