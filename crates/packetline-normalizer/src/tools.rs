use packetline_types::ToolKind;
use serde_json::Value;

use crate::diff::has_diff_shape;
use crate::fields;

/// Name used when no tool identity can be resolved
pub const UNKNOWN_TOOL: &str = "unknown";

/// Tool specification with canonical name, aliases and semantic kind
pub struct ToolSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ToolKind,
    pub aliases: &'static [&'static str],
}

impl ToolSpec {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        kind: ToolKind,
        aliases: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            label,
            kind,
            aliases,
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        self.name == candidate || self.aliases.contains(&candidate)
    }
}

/// Registry of coding-agent tools
const TOOLS: &[ToolSpec] = &[
    // Execute tools
    ToolSpec::new("bash", "Bash", ToolKind::Execute, &["shell", "execute", "run_command"]),
    // Read tools
    ToolSpec::new("read", "Read", ToolKind::Read, &["read_file", "view"]),
    // Edit tools
    ToolSpec::new(
        "edit",
        "Edit",
        ToolKind::Edit,
        &["multiedit", "apply_patch", "patch", "str_replace_editor"],
    ),
    ToolSpec::new("write", "Write", ToolKind::Edit, &["write_file", "create_file"]),
    // Search tools
    ToolSpec::new("glob", "Glob", ToolKind::Search, &["find", "find_files"]),
    ToolSpec::new("grep", "Grep", ToolKind::Search, &["search", "ripgrep"]),
    ToolSpec::new("list", "List", ToolKind::Search, &["ls", "list_dir"]),
    // Fetch tools
    ToolSpec::new("webfetch", "WebFetch", ToolKind::Fetch, &["web_fetch", "fetch"]),
    ToolSpec::new("websearch", "WebSearch", ToolKind::Fetch, &["web_search"]),
    // Planning tools
    ToolSpec::new("task", "Task", ToolKind::Think, &["agent", "subagent"]),
    ToolSpec::new("todowrite", "TodoWrite", ToolKind::Think, &["todo_write"]),
    ToolSpec::new("todoread", "TodoRead", ToolKind::Think, &["todo_read"]),
];

/// Look up a tool by canonical name or alias (case-insensitive).
pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    let lower = name.trim().to_ascii_lowercase();
    TOOLS.iter().find(|spec| spec.matches(&lower))
}

/// Tool identity after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTool {
    pub name: String,
    pub kind: ToolKind,
}

impl ResolvedTool {
    fn from_spec(spec: &ToolSpec) -> Self {
        Self {
            name: spec.name.to_string(),
            kind: spec.kind,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_TOOL
    }

    pub fn is_todo_write(&self) -> bool {
        self.name == "todowrite"
    }
}

/// Resolve the tool behind a tool-call payload.
///
/// Priority:
/// 1. explicit tool name field
/// 2. a title that names a known tool
/// 3. subagent type in the input (task)
/// 4. todo list in the input (todo write)
/// 5. patch or diff shaped input/content (edit)
/// 6. command string (execute)
/// 7. backend kind tag
///
/// Falls back to `unknown` / `ToolKind::Other`.
pub fn resolve_tool(obj: &Value) -> ResolvedTool {
    let backend_kind = fields::backend_kind(obj).map(ToolKind::parse);

    if let Some(name) = fields::explicit_tool_name(obj) {
        return match find_tool(name) {
            Some(spec) => ResolvedTool::from_spec(spec),
            None => ResolvedTool {
                name: name.trim().to_ascii_lowercase(),
                kind: backend_kind.unwrap_or(ToolKind::Other),
            },
        };
    }

    if let Some(spec) = fields::title(obj).and_then(find_tool) {
        return ResolvedTool::from_spec(spec);
    }

    let input = fields::input(obj);
    let inferred = if fields::subagent_type(input).is_some() {
        Some("task")
    } else if fields::input_todos(input).is_some() {
        Some("todowrite")
    } else if has_diff_shape(obj, input) {
        Some("edit")
    } else if fields::command(obj, input).is_some() {
        Some("bash")
    } else {
        backend_kind.and_then(tool_for_kind)
    };

    inferred
        .and_then(find_tool)
        .map(ResolvedTool::from_spec)
        .unwrap_or_else(|| ResolvedTool {
            name: UNKNOWN_TOOL.to_string(),
            kind: ToolKind::Other,
        })
}

/// Canonical tool name, `unknown` when unresolvable
pub fn resolve_tool_name(obj: &Value) -> String {
    resolve_tool(obj).name
}

/// Fixed mapping from backend kind tags to tools
fn tool_for_kind(kind: ToolKind) -> Option<&'static str> {
    match kind {
        ToolKind::Execute => Some("bash"),
        ToolKind::Read => Some("read"),
        ToolKind::Edit | ToolKind::Delete | ToolKind::Move => Some("edit"),
        ToolKind::Search => Some("glob"),
        ToolKind::Fetch => Some("webfetch"),
        ToolKind::Think | ToolKind::Other => None,
    }
}

/// Human-facing tool name for tool lists. `None` when the tool is unresolved.
pub fn tool_display_name(name: &str) -> Option<String> {
    if name.is_empty() || name == UNKNOWN_TOOL {
        return None;
    }
    Some(
        find_tool(name)
            .map(|spec| spec.label.to_string())
            .unwrap_or_else(|| name.to_string()),
    )
}
