// Field resolution (single place for naming-convention fallbacks)
pub mod fields;

// Tool registry and identity inference
pub mod tools;

// Diff and patch-header extraction
pub mod diff;

// Path sanitation
pub mod sanitize;

// Todo list extraction
pub mod todos;

// Titles and descriptions
pub mod describe;

// Packet normalization
pub mod normalize;

// Per-call merge of start/progress packets
pub mod merge;

pub use describe::{tool_description, tool_title};
pub use diff::{PatchHeader, PatchOperation, extract_diff, parse_patch_header};
pub use merge::merge_tool_calls;
pub use normalize::{
    normalize_packet, normalize_payload, normalize_tool_progress, normalize_tool_start,
    tool_call_todos,
};
pub use sanitize::{sanitize_path, sanitize_text};
pub use todos::extract_todos;
pub use tools::{
    ResolvedTool, ToolSpec, UNKNOWN_TOOL, find_tool, resolve_tool, resolve_tool_name,
    tool_display_name,
};
