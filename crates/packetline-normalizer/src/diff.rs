use packetline_types::DiffContent;
use serde_json::Value;

use crate::fields;

/// Patch operation type, from the patch header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOperation {
    /// File creation (*** Add File:)
    Add,
    /// File modification (*** Update File:)
    Update,
}

/// Header of a raw apply-patch block
///
/// # Format
/// ```text
/// *** Begin Patch
/// *** Add File: path/to/file.rs
/// +content line 1
/// *** End Patch
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchHeader {
    pub operation: PatchOperation,
    pub file_path: String,
}

/// Find the first file header in a patch block.
pub fn parse_patch_header(raw: &str) -> Option<PatchHeader> {
    raw.lines().find_map(|line| {
        let line = line.trim_start();
        if let Some(path) = line.strip_prefix("*** Add File: ") {
            Some(PatchHeader {
                operation: PatchOperation::Add,
                file_path: path.trim().to_string(),
            })
        } else {
            line.strip_prefix("*** Update File: ")
                .map(|path| PatchHeader {
                    operation: PatchOperation::Update,
                    file_path: path.trim().to_string(),
                })
        }
    })
}

/// First `{"type": "diff"}` entry in the payload content.
fn content_diff_entry(obj: &Value) -> Option<&Value> {
    obj.get("content")
        .and_then(Value::as_array)?
        .iter()
        .find(|block| block.get("type").and_then(Value::as_str) == Some("diff"))
}

/// Whether the payload carries anything edit-shaped: a content diff entry,
/// old/new text in the input, or a patch text field.
pub(crate) fn has_diff_shape(obj: &Value, input: &Value) -> bool {
    content_diff_entry(obj).is_some()
        || fields::old_text(input).is_some()
        || fields::new_text(input).is_some()
        || fields::patch_text(input).is_some()
}

fn structured_diff(obj: &Value, input: &Value) -> Option<DiffContent> {
    let (source, path) = match content_diff_entry(obj) {
        Some(entry) => (entry, fields::file_path(&Value::Null, entry)),
        None if fields::old_text(input).is_some() || fields::new_text(input).is_some() => {
            (input, fields::file_path(obj, input))
        }
        None => return None,
    };

    let old_text = fields::old_text(source).unwrap_or_default().to_string();
    let new_text = fields::new_text(source).unwrap_or_default().to_string();
    Some(DiffContent {
        path: path.map(str::to_string),
        is_new_file: old_text.is_empty(),
        old_text,
        new_text,
    })
}

/// Resolve the edit shown for a tool call.
///
/// A structured diff with any text decides on its own: the file is new when the old
/// text is empty. The patch header is consulted only when no such diff exists, and
/// then supplies both the path (if missing) and the new-vs-update flag. The diff takes
/// precedence even when the two disagree.
pub fn extract_diff(obj: &Value, input: &Value) -> Option<DiffContent> {
    let structured = structured_diff(obj, input);
    if let Some(diff) = &structured
        && !(diff.old_text.is_empty() && diff.new_text.is_empty())
    {
        return structured;
    }

    let header = fields::patch_text(input).and_then(parse_patch_header);
    match (structured, header) {
        (Some(diff), Some(header)) => Some(DiffContent {
            path: diff.path.or(Some(header.file_path)),
            is_new_file: header.operation == PatchOperation::Add,
            ..diff
        }),
        (None, Some(header)) => Some(DiffContent {
            path: Some(header.file_path),
            old_text: String::new(),
            new_text: String::new(),
            is_new_file: header.operation == PatchOperation::Add,
        }),
        (Some(diff), None) => Some(DiffContent {
            is_new_file: false,
            ..diff
        }),
        (None, None) => None,
    }
}
