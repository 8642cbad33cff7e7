use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A retrieved document as sent in search/fetch document batches.
///
/// Only `document_id` is required; the remaining fields pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDoc {
    pub document_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One deduplicated citation: the first citation number that referenced a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub citation_number: u32,
    pub document_id: String,
}

/// A file produced by the agent (web app, markdown, image, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Artifact {
    /// Stable identity used for deduplication: explicit id, else path.
    pub fn identity(&self) -> Option<&str> {
        self.id.as_deref().or(self.path.as_deref())
    }
}
