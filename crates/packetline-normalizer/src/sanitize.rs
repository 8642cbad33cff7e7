use regex::Regex;
use std::sync::LazyLock;

/// Everything up to and including the last `sandboxes/<id>` or `sessions/<id>` segment.
static SESSION_ROOT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*/(?:sandboxes|sessions)/[A-Za-z0-9_-]+(?:/|$)").unwrap());

/// Absolute session-rooted path prefixes embedded in free text.
static SESSION_ROOT_IN_TEXT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(^|[\s"'`=(:])(?:/[^\s"'`/]+)*/(?:sandboxes|sessions)/[A-Za-z0-9_-]+/"#).unwrap()
});

const FALLBACK_SEGMENTS: usize = 3;

/// Rewrite an absolute filesystem path relative to its session root.
///
/// - relative paths pass through unchanged
/// - a path containing `sandboxes/<id>` or `sessions/<id>` keeps only what follows
///   the last such segment (`.` when nothing follows)
/// - other absolute paths keep their last three segments
/// - short absolute paths pass through unchanged
///
/// # Examples
/// ```
/// use packetline_normalizer::sanitize_path;
///
/// assert_eq!(
///     sanitize_path("/data/sandboxes/0f3c/sessions/ab12/outputs/web/page.tsx"),
///     "outputs/web/page.tsx"
/// );
/// assert_eq!(sanitize_path("/home/me/project/src/main.rs"), "project/src/main.rs");
/// assert_eq!(sanitize_path("src/main.rs"), "src/main.rs");
/// ```
pub fn sanitize_path(path: &str) -> String {
    if !path.starts_with('/') {
        return path.to_string();
    }

    if let Some(found) = SESSION_ROOT_REGEX.find(path) {
        let rest = path[found.end()..].trim_start_matches('/');
        return if rest.is_empty() {
            ".".to_string()
        } else {
            rest.to_string()
        };
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() > FALLBACK_SEGMENTS {
        segments[segments.len() - FALLBACK_SEGMENTS..].join("/")
    } else {
        path.to_string()
    }
}

/// Strip session-root prefixes from every absolute path embedded in `text`
/// (command lines, tool output). Other text is left untouched.
pub fn sanitize_text(text: &str) -> String {
    SESSION_ROOT_IN_TEXT_REGEX
        .replace_all(text, "${1}")
        .into_owned()
}
