//! Export-name detection for route modules
//!
//! A lexical scan, not a parser: enough to tell which of `default`, `loader`,
//! `ErrorBoundary` and `Layout` a module exports. Type-only exports are
//! ignored.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

// `://` is kept so URLs inside strings survive
static LINE_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^|[^:])//[^\n]*$").unwrap());

static DEFAULT_EXPORT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bexport\s+default\b").unwrap());

static DECLARATION_EXPORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bexport\s+(?:declare\s+)?(?:async\s+function\s*\*?\s*|function\s*\*?\s*|(?:const|let|var|class|abstract\s+class|enum)\s+)([A-Za-z_$][\w$]*)",
    )
    .unwrap()
});

static LIST_EXPORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s+(type\s+)?\{([^}]*)\}").unwrap());

static NAMESPACE_EXPORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s+\*\s+as\s+([A-Za-z_$][\w$]*)").unwrap());

/// Names exported by a JavaScript/TypeScript module
///
/// # Examples
///
/// ```
/// use define_remix_app::fs::detect_exports;
///
/// let exports = detect_exports(r#"
///     export async function loader() { return null; }
///     export { Boundary as ErrorBoundary };
///     export default function Page() {}
/// "#);
/// assert!(exports.contains("default"));
/// assert!(exports.contains("loader"));
/// assert!(exports.contains("ErrorBoundary"));
/// ```
pub fn detect_exports(source: &str) -> BTreeSet<String> {
    let source = BLOCK_COMMENT_REGEX.replace_all(source, "");
    let source = LINE_COMMENT_REGEX.replace_all(&source, "$1");

    let mut names = BTreeSet::new();

    if DEFAULT_EXPORT_REGEX.is_match(&source) {
        names.insert("default".to_string());
    }

    for captures in DECLARATION_EXPORT_REGEX.captures_iter(&source) {
        names.insert(captures[1].to_string());
    }

    for captures in NAMESPACE_EXPORT_REGEX.captures_iter(&source) {
        names.insert(captures[1].to_string());
    }

    for captures in LIST_EXPORT_REGEX.captures_iter(&source) {
        if captures.get(1).is_some() {
            continue;
        }
        names.extend(captures[2].split(',').filter_map(list_item_name));
    }

    names
}

/// Exported name of one `export { ... }` item (`a`, `a as b`, `type T`)
fn list_item_name(item: &str) -> Option<String> {
    let item = item.trim();
    if item.is_empty() || item.starts_with("type ") {
        return None;
    }
    let name = match item.split_once(" as ") {
        Some((_, alias)) => alias.trim(),
        None => item,
    };
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(source: &str) -> Vec<String> {
        detect_exports(source).into_iter().collect()
    }

    #[test]
    fn test_declarations() {
        let source = r#"
            export const meta = () => [];
            export let counter = 0;
            export class Store {}
            export function* ids() {}
            export async function action() {}
        "#;
        assert_eq!(names(source), vec!["Store", "action", "counter", "ids", "meta"]);
    }

    #[test]
    fn test_type_exports_are_ignored() {
        let source = r#"
            export type Props = { id: string };
            export interface Data { id: string }
            export type { LoaderData };
            export { type Shape, Layout };
        "#;
        assert_eq!(names(source), vec!["Layout"]);
    }

    #[test]
    fn test_reexports() {
        let source = r#"
            export { default, loader } from "./shared";
            export * as helpers from "./helpers";
            export * from "./everything";
        "#;
        assert_eq!(names(source), vec!["default", "helpers", "loader"]);
    }

    #[test]
    fn test_comments_are_stripped() {
        let source = r#"
            // export default function Old() {}
            /* export const loader = 1; */
            const url = "https://example.com"; export function ErrorBoundary() {}
        "#;
        assert_eq!(names(source), vec!["ErrorBoundary"]);
    }

    #[test]
    fn test_default_export_forms() {
        assert!(detect_exports("export default Page;").contains("default"));
        assert!(detect_exports("export default class extends X {}").contains("default"));
        assert!(detect_exports("export { Page as default };").contains("default"));
        assert!(detect_exports("const defaultValue = 1;").is_empty());
    }
}
