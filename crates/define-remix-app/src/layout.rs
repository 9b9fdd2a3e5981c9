//! Parent layout resolution
//!
//! A route nests inside every known route whose tokens form a prefix of its
//! own, outermost first, below the root module. Comparison ignores dynamic
//! parameter names and a trailing `_`, and a trailing `_` on the candidate's
//! token opts out of nesting at that level only:
//!
//! | files                         | layouts of the last file      |
//! |-------------------------------|-------------------------------|
//! | `about`, `about.us`           | root, `about`                 |
//! | `about`, `about_.us`          | root                          |
//! | `about`, `about._index`       | root, `about`                 |
//! | `_auth`, `_auth.login`        | root, `_auth`                 |
//! | `product.$id`, `product.$slug.reviews` | root, `product.$id` |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::path::PrefixHierarchy;
use crate::route::parser::ParsedRouteFile;
use crate::route::pattern::TokenKind;
use crate::{exports, RouteFile, RoutePathSegment};

/// Route id of the root module
pub const ROOT_ROUTE_ID: &str = "root";

/// One wrapping layout of a route, outermost first in [`crate::RouteInfo::parent_layouts`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub layout_module: PathBuf,
    pub layout_export_name: String,
    pub path: Vec<RoutePathSegment>,
}

/// A known route file together with its parsed name and Remix route id
#[derive(Debug, Clone)]
pub struct RouteEntry<'a> {
    pub file: &'a RouteFile,
    pub parsed: ParsedRouteFile,
    pub route_id: String,
}

impl RouteEntry<'_> {
    /// Whether this entry takes part in the route tree at all
    pub fn is_route_module(&self) -> bool {
        self.file.has_default() || self.file.has_error_boundary()
    }
}

/// A structural ancestor of a route
#[derive(Debug, Clone)]
pub struct Ancestor<'a> {
    pub file: &'a RouteFile,
    pub export_name: &'static str,
    pub path: Vec<RoutePathSegment>,
    pub route_id: &'a str,
    pub is_root: bool,
}

impl Ancestor<'_> {
    /// Whether this ancestor renders markup around its descendants
    ///
    /// Route modules without a default export still scope error boundaries
    /// but render nothing themselves.
    pub fn renders_layout(&self) -> bool {
        self.is_root || self.file.has_default()
    }

    /// Whether this ancestor can own an error boundary for its descendants
    pub fn owns_error_boundary(&self) -> bool {
        self.export_name != exports::LAYOUT && self.file.has_error_boundary()
    }

    pub fn to_layout_info(&self) -> LayoutInfo {
        LayoutInfo {
            layout_module: self.file.file_path.clone(),
            layout_export_name: self.export_name.to_string(),
            path: self.path.clone(),
        }
    }
}

/// Prefix comparison key: parameter names and trailing underscores do not matter
#[derive(Debug, PartialEq, Eq)]
enum TokenKey<'t> {
    Text(&'t str),
    Pathless(&'t str),
    Dynamic,
    Optional,
    CatchAll,
    Index,
}

fn token_key(kind: &TokenKind) -> TokenKey<'_> {
    match kind {
        TokenKind::Static(text) | TokenKind::Escaped(text) => TokenKey::Text(text),
        TokenKind::Pathless(text) => TokenKey::Pathless(text),
        TokenKind::Required(_) => TokenKey::Dynamic,
        TokenKind::Optional(_) => TokenKey::Optional,
        TokenKind::CatchAll => TokenKey::CatchAll,
        TokenKind::Index => TokenKey::Index,
    }
}

fn same_keys(a: &[TokenKind], b: &[TokenKind]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| token_key(x) == token_key(y))
}

/// Resolves ancestors of routes against a snapshot of known files
pub struct LayoutMatcher<'a> {
    root: Option<&'a RouteFile>,
    entries: &'a [RouteEntry<'a>],
}

impl<'a> LayoutMatcher<'a> {
    pub fn new(root: Option<&'a RouteFile>, entries: &'a [RouteEntry<'a>]) -> Self {
        Self { root, entries }
    }

    /// Ancestors of the root module: its `Layout` export, then its `default` export
    pub fn root_ancestors(&self) -> Vec<Ancestor<'a>> {
        let Some(root) = self.root else {
            return Vec::new();
        };

        [exports::LAYOUT, exports::DEFAULT]
            .into_iter()
            .filter(|name| root.has_export(name))
            .map(|export_name| Ancestor {
                file: root,
                export_name,
                path: Vec::new(),
                route_id: ROOT_ROUTE_ID,
                is_root: true,
            })
            .collect()
    }

    /// Finds the known route whose tokens equal `prefix` of the candidate
    ///
    /// A literal token match wins over a parameter-name-insensitive one; ties
    /// go to the earliest discovered file.
    fn entry_for_prefix(&self, candidate: &ParsedRouteFile, len: usize) -> Option<&'a RouteEntry<'a>> {
        let prefix = &candidate.kinds[..len];
        let mut matching = self
            .entries
            .iter()
            .filter(|entry| !entry.parsed.is_index && entry.is_route_module())
            .filter(|entry| same_keys(&entry.parsed.kinds, prefix))
            .peekable();

        let first = *matching.peek()?;
        Some(
            matching
                .find(|entry| entry.parsed.tokens[..] == candidate.tokens[..len])
                .unwrap_or(first),
        )
    }

    /// All ancestors of a route, outermost first
    pub fn ancestors(&self, candidate: &ParsedRouteFile) -> Vec<Ancestor<'a>> {
        let mut ancestors = self.root_ancestors();

        for prefix in PrefixHierarchy::new(&candidate.kinds) {
            let len = prefix.len();

            // `about_.us` does not nest under `about`, but still under shorter prefixes
            if matches!(prefix[len - 1], TokenKind::Escaped(_)) {
                continue;
            }

            if let Some(entry) = self.entry_for_prefix(candidate, len) {
                ancestors.push(Ancestor {
                    file: entry.file,
                    export_name: exports::DEFAULT,
                    path: entry.parsed.path.clone(),
                    route_id: &entry.route_id,
                    is_root: false,
                });
            }
        }

        ancestors
    }

    /// Rendered parent layouts of a route, outermost first
    pub fn parent_layouts(&self, candidate: &ParsedRouteFile) -> Vec<LayoutInfo> {
        self.ancestors(candidate)
            .iter()
            .filter(|a| a.renders_layout())
            .map(Ancestor::to_layout_info)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::parser::parse_route_stem;
    use pretty_assertions::assert_eq;

    fn entries_for<'a>(files: &'a [RouteFile]) -> Vec<RouteEntry<'a>> {
        files
            .iter()
            .map(|file| {
                let stem = file.file_path.file_stem().unwrap().to_str().unwrap();
                RouteEntry {
                    file,
                    parsed: parse_route_stem(stem).unwrap(),
                    route_id: format!("routes/{}", stem),
                }
            })
            .collect()
    }

    fn layout_modules(matcher: &LayoutMatcher<'_>, stem: &str) -> Vec<String> {
        matcher
            .parent_layouts(&parse_route_stem(stem).unwrap())
            .into_iter()
            .map(|l| format!("{}#{}", l.layout_module.display(), l.layout_export_name))
            .collect()
    }

    #[test]
    fn test_root_layout_then_default() {
        let root = RouteFile::new("/app/root.tsx", ["Layout", "default"]);
        let matcher = LayoutMatcher::new(Some(&root), &[]);
        assert_eq!(
            layout_modules(&matcher, "about"),
            vec!["/app/root.tsx#Layout", "/app/root.tsx#default"]
        );
    }

    #[test]
    fn test_nested_and_opt_out() {
        let files = vec![RouteFile::new("/r/about.tsx", ["default"])];
        let entries = entries_for(&files);
        let matcher = LayoutMatcher::new(None, &entries);

        assert_eq!(layout_modules(&matcher, "about.us"), vec!["/r/about.tsx#default"]);
        assert!(layout_modules(&matcher, "about_.us").is_empty());
        assert_eq!(layout_modules(&matcher, "about._index"), vec!["/r/about.tsx#default"]);
    }

    #[test]
    fn test_opt_out_only_skips_one_level() {
        let files = vec![
            RouteFile::new("/r/shop.tsx", ["default"]),
            RouteFile::new("/r/shop.cart.tsx", ["default"]),
        ];
        let entries = entries_for(&files);
        let matcher = LayoutMatcher::new(None, &entries);

        assert_eq!(
            layout_modules(&matcher, "shop.cart_.checkout"),
            vec!["/r/shop.tsx#default"]
        );
    }

    #[test]
    fn test_dynamic_tokens_match_by_position() {
        let files = vec![RouteFile::new("/r/product.$id.tsx", ["default"])];
        let entries = entries_for(&files);
        let matcher = LayoutMatcher::new(None, &entries);

        assert_eq!(
            layout_modules(&matcher, "product.$slug.reviews"),
            vec!["/r/product.$id.tsx#default"]
        );
        assert!(layout_modules(&matcher, "product.($slug).reviews").is_empty());
    }

    #[test]
    fn test_literal_match_wins() {
        let files = vec![
            RouteFile::new("/r/product.$id.tsx", ["default"]),
            RouteFile::new("/r/product.$slug.tsx", ["default"]),
        ];
        let entries = entries_for(&files);
        let matcher = LayoutMatcher::new(None, &entries);

        assert_eq!(
            layout_modules(&matcher, "product.$slug.reviews"),
            vec!["/r/product.$slug.tsx#default"]
        );
    }

    #[test]
    fn test_index_and_loader_only_files_are_not_layouts() {
        let files = vec![
            RouteFile::new("/r/about._index.tsx", ["default"]),
            RouteFile::new("/r/blog.tsx", ["loader"]),
        ];
        let entries = entries_for(&files);
        let matcher = LayoutMatcher::new(None, &entries);

        assert!(layout_modules(&matcher, "about.team").is_empty());
        assert!(layout_modules(&matcher, "blog.post").is_empty());
    }

    #[test]
    fn test_error_boundary_only_ancestor_is_structural() {
        let files = vec![RouteFile::new("/r/admin.tsx", ["ErrorBoundary"])];
        let entries = entries_for(&files);
        let matcher = LayoutMatcher::new(None, &entries);
        let parsed = parse_route_stem("admin.users").unwrap();

        let ancestors = matcher.ancestors(&parsed);
        assert_eq!(ancestors.len(), 1);
        assert!(!ancestors[0].renders_layout());
        assert!(matcher.parent_layouts(&parsed).is_empty());
    }
}
