/// Path utilities for URLs, readable URIs and route path identity
///
/// All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

use crate::error::RouteParseError;
use crate::route::parser::parse_route_stem;
use crate::route::pattern::{escape_literal, readable_literal};
use crate::RoutePathSegment;

pub mod hierarchy;
pub use hierarchy::PrefixHierarchy;

/// Placeholder used for every dynamic segment in [`route_path_id`]
pub const DYNAMIC_PLACEHOLDER: &str = ":param";

/// Validates if a URL path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
///
/// # Examples
///
/// ```
/// use define_remix_app::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/about"));
/// assert!(!is_valid_path("about"));
/// assert!(!is_valid_path("/about/"));
/// assert!(!is_valid_path("/about//page"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a URL path to canonical form
///
/// Returns `Cow::Borrowed` when input is already valid (zero allocations).
/// Returns `Cow::Owned` when normalization is needed.
///
/// # Examples
///
/// ```
/// use define_remix_app::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("about/"), "/about");
/// assert_eq!(normalize_path("\\users\\123"), "/users/123");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Builds the collision identity of a route path
///
/// Static text is kept, every dynamic segment becomes [`DYNAMIC_PLACEHOLDER`],
/// so `product/$id` and `product/$slug` share one id.
///
/// # Examples
///
/// ```
/// use define_remix_app::path::route_path_id;
/// use define_remix_app::RoutePathSegment;
///
/// let a = vec![RoutePathSegment::static_text("product"), RoutePathSegment::dynamic("id")];
/// let b = vec![RoutePathSegment::static_text("product"), RoutePathSegment::dynamic("slug")];
/// assert_eq!(route_path_id(&a), route_path_id(&b));
/// assert_eq!(route_path_id(&a), "product/:param");
/// ```
pub fn route_path_id(path: &[RoutePathSegment]) -> String {
    path.iter()
        .map(|segment| match segment {
            RoutePathSegment::Static { text } => text.as_str(),
            RoutePathSegment::Dynamic { .. } => DYNAMIC_PLACEHOLDER,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Renders a route path as a readable URI (`product/$id`, `($lang)/about`, `docs/$`)
pub fn route_path_to_readable_string(path: &[RoutePathSegment]) -> String {
    path.iter()
        .map(|segment| match segment {
            RoutePathSegment::Static { text } => readable_literal(text),
            RoutePathSegment::Dynamic {
                is_catch_all: true, ..
            } => "$".to_string(),
            RoutePathSegment::Dynamic {
                name,
                is_optional: true,
                ..
            } => format!("(${})", name),
            RoutePathSegment::Dynamic { name, .. } => format!("${}", name),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Converts a readable URI into file-name tokens
///
/// Slashes separate tokens; literal dots are escaped so they stay inside one
/// token, and `[...]` escapes are kept. An empty URI is the home route (`_index`).
///
/// # Examples
///
/// ```
/// use define_remix_app::path::readable_string_to_tokens;
///
/// assert_eq!(readable_string_to_tokens("about/us"), vec!["about", "us"]);
/// assert_eq!(readable_string_to_tokens("/sitemap.xml/"), vec!["sitemap[.]xml"]);
/// assert_eq!(readable_string_to_tokens(""), vec!["_index"]);
/// ```
pub fn readable_string_to_tokens(uri: &str) -> Vec<String> {
    let tokens: Vec<String> = uri
        .split('/')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(escape_literal)
        .collect();

    if tokens.is_empty() {
        vec!["_index".to_string()]
    } else {
        tokens
    }
}

/// Parses a readable URI into a route path (reverse of the readable mapping)
///
/// # Examples
///
/// ```
/// use define_remix_app::path::readable_string_to_route_path;
/// use define_remix_app::RoutePathSegment;
///
/// let path = readable_string_to_route_path("product/($variant)").unwrap();
/// assert_eq!(
///     path,
///     vec![RoutePathSegment::static_text("product"), RoutePathSegment::optional("variant")]
/// );
/// ```
pub fn readable_string_to_route_path(uri: &str) -> Result<Vec<RoutePathSegment>, RouteParseError> {
    parse_route_stem(&readable_string_to_tokens(uri).join(".")).map(|parsed| parsed.path)
}
