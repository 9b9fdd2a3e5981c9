//! URL matching and ranking against route paths
//!
//! Used by preview navigation to resolve a concrete URL to a manifest entry.

use std::collections::HashMap;

use crate::RoutePathSegment;

/// Key under which a splat segment's value is stored (Remix exposes it as `params["*"]`)
pub const SPLAT_PARAM: &str = "*";

/// Matches a route path against a URL path (case-sensitive)
///
/// Returns the extracted params on success.
///
/// # Examples
///
/// ```
/// use define_remix_app::route::matcher::match_route_path;
/// use define_remix_app::RoutePathSegment;
///
/// let path = vec![
///     RoutePathSegment::static_text("product"),
///     RoutePathSegment::dynamic("productId"),
/// ];
/// let params = match_route_path(&path, "/product/42").unwrap();
/// assert_eq!(params.get("productId"), Some(&"42".to_string()));
/// assert!(match_route_path(&path, "/product").is_none());
/// ```
pub fn match_route_path(path: &[RoutePathSegment], url: &str) -> Option<HashMap<String, String>> {
    let url_segments: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();

    // Tail-recursive helper walking route and URL segments together
    fn match_segments(
        route: &[RoutePathSegment],
        url: &[&str],
        mut params: HashMap<String, String>,
    ) -> Option<HashMap<String, String>> {
        let Some((segment, rest)) = route.split_first() else {
            return url.is_empty().then_some(params);
        };

        match segment {
            RoutePathSegment::Dynamic {
                is_catch_all: true,
                ..
            } => {
                // Splat needs at least one remaining segment
                if url.is_empty() {
                    return None;
                }
                params.insert(SPLAT_PARAM.to_string(), url.join("/"));
                Some(params)
            }
            RoutePathSegment::Dynamic {
                name,
                is_optional: true,
                ..
            } => {
                if let Some((value, url_rest)) = url.split_first() {
                    let mut consumed = params.clone();
                    consumed.insert(name.clone(), value.to_string());
                    if let Some(found) = match_segments(rest, url_rest, consumed) {
                        return Some(found);
                    }
                }
                match_segments(rest, url, params)
            }
            RoutePathSegment::Dynamic { name, .. } => {
                let (value, url_rest) = url.split_first()?;
                params.insert(name.clone(), value.to_string());
                match_segments(rest, url_rest, params)
            }
            RoutePathSegment::Static { text } => {
                let (value, url_rest) = url.split_first()?;
                if text != value {
                    return None;
                }
                match_segments(rest, url_rest, params)
            }
        }
    }

    match_segments(path, &url_segments, HashMap::new())
}

/// Calculates route priority for matching order (pure function)
///
/// Lower number = higher priority (matched first).
///
/// # Priority Order
///
/// 1. **Static routes** → 0
/// 2. **Dynamic routes** → 1-999
/// 3. **Splat routes** → 1000+
///
/// # Examples
///
/// ```
/// use define_remix_app::route::matcher::route_priority;
/// use define_remix_app::RoutePathSegment;
///
/// let about = vec![RoutePathSegment::static_text("about")];
/// let product = vec![
///     RoutePathSegment::static_text("product"),
///     RoutePathSegment::dynamic("id"),
/// ];
/// let docs = vec![
///     RoutePathSegment::static_text("docs"),
///     RoutePathSegment::catch_all(),
/// ];
/// assert_eq!(route_priority(&about), 0);
/// assert!(route_priority(&product) < route_priority(&docs));
/// ```
pub fn route_priority(path: &[RoutePathSegment]) -> usize {
    let depth = path.len();
    let has_catch_all = path.iter().any(RoutePathSegment::is_catch_all);
    let dynamic_count = path.iter().filter(|s| s.is_dynamic()).count();
    let has_optional = path.iter().any(RoutePathSegment::is_optional);

    if has_catch_all {
        1000 + depth
    } else if dynamic_count > 0 {
        let optional_bonus = if has_optional { 0 } else { 1 };
        dynamic_count + depth + optional_bonus
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_path() -> Vec<RoutePathSegment> {
        vec![
            RoutePathSegment::static_text("product"),
            RoutePathSegment::optional("variant"),
            RoutePathSegment::static_text("reviews"),
        ]
    }

    #[test]
    fn test_match_static() {
        let path = vec![RoutePathSegment::static_text("about")];
        assert!(match_route_path(&path, "/about").is_some());
        assert!(match_route_path(&path, "/about/").is_some());
        assert!(match_route_path(&path, "/other").is_none());
    }

    #[test]
    fn test_match_optional_with_and_without_value() {
        let path = product_path();
        let params = match_route_path(&path, "/product/red/reviews").unwrap();
        assert_eq!(params.get("variant"), Some(&"red".to_string()));

        let params = match_route_path(&path, "/product/reviews").unwrap();
        assert!(params.get("variant").is_none());
    }

    #[test]
    fn test_match_splat() {
        let path = vec![
            RoutePathSegment::static_text("docs"),
            RoutePathSegment::catch_all(),
        ];
        let params = match_route_path(&path, "/docs/guide/intro").unwrap();
        assert_eq!(params.get(SPLAT_PARAM), Some(&"guide/intro".to_string()));
        assert!(match_route_path(&path, "/docs").is_none());
    }

    #[test]
    fn test_match_home() {
        assert!(match_route_path(&[], "/").is_some());
        assert!(match_route_path(&[], "/about").is_none());
    }

    #[test]
    fn test_priority_static_before_dynamic() {
        let static_route = vec![
            RoutePathSegment::static_text("users"),
            RoutePathSegment::static_text("new"),
        ];
        let dynamic_route = vec![
            RoutePathSegment::static_text("users"),
            RoutePathSegment::dynamic("id"),
        ];
        assert!(route_priority(&static_route) < route_priority(&dynamic_route));
    }
}
