/// Route file parsing
///
/// Pure functional parser that transforms a routes-relative file path into
/// tokens, a [`RoutePathSegment`] sequence and a readable URI.

use crate::error::RouteParseError;
use crate::RoutePathSegment;

use super::pattern::{classify_token, readable_literal, split_tokens, TokenKind};

/// File names that turn a folder into a route module
const FOLDER_MODULES: [&str; 2] = ["route", "index"];

/// Result of parsing one route file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRouteFile {
    /// Raw dot-delimited tokens, escapes preserved (`["blog", "$slug"]`)
    pub tokens: Vec<String>,
    /// Classified tokens, parallel to `tokens`
    pub kinds: Vec<TokenKind>,
    /// Matchable URL path
    pub path: Vec<RoutePathSegment>,
    /// Human-facing URI (`blog/$slug`, `about_/us`, empty for the home route)
    pub readable_uri: String,
    /// Whether the file is an `_index` route
    pub is_index: bool,
    /// Route name without extension (`about.us`; folder routes use the folder name)
    pub module_id: String,
}

/// Internal state accumulator for fold-based parsing
#[derive(Default)]
struct ParseState {
    path: Vec<RoutePathSegment>,
    readable: Vec<String>,
    is_index: bool,
}

impl ParseState {
    fn with_token(mut self, kind: &TokenKind) -> Self {
        let (segment, readable) = match kind {
            TokenKind::CatchAll => (RoutePathSegment::catch_all(), "$".to_string()),
            TokenKind::Optional(name) => (RoutePathSegment::optional(name), format!("(${})", name)),
            TokenKind::Required(name) => (RoutePathSegment::dynamic(name), format!("${}", name)),
            TokenKind::Escaped(text) => (
                RoutePathSegment::static_text(text),
                format!("{}_", readable_literal(text)),
            ),
            TokenKind::Static(text) => (RoutePathSegment::static_text(text), readable_literal(text)),
            TokenKind::Index => {
                self.is_index = true;
                return self;
            }
            TokenKind::Pathless(_) => return self,
        };

        self.path.push(segment);
        self.readable.push(readable);
        self
    }
}

/// Splits a file name into stem and extension (`about.us.tsx` → `about.us`)
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 && !file_name[pos..].contains(']') => &file_name[..pos],
        _ => file_name,
    }
}

/// Parses a routes-relative file path (pure function)
///
/// Flat files (`about.us.tsx`) take their tokens from the file stem. Folder
/// routes (`about.us/route.tsx`, `about.us/index.tsx`) take them from the
/// folder name. Anything nested deeper is a colocated module, not a route.
///
/// # Examples
///
/// ```
/// use define_remix_app::route::parser::parse_route_file;
/// use define_remix_app::RoutePathSegment;
///
/// let parsed = parse_route_file("product.$productId.tsx", '/').unwrap();
/// assert_eq!(
///     parsed.path,
///     vec![
///         RoutePathSegment::static_text("product"),
///         RoutePathSegment::dynamic("productId"),
///     ]
/// );
/// assert_eq!(parsed.readable_uri, "product/$productId");
///
/// let home = parse_route_file("_index.tsx", '/').unwrap();
/// assert!(home.path.is_empty());
/// assert_eq!(home.readable_uri, "");
/// ```
pub fn parse_route_file(relative_path: &str, sep: char) -> Result<ParsedRouteFile, RouteParseError> {
    let parts: Vec<&str> = relative_path.split(sep).filter(|p| !p.is_empty()).collect();

    let stem = match parts.as_slice() {
        [file] => strip_extension(file),
        [folder, file] if FOLDER_MODULES.contains(&strip_extension(file)) => *folder,
        _ => return Err(RouteParseError::UnsupportedNesting(relative_path.to_string())),
    };

    parse_route_stem(stem)
}

/// Parses the dot-delimited part of a route name (`blog.$slug`)
pub fn parse_route_stem(stem: &str) -> Result<ParsedRouteFile, RouteParseError> {
    let tokens = split_tokens(stem)?;
    let kinds = tokens
        .iter()
        .map(|t| classify_token(t))
        .collect::<Result<Vec<_>, _>>()?;

    // `_index` only makes sense as the final token
    let misplaced_index = kinds
        .iter()
        .take(kinds.len().saturating_sub(1))
        .any(|k| *k == TokenKind::Index);
    if misplaced_index {
        return Err(RouteParseError::MisplacedIndex(stem.to_string()));
    }

    let state = kinds
        .iter()
        .fold(ParseState::default(), |state, kind| state.with_token(kind));

    Ok(ParsedRouteFile {
        readable_uri: state.readable.join("/"),
        path: state.path,
        is_index: state.is_index,
        module_id: stem.to_string(),
        tokens,
        kinds,
    })
}
