/// Route module for Remix flat-file routing
///
/// Contains pure functional components for route file parsing and matching:
/// - `pattern` classifies the dot-delimited tokens of a file name
/// - `parser` folds tokens into a route path and readable URI
/// - `matcher` ranks route paths and matches concrete URLs

pub mod matcher;
pub mod parser;
pub mod pattern;

// Re-export commonly used types
pub use matcher::{match_route_path, route_priority};
pub use parser::{parse_route_file, parse_route_stem, ParsedRouteFile};
pub use pattern::{classify_token, split_tokens, TokenKind};
