//! Error types for route parsing, file watching and app preparation

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a route file name cannot be turned into a route path.
///
/// Parse errors never abort a manifest build: the offending file is skipped
/// and reported as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteParseError {
    #[error("empty route segment in `{0}`")]
    EmptyToken(String),

    #[error("unbalanced parenthesis in route segment `{0}`")]
    UnbalancedParenthesis(String),

    #[error("unterminated escape bracket in route segment `{0}`")]
    UnbalancedBracket(String),

    #[error("optional segment `{0}` has no parameter name")]
    EmptyOptional(String),

    #[error("optional catch-all segments are not supported (`{0}`)")]
    OptionalCatchAll(String),

    #[error("optional static segments are not supported (`{0}`)")]
    OptionalStatic(String),

    #[error("invalid parameter name in route segment `{0}`")]
    InvalidParamName(String),

    #[error("`_index` must be the last segment of `{0}`")]
    MisplacedIndex(String),

    #[error("`{0}` is nested too deeply or is not a route module (expected `route` or `index`)")]
    UnsupportedNesting(String),
}

/// Failures reported by a [`crate::fs::FsApi`] implementation.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("i/o error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path does not exist: {0:?}")]
    NotFound(PathBuf),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Failures while preparing a live app manifest.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to watch routes directory {path:?}: {source}")]
    WatchRoutes {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    #[error("failed to watch exports of {path:?}: {source}")]
    WatchExports {
        path: PathBuf,
        #[source]
        source: FsError,
    },
}

/// Failures while navigating a preview app.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route matches `{0}`")]
    NoMatchingRoute(String),
}
