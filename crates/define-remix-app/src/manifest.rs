//! App manifest assembly
//!
//! [`build_manifest`] folds a snapshot of known route files into an
//! [`AppManifest`]: the home route, the page routes in discovery order, the
//! error-boundary routes and any diagnostics found along the way. The result
//! depends only on the snapshot and the configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::RouteParseError;
use crate::layout::{Ancestor, LayoutInfo, LayoutMatcher, RouteEntry, ROOT_ROUTE_ID};
use crate::path::{normalize_path, route_path_id, route_path_to_readable_string};
use crate::route::matcher::{match_route_path, route_priority};
use crate::route::parser::parse_route_file;
use crate::route::pattern::TokenKind;
use crate::{exports, RouteFile, RouteFiles, RoutePathSegment};

// ============================================================================
// Manifest Types
// ============================================================================

/// Remix-specific payload of a manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixRouteData {
    /// Remix route id (`root`, `routes/about.us`)
    pub route_id: String,
    /// Route ids of the rendered parent layouts, outermost first
    pub parent_layout_ids: Vec<String>,
}

/// One entry of an [`AppManifest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo<T = RemixRouteData> {
    pub path: Vec<RoutePathSegment>,
    pub page_module: PathBuf,
    pub page_export_name: String,
    /// Outermost first, always starting with the root module's exports
    pub parent_layouts: Vec<LayoutInfo>,
    /// Readable form of `path` (`/product/$id`)
    pub path_string: String,
    pub extra_data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// File name could not be parsed; the file was skipped
    MalformedRouteFile,
    /// Two page routes resolve to the same route path
    PathCollision,
    /// Route module nested where Remix does not look for routes
    UnsupportedNesting,
}

/// Problem found while building a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub file_path: PathBuf,
    pub message: String,
}

impl Diagnostic {
    fn from_parse_error(file_path: &Path, error: &RouteParseError) -> Self {
        let kind = match error {
            RouteParseError::UnsupportedNesting(_) => DiagnosticKind::UnsupportedNesting,
            _ => DiagnosticKind::MalformedRouteFile,
        };
        Self {
            severity: Severity::Warning,
            kind,
            file_path: file_path.to_path_buf(),
            message: error.to_string(),
        }
    }

    fn collision(file_path: &Path, first: &Path, path_string: &str) -> Self {
        Self {
            severity: Severity::Error,
            kind: DiagnosticKind::PathCollision,
            file_path: file_path.to_path_buf(),
            message: format!(
                "route `{}` is already defined by {}",
                path_string,
                first.display()
            ),
        }
    }
}

/// Route tree of an app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest<T = RemixRouteData> {
    pub home_route: Option<RouteInfo<T>>,
    pub routes: Vec<RouteInfo<T>>,
    pub error_routes: Vec<RouteInfo<T>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Default for AppManifest<T> {
    fn default() -> Self {
        Self {
            home_route: None,
            routes: Vec::new(),
            error_routes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

/// Result of matching a URL against a manifest
#[derive(Debug, Clone)]
pub struct RouteMatch<'a, T = RemixRouteData> {
    pub route: &'a RouteInfo<T>,
    pub params: HashMap<String, String>,
}

impl<T> AppManifest<T> {
    /// Home route followed by the other page routes
    pub fn all_routes(&self) -> impl Iterator<Item = &RouteInfo<T>> {
        self.home_route.iter().chain(self.routes.iter())
    }

    /// Page route rendered by the given module
    pub fn route_for_module(&self, page_module: &Path) -> Option<&RouteInfo<T>> {
        self.all_routes().find(|r| r.page_module == page_module)
    }

    /// Every module taking part in the manifest (pages, layouts, boundaries)
    pub fn known_modules(&self) -> Vec<&Path> {
        let mut modules: Vec<&Path> = Vec::new();
        let routes = self.all_routes().chain(self.error_routes.iter());
        for route in routes {
            let layout_modules = route.parent_layouts.iter().map(|l| l.layout_module.as_path());
            for module in layout_modules.chain(std::iter::once(route.page_module.as_path())) {
                if !modules.contains(&module) {
                    modules.push(module);
                }
            }
        }
        modules
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Finds the page route rendered for a URL
    ///
    /// Routes are tried by priority (static > dynamic > splat); among equal
    /// priorities the more deeply nested route wins, so an index route beats
    /// its own layout.
    pub fn match_path(&self, url: &str) -> Option<RouteMatch<'_, T>> {
        let url = normalize_path(url);
        let mut candidates: Vec<&RouteInfo<T>> = self.all_routes().collect();
        candidates.sort_by_key(|r| (route_priority(&r.path), std::cmp::Reverse(r.parent_layouts.len())));

        candidates.into_iter().find_map(|route| {
            match_route_path(&route.path, &url).map(|params| RouteMatch { route, params })
        })
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Parses every candidate route file, collecting diagnostics for the rest
fn route_entries<'a>(
    files: &'a RouteFiles,
    config: &AppConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<RouteEntry<'a>> {
    let root_path = config.root_file();
    let prefix = config.route_id_prefix();

    files
        .iter()
        .filter(|file| file.file_path != root_path && config.is_route_candidate(&file.file_path))
        .filter_map(|file| {
            let relative = config.relative_route_path(&file.file_path)?;
            match parse_route_file(&relative, config.path_separator) {
                Ok(parsed) => Some(RouteEntry {
                    route_id: format!("{}/{}", prefix, parsed.module_id),
                    file,
                    parsed,
                }),
                // Colocated helpers inside route folders are expected
                Err(error) if !(file.has_default() || file.has_error_boundary()) => {
                    debug!("Skipping non-route module {:?}: {}", file.file_path, error);
                    None
                }
                Err(error) => {
                    warn!("Skipping route file {:?}: {}", file.file_path, error);
                    diagnostics.push(Diagnostic::from_parse_error(&file.file_path, &error));
                    None
                }
            }
        })
        .collect()
}

/// Route ids of rendered layouts, root listed once
fn layout_ids(ancestors: &[&Ancestor<'_>]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(ancestors.len());
    for ancestor in ancestors {
        if ids.last().map(String::as_str) != Some(ancestor.route_id) {
            ids.push(ancestor.route_id.to_string());
        }
    }
    ids
}

fn route_info(
    path: &[RoutePathSegment],
    page_module: &Path,
    page_export_name: &str,
    ancestors: &[Ancestor<'_>],
    route_id: &str,
) -> RouteInfo {
    let rendered: Vec<&Ancestor<'_>> = ancestors.iter().filter(|a| a.renders_layout()).collect();

    RouteInfo {
        path: path.to_vec(),
        page_module: page_module.to_path_buf(),
        page_export_name: page_export_name.to_string(),
        parent_layouts: rendered.iter().map(|a| a.to_layout_info()).collect(),
        path_string: format!("/{}", route_path_to_readable_string(path)),
        extra_data: RemixRouteData {
            route_id: route_id.to_string(),
            parent_layout_ids: layout_ids(&rendered),
        },
    }
}

/// Error route of an entry: rendered by the nearest boundary owner
///
/// The owner is the file itself, else its innermost ancestor exporting
/// `ErrorBoundary`, else the root module. Only layouts outside the owner
/// wrap the boundary.
fn error_route(
    entry: &RouteEntry<'_>,
    ancestors: &[Ancestor<'_>],
    root: Option<&RouteFile>,
) -> Option<RouteInfo> {
    let build = |owner: &Path, outside: &[Ancestor<'_>], route_id: &str| {
        route_info(
            &entry.parsed.path,
            owner,
            exports::ERROR_BOUNDARY,
            outside,
            route_id,
        )
    };

    if entry.file.has_error_boundary() {
        return Some(build(&entry.file.file_path, ancestors, &entry.route_id));
    }

    if let Some(owner) = ancestors.iter().rposition(Ancestor::owns_error_boundary) {
        let owner_ancestor = &ancestors[owner];
        return Some(build(
            &owner_ancestor.file.file_path,
            &ancestors[..owner],
            owner_ancestor.route_id,
        ));
    }

    // Root boundary without a default export: only its `Layout` wraps it
    let root = root.filter(|r| r.has_error_boundary())?;
    let outside = ancestors
        .iter()
        .take_while(|a| a.is_root && a.export_name == exports::LAYOUT)
        .count();
    Some(build(&root.file_path, &ancestors[..outside], ROOT_ROUTE_ID))
}

/// Whether a file only groups children (`_auth.tsx`) and is not a page itself
fn is_pathless_layout(entry: &RouteEntry<'_>) -> bool {
    matches!(entry.parsed.kinds.last(), Some(TokenKind::Pathless(_)))
}

/// Builds the manifest of a known-file snapshot
///
/// The root module is the file at [`AppConfig::root_file`]; every other file
/// under the routes directory is parsed with the flat-file conventions.
/// Malformed names and path collisions become [`Diagnostic`]s (colliding
/// routes are all kept); this function never fails.
pub fn build_manifest(files: &RouteFiles, config: &AppConfig) -> AppManifest {
    let mut manifest = AppManifest::default();
    let entries = route_entries(files, config, &mut manifest.diagnostics);
    let root: Option<&RouteFile> = files.get(&config.root_file());
    let matcher = LayoutMatcher::new(root, &entries);

    // (route_path_id, is_index) → first file; a layout and its index share a path
    let mut claimed: HashMap<(String, bool), &Path> = HashMap::new();

    for entry in entries.iter().filter(|e| e.is_route_module() && !is_pathless_layout(e)) {
        let ancestors = matcher.ancestors(&entry.parsed);

        if entry.file.has_default() {
            let info = route_info(
                &entry.parsed.path,
                &entry.file.file_path,
                exports::DEFAULT,
                &ancestors,
                &entry.route_id,
            );

            let key = (route_path_id(&info.path), entry.parsed.is_index);
            match claimed.get(&key) {
                Some(first) => {
                    warn!("Route path collision: {:?} and {:?}", first, entry.file.file_path);
                    manifest.diagnostics.push(Diagnostic::collision(
                        &entry.file.file_path,
                        first,
                        &info.path_string,
                    ));
                }
                None => {
                    claimed.insert(key, &entry.file.file_path);
                }
            }

            if info.path.is_empty() && entry.parsed.is_index {
                // Only one home; a second one is reported above
                if manifest.home_route.is_none() {
                    manifest.home_route = Some(info);
                }
            } else {
                manifest.routes.push(info);
            }
        }

        if let Some(error) = error_route(entry, &ancestors, root) {
            let duplicate = manifest
                .error_routes
                .iter()
                .any(|r| r.path == error.path && r.page_module == error.page_module);
            if !duplicate {
                manifest.error_routes.push(error);
            }
        }
    }

    debug!(
        "Built manifest: {} routes, {} error routes, {} diagnostics",
        manifest.routes.len() + usize::from(manifest.home_route.is_some()),
        manifest.error_routes.len(),
        manifest.diagnostics.len()
    );
    manifest
}
