//! New and moved page planning
//!
//! Given a readable URI (`about/us`, `product/$id`, `about_/us`), works out
//! which file would implement it under the configured routing pattern, checks
//! it against the known files and the current manifest and previews the route
//! it would produce.
//! Problems are reported as display strings, never as errors.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AppConfig, RoutingPattern};
use crate::manifest::{build_manifest, AppManifest, RouteInfo};
use crate::path::{readable_string_to_tokens, route_path_id};
use crate::route::parser::{parse_route_file, parse_route_stem, ParsedRouteFile};
use crate::route::pattern::TokenKind;
use crate::template::{component_name, page_source, param_names};
use crate::{exports, RouteFile, RouteFiles};

/// Characters that cannot appear in a file name on any supported platform
const ILLEGAL_FILE_NAME_CHARS: [char; 8] = ['<', '>', ':', '"', '|', '?', '*', '\\'];

/// Outcome of planning a new or moved page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub warning_message: Option<String>,
    /// File that would implement the page
    pub page_module: PathBuf,
    /// Source of the new file; empty for moves
    pub new_page_source_code: String,
    /// Route the file would produce
    pub new_page_route: Option<RouteInfo>,
}

impl PageInfo {
    fn invalid(page_module: PathBuf, message: String) -> Self {
        debug!("Page plan rejected: {}", message);
        Self {
            is_valid: false,
            error_message: Some(message),
            page_module,
            ..Self::default()
        }
    }
}

// ============================================================================
// Target Resolution
// ============================================================================

/// File implementing a route stem under the configured routing pattern
fn target_file(config: &AppConfig, stem: &str) -> PathBuf {
    let routes_dir = config.routes_dir();
    let extension = &config.page_extension;
    match config.routing_pattern {
        RoutingPattern::File => routes_dir.join(format!("{}.{}", stem, extension)),
        RoutingPattern::FolderRoute => routes_dir.join(stem).join(format!("route.{}", extension)),
        RoutingPattern::FolderIndex => routes_dir.join(stem).join(format!("index.{}", extension)),
    }
}

fn illegal_char(uri: &str) -> Option<char> {
    uri.chars()
        .find(|c| c.is_control() || ILLEGAL_FILE_NAME_CHARS.contains(c))
}

/// Requested URI resolved to a file name and parsed route
struct Target {
    tokens: Vec<String>,
    parsed: ParsedRouteFile,
    page_module: PathBuf,
}

fn resolve_target(config: &AppConfig, requested_uri: &str) -> Result<Target, PageInfo> {
    let tokens = readable_string_to_tokens(requested_uri);
    let stem = tokens.join(".");
    let page_module = target_file(config, &stem);

    if let Some(c) = illegal_char(requested_uri) {
        return Err(PageInfo::invalid(
            page_module,
            format!("\"{}\" contains the illegal character '{}'", requested_uri, c),
        ));
    }

    let parsed = parse_route_stem(&stem).map_err(|e| {
        PageInfo::invalid(
            page_module.clone(),
            format!("\"{}\" is not a valid route: {}", requested_uri, e),
        )
    })?;

    Ok(Target {
        tokens,
        parsed,
        page_module,
    })
}

// ============================================================================
// Manifest Snapshot
// ============================================================================

/// Known files implied by a manifest, with the exports it relies on
///
/// Parents are listed before their children so rebuilding the snapshot
/// reproduces the same tree.
fn files_from_manifest(manifest: &AppManifest) -> RouteFiles {
    let mut files = RouteFiles::new();
    let mut add = |path: &Path, export: &str| {
        let mut file = files
            .get(path)
            .cloned()
            .unwrap_or_else(|| RouteFile::new(path, Vec::<String>::new()));
        file.export_names.insert(export.to_string());
        files.upsert(file);
    };

    for route in manifest.all_routes() {
        for layout in &route.parent_layouts {
            add(&layout.layout_module, &layout.layout_export_name);
        }
        add(&route.page_module, &route.page_export_name);
    }
    for route in &manifest.error_routes {
        for layout in &route.parent_layouts {
            add(&layout.layout_module, &layout.layout_export_name);
        }
        add(&route.page_module, &route.page_export_name);
    }

    files
}

/// Known files plus anything the manifest implies that they lack
///
/// The known files also cover modules the manifest leaves out, such as
/// loader-only files and childless pathless layouts.
fn snapshot(manifest: &AppManifest, known_files: &RouteFiles) -> RouteFiles {
    let mut files = known_files.clone();
    for file in files_from_manifest(manifest).iter() {
        if !files.contains(&file.file_path) {
            files.upsert(file.clone());
        }
    }
    files
}

/// Modules that currently wrap at least one other route
fn modules_with_descendants(manifest: &AppManifest) -> HashSet<PathBuf> {
    manifest
        .all_routes()
        .flat_map(|route| route.parent_layouts.iter())
        .map(|layout| layout.layout_module.clone())
        .collect()
}

fn route_for(manifest: &AppManifest, page_module: &Path) -> Option<RouteInfo> {
    manifest.route_for_module(page_module).cloned()
}

// ============================================================================
// Validation
// ============================================================================

/// Existing page route with the same path identity, other than `excluded`
fn colliding_route<'a>(
    manifest: &'a AppManifest,
    target: &Target,
    excluded: Option<&Path>,
) -> Option<&'a RouteInfo> {
    let id = route_path_id(&target.parsed.path);
    manifest
        .all_routes()
        .filter(|route| Some(route.page_module.as_path()) != excluded)
        .find(|route| route_path_id(&route.path) == id)
}

/// Warns when an existing leaf route would start wrapping the new page
///
/// Only the innermost such ancestor is reported; the suggestion opts out of
/// nesting at its level with a trailing underscore.
fn nesting_warning(
    config: &AppConfig,
    before: &AppManifest,
    target: &Target,
    route: &RouteInfo,
) -> Option<String> {
    let root_file = config.root_file();
    let with_descendants = modules_with_descendants(before);

    let (ancestor, depth) = route
        .parent_layouts
        .iter()
        .rev()
        .filter(|layout| layout.layout_module != root_file)
        .filter(|layout| !with_descendants.contains(&layout.layout_module))
        .find_map(|layout| {
            let relative = config.relative_route_path(&layout.layout_module)?;
            let parsed = parse_route_file(&relative, config.path_separator).ok()?;
            matches!(parsed.kinds.last(), Some(TokenKind::Static(_)))
                .then(|| (layout, parsed.tokens.len()))
        })?;

    let mut suggested = target.tokens.clone();
    suggested.get_mut(depth - 1)?.push('_');
    let suggestion = parse_route_stem(&suggested.join(".")).ok()?.readable_uri;

    Some(format!(
        "{} will become a layout of this page and wrap it. Use \"{}\" instead to keep the pages independent.",
        ancestor.layout_module.display(),
        suggestion
    ))
}

// ============================================================================
// Public API
// ============================================================================

/// Plans the creation of a page at `requested_uri`
///
/// `known_files` is the file set behind `manifest`; a target that is already
/// one of them is rejected even when the manifest does not list it.
///
/// # Examples
///
/// ```
/// use define_remix_app::{build_manifest, get_new_page_info, AppConfig, RouteFile, RouteFiles};
///
/// let config = AppConfig::for_app_dir("/project/app");
/// let files: RouteFiles = [RouteFile::new("/project/app/routes/about.tsx", ["default"])]
///     .into_iter()
///     .collect();
/// let manifest = build_manifest(&files, &config);
///
/// let info = get_new_page_info(&config, &manifest, &files, "about/us");
/// assert!(info.is_valid);
/// assert!(info.page_module.ends_with("about.us.tsx"));
/// assert!(info.warning_message.is_some());
/// ```
pub fn get_new_page_info(
    config: &AppConfig,
    manifest: &AppManifest,
    known_files: &RouteFiles,
    requested_uri: &str,
) -> PageInfo {
    let target = match resolve_target(config, requested_uri) {
        Ok(target) => target,
        Err(info) => return info,
    };

    let files = snapshot(manifest, known_files);
    if files.contains(&target.page_module) {
        return PageInfo::invalid(
            target.page_module.clone(),
            format!("{} already exists", target.page_module.display()),
        );
    }
    if let Some(existing) = colliding_route(manifest, &target, None) {
        return PageInfo::invalid(
            target.page_module.clone(),
            format!(
                "Route \"{}\" is already defined by {}",
                existing.path_string,
                existing.page_module.display()
            ),
        );
    }

    let mut after = files;
    after.upsert(RouteFile::new(&target.page_module, [exports::DEFAULT]));
    let Some(route) = route_for(&build_manifest(&after, config), &target.page_module) else {
        return PageInfo::invalid(
            target.page_module.clone(),
            format!("\"{}\" does not resolve to a page route", requested_uri),
        );
    };

    PageInfo {
        is_valid: true,
        error_message: None,
        warning_message: nesting_warning(config, manifest, &target, &route),
        new_page_source_code: page_source(&component_name(&route.path), &param_names(&route.path)),
        page_module: target.page_module,
        new_page_route: Some(route),
    }
}

/// Plans moving `moved_file_path` so it serves `requested_uri`
///
/// The file keeps its exports; no source is generated.
pub fn get_move_page_info(
    config: &AppConfig,
    manifest: &AppManifest,
    known_files: &RouteFiles,
    moved_file_path: &Path,
    requested_uri: &str,
) -> PageInfo {
    let target = match resolve_target(config, requested_uri) {
        Ok(target) => target,
        Err(info) => return info,
    };

    let mut files = snapshot(manifest, known_files);
    let Some(moved) = files.remove(moved_file_path) else {
        return PageInfo::invalid(
            target.page_module.clone(),
            format!("{} is not a known route", moved_file_path.display()),
        );
    };

    if target.page_module == moved_file_path || files.contains(&target.page_module) {
        return PageInfo::invalid(
            target.page_module.clone(),
            format!("{} already exists", target.page_module.display()),
        );
    }
    if let Some(existing) = colliding_route(manifest, &target, Some(moved_file_path)) {
        return PageInfo::invalid(
            target.page_module.clone(),
            format!(
                "Route \"{}\" is already defined by {}",
                existing.path_string,
                existing.page_module.display()
            ),
        );
    }

    let before = build_manifest(&files, config);
    let export_names: BTreeSet<String> = moved.export_names;
    let mut after = files;
    after.upsert(RouteFile {
        file_path: target.page_module.clone(),
        export_names,
    });
    let route = route_for(&build_manifest(&after, config), &target.page_module);
    let warning_message = route
        .as_ref()
        .and_then(|route| nesting_warning(config, &before, &target, route));

    PageInfo {
        is_valid: true,
        error_message: None,
        warning_message,
        page_module: target.page_module,
        new_page_source_code: String::new(),
        new_page_route: route,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest_of(config: &AppConfig, files: &[RouteFile]) -> AppManifest {
        build_manifest(&files.iter().cloned().collect(), config)
    }

    #[test]
    fn test_snapshot_rebuilds_same_manifest() {
        let config = AppConfig::for_app_dir("/app");
        let manifest = manifest_of(
            &config,
            &[
                RouteFile::new("/app/root.tsx", ["Layout", "default", "ErrorBoundary"]),
                RouteFile::new("/app/routes/_index.tsx", ["default"]),
                RouteFile::new("/app/routes/blog.tsx", ["default", "ErrorBoundary"]),
                RouteFile::new("/app/routes/blog.$slug.tsx", ["default"]),
            ],
        );

        let rebuilt = build_manifest(&files_from_manifest(&manifest), &config);
        assert_eq!(rebuilt, manifest);
    }

    #[test]
    fn test_snapshot_keeps_files_missing_from_manifest() {
        let config = AppConfig::for_app_dir("/app");
        let known: RouteFiles = [
            RouteFile::new("/app/routes/_auth.tsx", ["default"]),
            RouteFile::new("/app/routes/about.tsx", ["loader"]),
            RouteFile::new("/app/routes/blog.tsx", ["default"]),
        ]
        .into_iter()
        .collect();
        let manifest = build_manifest(&known, &config);

        let files = snapshot(&manifest, &known);
        assert_eq!(files, known);
        assert!(files_from_manifest(&manifest).get(Path::new("/app/routes/about.tsx")).is_none());
    }

    #[test]
    fn test_target_file_per_pattern() {
        let config = AppConfig::for_app_dir("/app");
        assert_eq!(target_file(&config, "a.b"), PathBuf::from("/app/routes/a.b.tsx"));

        let config = config.with_routing_pattern(RoutingPattern::FolderRoute);
        assert_eq!(target_file(&config, "a.b"), PathBuf::from("/app/routes/a.b/route.tsx"));

        let config = config.with_routing_pattern(RoutingPattern::FolderIndex);
        assert_eq!(target_file(&config, "a.b"), PathBuf::from("/app/routes/a.b/index.tsx"));
    }

    #[test]
    fn test_illegal_characters() {
        let config = AppConfig::for_app_dir("/app");
        let info = get_new_page_info(&config, &AppManifest::default(), &RouteFiles::new(), "what?");
        assert!(!info.is_valid);
        assert!(info.error_message.unwrap().contains('?'));
    }
}
