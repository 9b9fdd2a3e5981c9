//! # define-remix-app
//!
//! A file-system route manifest resolver for Remix applications with support for:
//! - Flat-file routes (`about.us.tsx` → `/about/us`)
//! - Dynamic parameters (`product.$id.tsx` → `/product/:id`)
//! - Optional parameters (`($lang).about.tsx`)
//! - Splat routes (`docs.$.tsx`)
//! - Index, pathless and escaped (`about_.us.tsx`) layout conventions
//! - Folder routes (`about.us/route.tsx`, `about.us/index.tsx`)
//! - Error boundaries inherited from the nearest owning route
//! - Live manifests that follow the routes directory as files change
//! - Planning of new and moved pages for an editing UI
//!
//! ## Example
//!
//! ```
//! use define_remix_app::{build_manifest, AppConfig, RouteFile, RouteFiles, RoutePathSegment};
//!
//! let config = AppConfig::for_app_dir("/project/app");
//! let mut files = RouteFiles::new();
//! files.upsert(RouteFile::new("/project/app/root.tsx", ["default"]));
//! files.upsert(RouteFile::new("/project/app/routes/about.tsx", ["default"]));
//!
//! let manifest = build_manifest(&files, &config);
//! assert_eq!(manifest.routes.len(), 1);
//! assert_eq!(manifest.routes[0].path, vec![RoutePathSegment::static_text("about")]);
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fs;
pub mod layout;
pub mod manifest;
pub mod path;
pub mod planner;
pub mod route;
pub mod runtime;
mod template;

// Re-export public types
pub use config::{AppConfig, RoutingPattern};
pub use coordinator::{prepare_app, AppHandle, ManifestCallback, PreparedApp};
pub use error::{AppError, FsError, NavigationError, RouteParseError};
pub use fs::{FsApi, NativeFs, WatchGuard, Watched};
pub use layout::LayoutInfo;
pub use manifest::{
    build_manifest, AppManifest, Diagnostic, DiagnosticKind, RemixRouteData, RouteInfo, RouteMatch,
    Severity,
};
pub use path::{readable_string_to_route_path, route_path_id, route_path_to_readable_string};
pub use planner::{get_move_page_info, get_new_page_info, PageInfo};
pub use runtime::{
    HookRegistry, LifecycleEvent, ListenerId, Navigation, NavigationTarget, SwapHandle,
};

/// Export names with a meaning for the route resolver
pub mod exports {
    pub const DEFAULT: &str = "default";
    pub const LAYOUT: &str = "Layout";
    pub const ERROR_BOUNDARY: &str = "ErrorBoundary";
    pub const LOADER: &str = "loader";
}

// ============================================================================
// Core Types
// ============================================================================

/// One segment of a matchable route path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RoutePathSegment {
    /// Literal URL text
    Static { text: String },
    /// URL parameter; splat segments are named `$`
    #[serde(rename_all = "camelCase")]
    Dynamic {
        name: String,
        #[serde(default)]
        is_optional: bool,
        #[serde(default)]
        is_catch_all: bool,
    },
}

impl RoutePathSegment {
    pub fn static_text(text: impl Into<String>) -> Self {
        Self::Static { text: text.into() }
    }

    pub fn dynamic(name: impl Into<String>) -> Self {
        Self::Dynamic {
            name: name.into(),
            is_optional: false,
            is_catch_all: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self::Dynamic {
            name: name.into(),
            is_optional: true,
            is_catch_all: false,
        }
    }

    pub fn catch_all() -> Self {
        Self::Dynamic {
            name: "$".to_string(),
            is_optional: false,
            is_catch_all: true,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Dynamic { is_optional: true, .. })
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Self::Dynamic { is_catch_all: true, .. })
    }
}

/// A source file known to the resolver, with its detected exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteFile {
    /// Absolute path, unique key
    pub file_path: PathBuf,
    /// Named exports (`default`, `loader`, `ErrorBoundary`, `Layout`, ...)
    pub export_names: BTreeSet<String>,
}

impl RouteFile {
    pub fn new<I, S>(file_path: impl Into<PathBuf>, export_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            file_path: file_path.into(),
            export_names: export_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_export(&self, name: &str) -> bool {
        self.export_names.contains(name)
    }

    pub fn has_default(&self) -> bool {
        self.has_export(exports::DEFAULT)
    }

    pub fn has_error_boundary(&self) -> bool {
        self.has_export(exports::ERROR_BOUNDARY)
    }
}

/// Insertion-ordered set of known route files keyed by path
///
/// Discovery order is preserved: manifests list routes in the order their
/// files were first seen, and updates keep a file's position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFiles {
    files: Vec<RouteFile>,
}

impl RouteFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new file at the end or replaces an existing entry in place
    pub fn upsert(&mut self, file: RouteFile) {
        match self.position(&file.file_path) {
            Some(index) => self.files[index] = file,
            None => self.files.push(file),
        }
    }

    /// Removes a file, returning it if it was known
    pub fn remove(&mut self, file_path: &Path) -> Option<RouteFile> {
        self.position(file_path).map(|index| self.files.remove(index))
    }

    pub fn get(&self, file_path: &Path) -> Option<&RouteFile> {
        self.position(file_path).map(|index| &self.files[index])
    }

    pub fn contains(&self, file_path: &Path) -> bool {
        self.position(file_path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteFile> {
        self.files.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.file_path.as_path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn position(&self, file_path: &Path) -> Option<usize> {
        self.files.iter().position(|f| f.file_path == file_path)
    }
}

impl FromIterator<RouteFile> for RouteFiles {
    fn from_iter<I: IntoIterator<Item = RouteFile>>(iter: I) -> Self {
        let mut files = RouteFiles::new();
        iter.into_iter().for_each(|file| files.upsert(file));
        files
    }
}
