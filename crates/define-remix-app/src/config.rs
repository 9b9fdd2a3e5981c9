// File: src/config.rs
// Purpose: App layout and routing configuration, optionally read from remix-routes.toml

use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Default configuration file name looked up in the project root
pub const CONFIG_FILE_NAME: &str = "remix-routes.toml";

/// File-naming convention used when creating or moving pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoutingPattern {
    /// `routes/about.us.tsx`
    #[default]
    #[serde(rename = "file")]
    File,
    /// `routes/about.us/route.tsx`
    #[serde(rename = "folder(route)")]
    FolderRoute,
    /// `routes/about.us/index.tsx`
    #[serde(rename = "folder(index)")]
    FolderIndex,
}

impl std::str::FromStr for RoutingPattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "file" => Ok(Self::File),
            "folder(route)" | "folder-route" => Ok(Self::FolderRoute),
            "folder(index)" | "folder-index" => Ok(Self::FolderIndex),
            _ => Err(anyhow::anyhow!("Unknown routing pattern: {}", s)),
        }
    }
}

/// Layout of a Remix app on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// App directory holding `root.tsx` and `routes/` (default: "app")
    #[serde(default = "default_app_dir")]
    pub app_dir: PathBuf,

    /// Routes directory (default: `<app_dir>/routes`)
    #[serde(default)]
    pub routes_dir: Option<PathBuf>,

    /// Root module (default: `<app_dir>/root.<page_extension>`)
    #[serde(default)]
    pub root_file: Option<PathBuf>,

    /// Naming convention for new pages
    #[serde(default)]
    pub routing_pattern: RoutingPattern,

    /// Extensions of files considered route modules
    #[serde(default = "default_route_extensions")]
    pub route_extensions: Vec<String>,

    /// Extension used when creating pages
    #[serde(default = "default_page_extension")]
    pub page_extension: String,

    /// Glob patterns (relative to the routes directory) of files that are never routes
    #[serde(default)]
    pub ignored_route_files: Vec<String>,

    /// Separator of the file system paths come from (set by `prepare_app`)
    #[serde(default = "default_path_separator")]
    pub path_separator: char,
}

/// Top-level shape of `remix-routes.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    app: Option<AppConfig>,
}

// Default values
fn default_app_dir() -> PathBuf {
    PathBuf::from("app")
}

fn default_route_extensions() -> Vec<String> {
    ["tsx", "ts", "jsx", "js"].iter().map(|s| s.to_string()).collect()
}

fn default_page_extension() -> String {
    "tsx".to_string()
}

fn default_path_separator() -> char {
    MAIN_SEPARATOR
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            routes_dir: None,
            root_file: None,
            routing_pattern: RoutingPattern::default(),
            route_extensions: default_route_extensions(),
            page_extension: default_page_extension(),
            ignored_route_files: Vec::new(),
            path_separator: default_path_separator(),
        }
    }
}

impl AppConfig {
    /// Default configuration for an app directory
    pub fn for_app_dir(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_routing_pattern(mut self, pattern: RoutingPattern) -> Self {
        self.routing_pattern = pattern;
        self
    }

    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }

    pub fn with_ignored_route_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_route_files = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Parse configuration from TOML text (`[app]` section)
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Invalid TOML")?;
        let config = file.app.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration of a project, falling back to defaults
    ///
    /// Relative directories are resolved against `project_root`.
    pub fn load(project_root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let default_path = project_root.join(CONFIG_FILE_NAME);
        let config = match config_path {
            Some(path) => Self::from_file(path)?,
            None if default_path.exists() => Self::from_file(&default_path)?,
            None => Self::default(),
        };
        Ok(config.resolved_against(project_root))
    }

    /// Makes every configured directory absolute relative to `root`
    pub fn resolved_against(mut self, root: &Path) -> Self {
        let absolutize = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { root.join(p) };
        self.app_dir = absolutize(&self.app_dir);
        self.routes_dir = self.routes_dir.as_deref().map(absolutize);
        self.root_file = self.root_file.as_deref().map(absolutize);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.route_extensions.is_empty() {
            anyhow::bail!("route_extensions must not be empty");
        }
        for pattern in &self.ignored_route_files {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid ignored_route_files pattern: {}", pattern))?;
        }
        Ok(())
    }

    pub fn routes_dir(&self) -> PathBuf {
        self.routes_dir
            .clone()
            .unwrap_or_else(|| self.app_dir.join("routes"))
    }

    pub fn root_file(&self) -> PathBuf {
        self.root_file
            .clone()
            .unwrap_or_else(|| self.app_dir.join(format!("root.{}", self.page_extension)))
    }

    /// Prefix of Remix route ids (`routes` for `app/routes`)
    pub fn route_id_prefix(&self) -> String {
        self.routes_dir()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "routes".to_string())
    }

    /// Routes-relative path of a file, joined with `path_separator`
    pub fn relative_route_path(&self, file_path: &Path) -> Option<String> {
        let relative = file_path.strip_prefix(self.routes_dir()).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        (!parts.is_empty()).then(|| parts.join(&self.path_separator.to_string()))
    }

    /// Whether a file under the routes directory is matched by `ignored_route_files`
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        let normalized = relative_path.replace(self.path_separator, "/");
        self.ignored_route_files.iter().any(|pattern| {
            Pattern::new(pattern)
                .map(|p| p.matches(&normalized))
                .unwrap_or(false)
        })
    }

    /// Whether a file could be a route module (extension, location, ignore list)
    pub fn is_route_candidate(&self, file_path: &Path) -> bool {
        let has_extension = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| self.route_extensions.iter().any(|e| e == ext));

        has_extension
            && self
                .relative_route_path(file_path)
                .map_or(false, |relative| !self.is_ignored(&relative))
    }
}
