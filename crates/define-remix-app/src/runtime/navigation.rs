//! Preview navigation over a live manifest

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::NavigationError;
use crate::manifest::AppManifest;
use crate::path::normalize_path;

use super::{HookRegistry, LifecycleEvent, SwapHandle};

/// Where a navigation landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub url: String,
    pub route_id: String,
    pub page_module: PathBuf,
    pub params: HashMap<String, String>,
}

/// Navigation handle of one prepared app
///
/// Resolves URLs against whatever manifest the app currently publishes and
/// reports each move as [`LifecycleEvent::Navigated`].
#[derive(Debug, Clone)]
pub struct Navigation {
    manifest: SwapHandle<AppManifest>,
    hooks: HookRegistry,
    current: Arc<Mutex<String>>,
}

impl Navigation {
    pub fn new(manifest: SwapHandle<AppManifest>, hooks: HookRegistry) -> Self {
        Self {
            manifest,
            hooks,
            current: Arc::new(Mutex::new("/".to_string())),
        }
    }

    /// Current URL
    pub fn current(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolves `url` to a page route without moving
    pub fn resolve(&self, url: &str) -> Result<NavigationTarget, NavigationError> {
        let url = normalize_path(url).into_owned();
        let manifest = self.manifest.get();
        let found = manifest
            .match_path(&url)
            .ok_or_else(|| NavigationError::NoMatchingRoute(url.clone()))?;

        Ok(NavigationTarget {
            route_id: found.route.extra_data.route_id.clone(),
            page_module: found.route.page_module.clone(),
            params: found.params,
            url,
        })
    }

    /// Moves to `url`; the current URL is unchanged on failure
    pub fn navigate(&self, url: &str) -> Result<NavigationTarget, NavigationError> {
        let target = self.resolve(url)?;

        let from = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, target.url.clone())
        };
        debug!("Navigated {} -> {} ({})", from, target.url, target.route_id);

        self.hooks.emit(LifecycleEvent::Navigated {
            from,
            to: target.url.clone(),
            route_id: target.route_id.clone(),
        });
        Ok(target)
    }
}
