//! Live update coordinator
//!
//! Keeps an [`AppManifest`] in sync with the routes directory. Watch
//! callbacks only enqueue [`CoordinatorEvent`]s; a single task owns the known
//! file set and handles events one at a time, so a callback firing during a
//! recomputation is queued behind it instead of interleaving with it.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, FsError};
use crate::fs::{FsApi, WatchGuard, Watched};
use crate::manifest::{build_manifest, AppManifest};
use crate::runtime::{HookRegistry, LifecycleEvent, Navigation, SwapHandle};
use crate::{RouteFile, RouteFiles};

/// Called with every manifest published after the initial one
pub type ManifestCallback = Box<dyn Fn(&AppManifest) + Send + Sync>;

/// Change reported by a watch callback
#[derive(Debug)]
enum CoordinatorEvent {
    /// Full file list of the routes directory
    Directory(Vec<PathBuf>),
    /// New export names of a watched module
    Exports {
        path: PathBuf,
        exports: BTreeSet<String>,
    },
}

#[derive(Default)]
struct Guards {
    directory: Option<WatchGuard>,
    files: HashMap<PathBuf, WatchGuard>,
}

/// State shared between the handle, the task and watch callbacks
#[derive(Default)]
struct Shared {
    disposed: AtomicBool,
    guards: Mutex<Guards>,
    /// Held while a manifest is handed out; `dispose` waits for it
    publishing: Mutex<()>,
}

impl Shared {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn guards(&self) -> std::sync::MutexGuard<'_, Guards> {
        self.guards.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publishing(&self) -> std::sync::MutexGuard<'_, ()> {
        self.publishing.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Keeps a file watch, or stops it right away if the app is gone
    fn keep_file_guard(&self, path: PathBuf, guard: WatchGuard) {
        if self.is_disposed() {
            guard.stop();
            return;
        }
        if let Some(previous) = self.guards().files.insert(path, guard) {
            previous.stop();
        }
    }

    fn stop_file_guard(&self, path: &Path) {
        let guard = self.guards().files.remove(path);
        if let Some(guard) = guard {
            guard.stop();
        }
    }
}

/// Initial manifest plus the handle of the live app
#[derive(Debug)]
pub struct PreparedApp {
    pub manifest: AppManifest,
    pub handle: AppHandle,
}

/// Handle of a live app; dispose it to stop watching
pub struct AppHandle {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
    manifest: SwapHandle<AppManifest>,
    known_files: SwapHandle<RouteFiles>,
    hooks: HookRegistry,
    navigation: Navigation,
}

impl std::fmt::Debug for AppHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppHandle")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl AppHandle {
    /// Latest published manifest
    pub fn manifest(&self) -> SwapHandle<AppManifest> {
        self.manifest.clone()
    }

    /// Files behind the latest manifest, including those it leaves out
    pub fn known_files(&self) -> SwapHandle<RouteFiles> {
        self.known_files.clone()
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

    /// Stops every watch; no manifest is published afterwards
    ///
    /// Idempotent. Watches still being opened are stopped as soon as they
    /// resolve. A publish already in progress finishes before this returns,
    /// so it must not be called from the manifest callback or a hook listener.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        drop(self.shared.publishing());

        let guards = std::mem::take(&mut *self.shared.guards());
        if let Some(directory) = guards.directory {
            directory.stop();
        }
        for (_, guard) in guards.files {
            guard.stop();
        }

        if let Some(task) = self.task.lock().unwrap_or_else(PoisonError::into_inner).take() {
            task.abort();
        }

        info!("Disposed app");
        self.hooks.emit(LifecycleEvent::Disposed);
    }
}

impl Drop for AppHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Owned by the coordinator task
struct Coordinator {
    fs: Arc<dyn FsApi>,
    config: AppConfig,
    files: RouteFiles,
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<CoordinatorEvent>,
    manifest: SwapHandle<AppManifest>,
    known_files: SwapHandle<RouteFiles>,
    hooks: HookRegistry,
    on_manifest_update: ManifestCallback,
}

/// Opens an exports watch whose updates are queued as events
async fn watch_exports(
    fs: &dyn FsApi,
    path: &Path,
    tx: &mpsc::UnboundedSender<CoordinatorEvent>,
    shared: &Arc<Shared>,
) -> Result<Watched<BTreeSet<String>>, FsError> {
    let tx = tx.clone();
    let shared = Arc::clone(shared);
    let file = path.to_path_buf();

    fs.watch_file_exports(
        path,
        Box::new(move |exports| {
            if shared.is_disposed() {
                return;
            }
            // Receiver gone means the app was disposed
            let _ = tx.send(CoordinatorEvent::Exports {
                path: file.clone(),
                exports,
            });
        }),
    )
    .await
}

impl Coordinator {
    fn is_watched(&self, path: &Path) -> bool {
        path == self.config.root_file() || self.config.is_route_candidate(path)
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<CoordinatorEvent>) {
        while let Some(event) = rx.recv().await {
            if self.shared.is_disposed() {
                break;
            }
            match event {
                CoordinatorEvent::Directory(paths) => self.on_directory(paths).await,
                CoordinatorEvent::Exports { path, exports } => self.on_exports(path, exports),
            }
        }
        debug!("Coordinator task finished");
    }

    async fn on_directory(&mut self, paths: Vec<PathBuf>) {
        let listed: HashSet<&Path> = paths.iter().map(PathBuf::as_path).collect();
        let root_file = self.config.root_file();

        let removed: Vec<PathBuf> = self
            .files
            .paths()
            .filter(|p| *p != root_file && !listed.contains(p))
            .map(Path::to_path_buf)
            .collect();
        for path in &removed {
            debug!("Route file removed: {:?}", path);
            self.shared.stop_file_guard(path);
            self.files.remove(path);
        }

        let new_paths: Vec<PathBuf> = paths
            .iter()
            .filter(|p| self.is_watched(p) && !self.files.contains(p))
            .cloned()
            .collect();

        let mut added = false;
        for path in &new_paths {
            match watch_exports(self.fs.as_ref(), path, &self.tx, &self.shared).await {
                Ok(watched) => {
                    if self.shared.is_disposed() {
                        watched.guard.stop();
                        return;
                    }
                    debug!("Route file added: {:?}", path);
                    self.shared.keep_file_guard(path.clone(), watched.guard);
                    self.files.upsert(RouteFile {
                        file_path: path.clone(),
                        export_names: watched.initial,
                    });
                    added = true;
                }
                Err(e) => error!("Failed to watch exports of {:?}: {}", path, e),
            }
        }

        if added || !removed.is_empty() {
            self.publish();
        }
    }

    fn on_exports(&mut self, path: PathBuf, exports: BTreeSet<String>) {
        if !self.files.contains(&path) {
            debug!("Ignoring exports of unknown file {:?}", path);
            return;
        }
        debug!("Exports changed: {:?} -> {:?}", path, exports);
        self.files.upsert(RouteFile {
            file_path: path,
            export_names: exports,
        });
        self.publish();
    }

    fn publish(&self) {
        let manifest = build_manifest(&self.files, &self.config);

        let _publishing = self.shared.publishing();
        // `dispose` may have run on another thread during the build
        if self.shared.is_disposed() {
            debug!("Dropping manifest built after dispose");
            return;
        }
        self.known_files.set(self.files.clone());
        self.manifest.set(manifest);
        let manifest = self.manifest.get();
        let route_count = manifest.all_routes().count();
        info!(
            "Manifest updated: {} routes, {} error routes",
            route_count,
            manifest.error_routes.len()
        );

        (self.on_manifest_update)(&manifest);
        self.hooks.emit(LifecycleEvent::ManifestUpdated {
            route_count,
            error_route_count: manifest.error_routes.len(),
            diagnostic_count: manifest.diagnostics.len(),
        });
    }
}

/// Builds the initial manifest of an app and keeps it live
///
/// Watches the routes directory and the exports of the root module and of
/// every route file. `on_manifest_update` receives each later manifest; the
/// initial one is returned. Must be called within a tokio runtime.
///
/// Failing to watch the routes directory or the root module is an error;
/// a route file whose exports cannot be watched is logged and left out.
pub async fn prepare_app(
    fs: Arc<dyn FsApi>,
    config: AppConfig,
    on_manifest_update: ManifestCallback,
) -> Result<PreparedApp, AppError> {
    let config = config.with_path_separator(fs.path_separator());
    let shared = Arc::new(Shared::default());
    let (tx, rx) = mpsc::unbounded_channel();
    let routes_dir = config.routes_dir();
    let root_file = config.root_file();

    let directory_tx = tx.clone();
    let directory_shared = Arc::clone(&shared);
    let directory = fs
        .watch_directory(
            &routes_dir,
            Box::new(move |paths| {
                if directory_shared.is_disposed() {
                    return;
                }
                let _ = directory_tx.send(CoordinatorEvent::Directory(paths));
            }),
        )
        .await
        .map_err(|source| AppError::WatchRoutes {
            path: routes_dir.clone(),
            source,
        })?;
    shared.guards().directory = Some(directory.guard);

    let mut files = RouteFiles::new();

    let root = watch_exports(fs.as_ref(), &root_file, &tx, &shared)
        .await
        .map_err(|source| AppError::WatchExports {
            path: root_file.clone(),
            source,
        })?;
    shared.keep_file_guard(root_file.clone(), root.guard);
    files.upsert(RouteFile {
        file_path: root_file,
        export_names: root.initial,
    });

    for path in directory.initial.iter().filter(|p| config.is_route_candidate(p)) {
        match watch_exports(fs.as_ref(), path, &tx, &shared).await {
            Ok(watched) => {
                shared.keep_file_guard(path.clone(), watched.guard);
                files.upsert(RouteFile {
                    file_path: path.clone(),
                    export_names: watched.initial,
                });
            }
            Err(e) => warn!("Skipping {:?}: {}", path, e),
        }
    }

    let manifest = build_manifest(&files, &config);
    info!(
        "Prepared app {:?}: {} routes, {} diagnostics",
        config.app_dir,
        manifest.all_routes().count(),
        manifest.diagnostics.len()
    );

    let manifest_handle = SwapHandle::new(manifest.clone());
    let known_files = SwapHandle::new(files.clone());
    let hooks = HookRegistry::new();
    let navigation = Navigation::new(manifest_handle.clone(), hooks.clone());

    let coordinator = Coordinator {
        fs,
        config,
        files,
        shared: Arc::clone(&shared),
        tx,
        manifest: manifest_handle.clone(),
        known_files: known_files.clone(),
        hooks: hooks.clone(),
        on_manifest_update,
    };
    let task = tokio::spawn(coordinator.run(rx));

    Ok(PreparedApp {
        manifest,
        handle: AppHandle {
            shared,
            task: Mutex::new(Some(task)),
            manifest: manifest_handle,
            known_files,
            hooks,
            navigation,
        },
    })
}
