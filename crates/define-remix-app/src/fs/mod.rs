//! File-system seam of the resolver
//!
//! The coordinator never touches the disk directly: it asks an [`FsApi`] to
//! watch the routes directory and the exports of each route file. Each watch
//! resolves to its initial value plus a [`WatchGuard`]; later changes arrive
//! through the callback handed to the watch call.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::FsError;

pub mod exports;
pub mod native;

pub use exports::detect_exports;
pub use native::NativeFs;

/// Receives the full, sorted list of files below a watched directory
pub type DirectoryCallback = Box<dyn Fn(Vec<PathBuf>) + Send + Sync>;

/// Receives the new contents of a watched file (`None` once it is gone)
pub type FileCallback = Box<dyn Fn(Option<String>) + Send + Sync>;

/// Receives the new export names of a watched module
pub type ExportsCallback = Box<dyn Fn(BTreeSet<String>) + Send + Sync>;

/// Initial value of a watch together with the guard that ends it
pub struct Watched<T> {
    pub initial: T,
    pub guard: WatchGuard,
}

impl<T: fmt::Debug> fmt::Debug for Watched<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watched")
            .field("initial", &self.initial)
            .field("guard", &self.guard)
            .finish()
    }
}

/// Stops a watch when stopped explicitly or dropped
pub struct WatchGuard {
    stop: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchGuard {
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            stop: Some(Box::new(stop)),
        }
    }

    /// Guard for a watch with nothing to release
    pub fn noop() -> Self {
        Self { stop: None }
    }

    pub fn stop(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchGuard")
            .field("active", &self.stop.is_some())
            .finish()
    }
}

/// Watch I/O used by the live update coordinator
#[async_trait]
pub trait FsApi: Send + Sync {
    /// Separator used in paths handed out by this file system; `prepare_app`
    /// joins and splits routes-relative paths with it
    fn path_separator(&self) -> char {
        MAIN_SEPARATOR
    }

    /// Watches every file below `path`, recursively
    async fn watch_directory(
        &self,
        path: &Path,
        on_change: DirectoryCallback,
    ) -> Result<Watched<Vec<PathBuf>>, FsError>;

    /// Watches the contents of one file
    async fn watch_file(
        &self,
        path: &Path,
        on_change: FileCallback,
    ) -> Result<Watched<Option<String>>, FsError>;

    /// Watches the export names of one module
    ///
    /// Derived from [`FsApi::watch_file`]; the callback only fires when the
    /// set of names actually changes.
    async fn watch_file_exports(
        &self,
        path: &Path,
        on_change: ExportsCallback,
    ) -> Result<Watched<BTreeSet<String>>, FsError> {
        let last: Arc<Mutex<Option<BTreeSet<String>>>> = Arc::new(Mutex::new(None));
        let last_seen = Arc::clone(&last);

        let watched = self
            .watch_file(
                path,
                Box::new(move |contents| {
                    let names = contents.as_deref().map(detect_exports).unwrap_or_default();
                    let mut last = last_seen.lock().unwrap_or_else(PoisonError::into_inner);
                    if last.as_ref() != Some(&names) {
                        *last = Some(names.clone());
                        drop(last);
                        on_change(names);
                    }
                }),
            )
            .await?;

        let initial = watched.initial.as_deref().map(detect_exports).unwrap_or_default();
        last.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert_with(|| initial.clone());

        Ok(Watched {
            initial,
            guard: watched.guard,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_guard_stops_once() {
        let stops = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&stops);
        let guard = WatchGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        guard.stop();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_stops_on_drop() {
        let stops = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&stops);
        {
            let _guard = WatchGuard::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    /// File system whose single file can be rewritten by the test
    struct OneFile {
        contents: &'static str,
        callback: Mutex<Option<FileCallback>>,
    }

    impl OneFile {
        fn write(&self, contents: &str) {
            if let Some(callback) = self.callback.lock().unwrap().as_ref() {
                callback(Some(contents.to_string()));
            }
        }
    }

    #[async_trait]
    impl FsApi for OneFile {
        async fn watch_directory(
            &self,
            _path: &Path,
            _on_change: DirectoryCallback,
        ) -> Result<Watched<Vec<PathBuf>>, FsError> {
            Ok(Watched {
                initial: Vec::new(),
                guard: WatchGuard::noop(),
            })
        }

        async fn watch_file(
            &self,
            _path: &Path,
            on_change: FileCallback,
        ) -> Result<Watched<Option<String>>, FsError> {
            *self.callback.lock().unwrap() = Some(on_change);
            Ok(Watched {
                initial: Some(self.contents.to_string()),
                guard: WatchGuard::noop(),
            })
        }
    }

    #[tokio::test]
    async fn test_exports_callback_fires_only_on_change() {
        let fs = OneFile {
            contents: "export default function Page() {}",
            callback: Mutex::new(None),
        };
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let watched = fs
            .watch_file_exports(
                Path::new("/app/routes/about.tsx"),
                Box::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();
        assert!(watched.initial.contains("default"));

        fs.write("export default function Page() { return null; }");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        fs.write("export default function Page() {}\nexport const loader = () => null;");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
