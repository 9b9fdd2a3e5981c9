//! [`FsApi`] over the real disk, backed by `notify`

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{debug, error};
use walkdir::WalkDir;

use super::{DirectoryCallback, FileCallback, FsApi, WatchGuard, Watched};
use crate::error::FsError;

/// Local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFs;

impl NativeFs {
    pub fn new() -> Self {
        Self
    }
}

/// Files below `root`, sorted by path
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, FsError> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                Some(Err(FsError::Io {
                    path,
                    source: err.into(),
                }))
            }
        })
        .collect()
}

/// Contents of a file, `None` if it does not exist
fn read_optional(path: &Path) -> Result<Option<String>, FsError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(FsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Whether an event can change the set of files below a directory
fn changes_file_set(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}

#[async_trait]
impl FsApi for NativeFs {
    async fn watch_directory(
        &self,
        path: &Path,
        on_change: DirectoryCallback,
    ) -> Result<Watched<Vec<PathBuf>>, FsError> {
        if !path.is_dir() {
            return Err(FsError::NotFound(path.to_path_buf()));
        }

        let initial = list_files(path)?;
        let root = path.to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) if changes_file_set(&event.kind) => match list_files(&root) {
                    Ok(files) => on_change(files),
                    Err(e) => error!("Failed to list {:?}: {}", root, e),
                },
                Ok(_) => {}
                Err(e) => error!("Watch error: {:?}", e),
            }
        })?;
        watcher.watch(path, RecursiveMode::Recursive)?;
        debug!("Watching directory: {:?}", path);

        Ok(Watched {
            initial,
            guard: WatchGuard::new(move || drop(watcher)),
        })
    }

    async fn watch_file(
        &self,
        path: &Path,
        on_change: FileCallback,
    ) -> Result<Watched<Option<String>>, FsError> {
        let parent = path
            .parent()
            .filter(|p| p.is_dir())
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))?;

        let initial = read_optional(path)?;
        let last = Arc::new(Mutex::new(initial.clone()));
        let file = path.to_path_buf();

        // Editors replace files on save; watching the parent survives that
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    error!("Watch error: {:?}", e);
                    return;
                }
            };
            if matches!(event.kind, EventKind::Access(_)) || !event.paths.contains(&file) {
                return;
            }

            let contents = match read_optional(&file) {
                Ok(contents) => contents,
                Err(e) => {
                    error!("Failed to read {:?}: {}", file, e);
                    return;
                }
            };

            let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
            if *last != contents {
                *last = contents.clone();
                drop(last);
                on_change(contents);
            }
        })?;
        watcher.watch(parent, RecursiveMode::NonRecursive)?;
        debug!("Watching file: {:?}", path);

        Ok(Watched {
            initial,
            guard: WatchGuard::new(move || drop(watcher)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("define-remix-app-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_list_files_sorted_and_recursive() {
        let dir = temp_dir("list");
        std::fs::create_dir_all(dir.join("b")).unwrap();
        std::fs::write(dir.join("c.tsx"), "").unwrap();
        std::fs::write(dir.join("a.tsx"), "").unwrap();
        std::fs::write(dir.join("b/route.tsx"), "").unwrap();

        let files = list_files(&dir).unwrap();
        assert_eq!(
            files,
            vec![dir.join("a.tsx"), dir.join("b/route.tsx"), dir.join("c.tsx")]
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_watch_missing_directory_fails() {
        let result = NativeFs
            .watch_directory(Path::new("/definitely/not/here"), Box::new(|_: Vec<PathBuf>| {}))
            .await;
        assert!(matches!(result, Err(FsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_initial_exports_of_file() {
        let dir = temp_dir("exports");
        let file = dir.join("about.tsx");
        std::fs::write(&file, "export default function About() {}").unwrap();

        let watched = NativeFs
            .watch_file_exports(&file, Box::new(|_: BTreeSet<String>| {}))
            .await
            .unwrap();
        assert!(watched.initial.contains("default"));

        watched.guard.stop();
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
