//! Listings over a bundled template tree on disk

use super::{is_hidden, join_path, Entry, ListingProvider};
use crate::templates::manifest::MANIFEST_FILE;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Provider rooted at a fixed base directory
#[derive(Debug, Clone)]
pub struct LocalProvider {
    base: PathBuf,
}

impl LocalProvider {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Map a collection-relative path onto disk
    ///
    /// Returns `None` for paths that would leave the base directory.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_matches('/'));
        let stays_inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !stays_inside {
            return None;
        }
        Some(self.base.join(relative))
    }
}

impl ListingProvider for LocalProvider {
    async fn list(&self, dir: &str) -> Vec<Entry> {
        let Some(dir_path) = self.resolve(dir) else {
            return Vec::new();
        };
        let at_root = dir.trim_matches('/').is_empty();
        let canonical_dir = std::fs::canonicalize(&dir_path).ok();

        WalkDir::new(&dir_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                if is_hidden(&name) || (at_root && name == MANIFEST_FILE) {
                    return None;
                }
                let path = join_path(dir, &name);
                // Follows symlinks so linked template folders still browse as folders
                if e.path().is_dir() {
                    if e.path_is_symlink()
                        && links_to_ancestor(e.path(), canonical_dir.as_deref())
                    {
                        return None;
                    }
                    Some(Entry::dir(name, path))
                } else {
                    Some(Entry::file(name, path))
                }
            })
            .collect()
    }

    async fn fetch(&self, path: &str) -> Option<Vec<u8>> {
        let file_path = self.resolve(path)?;
        if !file_path.is_file() {
            return None;
        }
        fs::read(&file_path).await.ok()
    }
}

/// A symlinked directory pointing at the listed directory or one of its
/// ancestors would make every recursive walk loop forever
fn links_to_ancestor(link: &Path, listed: Option<&Path>) -> bool {
    let Some(listed) = listed else {
        return false;
    };
    match std::fs::canonicalize(link) {
        Ok(target) => listed.starts_with(target),
        Err(_) => true,
    }
}
