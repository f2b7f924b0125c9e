//! In-memory provider for tests

use super::{join_path, Entry, ListingProvider};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Provider over a fixed set of files; directories are implied by file paths
#[derive(Debug, Default)]
pub struct MemoryProvider {
    files: BTreeMap<String, Vec<u8>>,
    failing: HashSet<String>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.as_bytes().to_vec());
        self
    }

    /// Keep `path` listed but make every fetch of it fail
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }
}

impl ListingProvider for MemoryProvider {
    async fn list(&self, dir: &str) -> Vec<Entry> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            join_path(dir, "")
        };

        let mut files = BTreeSet::new();
        let mut dirs = BTreeSet::new();
        for path in self.files.keys() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child, _)) => dirs.insert(child.to_string()),
                None => files.insert(rest.to_string()),
            };
        }

        let mut entries: Vec<Entry> = files
            .into_iter()
            .map(|name| Entry::file(name.clone(), join_path(dir, &name)))
            .chain(
                dirs.into_iter()
                    .map(|name| Entry::dir(name.clone(), join_path(dir, &name))),
            )
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    async fn fetch(&self, path: &str) -> Option<Vec<u8>> {
        if self.failing.contains(path) {
            return None;
        }
        self.files.get(path).cloned()
    }
}
