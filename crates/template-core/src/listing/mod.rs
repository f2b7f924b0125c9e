//! Directory listings over local or remote template collections
//!
//! Every collection is addressed with `/`-separated paths relative to its
//! root; the empty string is the root itself. Both providers hand back fresh
//! `Entry` values on every call and never cache listings.

pub mod local;
pub mod remote;

#[cfg(test)]
pub(crate) mod memory;

use crate::error::Error;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;

pub use local::LocalProvider;
pub use remote::{RemoteProvider, RemoteRepo};

/// Kind of a listed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
}

/// One item in a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display label
    pub name: String,
    pub kind: EntryKind,
    /// Identifier used to retrieve the item, relative to the collection root
    pub path: String,
}

impl Entry {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            path: path.into(),
        }
    }

    pub fn dir(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            path: path.into(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Source of directory listings and file contents
///
/// Implementations swallow their own failures: an unreadable directory is an
/// empty listing and an unreadable file is `None`. Failures worth telling the
/// user about are kept until the caller drains them with `take_failures`.
#[allow(async_fn_in_trait)]
pub trait ListingProvider {
    /// List the entries directly under `dir`, in a stable order
    async fn list(&self, dir: &str) -> Vec<Entry>;

    /// Raw content of the file at `path`
    async fn fetch(&self, path: &str) -> Option<Vec<u8>>;

    /// Failures recorded since the last call, oldest first
    fn take_failures(&self) -> Vec<Error> {
        Vec::new()
    }
}

/// Named root collections shipped with a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Public templates
    Templates,
    /// Privileged templates, only reachable after owner verification
    OwnerTemplates,
}

impl Collection {
    /// Directory name of the collection, both bundled and in the remote repository
    pub fn dir_name(&self) -> &'static str {
        match self {
            Collection::Templates => "templates",
            Collection::OwnerTemplates => "owner_templates",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Where a collection is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SourceKind {
    /// Bundled template tree on disk
    #[default]
    Local,
    /// Remote repository through the GitHub contents API
    Remote,
}

/// Template source - either a local directory or a remote repository
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Local(PathBuf),
    Remote { repo: RemoteRepo, root: String },
}

impl TemplateSource {
    /// Resolve a collection against a product config
    ///
    /// Precedence: explicit `template_dir`, then the product's env var, then
    /// the product default.
    pub fn from_config<C: ProductConfig>(
        config: &C,
        collection: Collection,
        kind: SourceKind,
        template_dir: Option<&PathBuf>,
    ) -> Result<Self> {
        match kind {
            SourceKind::Local => {
                let base = match template_dir {
                    Some(dir) => dir.clone(),
                    None => std::env::var(config.bundled_dir_env())
                        .map(PathBuf::from)
                        .unwrap_or_else(|_| config.bundled_dir()),
                };
                Ok(Self::Local(base.join(collection.dir_name())))
            }
            SourceKind::Remote => {
                let coordinates = std::env::var(config.remote_repo_env())
                    .unwrap_or_else(|_| config.default_remote_repo().to_string());
                let repo = RemoteRepo::parse(&coordinates)
                    .with_context(|| format!("Invalid remote repository: {}", coordinates))?;
                Ok(Self::Remote {
                    repo,
                    root: collection.dir_name().to_string(),
                })
            }
        }
    }

    /// Human readable description, used in status messages
    pub fn describe(&self) -> String {
        match self {
            TemplateSource::Local(path) => path.display().to_string(),
            TemplateSource::Remote { repo, root } => format!("{}/{}", repo, root),
        }
    }
}

/// Provider dispatching to the local or remote implementation
pub enum TemplateProvider {
    Local(LocalProvider),
    Remote(RemoteProvider),
}

impl TemplateProvider {
    /// Build the provider for a resolved source
    pub fn new(source: TemplateSource, user_agent: &str) -> Result<Self> {
        Ok(match source {
            TemplateSource::Local(path) => Self::Local(LocalProvider::new(path)),
            TemplateSource::Remote { repo, root } => {
                Self::Remote(RemoteProvider::for_repo(&repo, &root, user_agent)?)
            }
        })
    }
}

impl ListingProvider for TemplateProvider {
    async fn list(&self, dir: &str) -> Vec<Entry> {
        match self {
            TemplateProvider::Local(p) => p.list(dir).await,
            TemplateProvider::Remote(p) => p.list(dir).await,
        }
    }

    async fn fetch(&self, path: &str) -> Option<Vec<u8>> {
        match self {
            TemplateProvider::Local(p) => p.fetch(path).await,
            TemplateProvider::Remote(p) => p.fetch(path).await,
        }
    }

    fn take_failures(&self) -> Vec<Error> {
        match self {
            TemplateProvider::Local(p) => p.take_failures(),
            TemplateProvider::Remote(p) => p.take_failures(),
        }
    }
}

/// Join a collection-relative directory and a child name
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Parent of a collection-relative path; the root is its own parent
pub fn parent_path(path: &str) -> &str {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some((parent, _)) => parent,
        None => "",
    }
}

/// Entries named like build artifacts are hidden from every listing
pub(crate) fn is_hidden(name: &str) -> bool {
    name == "__pycache__" || name.ends_with(".pyc")
}
