//! Copying selected files or whole projects into a destination directory

use crate::browse::SelectionSet;
use crate::error::{Error, Result};
use crate::listing::{join_path, Entry, EntryKind, ListingProvider};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Download every identifier in `selection` into `destination`
///
/// Files keep their path relative to the selection's browse root. A file
/// whose fetch fails is skipped; files already written stay on disk.
/// Returns the number of files written.
pub async fn download_selection<P: ListingProvider>(
    selection: &SelectionSet,
    provider: &P,
    destination: &Path,
) -> Result<usize> {
    let mut written = 0;

    for path in selection.iter() {
        let Some(content) = provider.fetch(path).await else {
            continue;
        };
        let Some(target) = target_path(destination, selection.relative(path)) else {
            continue;
        };
        write_file(&target, &content).await?;
        written += 1;
    }

    Ok(written)
}

/// Copy a whole project directory out of a collection
///
/// Fails with `NotFound` when the collection has no such project and with
/// `AlreadyExists` when `destination` is present; nothing is written in
/// either case. Files whose fetch fails are skipped.
pub async fn copy_project<P: ListingProvider>(
    provider: &P,
    project: &str,
    destination: &Path,
) -> Result<usize> {
    ensure_project(provider, project).await?;

    if destination.exists() {
        return Err(Error::AlreadyExists(destination.to_path_buf()));
    }

    let files = collect_files(provider, project).await;
    fs::create_dir_all(destination).await?;

    let prefix = join_path(project, "");
    let mut written = 0;
    for path in &files {
        let Some(content) = provider.fetch(path).await else {
            continue;
        };
        let relative = path.strip_prefix(prefix.as_str()).unwrap_or(path.as_str());
        let Some(target) = target_path(destination, relative) else {
            continue;
        };
        write_file(&target, &content).await?;
        written += 1;
    }

    Ok(written)
}

/// Names of the project directories at the collection root, sorted
pub async fn list_projects<P: ListingProvider>(provider: &P) -> Vec<String> {
    let mut projects: Vec<String> = provider
        .list("")
        .await
        .into_iter()
        .filter(Entry::is_dir)
        .map(|e| e.name)
        .collect();
    projects.sort();
    projects
}

/// Fail with `NotFound` unless `project` is a directory at the collection root
pub async fn ensure_project<P: ListingProvider>(provider: &P, project: &str) -> Result<()> {
    let exists = provider
        .list("")
        .await
        .iter()
        .any(|e| e.kind == EntryKind::Directory && e.name == project);

    if exists {
        Ok(())
    } else {
        Err(Error::NotFound(project.to_string()))
    }
}

/// Every file below `dir`, depth first in listing order
pub async fn collect_files<P: ListingProvider>(provider: &P, dir: &str) -> Vec<String> {
    let mut files = Vec::new();
    let mut pending: Vec<Entry> = provider.list(dir).await.into_iter().rev().collect();

    while let Some(entry) = pending.pop() {
        match entry.kind {
            EntryKind::File => files.push(entry.path),
            EntryKind::Directory => {
                let children = provider.list(&entry.path).await;
                pending.extend(children.into_iter().rev());
            }
        }
    }

    files
}

/// Destination for a collection-relative path, refusing anything that
/// would land outside `destination`
fn target_path(destination: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let inside = relative.components().count() > 0
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    inside.then(|| destination.join(relative))
}

async fn write_file(target: &Path, content: &[u8]) -> Result<()> {
    // Ensure parent directories exist
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(target, content).await?;
    Ok(())
}
