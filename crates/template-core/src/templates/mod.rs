//! Template collection operations
//!
//! This module provides:
//! - Collection manifest parsing (project descriptions)
//! - Download of browse selections and whole-project copies
//! - Tree previews of a project

pub mod copier;
pub mod manifest;
pub mod tree;

pub use copier::{collect_files, copy_project, download_selection, ensure_project, list_projects};
pub use manifest::{load_manifest, ProjectInfo, RootManifest, MANIFEST_FILE};
pub use tree::{build_tree, TreeLine};
