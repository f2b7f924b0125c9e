//! Collection manifest types and parsing

use crate::listing::ListingProvider;
use serde::{Deserialize, Serialize};

/// Manifest file name at a collection root; hidden from listings
pub const MANIFEST_FILE: &str = "template.yaml";

/// Description of one project in a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project directory name
    pub name: String,

    /// One-line summary shown in the project picker
    #[serde(default)]
    pub description: String,
}

/// Collection manifest (templates/template.yaml)
///
/// Optional: a collection without one still browses, its projects just have
/// no descriptions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RootManifest {
    #[serde(default)]
    pub projects: Vec<ProjectInfo>,
}

impl RootManifest {
    /// Description for a project, if the manifest has a non-empty one
    pub fn description(&self, project: &str) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| p.name == project)
            .map(|p| p.description.as_str())
            .filter(|d| !d.is_empty())
    }
}

/// Load the collection manifest; a collection without one has an empty manifest
pub async fn load_manifest<P: ListingProvider>(
    provider: &P,
) -> Result<RootManifest, serde_yaml::Error> {
    match provider.fetch(MANIFEST_FILE).await {
        Some(bytes) => serde_yaml::from_slice(&bytes),
        None => Ok(RootManifest::default()),
    }
}
