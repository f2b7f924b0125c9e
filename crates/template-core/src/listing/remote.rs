//! Listings over a GitHub repository
//!
//! Directories are listed through the contents API and files are pulled from
//! raw.githubusercontent.com. Any failure is recorded once and then treated
//! as an empty listing or a skipped file.

use super::{is_hidden, join_path, Entry, ListingProvider};
use crate::error::Error;
use crate::templates::manifest::MANIFEST_FILE;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Timeout for a single listing or file request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const GITHUB_API: &str = "https://api.github.com";
const GITHUB_RAW: &str = "https://raw.githubusercontent.com";

/// Coordinates of a GitHub repository holding template collections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub owner: String,
    pub name: String,
    /// Branch, tag or commit
    pub reference: String,
}

impl RemoteRepo {
    /// Parse `owner/repo` or `owner/repo@ref` (the ref defaults to `main`)
    pub fn parse(coordinates: &str) -> Result<Self> {
        let (repo, reference) = match coordinates.trim().split_once('@') {
            Some((repo, reference)) => (repo, reference),
            None => (coordinates.trim(), "main"),
        };
        let (owner, name) = repo
            .split_once('/')
            .filter(|(o, n)| !o.is_empty() && !n.is_empty() && !n.contains('/'))
            .ok_or_else(|| anyhow::anyhow!("expected owner/repo[@ref], got '{}'", coordinates))?;
        if reference.is_empty() {
            anyhow::bail!("empty ref in '{}'", coordinates);
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            reference: reference.to_string(),
        })
    }

    /// Contents API URL for a directory inside the repository
    pub fn contents_url(&self, root: &str) -> Result<Url> {
        let mut url = Url::parse(GITHUB_API)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", GITHUB_API))?
            .extend(["repos", self.owner.as_str(), self.name.as_str(), "contents"])
            .extend(root.split('/').filter(|s| !s.is_empty()));
        url.query_pairs_mut().append_pair("ref", &self.reference);
        Ok(url)
    }

    /// Raw content URL for a directory inside the repository
    pub fn raw_url(&self, root: &str) -> Result<Url> {
        let mut url = Url::parse(GITHUB_RAW)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", GITHUB_RAW))?
            .extend([self.owner.as_str(), self.name.as_str(), self.reference.as_str()])
            .extend(root.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }
}

impl fmt::Display for RemoteRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.name, self.reference)
    }
}

/// One element of a contents API directory response
#[derive(Debug, Deserialize)]
struct RemoteItem {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Provider backed by HTTP listing and raw content endpoints
pub struct RemoteProvider {
    contents_base: Url,
    raw_base: Url,
    client: reqwest::Client,
    failures: Mutex<Vec<Error>>,
}

impl RemoteProvider {
    /// Create a provider with a custom user agent
    pub fn new(contents_base: Url, raw_base: Url, user_agent: &str) -> Self {
        Self {
            contents_base,
            raw_base,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider for a collection directory inside a repository
    pub fn for_repo(repo: &RemoteRepo, root: &str, user_agent: &str) -> Result<Self> {
        let contents = repo
            .contents_url(root)
            .with_context(|| format!("Invalid contents URL for {}", repo))?;
        let raw = repo
            .raw_url(root)
            .with_context(|| format!("Invalid raw URL for {}", repo))?;
        Ok(Self::new(contents, raw, user_agent))
    }

    /// Build a URL by appending path segments, preserving query parameters
    fn build_url(base: &Url, path: &str) -> Option<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Some(url)
    }

    async fn try_list(&self, dir: &str) -> Result<Vec<Entry>, Error> {
        let url = Self::build_url(&self.contents_base, dir)
            .ok_or_else(|| network_error(&self.contents_base, "cannot build listing URL"))?;
        let body = self.get(&url).await?.text().await.map_err(|e| network_error(&url, e))?;
        parse_listing(dir, &body).map_err(|e| network_error(&url, format!("bad listing: {}", e)))
    }

    async fn try_fetch(&self, path: &str) -> Result<Vec<u8>, Error> {
        let url = Self::build_url(&self.raw_base, path)
            .ok_or_else(|| network_error(&self.raw_base, "cannot build content URL"))?;
        let bytes = self.get(&url).await?.bytes().await.map_err(|e| network_error(&url, e))?;
        Ok(bytes.to_vec())
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response, Error> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| network_error(url, e))?;

        if !response.status().is_success() {
            return Err(network_error(url, format!("HTTP {}", response.status())));
        }
        Ok(response)
    }

    fn record(&self, err: Error) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(err);
        }
    }
}

impl ListingProvider for RemoteProvider {
    async fn list(&self, dir: &str) -> Vec<Entry> {
        match self.try_list(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                self.record(e);
                Vec::new()
            }
        }
    }

    async fn fetch(&self, path: &str) -> Option<Vec<u8>> {
        match self.try_fetch(path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                self.record(e);
                None
            }
        }
    }

    fn take_failures(&self) -> Vec<Error> {
        self.failures
            .lock()
            .map(|mut failures| std::mem::take(&mut *failures))
            .unwrap_or_default()
    }
}

/// Turn a contents API response into entries under `dir`
///
/// Symlinks and submodules are dropped; only files and directories browse.
/// The collection manifest is hidden at the root, as on disk.
fn parse_listing(dir: &str, body: &str) -> serde_json::Result<Vec<Entry>> {
    let items: Vec<RemoteItem> = serde_json::from_str(body)?;
    let at_root = dir.trim_matches('/').is_empty();
    Ok(items
        .into_iter()
        .filter(|item| !is_hidden(&item.name))
        .filter(|item| !(at_root && item.name == MANIFEST_FILE))
        .filter_map(|item| {
            let path = join_path(dir, &item.name);
            match item.kind.as_str() {
                "dir" => Some(Entry::dir(item.name, path)),
                "file" => Some(Entry::file(item.name, path)),
                _ => None,
            }
        })
        .collect())
}

fn network_error(url: &Url, reason: impl fmt::Display) -> Error {
    Error::Network {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
