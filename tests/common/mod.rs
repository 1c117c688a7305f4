#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use luximo_lib::core::catalog::{ArtifactSource, CatalogDocument, CatalogSnapshot};
use luximo_lib::core::error::{CatalogFailure, DownloadFailure, SyncError, SyncResult};
use luximo_lib::core::family::build::BuildResponse;
use luximo_lib::core::family::map::MapsResponse;
use luximo_lib::core::family::plugin::PluginsResponse;
use luximo_lib::core::family::Family;
use tempfile::TempDir;

/// In-memory catalog service. Unknown download paths answer 404, a
/// family without a catalog answers `success=false`.
#[derive(Default)]
pub struct FakeSource {
    catalogs: Mutex<HashMap<Family, CatalogSnapshot>>,
    artifacts: Mutex<HashMap<Vec<String>, Vec<u8>>>,
    requests: Mutex<Vec<Vec<String>>>,
    watched: Mutex<Option<PathBuf>>,
    observed: Mutex<Vec<bool>>,
    download_delay: Mutex<Option<Duration>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_catalog(&self, family: Family, snapshot: CatalogSnapshot) {
        self.catalogs.lock().unwrap().insert(family, snapshot);
    }

    pub fn remove_catalog(&self, family: Family) {
        self.catalogs.lock().unwrap().remove(&family);
    }

    pub fn put(&self, path: &[&str], bytes: &[u8]) {
        self.artifacts
            .lock()
            .unwrap()
            .insert(path.iter().map(|s| s.to_string()).collect(), bytes.to_vec());
    }

    /// Record whether `path` exists each time an artifact is fetched.
    pub fn watch(&self, path: PathBuf) {
        *self.watched.lock().unwrap() = Some(path);
    }

    pub fn observed(&self) -> Vec<bool> {
        self.observed.lock().unwrap().clone()
    }

    pub fn slow_downloads(&self, delay: Duration) {
        *self.download_delay.lock().unwrap() = Some(delay);
    }

    /// Download paths requested so far, joined with `/`.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.join("/"))
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl ArtifactSource for FakeSource {
    async fn fetch_catalog(&self, family: Family) -> SyncResult<CatalogSnapshot> {
        self.catalogs
            .lock()
            .unwrap()
            .get(&family)
            .cloned()
            .ok_or(SyncError::Catalog {
                family,
                source: CatalogFailure::Rejected,
            })
    }

    async fn fetch_artifact(&self, path: &[String]) -> SyncResult<Vec<u8>> {
        self.requests.lock().unwrap().push(path.to_vec());

        let watched = self.watched.lock().unwrap().clone();
        if let Some(watched) = watched {
            self.observed.lock().unwrap().push(watched.exists());
        }

        let delay = *self.download_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let found = self.artifacts.lock().unwrap().get(path).cloned();
        found.ok_or_else(|| SyncError::Download {
            url: path.join("/"),
            source: DownloadFailure::Status(404),
        })
    }
}

pub fn plugins_catalog(json: &str) -> CatalogSnapshot {
    serde_json::from_str::<PluginsResponse>(json)
        .unwrap()
        .into_snapshot(Family::Plugin)
        .unwrap()
}

pub fn build_catalog(family: Family, json: &str) -> CatalogSnapshot {
    serde_json::from_str::<BuildResponse>(json)
        .unwrap()
        .into_snapshot(family)
        .unwrap()
}

pub fn maps_catalog(json: &str) -> CatalogSnapshot {
    serde_json::from_str::<MapsResponse>(json)
        .unwrap()
        .into_snapshot(Family::Map)
        .unwrap()
}

/// Family roots created under a fresh temporary directory.
pub fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    for family in ["plugins", "paper", "velocity", "maps"] {
        std::fs::create_dir(dir.path().join(family)).unwrap();
    }
    dir
}

pub fn touch(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Every file and directory under `root`, relative, sorted.
pub fn tree(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
            if path.is_dir() {
                out.push(format!("{rel}/"));
                walk(root, &path, out);
            } else {
                out.push(rel);
            }
        }
    }

    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
