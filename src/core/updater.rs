use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::core::catalog::ArtifactSource;
use crate::core::error::SyncResult;
use crate::core::family::Family;
use crate::core::reconcile::{self, ReconcileReport};

/// Local root directory of every family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyRoots {
    pub plugins: PathBuf,
    pub paper: PathBuf,
    pub velocity: PathBuf,
    pub maps: PathBuf,
}

impl FamilyRoots {
    /// `<data_dir>/{plugins,paper,velocity,maps}`
    pub fn under(data_dir: &Path) -> Self {
        Self {
            plugins: data_dir.join("plugins"),
            paper: data_dir.join("paper"),
            velocity: data_dir.join("velocity"),
            maps: data_dir.join("maps"),
        }
    }

    pub fn root(&self, family: Family) -> &Path {
        match family {
            Family::Plugin => &self.plugins,
            Family::Paper => &self.paper,
            Family::Velocity => &self.velocity,
            Family::Map => &self.maps,
        }
    }
}

/// Entry points of the synchronizer, one per family.
///
/// Passes of the same family are serialized; different families run
/// independently.
pub struct Updater<S> {
    source: S,
    roots: FamilyRoots,
    /// Indexed by `Family as usize`.
    locks: [Mutex<()>; 4],
}

impl<S: ArtifactSource> Updater<S> {
    pub fn new(source: S, roots: FamilyRoots) -> Self {
        Self {
            source,
            roots,
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    pub fn roots(&self) -> &FamilyRoots {
        &self.roots
    }

    /// Run one reconciliation pass for `family`, waiting for any pass
    /// of the same family already in flight.
    pub async fn update(&self, family: Family) -> SyncResult<ReconcileReport> {
        let _guard = self.locks[family as usize].lock().await;

        info!("Updating {}...", family);
        let result = reconcile::run_pass(family, self.roots.root(family), &self.source).await;

        match &result {
            Ok(report) => info!(
                "{} updated: {} deleted, {} fetched",
                family,
                report.deleted.len(),
                report.fetched.len()
            ),
            Err(e) => error!("{} update failed: {}", family, e),
        }
        result
    }

    pub async fn update_plugins(&self) -> SyncResult<ReconcileReport> {
        self.update(Family::Plugin).await
    }

    pub async fn update_paper(&self) -> SyncResult<ReconcileReport> {
        self.update(Family::Paper).await
    }

    pub async fn update_velocity(&self) -> SyncResult<ReconcileReport> {
        self.update(Family::Velocity).await
    }

    pub async fn update_maps(&self) -> SyncResult<ReconcileReport> {
        self.update(Family::Map).await
    }
}
