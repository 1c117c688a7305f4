use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::plan::ReconcilePlan;
use crate::core::catalog::{ArtifactSource, DesiredUnit};
use crate::core::error::{SyncError, SyncResult};
use crate::core::family::{Family, UnitShape};
use crate::core::identity::VersionedIdentity;

/// Prefix of the per-unit staging directories. Dot-prefixed names never
/// decode as identities, so a leftover from a killed process is
/// collected as an orphan by the next pass.
const STAGING_PREFIX: &str = ".staging-";

/// What one pass actually changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub family: Family,
    pub deleted: Vec<PathBuf>,
    pub fetched: Vec<VersionedIdentity>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.fetched.is_empty()
    }
}

/// Apply a plan under `root`: every deletion first, then every fetch.
///
/// Stops at the first error. Whatever was applied before stays applied;
/// the next pass rescans and continues from there.
pub async fn apply<S: ArtifactSource + ?Sized>(
    family: Family,
    root: &Path,
    plan: ReconcilePlan,
    source: &S,
) -> SyncResult<ReconcileReport> {
    let mut report = ReconcileReport {
        family,
        deleted: Vec::with_capacity(plan.deletions.len()),
        fetched: Vec::with_capacity(plan.fetches.len()),
    };

    for deletion in plan.deletions {
        info!("Deleting {:?} ({})", deletion.path, deletion.reason);
        remove_path(&deletion.path).await?;
        report.deleted.push(deletion.path);
    }

    for unit in plan.fetches {
        info!("Fetching {} {}", family, unit.identity);
        install_unit(family, root, &unit, source).await?;
        report.fetched.push(unit.identity);
    }

    Ok(report)
}

/// Download every payload of a unit, then move it into place in one step.
///
/// Nothing becomes visible under its final name until all payloads are
/// written; the staging directory is removed on every exit path.
async fn install_unit<S: ArtifactSource + ?Sized>(
    family: Family,
    root: &Path,
    unit: &DesiredUnit,
    source: &S,
) -> SyncResult<()> {
    let layout = family.layout();

    let mut files = Vec::new();
    for payload in family.payloads(unit) {
        let bytes = source.fetch_artifact(&payload.remote_path).await?;
        files.push((payload.file_name, bytes));
    }

    let bucket_dir = unit
        .bucket
        .iter()
        .fold(root.to_path_buf(), |dir, part| dir.join(part));
    tokio::fs::create_dir_all(&bucket_dir)
        .await
        .map_err(|e| SyncError::io(&bucket_dir, e))?;

    let staging = {
        let bucket_dir = bucket_dir.clone();
        tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(STAGING_PREFIX)
                .tempdir_in(&bucket_dir)
        })
    }
    .await
    .map_err(std::io::Error::from)
    .and_then(|created| created)
    .map_err(|e| SyncError::io(&bucket_dir, e))?;

    for (file_name, bytes) in &files {
        let path = staging.path().join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| SyncError::io(&path, e))?;
    }

    let final_name = layout.codec.encode(&unit.identity);
    let final_path = bucket_dir.join(&final_name);

    // A same-named leftover would block the rename.
    remove_path(&final_path).await?;

    let staged = match layout.shape {
        UnitShape::File => staging.path().join(&final_name),
        UnitShape::Directory(_) => staging.path().to_path_buf(),
    };
    tokio::fs::rename(&staged, &final_path)
        .await
        .map_err(|e| SyncError::io(&final_path, e))?;

    debug!("Installed {:?}", final_path);
    // Dropping `staging` removes what is left of it (nothing, for
    // directory units that were renamed away).
    drop(staging);
    Ok(())
}

/// Remove a file or directory tree. Already gone counts as removed.
async fn remove_path(path: &Path) -> SyncResult<()> {
    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(SyncError::io(path, e)),
    };

    let result = if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SyncError::io(path, e)),
    }
}
