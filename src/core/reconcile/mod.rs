mod apply;
mod plan;

use std::path::Path;

use tracing::info;

use crate::core::catalog::ArtifactSource;
use crate::core::error::SyncResult;
use crate::core::family::Family;
use crate::core::inventory;

pub use apply::{apply, ReconcileReport};
pub use plan::{plan, Deletion, DeletionReason, ReconcilePlan};

/// One full fetch → scan → diff → apply cycle for a family.
///
/// The catalog is fetched (and validated) before the disk is even
/// read, so a catalog failure never mutates anything.
pub async fn run_pass<S: ArtifactSource + ?Sized>(
    family: Family,
    root: &Path,
    source: &S,
) -> SyncResult<ReconcileReport> {
    let layout = family.layout();

    let snapshot = source.fetch_catalog(family).await?;
    let local = inventory::scan(root, layout).await?;
    let plan = plan(layout, &snapshot, &local);

    if plan.is_empty() {
        info!("{} is up to date", family);
    } else {
        info!(
            "{}: {} to delete, {} to fetch",
            family,
            plan.deletions.len(),
            plan.fetches.len()
        );
    }

    apply(family, root, plan, source).await
}
