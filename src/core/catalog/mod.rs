mod client;
mod snapshot;

use serde::de::DeserializeOwned;

use crate::core::error::SyncResult;
use crate::core::family::Family;

pub use client::{ArtifactSource, CatalogClient};
pub use snapshot::{CatalogItem, CatalogSnapshot, DesiredUnit, FormatCatalog, MinigameCatalog};

/// A family-specific catalog response body.
pub trait CatalogDocument: DeserializeOwned {
    /// The `success` flag of the response envelope.
    fn success(&self) -> bool;

    /// Validate entries and resolve latest versions.
    fn into_snapshot(self, family: Family) -> SyncResult<CatalogSnapshot>;
}
