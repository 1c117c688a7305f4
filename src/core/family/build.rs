// Server builds: one artifact per family, at most one file on disk.

use serde::Deserialize;

use super::{Family, FamilyLayout, UnitShape};
use crate::core::catalog::{CatalogDocument, CatalogItem, CatalogSnapshot};
use crate::core::error::SyncResult;
use crate::core::identity::IdentityCodec;

/// `<root>/paper-<version>.rar`
pub const PAPER_LAYOUT: FamilyLayout = FamilyLayout {
    endpoint: "paper",
    bucket_depth: 0,
    codec: IdentityCodec::new(Some("rar")),
    shape: UnitShape::File,
};

/// `<root>/velocity-<version>.rar`
pub const VELOCITY_LAYOUT: FamilyLayout = FamilyLayout {
    endpoint: "velocity",
    bucket_depth: 0,
    codec: IdentityCodec::new(Some("rar")),
    shape: UnitShape::File,
};

/// `GET /paper`, `GET /velocity`
#[derive(Debug, Deserialize)]
pub struct BuildResponse {
    pub success: bool,
    #[serde(default)]
    pub versions: Vec<String>,
}

impl CatalogDocument for BuildResponse {
    fn success(&self) -> bool {
        self.success
    }

    /// The build is named after its family on disk (`paper-1.20.4.rar`).
    fn into_snapshot(self, family: Family) -> SyncResult<CatalogSnapshot> {
        let build = CatalogItem::new(family, family.to_string(), self.versions)?;
        Ok(CatalogSnapshot::single(build))
    }
}
