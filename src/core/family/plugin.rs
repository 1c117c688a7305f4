use serde::Deserialize;

use super::{Family, FamilyLayout, UnitShape};
use crate::core::catalog::{CatalogDocument, CatalogItem, CatalogSnapshot};
use crate::core::error::SyncResult;
use crate::core::identity::IdentityCodec;

/// `<root>/<name>-<version>.jar`
pub const LAYOUT: FamilyLayout = FamilyLayout {
    endpoint: "plugin",
    bucket_depth: 0,
    codec: IdentityCodec::new(Some("jar")),
    shape: UnitShape::File,
};

/// `GET /plugin`
#[derive(Debug, Deserialize)]
pub struct PluginsResponse {
    pub success: bool,
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    #[serde(default)]
    pub versions: Vec<String>,
}

impl CatalogDocument for PluginsResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn into_snapshot(self, family: Family) -> SyncResult<CatalogSnapshot> {
        let items = self
            .plugins
            .into_iter()
            .map(|plugin| CatalogItem::new(family, plugin.name, plugin.versions))
            .collect::<SyncResult<Vec<_>>>()?;

        CatalogSnapshot::flat(family, items)
    }
}
