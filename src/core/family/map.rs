use serde::Deserialize;

use super::{Companion, Family, FamilyLayout, UnitShape};
use crate::core::catalog::{
    CatalogDocument, CatalogItem, CatalogSnapshot, FormatCatalog, MinigameCatalog,
};
use crate::core::error::SyncResult;
use crate::core::identity::IdentityCodec;

pub const WORLD: Companion = Companion {
    file_name: "world.rar",
    remote: "world",
};

pub const CONFIG: Companion = Companion {
    file_name: "map.yml",
    remote: "config",
};

/// `<root>/<minigame>/<format>/<map>-<version>/{world.rar,map.yml}`
pub const LAYOUT: FamilyLayout = FamilyLayout {
    endpoint: "map",
    bucket_depth: 2,
    codec: IdentityCodec::new(None),
    shape: UnitShape::Directory(&[WORLD, CONFIG]),
};

/// `GET /map`
#[derive(Debug, Deserialize)]
pub struct MapsResponse {
    pub success: bool,
    #[serde(default)]
    pub minigames: Vec<MinigameEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MinigameEntry {
    pub name: String,
    #[serde(default)]
    pub formats: Vec<FormatEntry>,
}

#[derive(Debug, Deserialize)]
pub struct FormatEntry {
    pub format: String,
    #[serde(default)]
    pub maps: Vec<MapEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MapEntry {
    pub name: String,
    #[serde(default)]
    pub versions: Vec<String>,
}

impl CatalogDocument for MapsResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn into_snapshot(self, family: Family) -> SyncResult<CatalogSnapshot> {
        let mut minigames = Vec::with_capacity(self.minigames.len());

        for minigame in self.minigames {
            let mut formats = Vec::with_capacity(minigame.formats.len());
            for format in minigame.formats {
                let maps = format
                    .maps
                    .into_iter()
                    .map(|m| CatalogItem::new(family, m.name, m.versions))
                    .collect::<SyncResult<Vec<_>>>()?;
                formats.push(FormatCatalog {
                    format: format.format,
                    maps,
                });
            }
            minigames.push(MinigameCatalog {
                name: minigame.name,
                formats,
            });
        }

        CatalogSnapshot::tree(family, minigames)
    }
}
