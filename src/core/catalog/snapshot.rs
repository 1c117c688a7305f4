use std::collections::{BTreeSet, HashSet};

use crate::core::error::{CatalogFailure, SyncError, SyncResult};
use crate::core::family::Family;
use crate::core::identity::{self, VersionedIdentity};
use crate::core::version::latest_version;

/// One logical artifact as the catalog describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    identity: VersionedIdentity,
}

impl CatalogItem {
    /// Validate the name and resolve the latest of `versions`.
    pub fn new(family: Family, name: String, versions: Vec<String>) -> SyncResult<Self> {
        identity::validate_name(&name)
            .map_err(|e| SyncError::catalog(family, CatalogFailure::InvalidIdentity(e)))?;

        let latest = latest_version(&versions).map_err(|source| SyncError::VersionParse {
            item: format!("{family} {name}"),
            source,
        })?;

        let identity = VersionedIdentity::new(name, latest)
            .map_err(|e| SyncError::catalog(family, CatalogFailure::InvalidIdentity(e)))?;

        Ok(Self { identity })
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn latest_version(&self) -> &str {
        self.identity.version()
    }

    pub fn identity(&self) -> &VersionedIdentity {
        &self.identity
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCatalog {
    pub format: String,
    pub maps: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinigameCatalog {
    pub name: String,
    pub formats: Vec<FormatCatalog>,
}

/// The full catalog of one family, fetched once per update pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSnapshot {
    /// Independent named artifacts (plugins).
    Flat(Vec<CatalogItem>),
    /// Exactly one build artifact (paper, velocity).
    Single(CatalogItem),
    /// Artifacts grouped under minigame → format (maps).
    Tree(Vec<MinigameCatalog>),
}

/// One artifact the local tree should hold after a pass.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DesiredUnit {
    /// Directory names between the family root and the artifact.
    pub bucket: Vec<String>,
    pub identity: VersionedIdentity,
    /// Download path below the family endpoint, without companion suffix.
    pub remote: Vec<String>,
}

impl CatalogSnapshot {
    pub fn flat(family: Family, items: Vec<CatalogItem>) -> SyncResult<Self> {
        ensure_unique(family, items.iter().map(|i| i.name().to_string()))?;
        Ok(CatalogSnapshot::Flat(items))
    }

    pub fn single(item: CatalogItem) -> Self {
        CatalogSnapshot::Single(item)
    }

    pub fn tree(family: Family, minigames: Vec<MinigameCatalog>) -> SyncResult<Self> {
        let invalid = |e| SyncError::catalog(family, CatalogFailure::InvalidIdentity(e));

        ensure_unique(family, minigames.iter().map(|m| m.name.clone()))?;
        for minigame in &minigames {
            identity::validate_bucket(&minigame.name).map_err(invalid)?;
            ensure_unique(
                family,
                minigame
                    .formats
                    .iter()
                    .map(|f| format!("{}/{}", minigame.name, f.format)),
            )?;
            for format in &minigame.formats {
                identity::validate_bucket(&format.format).map_err(invalid)?;
                ensure_unique(
                    family,
                    format
                        .maps
                        .iter()
                        .map(|m| format!("{}/{}/{}", minigame.name, format.format, m.name())),
                )?;
            }
        }

        Ok(CatalogSnapshot::Tree(minigames))
    }

    /// Flatten into the artifacts that should exist locally, each at
    /// its latest version.
    pub fn desired_units(&self) -> Vec<DesiredUnit> {
        match self {
            CatalogSnapshot::Flat(items) => items
                .iter()
                .map(|item| DesiredUnit {
                    bucket: Vec::new(),
                    identity: item.identity().clone(),
                    remote: vec![item.name().to_string(), item.latest_version().to_string()],
                })
                .collect(),
            CatalogSnapshot::Single(item) => vec![DesiredUnit {
                bucket: Vec::new(),
                identity: item.identity().clone(),
                remote: vec![item.latest_version().to_string()],
            }],
            CatalogSnapshot::Tree(minigames) => {
                let mut units = Vec::new();
                for minigame in minigames {
                    for format in &minigame.formats {
                        for map in &format.maps {
                            units.push(DesiredUnit {
                                bucket: vec![minigame.name.clone(), format.format.clone()],
                                identity: map.identity().clone(),
                                remote: vec![
                                    minigame.name.clone(),
                                    format.format.clone(),
                                    map.name().to_string(),
                                    map.latest_version().to_string(),
                                ],
                            });
                        }
                    }
                }
                units
            }
        }
    }

    /// Every bucket directory the catalog still knows, including
    /// buckets that currently list no artifacts.
    pub fn desired_buckets(&self) -> BTreeSet<Vec<String>> {
        let mut buckets = BTreeSet::new();
        if let CatalogSnapshot::Tree(minigames) = self {
            for minigame in minigames {
                buckets.insert(vec![minigame.name.clone()]);
                for format in &minigame.formats {
                    buckets.insert(vec![minigame.name.clone(), format.format.clone()]);
                }
            }
        }
        buckets
    }
}

fn ensure_unique(family: Family, keys: impl Iterator<Item = String>) -> SyncResult<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.clone()) {
            return Err(SyncError::catalog(family, CatalogFailure::Duplicate(key)));
        }
    }
    Ok(())
}
