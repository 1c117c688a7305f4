use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use crate::core::catalog::{CatalogSnapshot, DesiredUnit};
use crate::core::family::FamilyLayout;
use crate::core::inventory::{LocalEntry, LocalInventory};

/// Why a path is scheduled for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionReason {
    /// Name does not follow the family's naming convention.
    Malformed,
    /// Bucket directory no longer in the catalog.
    UnknownBucket,
    /// Valid name, but the catalog does not list it.
    Unlisted,
    /// Listed, but not at the latest version.
    Outdated,
    /// Listed at the latest version, but a companion file is missing.
    Incomplete,
    /// More than one local copy of the same artifact.
    Duplicate,
}

impl fmt::Display for DeletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeletionReason::Malformed => "malformed name",
            DeletionReason::UnknownBucket => "bucket not in catalog",
            DeletionReason::Unlisted => "not in catalog",
            DeletionReason::Outdated => "outdated",
            DeletionReason::Incomplete => "incomplete",
            DeletionReason::Duplicate => "duplicate",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub path: PathBuf,
    pub reason: DeletionReason,
}

/// The decision of one pass: what to remove, then what to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub deletions: Vec<Deletion>,
    pub fetches: Vec<DesiredUnit>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.fetches.is_empty()
    }
}

type Key = (Vec<String>, String);

/// Diff a catalog snapshot against a local inventory.
///
/// Pure: the result depends only on the two inputs. Deletions come out
/// sorted by path with nested paths pruned (removing a bucket removes
/// its contents), fetches sorted by bucket and identity.
pub fn plan(
    layout: &FamilyLayout,
    snapshot: &CatalogSnapshot,
    inventory: &LocalInventory,
) -> ReconcilePlan {
    let desired: BTreeMap<Key, DesiredUnit> = snapshot
        .desired_units()
        .into_iter()
        .map(|unit| ((unit.bucket.clone(), unit.identity.name().to_string()), unit))
        .collect();
    let desired_buckets = snapshot.desired_buckets();

    let mut deletions = Vec::new();

    for orphan in &inventory.orphans {
        deletions.push(Deletion {
            path: orphan.path.clone(),
            reason: DeletionReason::Malformed,
        });
    }

    for bucket in &inventory.buckets {
        if !desired_buckets.contains(&bucket.components) {
            deletions.push(Deletion {
                path: bucket.path.clone(),
                reason: DeletionReason::UnknownBucket,
            });
        }
    }

    let mut local: BTreeMap<Key, Vec<&LocalEntry>> = BTreeMap::new();
    for entry in &inventory.entries {
        local
            .entry((entry.bucket.clone(), entry.identity.name().to_string()))
            .or_default()
            .push(entry);
    }

    let mut current: BTreeSet<&Key> = BTreeSet::new();
    for (key, entries) in &local {
        let verdict = match desired.get(key) {
            None => Some(DeletionReason::Unlisted),
            Some(_) if entries.len() > 1 => Some(DeletionReason::Duplicate),
            Some(unit) => {
                let entry = entries[0];
                if entry.identity.version() != unit.identity.version() {
                    Some(DeletionReason::Outdated)
                } else if !entry.is_complete(layout) {
                    Some(DeletionReason::Incomplete)
                } else {
                    None
                }
            }
        };

        match verdict {
            Some(reason) => deletions.extend(entries.iter().map(|entry| Deletion {
                path: entry.path.clone(),
                reason,
            })),
            None => {
                current.insert(key);
            }
        }
    }

    let fetches = desired
        .iter()
        .filter(|(key, _)| !current.contains(key))
        .map(|(_, unit)| unit.clone())
        .collect();

    ReconcilePlan {
        deletions: prune_nested(deletions),
        fetches,
    }
}

/// Sort by path and drop every deletion that lies inside another one.
fn prune_nested(mut deletions: Vec<Deletion>) -> Vec<Deletion> {
    deletions.sort_by(|a, b| a.path.cmp(&b.path));

    let mut kept: Vec<Deletion> = Vec::with_capacity(deletions.len());
    for deletion in deletions {
        let nested = kept
            .last()
            .is_some_and(|parent| deletion.path.starts_with(&parent.path));
        if !nested {
            kept.push(deletion);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{CatalogItem, FormatCatalog, MinigameCatalog};
    use crate::core::family::Family;
    use crate::core::identity::VersionedIdentity;
    use crate::core::inventory::{LocalBucket, Orphan};
    use pretty_assertions::assert_eq;

    fn item(family: Family, name: &str, versions: &[&str]) -> CatalogItem {
        CatalogItem::new(
            family,
            name.to_string(),
            versions.iter().map(|v| v.to_string()).collect(),
        )
        .unwrap()
    }

    fn plugins(items: &[(&str, &[&str])]) -> CatalogSnapshot {
        CatalogSnapshot::flat(
            Family::Plugin,
            items
                .iter()
                .map(|(name, versions)| item(Family::Plugin, name, versions))
                .collect(),
        )
        .unwrap()
    }

    fn jar(name: &str, version: &str) -> LocalEntry {
        let identity = VersionedIdentity::new(name, version).unwrap();
        LocalEntry {
            bucket: vec![],
            path: PathBuf::from("/plugins").join(format!("{identity}.jar")),
            identity,
            companions: BTreeSet::new(),
        }
    }

    fn deleted(plan: &ReconcilePlan) -> Vec<(String, DeletionReason)> {
        plan.deletions
            .iter()
            .map(|d| (d.path.to_string_lossy().into_owned(), d.reason))
            .collect()
    }

    fn fetched(plan: &ReconcilePlan) -> Vec<String> {
        plan.fetches.iter().map(|u| u.identity.to_string()).collect()
    }

    #[test]
    fn empty_local_fetches_everything() {
        let snapshot = plugins(&[("worldedit", &["7.3.0"]), ("vault", &["1.7.3"])]);
        let plan = plan(Family::Plugin.layout(), &snapshot, &LocalInventory::default());
        assert!(plan.deletions.is_empty());
        assert_eq!(fetched(&plan), vec!["vault-1.7.3", "worldedit-7.3.0"]);
    }

    #[test]
    fn current_entry_is_left_alone() {
        let snapshot = plugins(&[("worldedit", &["7.2.0", "7.3.0"])]);
        let inventory = LocalInventory {
            entries: vec![jar("worldedit", "7.3.0")],
            ..Default::default()
        };
        assert!(plan(Family::Plugin.layout(), &snapshot, &inventory).is_empty());
    }

    #[test]
    fn outdated_entry_is_replaced() {
        let snapshot = plugins(&[("plugin", &["1.0.0", "1.1.0"])]);
        let inventory = LocalInventory {
            entries: vec![jar("plugin", "1.0.0")],
            ..Default::default()
        };
        let plan = plan(Family::Plugin.layout(), &snapshot, &inventory);
        assert_eq!(
            deleted(&plan),
            vec![("/plugins/plugin-1.0.0.jar".to_string(), DeletionReason::Outdated)]
        );
        assert_eq!(fetched(&plan), vec!["plugin-1.1.0"]);
    }

    #[test]
    fn unlisted_and_malformed_are_deleted() {
        let snapshot = plugins(&[]);
        let inventory = LocalInventory {
            entries: vec![jar("oldplugin", "2.0")],
            orphans: vec![Orphan {
                path: PathBuf::from("/plugins/notes.txt"),
            }],
            ..Default::default()
        };
        let plan = plan(Family::Plugin.layout(), &snapshot, &inventory);
        assert_eq!(
            deleted(&plan),
            vec![
                ("/plugins/notes.txt".to_string(), DeletionReason::Malformed),
                ("/plugins/oldplugin-2.0.jar".to_string(), DeletionReason::Unlisted),
            ]
        );
        assert!(plan.fetches.is_empty());
    }

    #[test]
    fn duplicates_are_all_deleted_and_refetched() {
        let snapshot = plugins(&[("worldedit", &["7.3.0"])]);
        let inventory = LocalInventory {
            entries: vec![jar("worldedit", "7.3.0"), jar("worldedit", "7.2.0")],
            ..Default::default()
        };
        let plan = plan(Family::Plugin.layout(), &snapshot, &inventory);
        assert_eq!(plan.deletions.len(), 2);
        assert!(plan
            .deletions
            .iter()
            .all(|d| d.reason == DeletionReason::Duplicate));
        assert_eq!(fetched(&plan), vec!["worldedit-7.3.0"]);
    }

    #[test]
    fn two_builds_on_disk_collapse_to_one() {
        let build = item(Family::Paper, "paper", &["1.20.4"]);
        let snapshot = CatalogSnapshot::single(build);
        let build_entry = |version: &str| {
            let identity = VersionedIdentity::new("paper", version).unwrap();
            LocalEntry {
                bucket: vec![],
                path: PathBuf::from(format!("/paper/{identity}.rar")),
                identity,
                companions: BTreeSet::new(),
            }
        };
        let inventory = LocalInventory {
            entries: vec![build_entry("1.20.4"), build_entry("1.20.2")],
            ..Default::default()
        };
        let plan = plan(Family::Paper.layout(), &snapshot, &inventory);
        assert_eq!(plan.deletions.len(), 2);
        assert_eq!(fetched(&plan), vec!["paper-1.20.4"]);
    }

    #[test]
    fn incomplete_map_is_refetched_whole() {
        let snapshot = CatalogSnapshot::tree(
            Family::Map,
            vec![MinigameCatalog {
                name: "bedwars".into(),
                formats: vec![FormatCatalog {
                    format: "4x4".into(),
                    maps: vec![item(Family::Map, "forest", &["1.1"])],
                }],
            }],
        )
        .unwrap();
        let inventory = LocalInventory {
            entries: vec![LocalEntry {
                bucket: vec!["bedwars".into(), "4x4".into()],
                identity: VersionedIdentity::new("forest", "1.1").unwrap(),
                path: PathBuf::from("/maps/bedwars/4x4/forest-1.1"),
                companions: BTreeSet::from(["world.rar".to_string()]),
            }],
            buckets: vec![
                LocalBucket {
                    components: vec!["bedwars".into()],
                    path: PathBuf::from("/maps/bedwars"),
                },
                LocalBucket {
                    components: vec!["bedwars".into(), "4x4".into()],
                    path: PathBuf::from("/maps/bedwars/4x4"),
                },
            ],
            ..Default::default()
        };
        let plan = plan(Family::Map.layout(), &snapshot, &inventory);
        assert_eq!(
            deleted(&plan),
            vec![(
                "/maps/bedwars/4x4/forest-1.1".to_string(),
                DeletionReason::Incomplete
            )]
        );
        assert_eq!(fetched(&plan), vec!["forest-1.1"]);
    }

    #[test]
    fn unknown_bucket_swallows_nested_deletions() {
        let snapshot = CatalogSnapshot::tree(Family::Map, vec![]).unwrap();
        let inventory = LocalInventory {
            entries: vec![LocalEntry {
                bucket: vec!["duels".into(), "1x1".into()],
                identity: VersionedIdentity::new("arena", "1.0").unwrap(),
                path: PathBuf::from("/maps/duels/1x1/arena-1.0"),
                companions: BTreeSet::new(),
            }],
            buckets: vec![
                LocalBucket {
                    components: vec!["duels".into()],
                    path: PathBuf::from("/maps/duels"),
                },
                LocalBucket {
                    components: vec!["duels".into(), "1x1".into()],
                    path: PathBuf::from("/maps/duels/1x1"),
                },
            ],
            orphans: vec![Orphan {
                path: PathBuf::from("/maps/duels/1x1/arena-1.0/old.txt"),
            }],
        };
        let plan = plan(Family::Map.layout(), &snapshot, &inventory);
        assert_eq!(
            deleted(&plan),
            vec![("/maps/duels".to_string(), DeletionReason::UnknownBucket)]
        );
    }

    #[test]
    fn sibling_prefix_is_not_nested() {
        let pruned = prune_nested(vec![
            Deletion {
                path: PathBuf::from("/maps/bed"),
                reason: DeletionReason::UnknownBucket,
            },
            Deletion {
                path: PathBuf::from("/maps/bedwars"),
                reason: DeletionReason::UnknownBucket,
            },
        ]);
        assert_eq!(pruned.len(), 2);
    }
}
