use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::error::{SyncError, SyncResult};
use crate::core::family::{FamilyLayout, UnitShape};
use crate::core::identity::{self, VersionedIdentity};

/// One artifact instance found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEntry {
    pub bucket: Vec<String>,
    pub identity: VersionedIdentity,
    pub path: PathBuf,
    /// Companion files present inside a directory unit. Empty for
    /// single-file units.
    pub companions: BTreeSet<String>,
}

impl LocalEntry {
    /// Whether every file the layout requires is present.
    pub fn is_complete(&self, layout: &FamilyLayout) -> bool {
        match layout.shape {
            UnitShape::File => true,
            UnitShape::Directory(required) => required
                .iter()
                .all(|c| self.companions.contains(c.file_name)),
        }
    }
}

/// A directory between the family root and the artifacts
/// (`<root>/bedwars`, `<root>/bedwars/4x4`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBucket {
    pub components: Vec<String>,
    pub path: PathBuf,
}

/// A path that is not a valid artifact under the family's naming rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    pub path: PathBuf,
}

/// Everything found under one family root during a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalInventory {
    pub entries: Vec<LocalEntry>,
    pub buckets: Vec<LocalBucket>,
    pub orphans: Vec<Orphan>,
}

/// Walk a family root and classify what is there.
///
/// Never touches the network or the filesystem contents. The root must
/// exist; an empty root yields an empty inventory.
pub async fn scan(root: &Path, layout: &FamilyLayout) -> SyncResult<LocalInventory> {
    let mut inventory = LocalInventory::default();
    // Explicit stack instead of recursion: (directory, bucket components).
    let mut pending = vec![(root.to_path_buf(), Vec::<String>::new())];

    while let Some((dir, bucket)) = pending.pop() {
        for (name, path, is_dir) in read_dir_sorted(&dir).await? {
            let Some(name) = name else {
                inventory.orphans.push(Orphan { path });
                continue;
            };

            if bucket.len() < layout.bucket_depth {
                if is_dir && identity::validate_bucket(&name).is_ok() {
                    let mut components = bucket.clone();
                    components.push(name);
                    inventory.buckets.push(LocalBucket {
                        components: components.clone(),
                        path: path.clone(),
                    });
                    pending.push((path, components));
                } else {
                    inventory.orphans.push(Orphan { path });
                }
                continue;
            }

            match classify_unit(&name, &path, is_dir, &bucket, layout, &mut inventory).await? {
                Some(entry) => inventory.entries.push(entry),
                None => inventory.orphans.push(Orphan { path }),
            }
        }
    }

    for orphan in &inventory.orphans {
        warn!("Unrecognized entry {:?}", orphan.path);
    }
    debug!(
        "Scanned {:?}: {} entries, {} buckets, {} orphans",
        root,
        inventory.entries.len(),
        inventory.buckets.len(),
        inventory.orphans.len()
    );
    Ok(inventory)
}

/// Turn one unit-level directory entry into a `LocalEntry`, or `None`
/// if it does not follow the naming convention. Unknown files inside a
/// directory unit are recorded as orphans on the way.
async fn classify_unit(
    name: &str,
    path: &Path,
    is_dir: bool,
    bucket: &[String],
    layout: &FamilyLayout,
    inventory: &mut LocalInventory,
) -> SyncResult<Option<LocalEntry>> {
    let Some(identity) = layout.codec.decode(name) else {
        return Ok(None);
    };

    let companions = match layout.shape {
        UnitShape::File if is_dir => return Ok(None),
        UnitShape::File => BTreeSet::new(),
        UnitShape::Directory(_) if !is_dir => return Ok(None),
        UnitShape::Directory(required) => {
            let mut present = BTreeSet::new();
            for (file_name, file_path, file_is_dir) in read_dir_sorted(path).await? {
                match file_name {
                    Some(file_name)
                        if !file_is_dir && required.iter().any(|c| c.file_name == file_name) =>
                    {
                        present.insert(file_name);
                    }
                    _ => inventory.orphans.push(Orphan { path: file_path }),
                }
            }
            present
        }
    };

    Ok(Some(LocalEntry {
        bucket: bucket.to_vec(),
        identity,
        path: path.to_path_buf(),
        companions,
    }))
}

/// List a directory as `(utf-8 name, path, is_dir)`, sorted by path so
/// scans are deterministic. Symlinks are reported as non-directories.
async fn read_dir_sorted(dir: &Path) -> SyncResult<Vec<(Option<String>, PathBuf, bool)>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| SyncError::io(dir, e))?;

    let mut listed = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| SyncError::io(dir, e))?
    {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| SyncError::io(&path, e))?;
        let name = entry.file_name().into_string().ok();
        listed.push((name, path, file_type.is_dir()));
    }

    listed.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(listed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::family::Family;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"x").unwrap();
    }

    #[tokio::test]
    async fn empty_root_is_empty_inventory() {
        let root = TempDir::new().unwrap();
        let inventory = scan(root.path(), Family::Plugin.layout()).await.unwrap();
        assert_eq!(inventory, LocalInventory::default());
    }

    #[tokio::test]
    async fn missing_root_is_io_error() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("plugins");
        let err = scan(&missing, Family::Plugin.layout()).await.unwrap_err();
        assert!(matches!(err, SyncError::Io { ref path, .. } if path == &missing));
    }

    #[tokio::test]
    async fn plugin_files_and_orphans() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("worldedit-7.3.0.jar"));
        touch(&root.path().join("readme.txt"));
        touch(&root.path().join("vault.jar"));
        std::fs::create_dir(root.path().join("cache-1.0.jar")).unwrap();

        let inventory = scan(root.path(), Family::Plugin.layout()).await.unwrap();

        assert_eq!(inventory.entries.len(), 1);
        assert_eq!(inventory.entries[0].identity.to_string(), "worldedit-7.3.0");
        let orphans: Vec<_> = inventory
            .orphans
            .iter()
            .map(|o| o.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(orphans, vec!["cache-1.0.jar", "readme.txt", "vault.jar"]);
    }

    #[tokio::test]
    async fn map_tree_with_companions() {
        let root = TempDir::new().unwrap();
        let unit = root.path().join("bedwars/4x4/forest-1.1");
        touch(&unit.join("world.rar"));
        touch(&unit.join("notes.txt"));
        touch(&root.path().join("bedwars/stray.rar"));

        let inventory = scan(root.path(), Family::Map.layout()).await.unwrap();

        assert_eq!(inventory.buckets.len(), 2);
        assert_eq!(inventory.entries.len(), 1);
        let entry = &inventory.entries[0];
        assert_eq!(entry.bucket, vec!["bedwars".to_string(), "4x4".to_string()]);
        assert_eq!(entry.identity.to_string(), "forest-1.1");
        assert!(!entry.is_complete(Family::Map.layout()));

        let mut orphans: Vec<_> = inventory.orphans.iter().map(|o| o.path.clone()).collect();
        orphans.sort();
        assert_eq!(
            orphans,
            vec![
                root.path().join("bedwars/4x4/forest-1.1/notes.txt"),
                root.path().join("bedwars/stray.rar"),
            ]
        );
    }

    #[tokio::test]
    async fn complete_map_entry() {
        let root = TempDir::new().unwrap();
        let unit = root.path().join("skywars/solo/islands-2.0");
        touch(&unit.join("world.rar"));
        touch(&unit.join("map.yml"));

        let inventory = scan(root.path(), Family::Map.layout()).await.unwrap();
        assert!(inventory.orphans.is_empty());
        assert!(inventory.entries[0].is_complete(Family::Map.layout()));
    }
}
