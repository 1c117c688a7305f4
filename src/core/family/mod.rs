pub mod build;
pub mod map;
pub mod plugin;

use serde::{Deserialize, Serialize};

use crate::core::catalog::DesiredUnit;
use crate::core::identity::IdentityCodec;

/// Artifact families. Serialized lowercase, as in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Plugin,
    Paper,
    Velocity,
    Map,
}

impl Family {
    pub fn layout(&self) -> &'static FamilyLayout {
        match self {
            Family::Plugin => &plugin::LAYOUT,
            Family::Paper => &build::PAPER_LAYOUT,
            Family::Velocity => &build::VELOCITY_LAYOUT,
            Family::Map => &map::LAYOUT,
        }
    }

    /// Files to download for one unit, paired with their download paths.
    pub fn payloads(&self, unit: &DesiredUnit) -> Vec<Payload> {
        let layout = self.layout();
        let base = || {
            let mut path = Vec::with_capacity(unit.remote.len() + 2);
            path.push(layout.endpoint.to_string());
            path.extend(unit.remote.iter().cloned());
            path
        };

        match layout.shape {
            UnitShape::File => vec![Payload {
                file_name: layout.codec.encode(&unit.identity),
                remote_path: base(),
            }],
            UnitShape::Directory(companions) => companions
                .iter()
                .map(|companion| {
                    let mut remote_path = base();
                    remote_path.push(companion.remote.to_string());
                    Payload {
                        file_name: companion.file_name.to_string(),
                        remote_path,
                    }
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::Plugin => write!(f, "plugin"),
            Family::Paper => write!(f, "paper"),
            Family::Velocity => write!(f, "velocity"),
            Family::Map => write!(f, "map"),
        }
    }
}

/// A file that must exist inside a multi-file artifact directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Companion {
    /// Name on disk (`world.rar`).
    pub file_name: &'static str,
    /// Last segment of the download path (`world`).
    pub remote: &'static str,
}

/// How one artifact version is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitShape {
    /// A single file named by the identity codec.
    File,
    /// A directory named by the identity codec holding every companion.
    Directory(&'static [Companion]),
}

/// Declarative description of a family: everything the generic scanner
/// and reconciler need to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyLayout {
    /// First segment of catalog and download URLs.
    pub endpoint: &'static str,
    /// Directory levels between the family root and the artifacts.
    pub bucket_depth: usize,
    pub codec: IdentityCodec,
    pub shape: UnitShape,
}

/// One file of a unit to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub file_name: String,
    pub remote_path: Vec<String>,
}
