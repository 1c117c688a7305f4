use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::{SyncError, SyncResult};

const APP_DIR_NAME: &str = "Luximo";
const SETTINGS_FILE: &str = "luximo.json";
const SETTINGS_ENV: &str = "LUXIMO_CONFIG";

/// Runtime configuration, read from `luximo.json` (or `$LUXIMO_CONFIG`).
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the catalog and download service.
    pub api_base_url: String,
    /// Address the update trigger listens on.
    pub listen_addr: SocketAddr,
    /// Parent of the per-family directories.
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.mineleague.ru".to_string(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: default_data_dir(),
        }
    }
}

impl Settings {
    /// Load from the path in `$LUXIMO_CONFIG`, else `./luximo.json`.
    pub fn load() -> SyncResult<Self> {
        let path = std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
        Self::load_from(&path)
    }

    /// A missing file means defaults; an unreadable or malformed one is
    /// an error.
    pub fn load_from(path: &Path) -> SyncResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No settings file at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(SyncError::io(path, e)),
        };

        serde_json::from_str(&raw)
            .map_err(|e| SyncError::Config(format!("invalid settings file {path:?}: {e}")))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
