use std::path::PathBuf;
use thiserror::Error;

use crate::core::family::Family;
use crate::core::identity::IdentityError;
use crate::core::version::VersionError;

/// Central error type for the synchronizer.
/// Every module returns `Result<T, SyncError>`.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Remote catalog ──────────────────────────────────
    #[error("Failed to fetch {family} catalog: {source}")]
    Catalog {
        family: Family,
        source: CatalogFailure,
    },

    // ── Artifact download ───────────────────────────────
    #[error("Download failed for {url}: {source}")]
    Download {
        url: String,
        source: DownloadFailure,
    },

    // ── Filesystem ──────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Versions ────────────────────────────────────────
    #[error("Cannot resolve latest version of {item}: {source}")]
    VersionParse { item: String, source: VersionError },

    // ── Configuration ───────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a catalog document could not be turned into a snapshot.
#[derive(Debug, Error)]
pub enum CatalogFailure {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("catalog answered with success=false")]
    Rejected,

    #[error("invalid entry: {0}")]
    InvalidIdentity(#[source] IdentityError),

    #[error("{0} is listed more than once")]
    Duplicate(String),
}

#[derive(Debug, Error)]
pub enum DownloadFailure {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),
}

/// Convenience alias used throughout the crate.
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn catalog(family: Family, source: CatalogFailure) -> Self {
        SyncError::Catalog { family, source }
    }
}
