use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::settings::Settings;
use crate::core::catalog::CatalogClient;
use crate::core::error::{SyncError, SyncResult};
use crate::core::http::build_http_client;
use crate::core::updater::{FamilyRoots, Updater};

pub struct AppState {
    pub settings: Settings,
    pub updater: Arc<Updater<CatalogClient>>,
}

impl AppState {
    /// Create the family directories and wire the HTTP client into the
    /// updater.
    pub async fn bootstrap(settings: Settings) -> SyncResult<Self> {
        let roots = FamilyRoots::under(&settings.data_dir);

        tokio::try_join!(
            create_dir_safe(&roots.plugins),
            create_dir_safe(&roots.paper),
            create_dir_safe(&roots.velocity),
            create_dir_safe(&roots.maps),
        )?;
        info!("Family directories ready under {:?}", settings.data_dir);

        let http_client = build_http_client()
            .map_err(|e| SyncError::Config(format!("cannot build HTTP client: {e}")))?;
        let catalog = CatalogClient::new(http_client, &settings.api_base_url)?;
        let updater = Arc::new(Updater::new(catalog, roots));

        Ok(Self { settings, updater })
    }
}

async fn create_dir_safe(path: &Path) -> SyncResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| SyncError::Io {
            path: path.to_path_buf(),
            source,
        })
}
