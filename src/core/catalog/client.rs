use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info};

use super::snapshot::CatalogSnapshot;
use super::CatalogDocument;
use crate::core::error::{CatalogFailure, DownloadFailure, SyncError, SyncResult};
use crate::core::family::build::BuildResponse;
use crate::core::family::map::MapsResponse;
use crate::core::family::plugin::PluginsResponse;
use crate::core::family::Family;

/// Everything the reconciler needs from the remote side.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Fetch and validate the catalog of one family.
    async fn fetch_catalog(&self, family: Family) -> SyncResult<CatalogSnapshot>;

    /// Fetch the raw bytes behind a download path (`["map", "bedwars", ..., "world"]`).
    async fn fetch_artifact(&self, path: &[String]) -> SyncResult<Vec<u8>>;
}

#[async_trait]
impl<T: ArtifactSource + ?Sized> ArtifactSource for Arc<T> {
    async fn fetch_catalog(&self, family: Family) -> SyncResult<CatalogSnapshot> {
        (**self).fetch_catalog(family).await
    }

    async fn fetch_artifact(&self, path: &[String]) -> SyncResult<Vec<u8>> {
        (**self).fetch_artifact(path).await
    }
}

/// HTTP client for the catalog service.
///
/// Every request is issued exactly once; there is no retry.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(client: Client, base_url: &str) -> SyncResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SyncError::Config(format!("invalid catalog URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::Config(format!(
                "catalog URL {base_url} cannot carry a path"
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Append percent-encoded path segments to the base URL.
    fn url_for<S: AsRef<str>>(&self, segments: &[S]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments.iter().map(AsRef::as_ref));
        }
        url
    }

    async fn fetch_document<D: CatalogDocument>(
        &self,
        family: Family,
    ) -> SyncResult<CatalogSnapshot> {
        let url = self.url_for(&[family.layout().endpoint]);
        info!("Fetching {} catalog from {}", family, url);

        let fail = |source| SyncError::catalog(family, source);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fail(CatalogFailure::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(CatalogFailure::Status(status.as_u16())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fail(CatalogFailure::Transport(e)))?;
        let document: D =
            serde_json::from_slice(&body).map_err(|e| fail(CatalogFailure::Decode(e)))?;

        if !document.success() {
            return Err(fail(CatalogFailure::Rejected));
        }

        let snapshot = document.into_snapshot(family)?;
        debug!(
            "{} catalog lists {} artifacts",
            family,
            snapshot.desired_units().len()
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl ArtifactSource for CatalogClient {
    async fn fetch_catalog(&self, family: Family) -> SyncResult<CatalogSnapshot> {
        match family {
            Family::Plugin => self.fetch_document::<PluginsResponse>(family).await,
            Family::Paper | Family::Velocity => self.fetch_document::<BuildResponse>(family).await,
            Family::Map => self.fetch_document::<MapsResponse>(family).await,
        }
    }

    async fn fetch_artifact(&self, path: &[String]) -> SyncResult<Vec<u8>> {
        let url = self.url_for(path);
        let fail = |source| SyncError::Download {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fail(DownloadFailure::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(DownloadFailure::Status(status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fail(DownloadFailure::Transport(e)))?;

        debug!("Downloaded {} ({} bytes)", url, bytes.len());
        Ok(bytes.to_vec())
    }
}
