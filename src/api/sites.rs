use async_trait::async_trait;
use std::sync::Arc;

use crate::{client::ApiClient, error::ApiError, models::Site};

/// SiteSource
///
/// Where the site store gets its list from. The HTTP client is the production
/// implementation; tests substitute a fixed list.
#[async_trait]
pub trait SiteSource: Send + Sync {
    async fn list_sites(&self) -> Result<Vec<Site>, ApiError>;
}

/// The shared handle type the site store holds.
pub type SiteSourceState = Arc<dyn SiteSource>;

/// SitesApi
#[derive(Clone)]
pub struct SitesApi {
    client: ApiClient,
}

impl SitesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /api/sites
    pub async fn list(&self) -> Result<Vec<Site>, ApiError> {
        self.client.get("/api/sites").await
    }
}

#[async_trait]
impl SiteSource for SitesApi {
    async fn list_sites(&self) -> Result<Vec<Site>, ApiError> {
        self.list().await
    }
}
