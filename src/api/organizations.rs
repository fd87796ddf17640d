use reqwest::Method;

use crate::{
    client::ApiClient,
    error::ApiError,
    models::{Organization, OrganizationRequest, OrganizationResponse, OrganizationUpdate},
};

/// OrganizationsApi
#[derive(Clone)]
pub struct OrganizationsApi {
    client: ApiClient,
}

impl OrganizationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// POST /api/organizations
    pub async fn create(
        &self,
        payload: &OrganizationRequest,
    ) -> Result<OrganizationResponse, ApiError> {
        self.client.post("/api/organizations", payload).await
    }

    /// GET /api/organizations/{id}
    pub async fn get(&self, id: &str) -> Result<Organization, ApiError> {
        let url = self.client.endpoint("/api/organizations", id)?;
        self.client.send(Method::GET, url, None::<&()>).await
    }

    /// PUT /api/organizations/{id}
    pub async fn update(
        &self,
        id: &str,
        changes: &OrganizationUpdate,
    ) -> Result<OrganizationResponse, ApiError> {
        let url = self.client.endpoint("/api/organizations", id)?;
        self.client.send(Method::PUT, url, Some(changes)).await
    }
}
