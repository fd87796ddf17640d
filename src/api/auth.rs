use serde_json::Value;

use crate::{
    client::ApiClient,
    error::ApiError,
    models::{
        CreateUserRequest, LoginRequest, LoginResponse, MeResponse, OrganizationRequest,
        OrganizationResponse, RegisterRequest,
    },
};

/// AuthApi
///
/// Account endpoints.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// POST /api/login
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post("/api/login", &body).await
    }

    /// POST /api/register
    ///
    /// The backend generates a temporary password and mails it to `email`.
    pub async fn register(&self, email: &str) -> Result<Value, ApiError> {
        let body = RegisterRequest {
            email: email.to_string(),
        };
        self.client.post("/api/register", &body).await
    }

    /// POST /api/users
    pub async fn create_user(&self, payload: &CreateUserRequest) -> Result<Value, ApiError> {
        self.client.post("/api/users", payload).await
    }

    /// POST /api/complete-organization
    pub async fn complete_organization(
        &self,
        payload: &OrganizationRequest,
    ) -> Result<OrganizationResponse, ApiError> {
        self.client.post("/api/complete-organization", payload).await
    }

    /// GET /me
    ///
    /// Returns `None` without touching the network when no token is held.
    pub async fn current_user(&self) -> Result<Option<MeResponse>, ApiError> {
        if !self.client.session().is_authenticated() {
            return Ok(None);
        }
        self.client.get("/me").await.map(Some)
    }
}
