use serde_json::Value;

use crate::{
    client::ApiClient,
    error::ApiError,
    models::{Agent, AgentTestResult, AssociateRequest, MacRequest, PreregisterRequest, PreregisterResponse},
};

/// AgentsApi
///
/// MikroTik device endpoints. Devices are addressed by MAC address throughout.
#[derive(Clone)]
pub struct AgentsApi {
    client: ApiClient,
}

fn mac(mac: &str) -> MacRequest {
    MacRequest {
        mac: mac.to_string(),
    }
}

impl AgentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /api/mikrotik/list
    pub async fn list(&self) -> Result<Vec<Agent>, ApiError> {
        self.client.get("/api/mikrotik/list").await
    }

    /// POST /api/mikrotik/preregister
    ///
    /// `site_id` is only sent when provided.
    pub async fn preregister(
        &self,
        mac: &str,
        site_id: Option<&str>,
    ) -> Result<PreregisterResponse, ApiError> {
        let body = PreregisterRequest {
            mac: mac.to_string(),
            site_id: site_id.map(str::to_string),
        };
        self.client.post("/api/mikrotik/preregister", &body).await
    }

    /// POST /api/mikrotik/enable
    pub async fn enable(&self, mac_address: &str) -> Result<Value, ApiError> {
        self.client.post("/api/mikrotik/enable", &mac(mac_address)).await
    }

    /// POST /api/mikrotik/disable
    pub async fn disable(&self, mac_address: &str) -> Result<Value, ApiError> {
        self.client.post("/api/mikrotik/disable", &mac(mac_address)).await
    }

    /// DELETE /api/mikrotik with a `{mac}` body.
    pub async fn remove(&self, mac_address: &str) -> Result<Value, ApiError> {
        self.client
            .delete("/api/mikrotik", Some(&mac(mac_address)))
            .await
    }

    /// POST /api/mikrotik/test: pings the device through its tunnel.
    pub async fn test(&self, mac_address: &str) -> Result<AgentTestResult, ApiError> {
        self.client.post("/api/mikrotik/test", &mac(mac_address)).await
    }

    /// POST /api/mikrotik/associate
    pub async fn associate(&self, mac: &str, site_id: &str) -> Result<Value, ApiError> {
        let body = AssociateRequest {
            mac: mac.to_string(),
            site_id: site_id.to_string(),
        };
        self.client.post("/api/mikrotik/associate", &body).await
    }

    /// POST /api/mikrotik/delete
    pub async fn delete(&self, mac_address: &str) -> Result<Value, ApiError> {
        self.client.post("/api/mikrotik/delete", &mac(mac_address)).await
    }
}
