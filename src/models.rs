use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

// --- Identity & Access ---

/// Role
///
/// The coarse-grained access tier of a portal account. Parsed once at every boundary
/// (stored session, login response, `/me`) so the rest of the crate never compares
/// raw role strings.
///
/// Accepted spellings are case-insensitive role names, the `admin` shorthand, and the
/// backend's numeric `role_id` (1 = Administrator, 2 = Operator, 3 = User).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
pub enum Role {
    Administrator,
    Operator,
    User,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::Operator => "Operator",
            Role::User => "User",
        }
    }

    /// Maps the backend's `roles.id` column onto a role.
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Role::Administrator),
            2 => Some(Role::Operator),
            3 => Some(Role::User),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "administrator" | "admin" => Ok(Role::Administrator),
            "operator" => Ok(Role::Operator),
            "user" => Ok(Role::User),
            _ => Err(UnknownRole(raw.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RoleRepr {
            Id(i64),
            Name(String),
        }

        match RoleRepr::deserialize(deserializer)? {
            RoleRepr::Id(id) => Role::from_id(id)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown role id {id}"))),
            RoleRepr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// UserProfile
///
/// The signed-in account as held by the session. Always replaced wholesale (login,
/// `/me` refresh); never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    /// Backend user id. Older sessions kept this under the separate `user_id` key.
    #[serde(default, alias = "user_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(alias = "role_id")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub permissions: HashSet<String>,
    /// Sites a plain `User` may see. `None` means no site scoping was provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_ids: Option<HashSet<String>>,
}

impl UserProfile {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            email: email.into(),
            role,
            organization_id: None,
            permissions: HashSet::new(),
            site_ids: None,
        }
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_site_ids<I, S>(mut self, site_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.site_ids = Some(site_ids.into_iter().map(Into::into).collect());
        self
    }

    /// True when the profile carries a non-empty organization id.
    pub fn has_organization(&self) -> bool {
        self.organization_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    /// Builds the session profile from a successful login exchange. The login
    /// endpoint does not return permissions; a later `/me` refresh fills them in.
    pub fn from_login(email: impl Into<String>, login: &LoginResponse) -> Self {
        Self {
            id: login.user_id.clone().filter(|id| !id.is_empty()),
            email: email.into(),
            role: login.role,
            organization_id: login.organization_id.clone().filter(|id| !id.is_empty()),
            permissions: HashSet::new(),
            site_ids: None,
        }
    }
}

// --- Auth Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// LoginResponse
///
/// Body of a successful `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub token: String,
    pub role: Role,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
}

/// CreateUserRequest
///
/// Payload for `POST /api/users`, used by administrators to add operators and by
/// operators to add users to their organization.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization_id: Option<String>,
    pub role: String,
}

/// MeResponse
///
/// Body of `GET /me`: the account, its flat permission list and per-site grants.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MeResponse {
    pub user: MeUser,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub site_permissions: Vec<SitePermission>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MeUser {
    pub id: String,
    pub email: String,
    #[serde(rename = "role_id")]
    pub role: Role,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SitePermission {
    pub site_id: String,
    #[serde(default)]
    pub read_access: bool,
    #[serde(default)]
    pub write_access: bool,
    #[serde(default)]
    pub can_receive_alerts: bool,
}

impl From<MeResponse> for UserProfile {
    fn from(me: MeResponse) -> Self {
        let site_ids = if me.site_permissions.is_empty() {
            None
        } else {
            Some(
                me.site_permissions
                    .into_iter()
                    .filter(|grant| grant.read_access || grant.write_access)
                    .map(|grant| grant.site_id)
                    .collect(),
            )
        };

        Self {
            id: Some(me.user.id),
            email: me.user.email,
            role: me.user.role,
            organization_id: me.user.organization_id.filter(|id| !id.is_empty()),
            permissions: me.permissions.into_iter().collect(),
            site_ids,
        }
    }
}

// --- Sites & Agents ---

/// Site
///
/// A physical location agents are attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Agent
///
/// One row of `GET /api/mikrotik/list`: a MikroTik device known to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Agent {
    pub mac: String,
    #[serde(default)]
    pub ip: String,
    pub status: String,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub last_online_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MacRequest {
    pub mac: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreregisterRequest {
    pub mac: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssociateRequest {
    pub mac: String,
    pub site_id: String,
}

/// PreregisterResponse
///
/// WireGuard material handed back when a device is pre-registered. The
/// `mikrotik_config` script is pasted into the router's terminal as-is.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreregisterResponse {
    #[serde(default)]
    pub internal_ip: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub mikrotik_config: String,
    #[serde(default)]
    #[ts(type = "unknown")]
    pub server_peer: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgentTestResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// --- Organizations ---

/// OrganizationRequest
///
/// Full organization record submitted on creation and on the operator's
/// "complete your organization" step.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct OrganizationRequest {
    pub name: String,
    pub address: String,
    pub vat_number: String,
    pub state: String,
    pub city: String,
    pub zip_code: String,
    pub contact_email: String,
    pub pec_email: String,
    pub sdi_code: String,
    pub contact_phone: String,
    pub personnel_info: String,
    pub user_id: String,
}

/// OrganizationUpdate
///
/// Partial update for `PUT /api/organizations/{id}`; only provided fields are sent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct OrganizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pec_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdi_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personnel_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrganizationResponse {
    #[serde(default)]
    pub message: String,
    pub organization_id: String,
}

/// Organization
///
/// A tenant as returned by `GET /api/organizations/{id}`. Every descriptive field is
/// optional because operators fill them in after the organization is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct Organization {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub vat_number: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub pec_email: Option<String>,
    #[serde(default)]
    pub sdi_code: Option<String>,
    #[serde(default)]
    pub personnel_info: Option<String>,
}
