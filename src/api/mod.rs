/// Domain Client Index
///
/// Each module is a fixed mapping from an operation to one `ApiClient` call with a
/// specific method, path and body. None of them catch errors: every failure is the
/// `ApiError` the resource client produced.

/// Login, registration, user creation and the current-user lookup.
pub mod auth;

/// MikroTik agent provisioning and lifecycle.
pub mod agents;

/// Organization (tenant) records.
pub mod organizations;

/// Site listing.
pub mod sites;

pub use agents::AgentsApi;
pub use auth::AuthApi;
pub use organizations::OrganizationsApi;
pub use sites::{SiteSource, SitesApi};
