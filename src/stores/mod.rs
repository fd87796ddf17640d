/// Store Index
///
/// State exposed to a presentation layer: the signed-in account and the sites it can see.

/// Session-backed account store (sign-in, sign-out, role getters).
pub mod auth;

/// Site list with role-scoped views.
pub mod site;

pub use auth::AuthStore;
pub use site::SiteStore;
