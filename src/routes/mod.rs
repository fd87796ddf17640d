/// Route Table Index
///
/// The portal's navigable pages, grouped by who may reach them. The guard reads these
/// descriptors; nothing mutates them after startup.

/// Pages reachable without a session.
pub mod public;

/// Pages for any signed-in account.
pub mod authenticated;

/// Pages restricted to administrators and (organization-bound) operators.
pub mod admin;

use crate::models::Role;

pub const HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const DASHBOARD: &str = "/dashboard";
pub const OPERATOR_DASHBOARD: &str = "/operator/dashboard";
pub const ORGANIZATION_SETUP: &str = "/organization/edit";

/// RouteDescriptor
///
/// The access requirements of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub requires_auth: bool,
    /// Roles allowed in. Empty means any role.
    pub allowed_roles: &'static [Role],
    /// Operators must belong to an organization before entering.
    pub require_org_for_operator: bool,
}

impl RouteDescriptor {
    pub const fn public(path: &'static str) -> Self {
        Self {
            path,
            requires_auth: false,
            allowed_roles: &[],
            require_org_for_operator: false,
        }
    }

    pub const fn authenticated(path: &'static str) -> Self {
        Self {
            path,
            requires_auth: true,
            allowed_roles: &[],
            require_org_for_operator: false,
        }
    }

    pub const fn restricted(path: &'static str, roles: &'static [Role]) -> Self {
        Self {
            path,
            requires_auth: true,
            allowed_roles: roles,
            require_org_for_operator: false,
        }
    }

    pub const fn requiring_org(mut self) -> Self {
        self.require_org_for_operator = true;
        self
    }
}

/// The full static table, in declaration order.
pub fn route_table() -> Vec<RouteDescriptor> {
    public::public_routes()
        .iter()
        .chain(authenticated::authenticated_routes())
        .chain(admin::admin_routes())
        .copied()
        .collect()
}
