use super::{ORGANIZATION_SETUP, RouteDescriptor};
use crate::models::Role;

const STAFF: &[Role] = &[Role::Administrator, Role::Operator];
const ADMIN_ONLY: &[Role] = &[Role::Administrator];

/// Staff Pages
///
/// Organization management, user provisioning and agent management. Pages that act
/// on an organization's devices or members also require an operator to have set up
/// their organization first.
pub fn admin_routes() -> &'static [RouteDescriptor] {
    const ROUTES: &[RouteDescriptor] = &[
        RouteDescriptor::restricted("/organization", STAFF),
        RouteDescriptor::restricted(ORGANIZATION_SETUP, STAFF),
        // Legacy alias of the organization form.
        RouteDescriptor::restricted("/organizationForm", STAFF),
        RouteDescriptor::restricted("/adduser", STAFF).requiring_org(),
        RouteDescriptor::restricted("/addoperator", ADMIN_ONLY),
        RouteDescriptor::restricted("/agents", STAFF).requiring_org(),
        RouteDescriptor::restricted("/agents/register", STAFF).requiring_org(),
    ];
    ROUTES
}
