use super::{DASHBOARD, OPERATOR_DASHBOARD, RouteDescriptor};
use crate::models::Role;

/// Signed-in Pages
///
/// Shared by every role. The operator dashboard is the operator's landing page;
/// other roles are deflected from it to the default dashboard.
pub fn authenticated_routes() -> &'static [RouteDescriptor] {
    const ROUTES: &[RouteDescriptor] = &[
        RouteDescriptor::authenticated(DASHBOARD),
        RouteDescriptor::authenticated("/routertable"),
        RouteDescriptor::restricted(OPERATOR_DASHBOARD, &[Role::Operator]),
    ];
    ROUTES
}
