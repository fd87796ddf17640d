use super::{HOME, LOGIN, REGISTER, RouteDescriptor};

/// Public Pages
///
/// Landing, sign-in and self-registration. A signed-in visitor hitting sign-in or
/// registration is sent on to their dashboard by the guard.
pub fn public_routes() -> &'static [RouteDescriptor] {
    const ROUTES: &[RouteDescriptor] = &[
        RouteDescriptor::public(HOME),
        RouteDescriptor::public(LOGIN),
        RouteDescriptor::public(REGISTER),
    ];
    ROUTES
}
