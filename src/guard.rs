use std::collections::HashMap;

use crate::{
    models::Role,
    routes::{self, DASHBOARD, LOGIN, OPERATOR_DASHBOARD, ORGANIZATION_SETUP, REGISTER, RouteDescriptor},
    session::Session,
};

/// Upper bound on redirects followed by `Router::navigate` before giving up.
pub const MAX_REDIRECTS: usize = 8;

/// Decision
///
/// The guard's verdict for a single navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
}

/// The landing page for a signed-in role.
pub fn landing_page(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Operator) => OPERATOR_DASHBOARD,
        _ => DASHBOARD,
    }
}

/// decide
///
/// Evaluates the navigation rules in order; the first that matches wins:
///
/// 1. protected page without a session → sign-in
/// 2. signed in and heading to sign-in or registration → role landing page
/// 3. page restricted to roles the session does not hold → default dashboard
/// 4. operator without an organization on an organization-bound page → organization setup
/// 5. otherwise allowed
///
/// Pure: the result depends only on `session` and `route`.
pub fn decide(session: &Session, route: &RouteDescriptor) -> Decision {
    let authenticated = session.is_authenticated();
    // Roles are only meaningful alongside a token.
    let role = if authenticated { session.role() } else { None };

    if route.requires_auth && !authenticated {
        return Decision::Redirect(LOGIN);
    }

    if authenticated && (route.path == LOGIN || route.path == REGISTER) {
        return Decision::Redirect(landing_page(role));
    }

    if !route.allowed_roles.is_empty() {
        let permitted = role.is_some_and(|r| route.allowed_roles.contains(&r));
        if !permitted {
            return Decision::Redirect(DASHBOARD);
        }
    }

    if route.require_org_for_operator && role == Some(Role::Operator) {
        let has_org = session.user.as_ref().is_some_and(|u| u.has_organization());
        if !has_org {
            return Decision::Redirect(ORGANIZATION_SETUP);
        }
    }

    Decision::Allow
}

/// Navigation
///
/// Where a navigation request ends up after every redirect has been followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The final page, and the redirects taken to reach it (empty if none).
    Arrived {
        path: &'static str,
        redirects: Vec<&'static str>,
    },
    /// No page is registered under the requested path.
    NotFound(String),
    /// Redirects did not settle within `MAX_REDIRECTS` hops.
    RedirectLoop(Vec<&'static str>),
}

/// Router
///
/// Resolves paths against the static route table and runs the guard on every
/// navigation, not only at sign-in/sign-out transitions.
#[derive(Debug, Clone)]
pub struct Router {
    routes: HashMap<&'static str, RouteDescriptor>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(routes::route_table())
    }
}

impl Router {
    pub fn new(table: impl IntoIterator<Item = RouteDescriptor>) -> Self {
        Self {
            routes: table.into_iter().map(|r| (r.path, r)).collect(),
        }
    }

    pub fn route(&self, path: &str) -> Option<&RouteDescriptor> {
        self.routes.get(normalize(path))
    }

    /// Runs the guard once for `path`, without following the redirect.
    pub fn check(&self, session: &Session, path: &str) -> Option<Decision> {
        self.route(path).map(|route| decide(session, route))
    }

    pub fn navigate(&self, session: &Session, path: &str) -> Navigation {
        let Some(mut route) = self.route(path) else {
            return Navigation::NotFound(path.to_string());
        };

        let mut redirects = Vec::new();
        loop {
            match decide(session, route) {
                Decision::Allow => {
                    tracing::debug!(from = path, to = route.path, hops = redirects.len(), "navigation allowed");
                    return Navigation::Arrived {
                        path: route.path,
                        redirects,
                    };
                }
                Decision::Redirect(target) => {
                    redirects.push(target);
                    if redirects.len() > MAX_REDIRECTS {
                        tracing::warn!(from = path, ?redirects, "navigation redirect loop");
                        return Navigation::RedirectLoop(redirects);
                    }
                    match self.route(target) {
                        Some(next) => route = next,
                        None => return Navigation::NotFound(target.to_string()),
                    }
                }
            }
        }
    }
}

// "/agents/" and "/agents" name the same page; the root stays "/".
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
