use std::sync::Arc;
use tokio::sync::broadcast;

use crate::{
    acl::{self, Needed},
    api::AuthApi,
    error::ApiError,
    guard,
    models::{Role, UserProfile},
    session::{AuthEvent, SessionState},
};

/// AuthStore
///
/// The account-facing view of the session: performs sign-in through the auth
/// client, keeps the profile current and exposes role getters.
#[derive(Clone)]
pub struct AuthStore {
    session: Arc<SessionState>,
    api: AuthApi,
}

impl AuthStore {
    pub fn new(session: Arc<SessionState>, api: AuthApi) -> Self {
        Self { session, api }
    }

    /// login
    ///
    /// Exchanges credentials for a token and installs the resulting session. On
    /// failure the previous session is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let response = self.api.login(email, password).await?;
        let user = UserProfile::from_login(email, &response);
        self.session.set_auth(response.token, user.clone());
        tracing::info!(role = %user.role, "signed in");
        Ok(user)
    }

    /// refresh_profile
    ///
    /// Replaces the stored profile with the backend's view (`/me`), which carries the
    /// permission set and site grants the login response lacks. Returns `None` when
    /// signed out, or when another sign-in or a sign-out landed while `/me` was in
    /// flight (the answer then describes an account the session no longer holds).
    pub async fn refresh_profile(&self) -> Result<Option<UserProfile>, ApiError> {
        let Some(token) = self.session.token() else {
            return Ok(None);
        };
        let Some(me) = self.api.current_user().await? else {
            return Ok(None);
        };
        let mut user = UserProfile::from(me);
        // /me omits email on some deployments; keep the one used to sign in.
        if user.email.is_empty() {
            if let Some(current) = self.session.user() {
                user.email = current.email;
            }
        }
        if !self.session.replace_user(&token, user.clone()) {
            tracing::warn!("session changed during profile refresh, keeping the newer session");
            return Ok(None);
        }
        Ok(Some(user))
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.user()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.snapshot().role()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Administrator)
    }

    pub fn is_operator(&self) -> bool {
        self.role() == Some(Role::Operator)
    }

    pub fn is_user(&self) -> bool {
        self.role() == Some(Role::User)
    }

    pub fn can<'a>(&self, needed: impl Into<Needed<'a>>) -> bool {
        acl::can(self.session.user().as_ref(), needed)
    }

    /// Where a freshly signed-in account should land.
    pub fn landing_page(&self) -> &'static str {
        guard::landing_page(self.role())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.session.subscribe()
    }
}
