use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::{
    models::{Role, UserProfile},
    storage::StorageState,
};

/// Durable key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Durable key holding the JSON-encoded `UserProfile`.
pub const USER_KEY: &str = "user";
/// Keys written by older front ends before the profile was consolidated under `user`.
pub const LEGACY_KEYS: [&str; 3] = ["role", "organization_id", "user_id"];

/// Session
///
/// A point-in-time view of the authentication state. An empty token means
/// unauthenticated, whatever `user` holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

/// AuthEvent
///
/// Broadcast whenever the session changes hands. `SignedOut` is the decoupled
/// "auth-changed" notification observers react to without polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
}

/// SessionState
///
/// The single owner of the token/profile pair. Both fields sit behind one lock so a
/// reader can never observe a new token next to a stale profile. Every mutation is
/// written through to the durable store after the in-memory swap.
pub struct SessionState {
    inner: RwLock<Session>,
    storage: StorageState,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionState {
    /// load
    ///
    /// Restores the session persisted by a previous run. Never fails: missing keys
    /// give an empty session and a malformed profile degrades to unauthenticated.
    pub fn load(storage: StorageState) -> Self {
        let session = restore(&storage);
        let (events, _) = broadcast::channel(16);

        tracing::debug!(
            authenticated = session.is_authenticated(),
            role = ?session.role(),
            "session loaded"
        );

        Self {
            inner: RwLock::new(session),
            storage,
            events,
        }
    }

    /// set_auth
    ///
    /// Replaces token and profile together, persists both and announces `SignedIn`.
    pub fn set_auth(&self, token: impl Into<String>, user: UserProfile) {
        let token = token.into();
        let encoded_user = serde_json::to_string(&user);

        {
            let mut guard = self.inner.write();
            *guard = Session {
                token: token.clone(),
                user: Some(user),
            };
        }

        self.persist(TOKEN_KEY, &token);
        match encoded_user {
            Ok(json) => self.persist(USER_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "failed to encode user profile for storage"),
        }

        tracing::info!("session established");
        let _ = self.events.send(AuthEvent::SignedIn);
    }

    /// replace_user
    ///
    /// Replaces only the profile (e.g. after `/me`), provided the session still holds
    /// `token`. Returns `false` and changes nothing when the session was signed out
    /// or handed to another account in the meantime.
    pub fn replace_user(&self, token: &str, user: UserProfile) -> bool {
        let encoded_user = serde_json::to_string(&user);

        let mut guard = self.inner.write();
        if !guard.is_authenticated() || guard.token != token {
            tracing::debug!("session changed before the profile arrived, discarding it");
            return false;
        }
        guard.user = Some(user);

        // Written under the lock so a concurrent sign-in cannot be overwritten on disk.
        match encoded_user {
            Ok(json) => self.persist(USER_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "failed to encode user profile for storage"),
        }
        true
    }

    /// logout
    ///
    /// Clears the session in memory and in storage (legacy keys included) and
    /// announces `SignedOut`.
    pub fn logout(&self) {
        {
            let mut guard = self.inner.write();
            *guard = Session::default();
        }

        for key in [TOKEN_KEY, USER_KEY].into_iter().chain(LEGACY_KEYS) {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear session key");
            }
        }

        tracing::info!("session cleared");
        let _ = self.events.send(AuthEvent::SignedOut);
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated()
    }

    /// The token, or `None` when unauthenticated.
    pub fn token(&self) -> Option<String> {
        let guard = self.inner.read();
        (!guard.token.is_empty()).then(|| guard.token.clone())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.read().user.clone()
    }

    /// A consistent copy of both fields, taken under one read lock.
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    // Durable writes are fire-and-forget: failures are logged, memory stays authoritative.
    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            tracing::warn!(key, error = %e, "failed to persist session key");
        }
    }
}

fn restore(storage: &StorageState) -> Session {
    let token = storage.get(TOKEN_KEY).unwrap_or_default();

    let user = match storage.get(USER_KEY) {
        Some(raw) if raw.trim().is_empty() || raw.trim() == "null" => None,
        Some(raw) => match serde_json::from_str::<UserProfile>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "stored user profile is malformed, starting signed out");
                return Session::default();
            }
        },
        None if !token.is_empty() => migrate_legacy(storage),
        None => None,
    };

    Session { token, user }
}

/// Folds the pre-consolidation `role` / `organization_id` / `user_id` keys into a
/// profile, rewrites it under `user` and drops the old keys.
fn migrate_legacy(storage: &StorageState) -> Option<UserProfile> {
    let role = storage.get("role")?.parse::<Role>().ok()?;

    let mut user = UserProfile::new(String::new(), role);
    user.id = storage.get("user_id").filter(|id| !id.is_empty());
    user.organization_id = storage.get("organization_id").filter(|id| !id.is_empty());

    match serde_json::to_string(&user) {
        Ok(json) => {
            if let Err(e) = storage.set(USER_KEY, &json) {
                tracing::warn!(error = %e, "failed to store migrated profile");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode migrated profile"),
    }
    for key in LEGACY_KEYS {
        if let Err(e) = storage.remove(key) {
            tracing::warn!(key, error = %e, "failed to remove legacy session key");
        }
    }

    tracing::info!(role = %user.role, "migrated legacy session keys");
    Some(user)
}
