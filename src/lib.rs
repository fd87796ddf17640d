use std::sync::Arc;

// --- Module Structure ---

// Core session, access-control and navigation components.
pub mod acl;
pub mod config;
pub mod guard;
pub mod models;
pub mod session;
pub mod storage;

// Backend access: the resource client, its error type and the domain clients on top.
pub mod api;
pub mod client;
pub mod error;

// Page table and presentation-facing stores.
pub mod routes;
pub mod stores;

// --- Public Re-exports ---

pub use acl::{Needed, can};
pub use client::ApiClient;
pub use config::{AppConfig, ConfigError, Env};
pub use error::ApiError;
pub use guard::{Decision, Navigation, Router, decide};
pub use models::{Role, UserProfile};
pub use session::{AuthEvent, Session, SessionState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageState};

use api::{AgentsApi, AuthApi, OrganizationsApi, SitesApi};
use stores::{AuthStore, SiteStore};

/// Portal
///
/// The unified state container. Built once, from an explicit configuration and
/// storage backend, and handed to whatever drives the portal (the CLI, a UI shell,
/// tests). Nothing in the crate reaches for global session state: every component
/// receives the shared `SessionState` from here.
#[derive(Clone)]
pub struct Portal {
    /// The loaded, immutable configuration.
    pub config: AppConfig,
    /// Token and profile, shared by the client, guard and stores.
    pub session: Arc<SessionState>,
    /// Resource client carrying the session's bearer token.
    pub client: ApiClient,
    pub auth: AuthStore,
    pub sites: Arc<SiteStore>,
    pub agents: AgentsApi,
    pub organizations: OrganizationsApi,
    pub router: Router,
}

impl Portal {
    /// Wires every component around a session restored from `storage`.
    pub fn new(config: AppConfig, storage: StorageState) -> Result<Self, ApiError> {
        let session = Arc::new(SessionState::load(storage));
        let client = ApiClient::new(&config, session.clone())?;

        let auth = AuthStore::new(session.clone(), AuthApi::new(client.clone()));
        let sites = Arc::new(SiteStore::new(
            Arc::new(SitesApi::new(client.clone())),
            session.clone(),
        ));

        tracing::debug!(api = %config.api_base_url, env = ?config.env, "portal initialised");

        Ok(Self {
            agents: AgentsApi::new(client.clone()),
            organizations: OrganizationsApi::new(client.clone()),
            router: Router::default(),
            config,
            session,
            client,
            auth,
            sites,
        })
    }

    /// Builds a portal persisting its session to `config.session_file`.
    pub fn with_file_storage(config: AppConfig) -> Result<Self, ApiError> {
        let storage: StorageState = Arc::new(FileStore::new(config.session_file.clone()));
        Self::new(config, storage)
    }

    /// A standalone auth client for calls that do not touch the session
    /// (registration, organization completion).
    pub fn auth_api(&self) -> AuthApi {
        AuthApi::new(self.client.clone())
    }

    /// Resolves a navigation request against the current session.
    pub fn navigate(&self, path: &str) -> Navigation {
        self.router.navigate(&self.session.snapshot(), path)
    }
}
