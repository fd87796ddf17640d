use parking_lot::RwLock;
use std::sync::Arc;

use crate::{
    api::sites::SiteSourceState,
    error::ApiError,
    models::{Role, Site, UserProfile},
    session::SessionState,
};

/// SiteStore
///
/// Holds the last fetched site list and derives the subset the signed-in account
/// may see.
pub struct SiteStore {
    sites: RwLock<Vec<Site>>,
    source: SiteSourceState,
    session: Arc<SessionState>,
}

impl SiteStore {
    pub fn new(source: SiteSourceState, session: Arc<SessionState>) -> Self {
        Self {
            sites: RwLock::new(Vec::new()),
            source,
            session,
        }
    }

    /// Replaces the held list with a fresh fetch. On error the previous list stays.
    pub async fn fetch_sites(&self) -> Result<usize, ApiError> {
        let fetched = self.source.list_sites().await?;
        let count = fetched.len();
        *self.sites.write() = fetched;
        tracing::debug!(count, "sites refreshed");
        Ok(count)
    }

    pub fn sites(&self) -> Vec<Site> {
        self.sites.read().clone()
    }

    /// The sites visible to the current session's account.
    pub fn filtered_sites(&self) -> Vec<Site> {
        let session = self.session.snapshot();
        let user = session.user.as_ref().filter(|_| session.is_authenticated());
        filter_for(&self.sites.read(), user)
    }
}

/// Role scoping: administrators see everything, operators their organization's
/// sites, users the sites they were granted, and nobody else sees anything.
pub fn filter_for(sites: &[Site], user: Option<&UserProfile>) -> Vec<Site> {
    let Some(user) = user else {
        return Vec::new();
    };

    match user.role {
        Role::Administrator => sites.to_vec(),
        Role::Operator => match user.organization_id.as_deref() {
            Some(org) if !org.is_empty() => sites
                .iter()
                .filter(|s| s.organization_id.as_deref() == Some(org))
                .cloned()
                .collect(),
            _ => Vec::new(),
        },
        Role::User => match &user.site_ids {
            Some(ids) => sites
                .iter()
                .filter(|s| ids.contains(&s.id))
                .cloned()
                .collect(),
            None => Vec::new(),
        },
    }
}
