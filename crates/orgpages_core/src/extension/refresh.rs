//! Refresh capability handed to hosted extensions.

use crate::fetch::OrganizationFetcher;
use crate::model::organization::Organization;
use log::{debug, info};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Bound request to reload the organization a page was rendered for.
///
/// The key is captured when the capability is bound; later state changes do
/// not retarget it. An unbound capability never reaches the fetcher.
#[derive(Clone)]
pub struct RefreshCapability {
    organization_key: Option<String>,
    fetcher: Arc<dyn OrganizationFetcher>,
}

impl RefreshCapability {
    /// Binds to the currently resolved organization, if any.
    pub fn bind(
        organization: Option<&Organization>,
        fetcher: Arc<dyn OrganizationFetcher>,
    ) -> Self {
        Self {
            organization_key: organization.map(|organization| organization.key.clone()),
            fetcher,
        }
    }

    /// Capability that ignores every invocation.
    pub fn unbound(fetcher: Arc<dyn OrganizationFetcher>) -> Self {
        Self::bind(None, fetcher)
    }

    pub fn organization_key(&self) -> Option<&str> {
        self.organization_key.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.organization_key.is_some()
    }

    /// Requests a reload of the bound organization. Fire-and-forget.
    pub fn invoke(&self) {
        let Some(organization_key) = self.organization_key.as_deref() else {
            debug!("event=org_refresh module=extension status=skipped reason=unbound");
            return;
        };
        info!("event=org_refresh module=extension status=requested org_key={organization_key}");
        self.fetcher.fetch_organization(organization_key);
    }
}

impl Debug for RefreshCapability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCapability")
            .field("organization_key", &self.organization_key)
            .finish_non_exhaustive()
    }
}
