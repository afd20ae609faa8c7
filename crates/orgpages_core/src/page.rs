//! Organization extension page adapter.
//!
//! # Responsibility
//! - Compose locate, resolve, bind-refresh and dispatch for one render.
//!
//! # Invariants
//! - Output is recomputed from inputs on every call; nothing is memoized.
//! - The refresh capability is bound to the organization found in `state`
//!   for this render, never to the route key alone.

use crate::extension::dispatch::{dispatch, RenderOutput};
use crate::extension::refresh::RefreshCapability;
use crate::extension::resolver::resolve_page;
use crate::fetch::OrganizationFetcher;
use crate::route::{Location, NavigationParams};
use crate::state::{locate_organization, AppState};
use std::sync::Arc;

/// Renders the extension page addressed by `params`.
pub fn render_organization_page<'a>(
    state: &'a AppState,
    params: &NavigationParams,
    location: &'a Location,
    fetcher: Arc<dyn OrganizationFetcher>,
) -> RenderOutput<'a> {
    let organization = locate_organization(state, params.organization_key.as_str());
    let extension = resolve_page(
        organization,
        params.plugin_key.as_str(),
        params.extension_key.as_str(),
    )
    .extension();
    let refresh_organization = RefreshCapability::bind(organization, fetcher);
    dispatch(organization, extension, location, refresh_organization)
}
