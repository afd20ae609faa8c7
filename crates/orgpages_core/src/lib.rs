//! Core logic for organization extension pages.
//!
//! Resolves which plugin-contributed page an organization exposes for the
//! current route, decides what the page surface renders, and lets hosted
//! pages request a reload of their organization.

pub mod db;
pub mod extension;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod page;
pub mod repo;
pub mod route;
pub mod state;

pub use extension::dispatch::{
    dispatch, ExtensionContainerProps, ExtensionOptions, NotFoundProps, RenderOutput,
};
pub use extension::refresh::RefreshCapability;
pub use extension::resolver::{resolve_extension, resolve_page, PageResolution};
pub use fetch::{FetchOutcome, OrganizationFetcher, RepositoryFetcher};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::organization::{
    ExtensionDescriptor, ExtensionKey, ExtensionKeyError, Organization,
    OrganizationValidationError,
};
pub use page::render_organization_page;
pub use repo::organization_repo::{
    OrganizationRepository, RepoError, RepoResult, SqliteOrganizationRepository,
};
pub use route::{match_extension_route, parse_location, Location, NavigationParams, RouteError};
pub use state::{locate_organization, AppState, SharedState, StateError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
