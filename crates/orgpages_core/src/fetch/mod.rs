//! Fetch collaborator contracts.
//!
//! # Responsibility
//! - Define the outbound seam the refresh capability calls into.
//! - Provide a repository-backed collaborator that reloads state.
//!
//! # Invariants
//! - Fetch requests are fire-and-forget: callers never observe completion
//!   or failure.
//! - `fetch_organization` never blocks on application state, so it is safe
//!   to call from inside a render.
//! - Overlapping requests are not deduplicated at this layer.

mod repository;

pub use repository::{FetchOutcome, RepositoryFetcher};

/// Outbound request to (re)load one organization into application state.
pub trait OrganizationFetcher: Send + Sync {
    fn fetch_organization(&self, organization_key: &str);
}
