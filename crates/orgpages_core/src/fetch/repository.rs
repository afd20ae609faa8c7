//! Repository-backed organization fetcher.

use super::OrganizationFetcher;
use crate::repo::organization_repo::{
    OrganizationRepository, RepoError, SqliteOrganizationRepository,
};
use crate::state::SharedState;
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

/// Result of applying one queued fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The organization was stored into state.
    Loaded,
    /// Storage has no such key; `removed` tells whether state held it.
    Evicted { removed: bool },
    /// Stored data failed validation; state keeps its previous value.
    Rejected,
    /// Storage failed; state keeps its previous value.
    Failed,
}

/// Loads organizations from SQLite storage into shared state.
///
/// `fetch_organization` only queues the key, so it may be called while a
/// render still holds a read snapshot of the state. Queued keys are loaded
/// by [`RepositoryFetcher::apply_pending`], which takes the write lock and
/// must run after the snapshot is released.
///
/// A key missing from storage is removed from state, so the locator reports
/// it absent on the next render. Storage errors leave state untouched.
pub struct RepositoryFetcher {
    conn: Mutex<Connection>,
    state: SharedState,
    pending: Mutex<VecDeque<String>>,
}

impl RepositoryFetcher {
    pub fn new(conn: Connection, state: SharedState) -> Self {
        Self {
            conn: Mutex::new(conn),
            state,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns the state handle this fetcher writes into.
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Number of queued requests not yet applied.
    pub fn pending_len(&self) -> usize {
        self.lock_pending().len()
    }

    /// Loads every queued key into state, in request order.
    ///
    /// Blocks on the state write lock; never call it while holding a read
    /// snapshot on the same thread.
    pub fn apply_pending(&self) -> Vec<FetchOutcome> {
        let queued: Vec<String> = self.lock_pending().drain(..).collect();
        queued
            .iter()
            .map(|organization_key| self.load_organization(organization_key))
            .collect()
    }

    /// Loads one key from storage and writes the result into state.
    pub fn load_organization(&self, organization_key: &str) -> FetchOutcome {
        let started_at = Instant::now();
        let loaded = {
            let conn = self
                .conn
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            SqliteOrganizationRepository::new(&conn).get_organization(organization_key)
        };

        match loaded {
            Ok(Some(organization)) => {
                let page_count = organization.pages.len();
                let admin_page_count = organization.admin_pages.as_ref().map_or(0, Vec::len);
                match self.state.write().insert_organization(organization) {
                    Ok(()) => {
                        info!(
                            "event=org_fetch module=fetch status=ok org_key={organization_key} pages={page_count} admin_pages={admin_page_count} duration_ms={}",
                            started_at.elapsed().as_millis()
                        );
                        FetchOutcome::Loaded
                    }
                    Err(err) => {
                        warn!(
                            "event=org_fetch module=fetch status=rejected org_key={organization_key} error={err}"
                        );
                        FetchOutcome::Rejected
                    }
                }
            }
            Ok(None) => {
                let removed = self.state.write().remove_organization(organization_key);
                info!(
                    "event=org_fetch module=fetch status=not_found org_key={organization_key} evicted={removed}"
                );
                FetchOutcome::Evicted { removed }
            }
            Err(RepoError::Validation(err)) => {
                warn!(
                    "event=org_fetch module=fetch status=rejected org_key={organization_key} error={err}"
                );
                FetchOutcome::Rejected
            }
            Err(err) => {
                error!(
                    "event=org_fetch module=fetch status=error org_key={organization_key} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                FetchOutcome::Failed
            }
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OrganizationFetcher for RepositoryFetcher {
    fn fetch_organization(&self, organization_key: &str) {
        let mut pending = self.lock_pending();
        pending.push_back(organization_key.to_string());
        debug!(
            "event=org_fetch module=fetch status=queued org_key={organization_key} pending={}",
            pending.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchOutcome, RepositoryFetcher};
    use crate::db::open_db_in_memory;
    use crate::fetch::OrganizationFetcher;
    use crate::model::organization::Organization;
    use crate::repo::organization_repo::{OrganizationRepository, SqliteOrganizationRepository};
    use crate::state::SharedState;

    #[test]
    fn fetch_only_queues_until_applied() {
        let conn = open_db_in_memory().expect("open db");
        SqliteOrganizationRepository::new(&conn)
            .upsert_organization(&Organization::new("acme", "Acme"))
            .expect("seed");
        let fetcher = RepositoryFetcher::new(conn, SharedState::default());

        fetcher.fetch_organization("acme");
        fetcher.fetch_organization("acme");
        assert_eq!(fetcher.pending_len(), 2);
        assert!(fetcher.state().read().is_empty());

        assert_eq!(
            fetcher.apply_pending(),
            vec![FetchOutcome::Loaded, FetchOutcome::Loaded]
        );
        assert_eq!(fetcher.pending_len(), 0);
        assert_eq!(fetcher.state().read().len(), 1);
    }

    #[test]
    fn queueing_does_not_wait_for_readers() {
        let fetcher = RepositoryFetcher::new(
            open_db_in_memory().expect("open db"),
            SharedState::default(),
        );
        let snapshot = fetcher.state().read();

        fetcher.fetch_organization("acme");

        assert!(snapshot.is_empty());
        drop(snapshot);
        assert_eq!(
            fetcher.apply_pending(),
            vec![FetchOutcome::Evicted { removed: false }]
        );
    }

    #[test]
    fn apply_with_empty_queue_does_nothing() {
        let fetcher = RepositoryFetcher::new(
            open_db_in_memory().expect("open db"),
            SharedState::default(),
        );
        assert!(fetcher.apply_pending().is_empty());
    }
}
