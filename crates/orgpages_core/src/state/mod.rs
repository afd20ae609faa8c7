//! Application state context and organization locator.
//!
//! # Responsibility
//! - Hold fetched organizations keyed by organization key.
//! - Answer read-only lookups for render-time resolution.
//!
//! # Invariants
//! - Lookups never fail: a missing organization is a valid result.
//! - Only validated organizations enter the state.
//! - The locator performs no fetching and no caching of its own.

use crate::model::organization::{Organization, OrganizationValidationError};
use log::warn;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Read-only context passed explicitly into resolution.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    organizations: BTreeMap<String, Organization>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the organization stored under `key`, if any.
    pub fn get_organization_by_key(&self, key: &str) -> Option<&Organization> {
        self.organizations.get(key)
    }

    /// Stores or replaces one organization after validation.
    pub fn insert_organization(&mut self, organization: Organization) -> Result<(), StateError> {
        organization.validate().map_err(|err| {
            warn!(
                "event=state_insert module=state status=rejected org_key={} error={}",
                organization.key, err
            );
            StateError::InvalidOrganization(err)
        })?;
        self.organizations
            .insert(organization.key.clone(), organization);
        Ok(())
    }

    /// Drops one organization; returns whether it was present.
    pub fn remove_organization(&mut self, key: &str) -> bool {
        self.organizations.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }
}

/// Looks up the current organization for a render.
pub fn locate_organization<'s>(
    state: &'s AppState,
    organization_key: &str,
) -> Option<&'s Organization> {
    state.get_organization_by_key(organization_key)
}

/// Host-owned state container shared by renders and the fetch collaborator.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<RwLock<AppState>>,
}

impl SharedState {
    pub fn new(state: AppState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Acquires a read snapshot for one render pass.
    pub fn read(&self) -> RwLockReadGuard<'_, AppState> {
        // Poisoning is ignored: inserts and removals are single map operations.
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, AppState> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// State update errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    InvalidOrganization(OrganizationValidationError),
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrganization(err) => write!(f, "organization rejected: {err}"),
        }
    }
}

impl Error for StateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidOrganization(err) => Some(err),
        }
    }
}
