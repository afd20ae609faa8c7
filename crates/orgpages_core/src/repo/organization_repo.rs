//! Organization repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist organizations together with their ordered page lists.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Organization::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Page order is preserved per scope (`page` before `admin`).

use crate::db::DbError;
use crate::model::organization::{
    ExtensionDescriptor, Organization, OrganizationValidationError,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SCOPE_PAGE: &str = "page";
const SCOPE_ADMIN: &str = "admin";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for organization persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(OrganizationValidationError),
    Db(DbError),
    Json(serde_json::Error),
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "page metadata is not valid JSON: {err}"),
            Self::NotFound(key) => write!(f, "organization not found: {key}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted organization data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<OrganizationValidationError> for RepoError {
    fn from(value: OrganizationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Repository interface for organization storage.
pub trait OrganizationRepository {
    /// Inserts or fully replaces one organization and its pages.
    fn upsert_organization(&self, organization: &Organization) -> RepoResult<()>;
    fn get_organization(&self, key: &str) -> RepoResult<Option<Organization>>;
    /// Returns stored keys in ascending order.
    fn list_organization_keys(&self) -> RepoResult<Vec<String>>;
    fn delete_organization(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed organization repository.
pub struct SqliteOrganizationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrganizationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl OrganizationRepository for SqliteOrganizationRepository<'_> {
    fn upsert_organization(&self, organization: &Organization) -> RepoResult<()> {
        organization.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO organizations (key, name, can_admin, has_admin_pages)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                name = excluded.name,
                can_admin = excluded.can_admin,
                has_admin_pages = excluded.has_admin_pages,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                organization.key.as_str(),
                organization.name.as_str(),
                bool_to_int(organization.can_admin),
                bool_to_int(organization.admin_pages.is_some()),
            ],
        )?;
        tx.execute(
            "DELETE FROM organization_pages WHERE organization_key = ?1;",
            [organization.key.as_str()],
        )?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO organization_pages (
                    organization_key,
                    scope,
                    position,
                    extension_key,
                    name,
                    metadata_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            )?;
            let admin_pages = organization.admin_pages.as_deref().unwrap_or_default();
            let scoped = [(SCOPE_PAGE, organization.pages.as_slice()), (SCOPE_ADMIN, admin_pages)];
            for (scope, pages) in scoped {
                for (position, page) in pages.iter().enumerate() {
                    let metadata_json = serde_json::to_string(&page.metadata)?;
                    insert.execute(params![
                        organization.key.as_str(),
                        scope,
                        position as i64,
                        page.key.as_str(),
                        page.name.as_str(),
                        metadata_json,
                    ])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_organization(&self, key: &str) -> RepoResult<Option<Organization>> {
        let header = self
            .conn
            .query_row(
                "SELECT key, name, can_admin, has_admin_pages
                 FROM organizations
                 WHERE key = ?1;",
                [key],
                |row| {
                    Ok((
                        row.get::<_, String>("key")?,
                        row.get::<_, String>("name")?,
                        row.get::<_, i64>("can_admin")?,
                        row.get::<_, i64>("has_admin_pages")?,
                    ))
                },
            )
            .optional()?;
        let Some((key, name, can_admin, has_admin_pages)) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT scope, extension_key, name, metadata_json
             FROM organization_pages
             WHERE organization_key = ?1
             ORDER BY CASE scope WHEN 'page' THEN 0 ELSE 1 END, position ASC;",
        )?;
        let mut rows = stmt.query([key.as_str()])?;
        let mut pages = Vec::new();
        let mut admin_pages = Vec::new();
        while let Some(row) = rows.next()? {
            let (scope, descriptor) = parse_page_row(row)?;
            match scope.as_str() {
                SCOPE_PAGE => pages.push(descriptor),
                SCOPE_ADMIN => admin_pages.push(descriptor),
                other => {
                    return Err(RepoError::InvalidData(format!(
                        "invalid page scope `{other}` in organization_pages.scope"
                    )));
                }
            }
        }

        let has_admin_pages = int_to_bool(has_admin_pages, "organizations.has_admin_pages")?;
        if !has_admin_pages && !admin_pages.is_empty() {
            return Err(RepoError::InvalidData(format!(
                "organization `{key}` has admin pages but has_admin_pages = 0"
            )));
        }

        let organization = Organization {
            key,
            name,
            can_admin: int_to_bool(can_admin, "organizations.can_admin")?,
            pages,
            admin_pages: has_admin_pages.then_some(admin_pages),
        };
        organization.validate()?;
        Ok(Some(organization))
    }

    fn list_organization_keys(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM organizations ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn delete_organization(&self, key: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM organizations WHERE key = ?1;", [key])?;
        if changed == 0 {
            return Err(RepoError::NotFound(key.to_string()));
        }
        Ok(())
    }
}

fn parse_page_row(row: &Row<'_>) -> RepoResult<(String, ExtensionDescriptor)> {
    let scope: String = row.get("scope")?;
    let metadata_json: String = row.get("metadata_json")?;
    let metadata: BTreeMap<String, serde_json::Value> = serde_json::from_str(&metadata_json)
        .map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid metadata `{metadata_json}` in organization_pages.metadata_json: {err}"
            ))
        })?;

    let descriptor = ExtensionDescriptor {
        key: row.get("extension_key")?,
        name: row.get("name")?,
        metadata,
    };
    Ok((scope, descriptor))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
