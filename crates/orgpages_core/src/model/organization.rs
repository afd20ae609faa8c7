//! Organization and extension descriptor model.
//!
//! # Responsibility
//! - Define the organization entity as received from the fetch collaborator.
//! - Define extension descriptors contributed by plugins.
//! - Provide the visible-set rule used by resolution.
//!
//! # Invariants
//! - `admin_pages` is only part of the visible set when `can_admin` is true.
//! - Descriptor keys have the `<pluginKey>/<extensionKey>` shape with exactly
//!   one separator, so every key is reachable through a single route segment
//!   per part.
//! - Validated organizations carry no duplicate descriptor key across
//!   `pages` and `admin_pages`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EXTENSION_KEY_SEPARATOR: char = '/';

/// Tenant-like entity owning a set of extension pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Stable unique identifier.
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// Whether the current viewer administers this organization.
    #[serde(default)]
    pub can_admin: bool,
    /// Pages visible to every viewer.
    #[serde(default)]
    pub pages: Vec<ExtensionDescriptor>,
    /// Pages visible only to administrators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_pages: Option<Vec<ExtensionDescriptor>>,
}

impl Organization {
    /// Creates an organization without pages and without admin rights.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            can_admin: false,
            pages: Vec::new(),
            admin_pages: None,
        }
    }

    /// Iterates the descriptors a viewer of this organization may see.
    ///
    /// Regular pages come first, followed by admin pages when `can_admin` is
    /// set. Relative order inside each list is preserved.
    pub fn visible_pages(&self) -> impl Iterator<Item = &ExtensionDescriptor> {
        let admin_pages: &[ExtensionDescriptor] = match (&self.admin_pages, self.can_admin) {
            (Some(admin_pages), true) => admin_pages.as_slice(),
            _ => &[],
        };
        self.pages.iter().chain(admin_pages.iter())
    }

    /// Validates registration-level invariants.
    ///
    /// Admin pages are checked even when `can_admin` is false, so the key
    /// space stays unique whatever the viewer's rights are.
    pub fn validate(&self) -> Result<(), OrganizationValidationError> {
        if self.key.trim().is_empty() {
            return Err(OrganizationValidationError::EmptyKey);
        }

        let mut seen = BTreeSet::<&str>::new();
        let admin_pages = self.admin_pages.as_deref().unwrap_or_default();
        for descriptor in self.pages.iter().chain(admin_pages.iter()) {
            ExtensionKey::parse(descriptor.key.as_str()).map_err(|_| {
                OrganizationValidationError::InvalidExtensionKey(descriptor.key.clone())
            })?;
            if !seen.insert(descriptor.key.as_str()) {
                return Err(OrganizationValidationError::DuplicateExtensionKey(
                    descriptor.key.clone(),
                ));
            }
        }
        Ok(())
    }
}

/// Metadata record for one pluggable page contributed by a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    /// `<pluginKey>/<extensionKey>`.
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// Rendering metadata, opaque to the host.
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ExtensionDescriptor {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Returns the parsed composite key, if well formed.
    pub fn extension_key(&self) -> Result<ExtensionKey, ExtensionKeyError> {
        ExtensionKey::parse(self.key.as_str())
    }
}

/// Composite `pluginKey` + `extensionKey` identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtensionKey {
    pub plugin_key: String,
    pub extension_key: String,
}

impl ExtensionKey {
    pub fn new(plugin_key: impl Into<String>, extension_key: impl Into<String>) -> Self {
        Self {
            plugin_key: plugin_key.into(),
            extension_key: extension_key.into(),
        }
    }

    /// Builds the descriptor lookup key without validating its parts.
    pub fn lookup_key(plugin_key: &str, extension_key: &str) -> String {
        format!("{plugin_key}{EXTENSION_KEY_SEPARATOR}{extension_key}")
    }

    /// Parses `<pluginKey>/<extensionKey>`.
    ///
    /// Neither part may contain a separator.
    pub fn parse(value: &str) -> Result<Self, ExtensionKeyError> {
        let Some((plugin_key, extension_key)) = value.split_once(EXTENSION_KEY_SEPARATOR) else {
            return Err(ExtensionKeyError::MissingSeparator(value.to_string()));
        };
        if extension_key.contains(EXTENSION_KEY_SEPARATOR) {
            return Err(ExtensionKeyError::ExtraSeparator(value.to_string()));
        }
        if plugin_key.trim().is_empty() {
            return Err(ExtensionKeyError::EmptyPluginKey(value.to_string()));
        }
        if extension_key.trim().is_empty() {
            return Err(ExtensionKeyError::EmptyExtensionKey(value.to_string()));
        }
        Ok(Self::new(plugin_key, extension_key))
    }
}

impl Display for ExtensionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            Self::lookup_key(&self.plugin_key, &self.extension_key)
        )
    }
}

/// Composite extension key parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionKeyError {
    MissingSeparator(String),
    ExtraSeparator(String),
    EmptyPluginKey(String),
    EmptyExtensionKey(String),
}

impl Display for ExtensionKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSeparator(value) => {
                write!(f, "extension key must be `plugin/extension`: {value}")
            }
            Self::ExtraSeparator(value) => {
                write!(f, "extension key must contain a single `/`: {value}")
            }
            Self::EmptyPluginKey(value) => {
                write!(f, "extension key has empty plugin part: {value}")
            }
            Self::EmptyExtensionKey(value) => {
                write!(f, "extension key has empty extension part: {value}")
            }
        }
    }
}

impl Error for ExtensionKeyError {}

/// Organization registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationValidationError {
    EmptyKey,
    InvalidExtensionKey(String),
    DuplicateExtensionKey(String),
}

impl Display for OrganizationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "organization key must not be empty"),
            Self::InvalidExtensionKey(value) => {
                write!(f, "organization page key is invalid: {value}")
            }
            Self::DuplicateExtensionKey(value) => {
                write!(f, "organization page key is registered twice: {value}")
            }
        }
    }
}

impl Error for OrganizationValidationError {}

#[cfg(test)]
mod tests {
    use super::{
        ExtensionDescriptor, ExtensionKey, ExtensionKeyError, Organization,
        OrganizationValidationError,
    };

    fn organization_with_admin_pages(can_admin: bool) -> Organization {
        let mut organization = Organization::new("acme", "Acme");
        organization.can_admin = can_admin;
        organization.pages = vec![
            ExtensionDescriptor::new("billing/overview", "Billing"),
            ExtensionDescriptor::new("audit/log", "Audit"),
        ];
        organization.admin_pages = Some(vec![ExtensionDescriptor::new(
            "billing/settings",
            "Billing settings",
        )]);
        organization
    }

    #[test]
    fn visible_pages_hide_admin_pages_without_admin_rights() {
        let organization = organization_with_admin_pages(false);
        let keys: Vec<&str> = organization
            .visible_pages()
            .map(|page| page.key.as_str())
            .collect();
        assert_eq!(keys, vec!["billing/overview", "audit/log"]);
    }

    #[test]
    fn visible_pages_append_admin_pages_after_regular_pages() {
        let organization = organization_with_admin_pages(true);
        let keys: Vec<&str> = organization
            .visible_pages()
            .map(|page| page.key.as_str())
            .collect();
        assert_eq!(
            keys,
            vec!["billing/overview", "audit/log", "billing/settings"]
        );
    }

    #[test]
    fn visible_pages_tolerate_missing_admin_pages() {
        let mut organization = organization_with_admin_pages(true);
        organization.admin_pages = None;
        assert_eq!(organization.visible_pages().count(), 2);
    }

    #[test]
    fn validate_accepts_unique_keys() {
        assert!(organization_with_admin_pages(true).validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_key() {
        let organization = Organization::new("  ", "Blank");
        assert_eq!(
            organization.validate().unwrap_err(),
            OrganizationValidationError::EmptyKey
        );
    }

    #[test]
    fn validate_rejects_duplicate_key_across_pages_and_admin_pages() {
        let mut organization = organization_with_admin_pages(false);
        organization
            .admin_pages
            .get_or_insert_with(Vec::new)
            .push(ExtensionDescriptor::new("audit/log", "Audit again"));
        assert_eq!(
            organization.validate().unwrap_err(),
            OrganizationValidationError::DuplicateExtensionKey("audit/log".to_string())
        );
    }

    #[test]
    fn validate_rejects_malformed_page_key() {
        let mut organization = organization_with_admin_pages(false);
        organization
            .pages
            .push(ExtensionDescriptor::new("no-separator", "Broken"));
        assert!(matches!(
            organization.validate(),
            Err(OrganizationValidationError::InvalidExtensionKey(_))
        ));
    }

    #[test]
    fn extension_key_parses_and_displays() {
        let key = ExtensionKey::parse("governance/reports").expect("valid key");
        assert_eq!(key.plugin_key, "governance");
        assert_eq!(key.extension_key, "reports");
        assert_eq!(key.to_string(), "governance/reports");
    }

    #[test]
    fn extension_key_rejects_nested_extension_part() {
        assert_eq!(
            ExtensionKey::parse("governance/reports/monthly").unwrap_err(),
            ExtensionKeyError::ExtraSeparator("governance/reports/monthly".to_string())
        );
    }

    #[test]
    fn validate_rejects_page_key_with_two_separators() {
        let mut organization = organization_with_admin_pages(false);
        organization
            .pages
            .push(ExtensionDescriptor::new("governance/reports/monthly", "Monthly"));
        assert_eq!(
            organization.validate().unwrap_err(),
            OrganizationValidationError::InvalidExtensionKey(
                "governance/reports/monthly".to_string()
            )
        );
    }

    #[test]
    fn extension_key_rejects_empty_parts() {
        assert_eq!(
            ExtensionKey::parse("/page").unwrap_err(),
            ExtensionKeyError::EmptyPluginKey("/page".to_string())
        );
        assert_eq!(
            ExtensionKey::parse("plugin/").unwrap_err(),
            ExtensionKeyError::EmptyExtensionKey("plugin/".to_string())
        );
        assert!(matches!(
            ExtensionKey::parse("plugin"),
            Err(ExtensionKeyError::MissingSeparator(_))
        ));
    }

    #[test]
    fn organization_uses_camel_case_wire_fields() {
        let json = serde_json::json!({
            "key": "acme",
            "name": "Acme",
            "canAdmin": true,
            "pages": [{ "key": "billing/overview", "name": "Billing", "icon": "coin" }],
            "adminPages": [{ "key": "billing/settings", "name": "Settings" }]
        });
        let organization: Organization = serde_json::from_value(json).expect("decode");
        assert!(organization.can_admin);
        assert_eq!(organization.pages[0].metadata["icon"], "coin");
        assert_eq!(
            organization.admin_pages.as_ref().map(Vec::len),
            Some(1)
        );

        let encoded = serde_json::to_value(&organization).expect("encode");
        assert_eq!(encoded["canAdmin"], true);
        assert_eq!(encoded["pages"][0]["icon"], "coin");
        assert_eq!(encoded["adminPages"][0]["key"], "billing/settings");
    }

    #[test]
    fn organization_defaults_missing_lists() {
        let organization: Organization =
            serde_json::from_value(serde_json::json!({ "key": "acme" })).expect("decode");
        assert!(organization.pages.is_empty());
        assert!(organization.admin_pages.is_none());
        assert!(!organization.can_admin);
    }
}
