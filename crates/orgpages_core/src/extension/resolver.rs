//! Extension resolution against an organization's visible pages.
//!
//! # Invariants
//! - Admin pages are consulted only when the organization grants admin rights.
//! - The first descriptor whose key matches wins; order is pages, then admin
//!   pages.
//! - Resolution never fails and keeps no state between calls.

use crate::model::organization::{ExtensionDescriptor, ExtensionKey, Organization};
use log::debug;

/// Outcome of resolving one page request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageResolution<'a> {
    /// Organization data is not available (yet). Nothing is rendered.
    Empty,
    /// Organization is known but exposes no matching page to this viewer.
    NotFound,
    Found(&'a ExtensionDescriptor),
}

impl<'a> PageResolution<'a> {
    pub fn extension(self) -> Option<&'a ExtensionDescriptor> {
        match self {
            Self::Found(extension) => Some(extension),
            Self::Empty | Self::NotFound => None,
        }
    }

    /// Stable name used in log lines and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::NotFound => "not_found",
            Self::Found(_) => "found",
        }
    }
}

/// Selects the descriptor keyed `plugin_key/extension_key`, if visible.
///
/// "No organization" and "no match" both yield `None`.
pub fn resolve_extension<'a>(
    organization: Option<&'a Organization>,
    plugin_key: &str,
    extension_key: &str,
) -> Option<&'a ExtensionDescriptor> {
    let organization = organization?;
    let lookup_key = ExtensionKey::lookup_key(plugin_key, extension_key);
    organization
        .visible_pages()
        .find(|page| page.key == lookup_key)
}

/// Three-way variant of [`resolve_extension`] that keeps the loading case
/// apart from the not-found case.
pub fn resolve_page<'a>(
    organization: Option<&'a Organization>,
    plugin_key: &str,
    extension_key: &str,
) -> PageResolution<'a> {
    let resolution = match organization {
        None => PageResolution::Empty,
        Some(_) => match resolve_extension(organization, plugin_key, extension_key) {
            Some(extension) => PageResolution::Found(extension),
            None => PageResolution::NotFound,
        },
    };
    debug!(
        "event=extension_resolve module=extension status={} org_key={} plugin_key={plugin_key} extension_key={extension_key}",
        resolution.as_str(),
        organization.map_or("-", |organization| organization.key.as_str())
    );
    resolution
}

#[cfg(test)]
mod tests {
    use super::{resolve_extension, resolve_page, PageResolution};
    use crate::model::organization::{ExtensionDescriptor, Organization};

    fn organization(can_admin: bool) -> Organization {
        let mut organization = Organization::new("acme", "Acme");
        organization.can_admin = can_admin;
        organization.pages = vec![
            ExtensionDescriptor::new("plugin-a/page-1", "Page 1"),
            ExtensionDescriptor::new("plugin-b/page-2", "Page 2"),
        ];
        organization.admin_pages = Some(vec![ExtensionDescriptor::new(
            "plugin-a/admin",
            "Admin",
        )]);
        organization
    }

    #[test]
    fn resolves_regular_page() {
        let organization = organization(false);
        let extension =
            resolve_extension(Some(&organization), "plugin-b", "page-2").expect("page");
        assert_eq!(extension.name, "Page 2");
    }

    #[test]
    fn hides_admin_page_without_admin_rights() {
        let organization = organization(false);
        assert!(resolve_extension(Some(&organization), "plugin-a", "admin").is_none());
        assert_eq!(
            resolve_page(Some(&organization), "plugin-a", "admin"),
            PageResolution::NotFound
        );
    }

    #[test]
    fn resolves_admin_page_with_admin_rights() {
        let organization = organization(true);
        let extension =
            resolve_extension(Some(&organization), "plugin-a", "admin").expect("admin page");
        assert!(std::ptr::eq(
            extension,
            &organization.admin_pages.as_ref().expect("admin pages")[0]
        ));
    }

    #[test]
    fn admin_rights_without_admin_pages_resolve_regular_pages_only() {
        let mut organization = organization(true);
        organization.admin_pages = None;
        assert!(resolve_extension(Some(&organization), "plugin-a", "page-1").is_some());
        assert!(resolve_extension(Some(&organization), "plugin-a", "admin").is_none());
    }

    #[test]
    fn absent_organization_resolves_to_empty() {
        assert!(resolve_extension(None, "plugin-a", "page-1").is_none());
        assert_eq!(resolve_page(None, "plugin-a", "page-1"), PageResolution::Empty);
    }

    #[test]
    fn first_match_wins_when_key_is_duplicated() {
        let mut organization = organization(true);
        organization.admin_pages = Some(vec![ExtensionDescriptor::new(
            "plugin-a/page-1",
            "Shadowed admin copy",
        )]);
        let extension =
            resolve_extension(Some(&organization), "plugin-a", "page-1").expect("page");
        assert_eq!(extension.name, "Page 1");
        assert!(std::ptr::eq(extension, &organization.pages[0]));
    }

    #[test]
    fn key_parts_are_joined_not_prefix_matched() {
        let organization = organization(false);
        assert!(resolve_extension(Some(&organization), "plugin-a/page-1", "").is_none());
        assert!(resolve_extension(Some(&organization), "plugin", "a/page-1").is_none());
        assert!(resolve_extension(Some(&organization), "plugin-a", "page").is_none());
    }

    #[test]
    fn resolution_is_idempotent() {
        let organization = organization(true);
        let first = resolve_page(Some(&organization), "plugin-a", "admin");
        let second = resolve_page(Some(&organization), "plugin-a", "admin");
        assert_eq!(first, second);
        assert_eq!(first.extension().map(|page| page.key.as_str()), Some("plugin-a/admin"));
    }
}
