//! Command implementations.

use anyhow::{bail, Context, Result};
use log::info;
use orgpages_core::db::open_db;
use orgpages_core::{
    match_extension_route, parse_location, render_organization_page, Organization,
    OrganizationFetcher, OrganizationRepository, RepositoryFetcher, SharedState,
    SqliteOrganizationRepository,
};
use std::path::Path;
use std::sync::Arc;

pub fn import(db_path: &Path, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read `{}`", file.display()))?;
    let organizations: Vec<Organization> = serde_json::from_str(&raw)
        .with_context(|| format!("`{}` is not a JSON array of organizations", file.display()))?;

    let conn = open_db(db_path)?;
    let repo = SqliteOrganizationRepository::new(&conn);
    for organization in &organizations {
        repo.upsert_organization(organization)
            .with_context(|| format!("failed to import organization `{}`", organization.key))?;
    }

    info!(
        "event=cli_import module=cli status=ok count={}",
        organizations.len()
    );
    println!("imported {} organization(s)", organizations.len());
    Ok(())
}

pub fn render(db_path: &Path, url: &str, refresh: bool) -> Result<()> {
    let location = parse_location(url).with_context(|| format!("failed to parse `{url}`"))?;
    let Some(params) = match_extension_route(&location.pathname) else {
        bail!(
            "`{}` is not an organization extension route (/organizations/{{org}}/extension/{{plugin}}/{{extension}})",
            location.pathname
        );
    };

    let state = SharedState::default();
    let fetcher = Arc::new(RepositoryFetcher::new(open_db(db_path)?, state.clone()));
    let handle: Arc<dyn OrganizationFetcher> = fetcher.clone();
    // Navigating to the page loads its organization, as the router would.
    handle.fetch_organization(&params.organization_key);
    fetcher.apply_pending();

    let refreshed = {
        let snapshot = state.read();
        let output = render_organization_page(&snapshot, &params, &location, handle.clone());
        println!("{}", serde_json::to_string_pretty(&output)?);
        // Invoked from the live props; the fetcher only queues the key.
        let refreshed = match output.extension_props() {
            Some(props) if refresh => {
                props.options.refresh_organization.invoke();
                true
            }
            _ => false,
        };
        refreshed
    };

    if !refresh {
        return Ok(());
    }
    if !refreshed {
        bail!("no extension rendered; nothing to refresh");
    }
    fetcher.apply_pending();

    let snapshot = state.read();
    let output = render_organization_page(&snapshot, &params, &location, handle);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn list(db_path: &Path) -> Result<()> {
    let conn = open_db(db_path)?;
    for key in SqliteOrganizationRepository::new(&conn).list_organization_keys()? {
        println!("{key}");
    }
    Ok(())
}
