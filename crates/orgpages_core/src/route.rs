//! Navigation inputs for organization extension pages.
//!
//! # Responsibility
//! - Carry the route parameters the page adapter needs.
//! - Recognize `/organizations/{org}/extension/{plugin}/{extension}` paths.
//!
//! # Invariants
//! - `Location` is passed through to hosted extensions unexamined.
//! - `Location::pathname` keeps its percent-encoding; query pairs and route
//!   parameters are decoded.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

const ORGANIZATIONS_SEGMENT: &str = "organizations";
const EXTENSION_SEGMENT: &str = "extension";
/// Relative locations are resolved against this origin; only path and
/// query survive into [`Location`].
const LOCATION_BASE: &str = "http://localhost/";

/// Parameters extracted from the current route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationParams {
    pub organization_key: String,
    pub plugin_key: String,
    pub extension_key: String,
}

impl NavigationParams {
    pub fn new(
        organization_key: impl Into<String>,
        plugin_key: impl Into<String>,
        extension_key: impl Into<String>,
    ) -> Self {
        Self {
            organization_key: organization_key.into(),
            plugin_key: plugin_key.into(),
            extension_key: extension_key.into(),
        }
    }
}

/// Current navigation location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

/// Parses a `path?query` string (or an absolute URL) into a [`Location`].
///
/// Query pairs are form-decoded (`%20` and `+` become spaces). Pairs
/// without `=` map to an empty value; the last duplicate wins.
pub fn parse_location(url: &str) -> Result<Location, RouteError> {
    let parsed = Url::parse(LOCATION_BASE)?.join(url)?;
    let query = parsed
        .query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    Ok(Location {
        pathname: parsed.path().to_string(),
        query,
    })
}

/// Matches an organization extension page path.
///
/// Segments are percent-decoded; a segment that does not decode to UTF-8
/// fails the match.
pub fn match_extension_route(pathname: &str) -> Option<NavigationParams> {
    let trimmed = pathname.strip_suffix('/').unwrap_or(pathname);
    let mut segments = trimmed.strip_prefix('/')?.split('/');

    if segments.next()? != ORGANIZATIONS_SEGMENT {
        return None;
    }
    let organization_key = decode_segment(segments.next()?)?;
    if segments.next()? != EXTENSION_SEGMENT {
        return None;
    }
    let plugin_key = decode_segment(segments.next()?)?;
    let extension_key = decode_segment(segments.next()?)?;
    if segments.next().is_some() {
        return None;
    }

    Some(NavigationParams::new(
        organization_key,
        plugin_key,
        extension_key,
    ))
}

fn decode_segment(segment: &str) -> Option<String> {
    let decoded = percent_decode_str(segment).decode_utf8().ok()?;
    if decoded.is_empty() {
        return None;
    }
    Some(decoded.into_owned())
}

/// Location parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    InvalidUrl(url::ParseError),
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(err) => write!(f, "invalid location: {err}"),
        }
    }
}

impl Error for RouteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUrl(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for RouteError {
    fn from(value: url::ParseError) -> Self {
        Self::InvalidUrl(value)
    }
}
