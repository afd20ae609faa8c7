//! Render dispatch for organization extension pages.
//!
//! Turns a resolution result into the props of exactly one render target:
//! nothing, the embedded not-found view, or the extension host container.

use crate::extension::refresh::RefreshCapability;
use crate::model::organization::{ExtensionDescriptor, Organization};
use crate::route::Location;
use serde::Serialize;

/// What the page surface renders.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderOutput<'a> {
    /// Organization not loaded; render nothing at all.
    Empty,
    NotFound(NotFoundProps),
    Extension(ExtensionContainerProps<'a>),
}

impl<'a> RenderOutput<'a> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn extension_props(&self) -> Option<&ExtensionContainerProps<'a>> {
        match self {
            Self::Extension(props) => Some(props),
            Self::Empty | Self::NotFound(_) => None,
        }
    }
}

/// Props for the fallback view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundProps {
    /// `false` when embedded inside an existing page shell.
    pub with_container: bool,
}

/// Props for the container that mounts third-party extension code.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionContainerProps<'a> {
    pub extension: &'a ExtensionDescriptor,
    pub location: &'a Location,
    pub options: ExtensionOptions<'a>,
}

/// Options bag exposed to the hosted extension.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionOptions<'a> {
    pub organization: &'a Organization,
    #[serde(skip)]
    pub refresh_organization: RefreshCapability,
}

/// Picks the render target for already resolved inputs.
pub fn dispatch<'a>(
    organization: Option<&'a Organization>,
    extension: Option<&'a ExtensionDescriptor>,
    location: &'a Location,
    refresh_organization: RefreshCapability,
) -> RenderOutput<'a> {
    let Some(organization) = organization else {
        return RenderOutput::Empty;
    };
    let Some(extension) = extension else {
        return RenderOutput::NotFound(NotFoundProps {
            with_container: false,
        });
    };

    RenderOutput::Extension(ExtensionContainerProps {
        extension,
        location,
        options: ExtensionOptions {
            organization,
            refresh_organization,
        },
    })
}
