//! Capability traits over the live editor UI.
//!
//! The engine never talks to a browser or editor driver directly. Scenarios
//! are written against these traits and a driver crate implements them. Every
//! handle carries a [`HandleId`] so that a staleness signal can be matched to
//! the exact dependency that went away.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identity token of a UI element handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(Uuid);

impl HandleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HandleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by the UI layer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UiError {
    /// The handle no longer refers to a live element.
    #[error("stale reference to ui element {handle}")]
    Stale { handle: HandleId },

    #[error("ui driver error: {0}")]
    Driver(String),

    #[error("timed out waiting for {0}")]
    WaitTimeout(String),
}

/// Anything that refers to a UI element.
#[async_trait]
pub trait UiHandle: Send + Sync + 'static {
    fn handle_id(&self) -> HandleId;

    async fn is_displayed(&self) -> Result<bool, UiError>;
}

/// The quick-input box behind the command palette.
#[async_trait]
pub trait InputBox: UiHandle {
    async fn text(&self) -> Result<String, UiError>;

    async fn set_text(&self, text: &str) -> Result<(), UiError>;

    /// Label of the first suggestion matching `label`, if one is shown.
    async fn find_quick_pick(&self, label: &str) -> Result<Option<String>, UiError>;

    async fn cancel(&self) -> Result<(), UiError>;
}

/// Entry point for the command-palette scenario.
#[async_trait]
pub trait CommandPalette: Send + Sync + 'static {
    type Input: InputBox;

    async fn open_command_prompt(&self) -> Result<(), UiError>;

    /// Handle to the input box, whether or not it is currently shown.
    async fn input_box(&self) -> Result<Self::Input, UiError>;
}

/// A section of the side bar, tagged by kind at the driver boundary.
#[derive(Debug)]
pub enum Section<E> {
    Extensions(E),
    Other { title: String },
}

impl<E> Section<E> {
    pub fn into_extensions(self) -> Option<E> {
        match self {
            Section::Extensions(section) => Some(section),
            Section::Other { .. } => None,
        }
    }
}

/// One extension entry in the extensions view.
#[async_trait]
pub trait ExtensionItem: UiHandle {
    async fn title(&self) -> Result<String, UiError>;

    async fn description(&self) -> Result<String, UiError>;

    async fn author(&self) -> Result<String, UiError>;

    async fn is_installed(&self) -> Result<bool, UiError>;
}

/// The extensions (marketplace) section of the side bar.
#[async_trait]
pub trait ExtensionsSection: UiHandle {
    type Item: ExtensionItem;

    /// Search the section with a filter string such as `@installed Name`.
    async fn find_item(&self, filter: &str) -> Result<Option<Self::Item>, UiError>;
}

/// Content pane of the side bar.
#[async_trait]
pub trait SideBarContent: UiHandle {
    type Extensions: ExtensionsSection;

    async fn sections(&self) -> Result<Vec<Section<Self::Extensions>>, UiError>;
}

/// An activity-bar control that toggles a side bar view.
#[async_trait]
pub trait ViewControl: Send + Sync {
    async fn toggle(&self) -> Result<(), UiError>;
}

/// Entry point for the marketplace scenario.
#[async_trait]
pub trait ExtensionsPanel: Send + Sync + 'static {
    type Content: SideBarContent;
    type Control: ViewControl;

    async fn side_bar_content(&self) -> Result<Self::Content, UiError>;

    async fn view_control(&self, title: &str) -> Result<Option<Self::Control>, UiError>;
}
