//! Events Module
//!
//! Window manager events that drive the focus history, and the result
//! reported back after each one.

use serde::{Deserialize, Serialize};

use crate::wm::client::{ClientId, ScreenId};

/// Events fed to [`crate::wm::WindowManager::handle_event`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WmEvent {
    /// A client was mapped. Empty `tags` means the screen's selected tags.
    MapClient {
        id: ClientId,
        #[serde(default)]
        screen: ScreenId,
        #[serde(default)]
        tags: Vec<String>,
        #[serde(default)]
        skip: bool,
        #[serde(default)]
        title: String,
    },

    /// A client received input focus
    FocusIn { id: ClientId },

    /// A client was destroyed
    DestroyClient { id: ClientId },

    /// Show only `tag` on `screen`
    ViewTag { screen: ScreenId, tag: String },

    /// Add or remove `tag` from the selection on `screen`
    ToggleTag { screen: ScreenId, tag: String },

    /// Add a tag (on the client's screen) to a client
    TagClient { id: ClientId, tag: String },

    /// Remove a tag (on the client's screen) from a client
    UntagClient { id: ClientId, tag: String },

    /// Change a client's skip flag
    SetSkip { id: ClientId, skip: bool },
}

/// Outcome of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResult {
    /// Focused client after the event
    pub focused: Option<ClientId>,
    /// Whether the event moved focus
    pub changed: bool,
}

impl EventResult {
    pub fn new(before: Option<ClientId>, after: Option<ClientId>) -> Self {
        Self {
            focused: after,
            changed: before != after,
        }
    }
}
