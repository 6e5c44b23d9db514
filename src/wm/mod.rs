//! Window Manager Module
//!
//! Client bookkeeping, tags and focus history for the Area WM. The
//! [`WindowManager`] owns all of it and turns incoming [`WmEvent`]s into
//! focus decisions.

pub mod client;
pub mod events;
pub mod focus;
pub mod tag;

use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, FocusConfig, Placement};
use crate::wm::client::{Client, ClientId, ScreenId};
use crate::wm::events::{EventResult, WmEvent};
use crate::wm::focus::FocusHistory;
use crate::wm::tag::{TagId, TagManager, TagService};

/// Errors for events that reference state the manager doesn't have
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WmError {
    #[error("client {0} is not managed")]
    UnknownClient(ClientId),

    #[error("client {0} is already managed")]
    DuplicateClient(ClientId),

    #[error("screen {0} does not exist")]
    UnknownScreen(ScreenId),

    #[error("tag {tag:?} does not exist on screen {screen}")]
    UnknownTag { screen: ScreenId, tag: String },
}

pub struct WindowManager {
    config: FocusConfig,
    clients: HashMap<ClientId, Client>,
    tags: TagManager,
    history: FocusHistory,
    focused: Option<ClientId>,
}

impl WindowManager {
    /// Create a window manager with the configured screens and tags
    pub fn new(config: &Config) -> Self {
        let tags = TagManager::from_config(&config.screens);
        info!(
            "Initializing focus tracking ({} screens, placement={:?})",
            tags.screen_count(),
            config.focus.new_client_placement
        );

        Self {
            config: config.focus.clone(),
            clients: HashMap::new(),
            tags,
            history: FocusHistory::new(),
            focused: None,
        }
    }

    pub fn focused(&self) -> Option<ClientId> {
        self.focused
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn clients(&self) -> &HashMap<ClientId, Client> {
        &self.clients
    }

    pub fn tags(&self) -> &TagManager {
        &self.tags
    }

    pub fn history(&self) -> &FocusHistory {
        &self.history
    }

    /// The client that should hold focus on `screen` right now
    pub fn current_client_for_screen(&self, screen: ScreenId) -> Option<ClientId> {
        self.history
            .current_client_for_screen(&self.clients, &self.tags, screen)
    }

    /// Apply one event and report where focus ended up
    pub fn handle_event(&mut self, event: WmEvent) -> Result<EventResult, WmError> {
        let before = self.focused;

        match event {
            WmEvent::MapClient {
                id,
                screen,
                tags,
                skip,
                title,
            } => self.map_client(Client::new(id, screen).with_skip(skip).with_title(title), &tags)?,
            WmEvent::FocusIn { id } => self.focus_in(id)?,
            WmEvent::DestroyClient { id } => self.destroy_client(id),
            WmEvent::ViewTag { screen, tag } => {
                let tag = self.lookup_tag(screen, &tag)?;
                self.tags.view_only(tag);
                self.after_tag_switch(screen);
            }
            WmEvent::ToggleTag { screen, tag } => {
                let tag = self.lookup_tag(screen, &tag)?;
                self.tags.toggle_view(tag);
                self.after_tag_switch(screen);
            }
            WmEvent::TagClient { id, tag } => self.set_client_tag(id, &tag, true)?,
            WmEvent::UntagClient { id, tag } => self.set_client_tag(id, &tag, false)?,
            WmEvent::SetSkip { id, skip } => self.set_skip(id, skip)?,
        }

        let result = EventResult::new(before, self.focused);
        if result.changed {
            debug!("Focus moved from {:?} to {:?}", before, self.focused);
        }
        Ok(result)
    }

    fn map_client(&mut self, client: Client, tag_names: &[String]) -> Result<(), WmError> {
        let id = client.id;
        let screen = client.screen;
        if !self.tags.has_screen(screen) {
            return Err(WmError::UnknownScreen(screen));
        }
        if self.clients.contains_key(&id) {
            return Err(WmError::DuplicateClient(id));
        }

        let tags = if tag_names.is_empty() {
            self.tags.current_tags(screen)
        } else {
            tag_names
                .iter()
                .map(|name| self.lookup_tag(screen, name))
                .collect::<Result<Vec<_>, _>>()?
        };

        let skip = client.skip;
        info!("Managing client {} on screen {} ({:?})", id, screen, client.title);
        self.clients.insert(id, client);
        for tag in tags {
            self.tags.tag_client(id, tag);
        }

        match self.config.new_client_placement {
            Placement::Front => {
                self.history.promote_to_front(id);
                if !skip && self.tags.is_visible(id, screen) {
                    self.focused = Some(id);
                }
            }
            Placement::Back => self.history.promote_to_back(id),
        }

        if self.focused.is_none() {
            self.refocus(screen);
        }
        Ok(())
    }

    fn focus_in(&mut self, id: ClientId) -> Result<(), WmError> {
        if !self.clients.contains_key(&id) {
            return Err(WmError::UnknownClient(id));
        }
        self.history.promote_to_front(id);
        self.focused = Some(id);
        Ok(())
    }

    fn destroy_client(&mut self, id: ClientId) {
        self.history.remove(id);
        self.tags.untag_all(id);

        let Some(client) = self.clients.remove(&id) else {
            debug!("Destroy for unmanaged client {}, ignoring", id);
            return;
        };
        info!("Unmanaged client {}", id);

        if self.focused == Some(id) {
            self.refocus(client.screen);
        }
    }

    fn after_tag_switch(&mut self, screen: ScreenId) {
        if self.config.refocus_on_tag_switch {
            self.refocus(screen);
        }
    }

    fn set_client_tag(&mut self, id: ClientId, name: &str, add: bool) -> Result<(), WmError> {
        let screen = self
            .clients
            .get(&id)
            .map(|c| c.screen)
            .ok_or(WmError::UnknownClient(id))?;
        let tag = self.lookup_tag(screen, name)?;

        if add {
            self.tags.tag_client(id, tag);
        } else {
            self.tags.untag_client(id, tag);
        }

        self.settle_focus(screen);
        Ok(())
    }

    fn set_skip(&mut self, id: ClientId, skip: bool) -> Result<(), WmError> {
        let client = self.clients.get_mut(&id).ok_or(WmError::UnknownClient(id))?;
        client.skip = skip;
        let screen = client.screen;
        debug!("Client {} skip={}", id, skip);

        if skip && self.focused == Some(id) {
            self.refocus(screen);
        } else {
            self.settle_focus(screen);
        }
        Ok(())
    }

    /// Pick up a client on `screen` when nothing is focused, or move focus
    /// away from the focused client if its screen no longer shows it
    fn settle_focus(&mut self, screen: ScreenId) {
        if self.focused.is_none() {
            self.refocus(screen);
            return;
        }

        let Some(screen) = self
            .focused
            .and_then(|id| self.clients.get(&id))
            .filter(|c| !self.tags.is_visible(c.id, c.screen))
            .map(|c| c.screen)
        else {
            return;
        };
        self.refocus(screen);
    }

    fn refocus(&mut self, screen: ScreenId) {
        self.focused = self.current_client_for_screen(screen);
        debug!("Refocused screen {} -> {:?}", screen, self.focused);
    }

    fn lookup_tag(&self, screen: ScreenId, name: &str) -> Result<TagId, WmError> {
        if !self.tags.has_screen(screen) {
            return Err(WmError::UnknownScreen(screen));
        }
        self.tags.find(screen, name).ok_or_else(|| WmError::UnknownTag {
            screen,
            tag: name.to_string(),
        })
    }
}
