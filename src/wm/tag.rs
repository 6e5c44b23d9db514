//! Tag Module
//!
//! Per-screen tags, their selection state, and client membership.
//! Tags replace fixed workspaces: a client may carry any number of tags and
//! a screen shows every client tagged with one of its selected tags.

use std::collections::HashSet;
use tracing::debug;

use crate::config::ScreenConfig;
use crate::wm::client::{ClientId, ScreenId};

/// Stable tag handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub usize);

/// Tag collaborator consumed by focus resolution.
///
/// Implemented by [`TagManager`]; kept as a trait so focus queries can run
/// against any tag store.
pub trait TagService {
    /// Tags currently selected on `screen`, in screen order.
    /// The returned list is owned by the caller.
    fn current_tags(&self, screen: ScreenId) -> Vec<TagId>;

    /// Whether `client` carries `tag`
    fn is_client_tagged(&self, client: ClientId, tag: TagId) -> bool;
}

/// A single tag
#[derive(Debug, Clone)]
pub struct Tag {
    pub name: String,
    pub screen: ScreenId,
    pub selected: bool,
    clients: HashSet<ClientId>,
}

impl Tag {
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

/// Tag manager
#[derive(Debug, Default)]
pub struct TagManager {
    tags: Vec<Tag>,
    screen_count: usize,
}

impl TagManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build screens and tags from configuration
    pub fn from_config(screens: &[ScreenConfig]) -> Self {
        let mut manager = Self::new();
        for screen_config in screens {
            let screen = manager.add_screen();
            for name in &screen_config.tags {
                let selected = screen_config.selected.iter().any(|s| s == name);
                manager.add_tag(screen, name.clone(), selected);
            }
        }
        manager
    }

    pub fn add_screen(&mut self) -> ScreenId {
        self.screen_count += 1;
        self.screen_count - 1
    }

    pub fn screen_count(&self) -> usize {
        self.screen_count
    }

    pub fn has_screen(&self, screen: ScreenId) -> bool {
        screen < self.screen_count
    }

    pub fn add_tag(&mut self, screen: ScreenId, name: impl Into<String>, selected: bool) -> TagId {
        debug_assert!(self.has_screen(screen), "tag added to unknown screen {screen}");
        let id = TagId(self.tags.len());
        self.tags.push(Tag {
            name: name.into(),
            screen,
            selected,
            clients: HashSet::new(),
        });
        id
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.get(id.0)
    }

    /// Look up a tag on `screen` by name
    pub fn find(&self, screen: ScreenId, name: &str) -> Option<TagId> {
        self.tags
            .iter()
            .position(|t| t.screen == screen && t.name == name)
            .map(TagId)
    }

    /// Select `tag` and deselect every other tag on its screen
    pub fn view_only(&mut self, tag: TagId) {
        let Some(screen) = self.tag(tag).map(|t| t.screen) else {
            return;
        };
        for (idx, t) in self.tags.iter_mut().enumerate() {
            if t.screen == screen {
                t.selected = idx == tag.0;
            }
        }
        debug!("Viewing only tag {:?} on screen {}", tag, screen);
    }

    /// Flip selection of `tag`, returning the new state
    pub fn toggle_view(&mut self, tag: TagId) -> bool {
        match self.tags.get_mut(tag.0) {
            Some(t) => {
                t.selected = !t.selected;
                debug!("Tag {} on screen {} selected={}", t.name, t.screen, t.selected);
                t.selected
            }
            None => false,
        }
    }

    /// Returns false if the client already carried the tag
    pub fn tag_client(&mut self, client: ClientId, tag: TagId) -> bool {
        self.tags
            .get_mut(tag.0)
            .is_some_and(|t| t.clients.insert(client))
    }

    /// Returns false if the client did not carry the tag
    pub fn untag_client(&mut self, client: ClientId, tag: TagId) -> bool {
        self.tags
            .get_mut(tag.0)
            .is_some_and(|t| t.clients.remove(&client))
    }

    /// Drop every membership of `client`
    pub fn untag_all(&mut self, client: ClientId) {
        for t in &mut self.tags {
            t.clients.remove(&client);
        }
    }

    /// Whether `client` is shown by the current selection on `screen`
    pub fn is_visible(&self, client: ClientId, screen: ScreenId) -> bool {
        self.current_tags(screen)
            .into_iter()
            .any(|tag| self.is_client_tagged(client, tag))
    }
}

impl TagService for TagManager {
    fn current_tags(&self, screen: ScreenId) -> Vec<TagId> {
        self.tags
            .iter()
            .enumerate()
            .filter(|(_, t)| t.screen == screen && t.selected)
            .map(|(idx, _)| TagId(idx))
            .collect()
    }

    fn is_client_tagged(&self, client: ClientId, tag: TagId) -> bool {
        self.tags
            .get(tag.0)
            .is_some_and(|t| t.clients.contains(&client))
    }
}
