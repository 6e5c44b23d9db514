//! Focus Module
//!
//! Most-recently-used focus history and refocus resolution.
//! When the focused client goes away or a screen's tag selection changes,
//! the history decides which client should get focus next.

use std::collections::HashMap;
use tracing::debug;

use crate::wm::client::{Client, ClientId, ScreenId};
use crate::wm::tag::{TagId, TagService};

type NodeHandle = usize;

/// One client bound into the history
#[derive(Debug, Clone)]
struct FocusNode {
    client: ClientId,
    prev: Option<NodeHandle>,
    next: Option<NodeHandle>,
}

/// Focus history, most recently used first.
///
/// Nodes live in an arena and link to each other by handle. Every indexed
/// node is linked into the sequence exactly once, so a client appears at
/// most once.
#[derive(Debug, Default)]
pub struct FocusHistory {
    nodes: Vec<Option<FocusNode>>,
    free: Vec<NodeHandle>,
    index: HashMap<ClientId, NodeHandle>,
    head: Option<NodeHandle>,
    tail: Option<NodeHandle>,
}

impl FocusHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, client: ClientId) -> bool {
        self.index.contains_key(&client)
    }

    /// Clients from most to least recently used
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            history: self,
            cursor: self.head,
        }
    }

    /// Make `client` the most recently used entry
    pub fn promote_to_front(&mut self, client: ClientId) {
        let handle = self.acquire(client);
        self.link_front(handle);
        debug!("Focus history: {} promoted to front ({} tracked)", client, self.len());
    }

    /// Record `client` as the least recently used entry
    pub fn promote_to_back(&mut self, client: ClientId) {
        let handle = self.acquire(client);
        self.link_back(handle);
        debug!("Focus history: {} appended ({} tracked)", client, self.len());
    }

    /// Forget `client`. Returns false if it was not tracked.
    pub fn remove(&mut self, client: ClientId) -> bool {
        let Some(handle) = self.find_node(client) else {
            return false;
        };
        self.detach(handle);
        self.nodes[handle] = None;
        self.free.push(handle);
        self.index.remove(&client);
        debug!("Focus history: {} removed ({} tracked)", client, self.len());
        true
    }

    fn find_node(&self, client: ClientId) -> Option<NodeHandle> {
        self.index.get(&client).copied()
    }

    /// Reuse the client's node (unlinked) or allocate a fresh one
    fn acquire(&mut self, client: ClientId) -> NodeHandle {
        if let Some(handle) = self.find_node(client) {
            self.detach(handle);
            return handle;
        }

        let node = FocusNode {
            client,
            prev: None,
            next: None,
        };
        let handle = match self.free.pop() {
            Some(handle) => {
                self.nodes[handle] = Some(node);
                handle
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };
        self.index.insert(client, handle);
        handle
    }

    fn node(&self, handle: NodeHandle) -> Option<&FocusNode> {
        self.nodes.get(handle).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut FocusNode> {
        self.nodes.get_mut(handle).and_then(Option::as_mut)
    }

    fn detach(&mut self, handle: NodeHandle) {
        let Some(node) = self.node_mut(handle) else {
            return;
        };
        let prev = node.prev.take();
        let next = node.next.take();

        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }
    }

    fn link_front(&mut self, handle: NodeHandle) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(handle) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|h| self.node_mut(h)) {
            Some(old) => old.prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
    }

    fn link_back(&mut self, handle: NodeHandle) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(handle) {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail.and_then(|t| self.node_mut(t)) {
            Some(old) => old.next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
    }

    /// The `n`th (0-based) client in recency order that is not skipped and
    /// carries at least one of `tags`.
    ///
    /// Clients missing from `clients` never count as candidates.
    pub fn nth_matching_client<T: TagService + ?Sized>(
        &self,
        clients: &HashMap<ClientId, Client>,
        tag_service: &T,
        tags: &[TagId],
        n: usize,
    ) -> Option<ClientId> {
        self.iter()
            .filter(|id| clients.get(id).is_some_and(|c| !c.skip))
            .filter(|&id| tags.iter().any(|&tag| tag_service.is_client_tagged(id, tag)))
            .nth(n)
    }

    /// Most recently used eligible client on `screen`'s selected tags
    pub fn current_client_for_screen<T: TagService + ?Sized>(
        &self,
        clients: &HashMap<ClientId, Client>,
        tag_service: &T,
        screen: ScreenId,
    ) -> Option<ClientId> {
        let tags = tag_service.current_tags(screen);
        self.nth_matching_client(clients, tag_service, &tags, 0)
    }
}

/// Iterator over a [`FocusHistory`], head to tail
pub struct Iter<'a> {
    history: &'a FocusHistory,
    cursor: Option<NodeHandle>,
}

impl Iterator for Iter<'_> {
    type Item = ClientId;

    fn next(&mut self) -> Option<ClientId> {
        let node = self.history.node(self.cursor?)?;
        self.cursor = node.next;
        Some(node.client)
    }
}

impl<'a> IntoIterator for &'a FocusHistory {
    type Item = ClientId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::tag::TagManager;

    const A: ClientId = ClientId(0xa);
    const B: ClientId = ClientId(0xb);
    const C: ClientId = ClientId(0xc);

    fn order(history: &FocusHistory) -> Vec<ClientId> {
        history.iter().collect()
    }

    fn reversed(history: &FocusHistory) -> Vec<ClientId> {
        let mut out = Vec::new();
        let mut cursor = history.tail;
        while let Some(node) = cursor.and_then(|h| history.node(h)) {
            out.push(node.client);
            cursor = node.prev;
        }
        out
    }

    fn clients(ids: &[ClientId]) -> HashMap<ClientId, Client> {
        ids.iter().map(|&id| (id, Client::new(id, 0))).collect()
    }

    fn cba() -> FocusHistory {
        let mut history = FocusHistory::new();
        history.promote_to_front(A);
        history.promote_to_front(B);
        history.promote_to_front(C);
        history
    }

    #[test]
    fn test_recency_ordering() {
        let history = cba();
        assert_eq!(order(&history), vec![C, B, A]);
        assert_eq!(reversed(&history), vec![A, B, C]);
    }

    #[test]
    fn test_append_semantics() {
        let mut history = FocusHistory::new();
        history.promote_to_front(A);
        history.promote_to_back(B);
        assert_eq!(order(&history), vec![A, B]);
    }

    #[test]
    fn test_append_existing_moves_to_tail() {
        let mut history = cba();
        history.promote_to_back(C);
        assert_eq!(order(&history), vec![B, A, C]);
        assert_eq!(reversed(&history), vec![C, A, B]);
    }

    #[test]
    fn test_repromotion_dedups() {
        let mut history = cba();
        history.promote_to_front(A);
        assert_eq!(order(&history), vec![A, C, B]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_uniqueness_over_many_promotions() {
        let mut history = FocusHistory::new();
        for round in 0..50u32 {
            let id = ClientId(round % 4);
            if round % 3 == 0 {
                history.promote_to_back(id);
            } else {
                history.promote_to_front(id);
            }
        }
        let mut seen = order(&history);
        assert_eq!(seen.len(), 4);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 4);
        assert_eq!(history.nodes.len(), 4);
    }

    #[test]
    fn test_idempotent_front() {
        let mut history = cba();
        history.promote_to_front(A);
        let once = order(&history);
        history.promote_to_front(A);
        assert_eq!(order(&history), once);
    }

    #[test]
    fn test_removal() {
        let mut history = cba();
        assert!(history.remove(B));
        assert_eq!(order(&history), vec![C, A]);
        assert_eq!(reversed(&history), vec![A, C]);
        assert!(!history.remove(B));
        assert_eq!(order(&history), vec![C, A]);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let mut history = cba();
        history.remove(C);
        history.remove(A);
        assert_eq!(order(&history), vec![B]);
        history.remove(B);
        assert!(history.is_empty());
        assert_eq!(history.head, None);
        assert_eq!(history.tail, None);
    }

    #[test]
    fn test_freed_slot_is_reused() {
        let mut history = cba();
        history.remove(B);
        history.promote_to_front(ClientId(0xd));
        assert_eq!(history.nodes.len(), 3);
        assert_eq!(order(&history), vec![ClientId(0xd), C, A]);
    }

    #[test]
    fn test_tag_filtering() {
        let history = cba();
        let mut tags = TagManager::new();
        let screen = tags.add_screen();
        let t1 = tags.add_tag(screen, "1", true);
        tags.tag_client(A, t1);
        tags.tag_client(C, t1);
        let clients = clients(&[A, B, C]);

        assert_eq!(history.nth_matching_client(&clients, &tags, &[t1], 0), Some(C));
        assert_eq!(history.nth_matching_client(&clients, &tags, &[t1], 1), Some(A));
        assert_eq!(history.nth_matching_client(&clients, &tags, &[t1], 2), None);
    }

    #[test]
    fn test_match_is_any_tag() {
        let history = cba();
        let mut tags = TagManager::new();
        let screen = tags.add_screen();
        let t1 = tags.add_tag(screen, "1", true);
        let t2 = tags.add_tag(screen, "2", true);
        tags.tag_client(A, t1);
        tags.tag_client(B, t2);
        tags.tag_client(B, t1);
        let clients = clients(&[A, B, C]);

        // B carries both tags but counts once
        assert_eq!(history.nth_matching_client(&clients, &tags, &[t1, t2], 0), Some(B));
        assert_eq!(history.nth_matching_client(&clients, &tags, &[t1, t2], 1), Some(A));
        assert_eq!(history.nth_matching_client(&clients, &tags, &[t1, t2], 2), None);
    }

    #[test]
    fn test_skip_exclusion() {
        let history = cba();
        let mut tags = TagManager::new();
        let screen = tags.add_screen();
        let t1 = tags.add_tag(screen, "1", true);
        for id in [A, B, C] {
            tags.tag_client(id, t1);
        }
        let mut clients = clients(&[A, B, C]);
        clients.insert(C, Client::new(C, 0).with_skip(true));

        assert_eq!(history.nth_matching_client(&clients, &tags, &[t1], 0), Some(B));
        assert_eq!(history.nth_matching_client(&clients, &tags, &[t1], 1), Some(A));
        assert_eq!(history.nth_matching_client(&clients, &tags, &[t1], 2), None);
    }

    #[test]
    fn test_untracked_client_is_not_a_candidate() {
        let history = cba();
        let mut tags = TagManager::new();
        let screen = tags.add_screen();
        let t1 = tags.add_tag(screen, "1", true);
        tags.tag_client(C, t1);
        tags.tag_client(A, t1);
        let clients = clients(&[A, B]);

        assert_eq!(history.current_client_for_screen(&clients, &tags, screen), Some(A));
    }

    #[test]
    fn test_empty_tag_set_matches_nothing() {
        let history = cba();
        let tags = TagManager::new();
        let clients = clients(&[A, B, C]);
        assert_eq!(history.nth_matching_client(&clients, &tags, &[], 0), None);
    }

    #[test]
    fn test_empty_history() {
        let history = FocusHistory::new();
        let mut tags = TagManager::new();
        let screen = tags.add_screen();
        tags.add_tag(screen, "1", true);
        assert_eq!(history.current_client_for_screen(&HashMap::new(), &tags, screen), None);
    }

    #[test]
    fn test_current_client_uses_selected_tags() {
        let mut history = cba();
        let mut tags = TagManager::new();
        let screen = tags.add_screen();
        let web = tags.add_tag(screen, "web", true);
        let code = tags.add_tag(screen, "code", false);
        tags.tag_client(A, web);
        tags.tag_client(C, code);
        let clients = clients(&[A, B, C]);

        assert_eq!(history.current_client_for_screen(&clients, &tags, screen), Some(A));
        tags.view_only(code);
        assert_eq!(history.current_client_for_screen(&clients, &tags, screen), Some(C));

        history.promote_to_front(A);
        tags.toggle_view(web);
        assert_eq!(history.current_client_for_screen(&clients, &tags, screen), Some(A));
    }
}
