//! Shuffle navigation history
//!
//! A doubly-linked list of visited tracks with a movable cursor. Nodes live
//! in an arena owned by the list and link to each other by index, so the
//! back and forward links never own anything and cannot form reference
//! cycles.

use tempo_core::Track;

/// Handle to a node in a [`History`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    track: Track,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Session log of played tracks with back/forward navigation
///
/// Moving the cursor never drops nodes: going back and then forward again
/// lands on the same node. Only [`History::prepend_current`] changes the
/// shape of the list, and only at the cursor.
#[derive(Debug, Clone, Default)]
pub struct History {
    nodes: Vec<Node>,
    cursor: Option<NodeId>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// True if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.cursor.is_none()
    }

    /// Cursor node, if any
    pub fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.cursor.map(|id| &self.node(id).track)
    }

    /// True if a forward neighbor exists from the cursor
    pub fn has_next(&self) -> bool {
        self.next_id().is_some()
    }

    /// True if a backward neighbor exists from the cursor
    pub fn has_prev(&self) -> bool {
        self.prev_id().is_some()
    }

    /// Forward neighbor's track, without moving
    pub fn peek_next(&self) -> Option<&Track> {
        self.next_id().map(|id| &self.node(id).track)
    }

    /// Backward neighbor's track, without moving
    pub fn peek_prev(&self) -> Option<&Track> {
        self.prev_id().map(|id| &self.node(id).track)
    }

    /// Move the cursor forward and return the new current track
    ///
    /// Returns `None` and leaves the cursor in place when there is no
    /// forward neighbor.
    pub fn next(&mut self) -> Option<&Track> {
        let id = self.next_id()?;
        self.cursor = Some(id);
        Some(&self.node(id).track)
    }

    /// Move the cursor backward and return the new current track
    ///
    /// Returns `None` and leaves the cursor in place when there is no
    /// backward neighbor.
    pub fn prev(&mut self) -> Option<&Track> {
        let id = self.prev_id()?;
        self.cursor = Some(id);
        Some(&self.node(id).track)
    }

    /// Link `track` onto the cursor and make it the new cursor
    ///
    /// The old cursor becomes the predecessor of the new node. Whatever was
    /// ahead of the old cursor is detached: the new node starts a fresh
    /// timeline with no forward neighbor. On an empty list the track becomes
    /// the sole node.
    ///
    /// Detached nodes are dropped and the remaining timeline is renumbered,
    /// so the arena never holds more than the reachable timeline. Any
    /// [`NodeId`] obtained before a detaching call is invalid afterwards.
    pub fn prepend_current(&mut self, track: Track) -> NodeId {
        if self.next_id().is_some() {
            self.detach_forward();
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            track,
            prev: self.cursor,
            next: None,
        });
        if let Some(old) = self.cursor {
            self.nodes[old.0].next = Some(id);
        }
        self.cursor = Some(id);
        id
    }

    /// Tracks on the cursor's timeline, oldest first
    pub fn timeline(&self) -> Vec<&Track> {
        let Some(mut id) = self.cursor else {
            return Vec::new();
        };
        while let Some(prev) = self.node(id).prev {
            id = prev;
        }
        let mut tracks = vec![&self.node(id).track];
        while let Some(next) = self.node(id).next {
            id = next;
            tracks.push(&self.node(id).track);
        }
        tracks
    }

    /// Number of nodes held in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.cursor = None;
    }

    /// Cut the timeline after the cursor and compact the arena
    fn detach_forward(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        self.nodes[cursor.0].next = None;

        let mut head = cursor;
        while let Some(prev) = self.node(head).prev {
            head = prev;
        }
        let mut order = vec![head];
        let mut id = head;
        while let Some(next) = self.node(id).next {
            id = next;
            order.push(id);
        }

        let mut slots: Vec<Option<Node>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();
        let last = order.len() - 1;
        self.nodes = order
            .iter()
            .enumerate()
            .filter_map(|(i, old)| {
                slots[old.0].take().map(|node| Node {
                    track: node.track,
                    prev: i.checked_sub(1).map(NodeId),
                    next: (i < last).then_some(NodeId(i + 1)),
                })
            })
            .collect();
        self.cursor = Some(NodeId(last));
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn next_id(&self) -> Option<NodeId> {
        self.cursor.and_then(|id| self.node(id).next)
    }

    fn prev_id(&self) -> Option<NodeId> {
        self.cursor.and_then(|id| self.node(id).prev)
    }
}
