//! Manual play queue
//!
//! User-ordered track ids that take precedence over the album/playlist pool.
//!
//! ```text
//! Currently Playing: Track A
//! ─────────────────────────────
//! Queue (play next, in order):
//!   - Track B
//!   - Track C
//! ─────────────────────────────
//! Pool (albums / playlist / shuffle):
//!   - ...
//! ```

use tempo_core::TrackId;

/// Explicit "play next" queue
///
/// A track id appears at most once; queueing it again moves it.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    ids: Vec<TrackId>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track at the end of the queue
    pub fn append(&mut self, id: TrackId) {
        self.remove(id);
        self.ids.push(id);
    }

    /// Insert a track at `position`, clamped to the queue length
    pub fn insert(&mut self, id: TrackId, position: usize) {
        self.remove(id);
        let position = position.min(self.ids.len());
        self.ids.insert(position, id);
    }

    /// Remove a track, returning whether it was queued
    pub fn remove(&mut self, id: TrackId) -> bool {
        if let Some(index) = self.ids.iter().position(|&queued| queued == id) {
            self.ids.remove(index);
            true
        } else {
            false
        }
    }

    /// Move the track at `from` to `to`
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), String> {
        if from >= self.ids.len() || to >= self.ids.len() {
            return Err(format!(
                "Index out of bounds: {} -> {} (queue has {} tracks)",
                from,
                to,
                self.ids.len()
            ));
        }
        let id = self.ids.remove(from);
        self.ids.insert(to, id);
        Ok(())
    }

    /// Next queued track without removing it
    pub fn front(&self) -> Option<TrackId> {
        self.ids.first().copied()
    }

    /// Remove and return the next queued track
    pub fn pop_front(&mut self) -> Option<TrackId> {
        if self.ids.is_empty() {
            None
        } else {
            Some(self.ids.remove(0))
        }
    }

    /// True if the track is queued
    pub fn contains(&self, id: TrackId) -> bool {
        self.ids.contains(&id)
    }

    /// Queued ids in play order
    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    /// Number of queued tracks
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_order() {
        let mut queue = Queue::new();
        queue.append(3);
        queue.append(1);
        queue.append(2);
        assert_eq!(queue.ids(), &[3, 1, 2]);
        assert_eq!(queue.front(), Some(3));
    }

    #[test]
    fn requeue_moves_instead_of_duplicating() {
        let mut queue = Queue::new();
        queue.append(1);
        queue.append(2);
        queue.append(1);
        assert_eq!(queue.ids(), &[2, 1]);
    }

    #[test]
    fn insert_clamps_position() {
        let mut queue = Queue::new();
        queue.append(1);
        queue.insert(5, 0);
        queue.insert(9, 100);
        assert_eq!(queue.ids(), &[5, 1, 9]);
    }

    #[test]
    fn pop_front_consumes() {
        let mut queue = Queue::new();
        queue.append(1);
        queue.append(2);
        assert_eq!(queue.pop_front(), Some(1));
        assert_eq!(queue.pop_front(), Some(2));
        assert_eq!(queue.pop_front(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn reorder_within_bounds() {
        let mut queue = Queue::new();
        for id in 1..=4 {
            queue.append(id);
        }
        queue.reorder(0, 3).unwrap();
        assert_eq!(queue.ids(), &[2, 3, 4, 1]);
        assert!(queue.reorder(0, 4).is_err());
    }

    #[test]
    fn remove_reports_presence() {
        let mut queue = Queue::new();
        queue.append(7);
        assert!(queue.remove(7));
        assert!(!queue.remove(7));
        assert!(!queue.contains(7));
    }
}
