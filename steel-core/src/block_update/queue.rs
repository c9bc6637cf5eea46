//! Per-world queue of pending block updates.

use std::collections::BinaryHeap;

use steel_utils::BlockPos;

use super::BlockUpdate;

/// Pending block updates of a single world.
///
/// Pops in non-decreasing scheduled tick order; updates sharing a tick come out
/// in the order they were pushed. Duplicates are kept as independent entries.
#[derive(Debug, Default)]
pub struct WorldUpdateQueue {
    pending: BinaryHeap<BlockUpdate>,
    next_sequence: u64,
}

impl WorldUpdateQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an update for `pos` at `scheduled_tick`.
    pub fn push(&mut self, pos: BlockPos, scheduled_tick: u64, force_notify: bool) {
        let update = BlockUpdate::new(pos, scheduled_tick, force_notify, self.next_sequence);
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.pending.push(update);
    }

    /// Queues one update per position, all sharing the same tick and flag.
    pub fn extend<I>(&mut self, positions: I, scheduled_tick: u64, force_notify: bool)
    where
        I: IntoIterator<Item = BlockPos>,
    {
        for pos in positions {
            self.push(pos, scheduled_tick, force_notify);
        }
    }

    /// Returns the next update in pop order without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&BlockUpdate> {
        self.pending.peek()
    }

    /// Removes and returns the next update if it is due at `current_tick`.
    ///
    /// Returns `None` when the queue is empty or the earliest update lies in the future.
    pub fn pop_due(&mut self, current_tick: u64) -> Option<BlockUpdate> {
        if self.pending.peek()?.scheduled_tick > current_tick {
            return None;
        }
        self.pending.pop()
    }

    /// Number of pending updates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_respects_tick() {
        let mut queue = WorldUpdateQueue::new();
        let pos1 = BlockPos::new(0, 0, 0);
        let pos2 = BlockPos::new(1, 0, 0);

        queue.push(pos1, 110, false);
        queue.push(pos2, 105, false);

        assert!(queue.pop_due(104).is_none());
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop_due(105).map(|u| u.pos), Some(pos2));
        assert!(queue.pop_due(109).is_none());
        assert_eq!(queue.pop_due(200).map(|u| u.pos), Some(pos1));
        assert!(queue.is_empty());
        assert!(queue.pop_due(u64::MAX).is_none());
    }

    #[test]
    fn test_pop_order_is_tick_then_fifo() {
        let mut queue = WorldUpdateQueue::new();
        let ticks = [7, 3, 7, 1, 3, 9, 1, 7];
        for (x, tick) in ticks.iter().enumerate() {
            queue.push(BlockPos::new(x as i32, 0, 0), *tick, false);
        }

        let mut popped = Vec::new();
        while let Some(update) = queue.pop_due(8) {
            popped.push((update.scheduled_tick, update.pos.x()));
        }

        assert_eq!(
            popped,
            vec![(1, 3), (1, 6), (3, 1), (3, 4), (7, 0), (7, 2), (7, 7)]
        );
        // Tick 9 is still in the future
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek().map(|u| u.scheduled_tick), Some(9));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut queue = WorldUpdateQueue::new();
        let pos = BlockPos::new(4, 4, 4);
        queue.push(pos, 5, true);
        queue.push(pos, 5, true);

        assert_eq!(queue.len(), 2);
        assert!(queue.pop_due(5).is_some());
        assert!(queue.pop_due(5).is_some());
        assert!(queue.is_empty());
    }
}
