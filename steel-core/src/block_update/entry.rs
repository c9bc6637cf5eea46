//! A single pending block update.

use std::cmp::Ordering;

use steel_utils::BlockPos;

/// One pending unit of work in a world's update queue.
///
/// The scheduled tick is fixed when the update is queued. An update is removed
/// from its queue before it is processed, so it runs at most once.
#[derive(Debug, Clone, Copy)]
pub struct BlockUpdate {
    /// The position to re-evaluate.
    pub pos: BlockPos,
    /// The tick at or after which this update may run.
    pub scheduled_tick: u64,
    /// Whether the neighbors should be notified when nothing changes.
    pub force_notify: bool,
    /// Enqueue order inside the owning queue, used to break ties.
    sequence: u64,
}

impl BlockUpdate {
    pub(super) const fn new(pos: BlockPos, scheduled_tick: u64, force_notify: bool, sequence: u64) -> Self {
        Self {
            pos,
            scheduled_tick,
            force_notify,
            sequence,
        }
    }

    /// Enqueue order of this update within its world.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl PartialEq for BlockUpdate {
    fn eq(&self, other: &Self) -> bool {
        self.scheduled_tick == other.scheduled_tick && self.sequence == other.sequence
    }
}

impl Eq for BlockUpdate {}

impl PartialOrd for BlockUpdate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlockUpdate {
    /// `BinaryHeap` is a max-heap, so the comparison is reversed:
    /// earlier ticks first, then earlier enqueues.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .scheduled_tick
            .cmp(&self.scheduled_tick)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
