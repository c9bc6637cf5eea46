//! World-level block update scheduler.

use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use steel_utils::{BlockPos, math::Vector3};
use tokio::sync::Mutex as AsyncMutex;

use super::neighbors::{NEIGHBOR_COUNT, directional_neighbors, neighbors};
use super::{BlockUpdate, BlockUpdateError, BlockUpdateHandler, HandlerRegistry, WorldUpdateQueue};
use crate::config::BlockUpdateConfig;
use crate::world::{Block, BlockChangeSink, BlockTypeLookup, BlockWorld, WorldId};

/// Queue and world handle of one world.
struct WorldSlot {
    world: Arc<dyn BlockWorld>,
    queue: Mutex<WorldUpdateQueue>,
    /// Held for the whole drain so overlapping ticks can't interleave on one world.
    drain_guard: AsyncMutex<()>,
}

impl WorldSlot {
    fn new(world: Arc<dyn BlockWorld>) -> Self {
        Self {
            world,
            queue: Mutex::new(WorldUpdateQueue::new()),
            drain_guard: AsyncMutex::new(()),
        }
    }

    fn pop_due(&self, current_tick: u64) -> Option<BlockUpdate> {
        self.queue.lock().pop_due(current_tick)
    }

    fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

/// What happened to a single drained update.
enum UpdateOutcome {
    /// The handler changed the block and the new state was broadcast.
    Changed,
    /// Nothing changed and the neighbors were queued.
    Propagated(usize),
    /// Nothing changed and nothing was queued.
    Unchanged,
}

/// Result of draining one world during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldTickSummary {
    /// The drained world.
    pub world: WorldId,
    /// Updates removed from the queue this tick, failed ones included.
    pub processed: usize,
    /// Updates still queued after the drain.
    pub remaining: usize,
    /// Block changes sent to players.
    pub broadcasts: usize,
    /// Neighbor updates queued by propagation.
    pub propagated: usize,
    /// Updates dropped because resolution or the handler failed.
    pub failed: usize,
}

impl WorldTickSummary {
    const fn empty(world: WorldId) -> Self {
        Self {
            world,
            processed: 0,
            remaining: 0,
            broadcasts: 0,
            propagated: 0,
            failed: 0,
        }
    }
}

/// Result of one [`BlockUpdateScheduler::on_tick`] call.
#[derive(Debug, Clone, Default)]
pub struct TickSummary {
    /// The tick that was processed.
    pub current_tick: u64,
    /// One entry per known world.
    pub worlds: Vec<WorldTickSummary>,
}

impl TickSummary {
    /// Summary of `world`, if it was drained.
    #[must_use]
    pub fn world(&self, world: WorldId) -> Option<&WorldTickSummary> {
        self.worlds.iter().find(|summary| summary.world == world)
    }

    /// Updates processed across all worlds.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.worlds.iter().map(|w| w.processed).sum()
    }

    /// Updates left queued across all worlds.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.worlds.iter().map(|w| w.remaining).sum()
    }
}

/// Owns the pending block updates of every world and dispatches them to handlers.
///
/// Queues are created lazily the first time a world is referenced and live as
/// long as the scheduler. Enqueueing is allowed at any time, including from a
/// handler while a drain is in progress.
pub struct BlockUpdateScheduler {
    worlds: RwLock<FxHashMap<WorldId, Arc<WorldSlot>>>,
    handlers: RwLock<HandlerRegistry>,
    block_types: Arc<dyn BlockTypeLookup>,
    sink: Arc<dyn BlockChangeSink>,
    max_updates_per_tick: AtomicUsize,
}

impl BlockUpdateScheduler {
    /// Creates a scheduler without any world or handler.
    ///
    /// A cap of 0 in `config` is raised to 1 so every tick makes progress.
    #[must_use]
    pub fn new(
        config: &BlockUpdateConfig,
        block_types: Arc<dyn BlockTypeLookup>,
        sink: Arc<dyn BlockChangeSink>,
    ) -> Self {
        Self {
            worlds: RwLock::new(FxHashMap::default()),
            handlers: RwLock::new(HandlerRegistry::new()),
            block_types,
            sink,
            max_updates_per_tick: AtomicUsize::new(config.max_updates_per_tick.max(1)),
        }
    }

    /// Maximum number of updates drained per world per tick.
    #[must_use]
    pub fn max_updates_per_tick(&self) -> usize {
        self.max_updates_per_tick.load(Ordering::Relaxed)
    }

    /// Overrides the per-world cap. Takes effect from the next drain on.
    pub fn set_max_updates_per_tick(&self, max: NonZeroUsize) {
        self.max_updates_per_tick.store(max.get(), Ordering::Relaxed);
    }

    /// Registers `handler` for the block type called `name`.
    ///
    /// A later registration for the same type replaces this one.
    pub fn on_block_update(
        &self,
        name: &str,
        handler: Arc<dyn BlockUpdateHandler>,
    ) -> Result<(), BlockUpdateError> {
        let type_id = self
            .handlers
            .write()
            .register(self.block_types.as_ref(), name, handler)?;
        log::debug!("Registered block update handler for {name} ({type_id:?})");
        Ok(())
    }

    fn slot(&self, world: &Arc<dyn BlockWorld>) -> Arc<WorldSlot> {
        let id = world.id();
        if let Some(slot) = self.worlds.read().get(&id) {
            return slot.clone();
        }
        self.worlds
            .write()
            .entry(id)
            .or_insert_with(|| {
                log::debug!("Created block update queue for world {id}");
                Arc::new(WorldSlot::new(world.clone()))
            })
            .clone()
    }

    /// Queues an update for `pos` at `tick`.
    pub fn schedule_update(
        &self,
        world: &Arc<dyn BlockWorld>,
        pos: BlockPos,
        tick: u64,
        force_notify: bool,
    ) {
        self.slot(world).queue.lock().push(pos, tick, force_notify);
        log::trace!("Scheduled block update at {pos} for tick {tick}");
    }

    /// Queues an update for each of the six axis neighbors of `pos`.
    pub fn notify_neighbors_of_state_change(
        &self,
        world: &Arc<dyn BlockWorld>,
        pos: BlockPos,
        tick: u64,
        force_notify: bool,
    ) {
        self.slot(world)
            .queue
            .lock()
            .extend(neighbors(pos), tick, force_notify);
        log::trace!("Scheduled neighbor updates around {pos} for tick {tick}");
    }

    /// Queues updates for `pos + direction` and its neighbors orthogonal to
    /// `direction`.
    pub fn notify_neighbors_of_state_change_directional(
        &self,
        world: &Arc<dyn BlockWorld>,
        pos: BlockPos,
        direction: Vector3<i32>,
        tick: u64,
        force_notify: bool,
    ) {
        let center = pos.plus(direction);
        self.slot(world)
            .queue
            .lock()
            .extend(directional_neighbors(center, direction), tick, force_notify);
        log::trace!("Scheduled directional updates around {center} for tick {tick}");
    }

    /// Number of pending updates in `world`.
    #[must_use]
    pub fn pending_count(&self, world: WorldId) -> usize {
        self.worlds.read().get(&world).map_or(0, |slot| slot.pending())
    }

    /// Number of pending updates across all worlds.
    #[must_use]
    pub fn total_pending(&self) -> usize {
        self.worlds.read().values().map(|slot| slot.pending()).sum()
    }

    /// Number of worlds that have a queue.
    #[must_use]
    pub fn world_count(&self) -> usize {
        self.worlds.read().len()
    }

    /// Scheduled tick of the next update `world` would process.
    #[must_use]
    pub fn peek_next_tick(&self, world: WorldId) -> Option<u64> {
        self.worlds
            .read()
            .get(&world)
            .and_then(|slot| slot.queue.lock().peek().map(|u| u.scheduled_tick))
    }

    /// Processes due updates of every world. Called once per server tick.
    ///
    /// At most [`Self::max_updates_per_tick`] updates are taken from each world;
    /// the rest stays queued for later ticks. Updates whose scheduled tick lies
    /// after `current_tick` are never processed.
    pub async fn on_tick(&self, tick_time: Duration, current_tick: u64) -> TickSummary {
        log::trace!("Block update tick {current_tick} ({tick_time:?} since last)");

        let slots: Vec<Arc<WorldSlot>> = self.worlds.read().values().cloned().collect();
        let mut summary = TickSummary {
            current_tick,
            worlds: Vec::with_capacity(slots.len()),
        };

        for slot in slots {
            summary.worlds.push(self.drain_world(&slot, current_tick).await);
        }
        summary
    }

    async fn drain_world(&self, slot: &WorldSlot, current_tick: u64) -> WorldTickSummary {
        let _guard = slot.drain_guard.lock().await;
        let max_updates = self.max_updates_per_tick();
        let mut summary = WorldTickSummary::empty(slot.world.id());

        while summary.processed < max_updates {
            let Some(update) = slot.pop_due(current_tick) else {
                break;
            };
            summary.processed += 1;

            match self.apply(&slot.world, &update).await {
                Ok(UpdateOutcome::Changed) => summary.broadcasts += 1,
                Ok(UpdateOutcome::Propagated(count)) => summary.propagated += count,
                Ok(UpdateOutcome::Unchanged) => {}
                Err(err) => {
                    summary.failed += 1;
                    log::warn!("Dropped block update: {err}");
                }
            }
        }

        summary.remaining = slot.pending();
        if summary.processed > 0 {
            log::info!(
                "[Block Update] Made {} updates, {} remaining in world {}",
                summary.processed,
                summary.remaining,
                summary.world
            );
        }
        summary
    }

    async fn apply(
        &self,
        world: &Arc<dyn BlockWorld>,
        update: &BlockUpdate,
    ) -> Result<UpdateOutcome, BlockUpdateError> {
        let block = self.resolve(world, update).await?;
        let handler = self.handlers.read().get(block.block_type);

        let changed = match handler {
            Some(handler) => self.invoke(handler, world, &block, update).await?,
            None => false,
        };

        if changed {
            let block = self.resolve(world, update).await?;
            self.sink.broadcast_block_change(world.id(), &block);
            return Ok(UpdateOutcome::Changed);
        }

        if update.force_notify {
            // Force only reaches one level: the neighbors are queued without it.
            self.notify_neighbors_of_state_change(world, update.pos, update.scheduled_tick, false);
            return Ok(UpdateOutcome::Propagated(NEIGHBOR_COUNT));
        }

        Ok(UpdateOutcome::Unchanged)
    }

    async fn resolve(
        &self,
        world: &Arc<dyn BlockWorld>,
        update: &BlockUpdate,
    ) -> Result<Block, BlockUpdateError> {
        let mut block = world
            .get_block(update.pos)
            .await
            .map_err(|source| BlockUpdateError::BlockResolution {
                world: world.id(),
                pos: update.pos,
                tick: update.scheduled_tick,
                source: source.into(),
            })?;
        block.pos = update.pos;
        Ok(block)
    }

    async fn invoke(
        &self,
        handler: Arc<dyn BlockUpdateHandler>,
        world: &Arc<dyn BlockWorld>,
        block: &Block,
        update: &BlockUpdate,
    ) -> Result<bool, BlockUpdateError> {
        let result = AssertUnwindSafe(handler.on_block_update(
            self,
            world,
            block,
            update.scheduled_tick,
        ))
        .catch_unwind()
        .await;

        match result {
            Ok(Ok(changed)) => Ok(changed),
            Ok(Err(source)) => Err(BlockUpdateError::Handler {
                world: world.id(),
                pos: update.pos,
                tick: update.scheduled_tick,
                source: source.into(),
            }),
            Err(_) => Err(BlockUpdateError::HandlerPanicked {
                world: world.id(),
                pos: update.pos,
                tick: update.scheduled_tick,
            }),
        }
    }
}
