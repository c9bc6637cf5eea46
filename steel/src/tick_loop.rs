//! Fixed rate game tick source.

use std::sync::Arc;
use std::time::Duration;

use steel_core::block_update::BlockUpdateScheduler;
use tokio::{
    select,
    time::{Instant, MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;

/// Vanilla tick rate.
pub const TICKS_PER_SECOND: u32 = 20;

/// Drives a [`BlockUpdateScheduler`] once per server frame.
///
/// Each frame advances the logical tick counter by one and awaits the
/// scheduler before the next frame starts, so ticks never overlap.
pub struct TickLoop {
    scheduler: Arc<BlockUpdateScheduler>,
    period: Duration,
    current_tick: u64,
    cancel_token: CancellationToken,
}

impl TickLoop {
    /// Creates a loop running at [`TICKS_PER_SECOND`], starting after tick 0.
    #[must_use]
    pub fn new(scheduler: Arc<BlockUpdateScheduler>, cancel_token: CancellationToken) -> Self {
        Self {
            scheduler,
            period: Duration::from_secs(1) / TICKS_PER_SECOND,
            current_tick: 0,
            cancel_token,
        }
    }

    /// Sets the frame period.
    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Sets the tick the counter continues from.
    #[must_use]
    pub fn starting_at(mut self, tick: u64) -> Self {
        self.current_tick = tick;
        self
    }

    /// The last tick that was emitted.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Runs until the cancellation token fires and returns the last emitted tick.
    pub async fn run(mut self) -> u64 {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval completes immediately.
        ticker.tick().await;
        let mut last_frame = Instant::now();

        loop {
            select! {
                biased;
                () = self.cancel_token.cancelled() => break,
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let tick_time = now - last_frame;
                    last_frame = now;
                    self.current_tick += 1;

                    let summary = self.scheduler.on_tick(tick_time, self.current_tick).await;
                    let took = now.elapsed();
                    if took > self.period {
                        tracing::warn!(
                            tick = self.current_tick,
                            took_ms = took.as_millis(),
                            processed = summary.processed(),
                            "Block updates overran the tick"
                        );
                    }
                }
            }
        }

        tracing::debug!(tick = self.current_tick, "Tick loop stopped");
        self.current_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use steel_core::block_update::BlockUpdateHandler;
    use steel_core::config::BlockUpdateConfig;
    use steel_core::world::{
        Block, BlockChangeSink, BlockTypeId, BlockTypeLookup, BlockWorld, WorldId,
    };
    use steel_utils::{BlockPos, BlockStateId};

    struct OneType;

    impl BlockTypeLookup for OneType {
        fn type_id_by_name(&self, _name: &str) -> Option<BlockTypeId> {
            Some(BlockTypeId(1))
        }
    }

    struct NoPlayers;

    impl BlockChangeSink for NoPlayers {
        fn broadcast_block_change(&self, _world: WorldId, _block: &Block) {}
    }

    struct Flat(WorldId);

    #[async_trait]
    impl BlockWorld for Flat {
        fn id(&self) -> WorldId {
            self.0
        }

        async fn get_block(&self, pos: BlockPos) -> anyhow::Result<Block> {
            Ok(Block {
                pos,
                block_type: BlockTypeId(1),
                state: BlockStateId(0),
            })
        }
    }

    #[derive(Default)]
    struct TickLog(Mutex<Vec<u64>>);

    #[async_trait]
    impl BlockUpdateHandler for TickLog {
        async fn on_block_update(
            &self,
            _scheduler: &BlockUpdateScheduler,
            _world: &Arc<dyn BlockWorld>,
            _block: &Block,
            scheduled_tick: u64,
        ) -> anyhow::Result<bool> {
            self.0.lock().push(scheduled_tick);
            Ok(false)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_drives_scheduler() {
        let scheduler = Arc::new(BlockUpdateScheduler::new(
            &BlockUpdateConfig::default(),
            Arc::new(OneType),
            Arc::new(NoPlayers),
        ));
        let log = Arc::new(TickLog::default());
        scheduler.on_block_update("minecraft:stone", log.clone()).unwrap();

        let world: Arc<dyn BlockWorld> = Arc::new(Flat(WorldId::random()));
        scheduler.schedule_update(&world, BlockPos::ORIGIN, 3, false);
        scheduler.schedule_update(&world, BlockPos::ORIGIN, 1_000, false);

        let cancel_token = CancellationToken::new();
        let tick_loop = TickLoop::new(scheduler.clone(), cancel_token.clone());
        let handle = tokio::spawn(tick_loop.run());

        // 10 frames at 50ms
        tokio::time::sleep(Duration::from_millis(525)).await;
        cancel_token.cancel();
        let last_tick = handle.await.unwrap();

        assert_eq!(last_tick, 10);
        assert_eq!(log.0.lock().as_slice(), &[3]);
        assert_eq!(scheduler.total_pending(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_start_and_period() {
        let scheduler = Arc::new(BlockUpdateScheduler::new(
            &BlockUpdateConfig::default(),
            Arc::new(OneType),
            Arc::new(NoPlayers),
        ));
        let cancel_token = CancellationToken::new();
        let tick_loop = TickLoop::new(scheduler, cancel_token.clone())
            .with_period(Duration::from_millis(10))
            .starting_at(100);
        assert_eq!(tick_loop.current_tick(), 100);

        let handle = tokio::spawn(tick_loop.run());
        tokio::time::sleep(Duration::from_millis(35)).await;
        cancel_token.cancel();

        assert_eq!(handle.await.unwrap(), 103);
    }
}
