//! Contracts the block update system consumes from the rest of the server.
//!
//! The scheduler never owns worlds, registries or connections; it talks to them
//! through these traits so the host can plug in its own implementations.

use std::fmt::{self, Display};

use async_trait::async_trait;
use steel_utils::{BlockPos, BlockStateId};
use uuid::Uuid;

/// Stable identity of a world, used to partition pending updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldId(pub Uuid);

impl WorldId {
    /// Creates a fresh random world id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Numeric id of a block type, as handed out by the block registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockTypeId(pub u32);

/// A resolved block: its position, type and current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Where the block was resolved.
    pub pos: BlockPos,
    /// The block's type.
    pub block_type: BlockTypeId,
    /// The block's current state (properties / metadata).
    pub state: BlockStateId,
}

/// A world the scheduler can resolve blocks in.
#[async_trait]
pub trait BlockWorld: Send + Sync {
    /// The identity of this world.
    fn id(&self) -> WorldId;

    /// Resolves the block at `pos`.
    ///
    /// May suspend while the chunk holding `pos` is read.
    async fn get_block(&self, pos: BlockPos) -> anyhow::Result<Block>;
}

/// Name to id lookup for block types.
pub trait BlockTypeLookup: Send + Sync {
    /// Returns the id of the block type called `name`, if it exists.
    fn type_id_by_name(&self, name: &str) -> Option<BlockTypeId>;
}

/// Receives block changes that must reach the players of a world.
pub trait BlockChangeSink: Send + Sync {
    /// Sends `block` to every player currently in `world`.
    fn broadcast_block_change(&self, world: WorldId, block: &Block);
}
