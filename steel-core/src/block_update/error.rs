//! Errors of the block update system.

use std::error::Error;

use steel_utils::BlockPos;
use thiserror::Error;

use crate::world::WorldId;

/// Boxed error coming out of a collaborator (world or handler).
pub type SourceError = Box<dyn Error + Send + Sync + 'static>;

/// Errors reported by the block update scheduler.
#[derive(Debug, Error)]
pub enum BlockUpdateError {
    /// A handler was registered for a block name the registry doesn't know.
    #[error("unknown block type `{0}`")]
    UnknownBlockType(String),
    /// The world couldn't resolve the block of a due update.
    #[error("failed to resolve block at {pos} in world {world} (tick {tick})")]
    BlockResolution {
        /// World of the update.
        world: WorldId,
        /// Position of the update.
        pos: BlockPos,
        /// Scheduled tick of the update.
        tick: u64,
        /// The world's error.
        #[source]
        source: SourceError,
    },
    /// A block update handler returned an error.
    #[error("block update handler failed at {pos} in world {world} (tick {tick})")]
    Handler {
        /// World of the update.
        world: WorldId,
        /// Position of the update.
        pos: BlockPos,
        /// Scheduled tick of the update.
        tick: u64,
        /// The handler's error.
        #[source]
        source: SourceError,
    },
    /// A block update handler panicked.
    #[error("block update handler panicked at {pos} in world {world} (tick {tick})")]
    HandlerPanicked {
        /// World of the update.
        world: WorldId,
        /// Position of the update.
        pos: BlockPos,
        /// Scheduled tick of the update.
        tick: u64,
    },
}
