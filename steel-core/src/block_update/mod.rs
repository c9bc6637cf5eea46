//! Deferred block updates.
//!
//! Positions are queued for re-evaluation at a future game tick. Every tick the
//! [`BlockUpdateScheduler`] drains the due updates of each world, resolves the
//! block, runs the handler registered for its type and either broadcasts the
//! changed block or propagates the update to the neighbors.
//!
//! # Architecture
//!
//! - [`neighbors`] - Axis neighbor offsets for propagation
//! - [`BlockUpdate`] - A single pending update
//! - [`WorldUpdateQueue`] - Per-world queue ordered by scheduled tick
//! - [`HandlerRegistry`] - Block type to [`BlockUpdateHandler`] mapping
//! - [`BlockUpdateScheduler`] - Owns the queues and dispatches due updates

mod entry;
mod error;
mod handler;
pub mod neighbors;
mod queue;
mod scheduler;

pub use entry::BlockUpdate;
pub use error::{BlockUpdateError, SourceError};
pub use handler::{BlockUpdateHandler, HandlerRegistry};
pub use queue::WorldUpdateQueue;
pub use scheduler::{BlockUpdateScheduler, TickSummary, WorldTickSummary};
