//! Per block type update handlers.

use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use super::{BlockUpdateError, BlockUpdateScheduler};
use crate::world::{Block, BlockTypeId, BlockTypeLookup, BlockWorld};

/// Logic run when a block of a registered type is due for an update.
#[async_trait]
pub trait BlockUpdateHandler: Send + Sync {
    /// Re-evaluates `block` for the update scheduled at `scheduled_tick`.
    ///
    /// The handler may read and write the world and queue further updates through
    /// `scheduler`. Returns `true` if the observable state at `block.pos` changed.
    async fn on_block_update(
        &self,
        scheduler: &BlockUpdateScheduler,
        world: &Arc<dyn BlockWorld>,
        block: &Block,
        scheduled_tick: u64,
    ) -> anyhow::Result<bool>;
}

/// Maps block types to their update handler. The last registration wins.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: FxHashMap<BlockTypeId, Arc<dyn BlockUpdateHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `name` through `lookup` and stores `handler` under its id,
    /// replacing any previous handler for that type.
    pub fn register(
        &mut self,
        lookup: &dyn BlockTypeLookup,
        name: &str,
        handler: Arc<dyn BlockUpdateHandler>,
    ) -> Result<BlockTypeId, BlockUpdateError> {
        let type_id = lookup
            .type_id_by_name(name)
            .ok_or_else(|| BlockUpdateError::UnknownBlockType(name.to_owned()))?;

        if self.handlers.insert(type_id, handler).is_some() {
            log::debug!("Replaced block update handler for {name} ({type_id:?})");
        }
        Ok(type_id)
    }

    /// Returns the handler for `block_type`, if any.
    #[must_use]
    pub fn get(&self, block_type: BlockTypeId) -> Option<Arc<dyn BlockUpdateHandler>> {
        self.handlers.get(&block_type).cloned()
    }

    /// Number of block types with a handler.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Names;

    impl BlockTypeLookup for Names {
        fn type_id_by_name(&self, name: &str) -> Option<BlockTypeId> {
            match name {
                "minecraft:stone" => Some(BlockTypeId(1)),
                "minecraft:redstone_wire" => Some(BlockTypeId(55)),
                _ => None,
            }
        }
    }

    struct Fixed(bool);

    #[async_trait]
    impl BlockUpdateHandler for Fixed {
        async fn on_block_update(
            &self,
            _scheduler: &BlockUpdateScheduler,
            _world: &Arc<dyn BlockWorld>,
            _block: &Block,
            _scheduled_tick: u64,
        ) -> anyhow::Result<bool> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let mut registry = HandlerRegistry::new();
        let err = registry
            .register(&Names, "minecraft:not_a_block", Arc::new(Fixed(true)))
            .unwrap_err();
        assert!(matches!(err, BlockUpdateError::UnknownBlockType(name) if name == "minecraft:not_a_block"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = HandlerRegistry::new();
        let first: Arc<dyn BlockUpdateHandler> = Arc::new(Fixed(true));
        let second: Arc<dyn BlockUpdateHandler> = Arc::new(Fixed(false));

        let id = registry
            .register(&Names, "minecraft:redstone_wire", first)
            .unwrap();
        registry
            .register(&Names, "minecraft:redstone_wire", second.clone())
            .unwrap();

        assert_eq!(id, BlockTypeId(55));
        assert_eq!(registry.len(), 1);
        let stored = registry.get(id).unwrap();
        assert!(Arc::ptr_eq(&stored, &second));
        assert!(registry.get(BlockTypeId(1)).is_none());
    }
}
