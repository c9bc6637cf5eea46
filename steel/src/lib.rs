//! # Steel
//!
//! Host glue for the Steel block update system: logging and the game tick source.
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata
)]
use std::path::Path;

use steel_core::config::{BlockUpdateConfig, ConfigError};

pub mod logger;
pub mod tick_loop;

pub use tick_loop::{TICKS_PER_SECOND, TickLoop};

/// Where the block update config lives, relative to the working directory.
pub const CONFIG_PATH: &str = "config/block_updates.json5";

/// Loads the block update config from [`CONFIG_PATH`], creating it on first start.
pub fn load_config() -> Result<BlockUpdateConfig, ConfigError> {
    load_config_in(Path::new("."))
}

/// Loads the block update config from [`CONFIG_PATH`] below `root`.
pub fn load_config_in(root: &Path) -> Result<BlockUpdateConfig, ConfigError> {
    BlockUpdateConfig::load_or_create(&root.join(CONFIG_PATH))
}
