//! # Steel Core
//!
//! Deferred block updates for the Steel server and the world contracts they run against.

pub mod block_update;
pub mod config;
pub mod world;
