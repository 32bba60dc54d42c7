//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the stores.
//!
//! # Tasks
//! - Expiration sweep: removes expired entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
