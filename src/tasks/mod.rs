//! Background Tasks Module
//!
//! Contains the recurring work a cache instance owns.
//!
//! # Tasks
//! - TTL Cleanup: removes expired cache entries at configured intervals

mod cleanup;

pub(crate) use cleanup::spawn_cleanup_task;
