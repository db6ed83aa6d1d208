//! Parallel execution support.
//!
//! This module contains the work partitioner, the per-worker slot storage
//! and the two execution strategies used by histogram-based metrics.

pub mod partition;
pub mod storage;
pub mod strategy;

pub use partition::{number_of_pieces, split_extent};
pub use storage::{WorkerSlot, WorkerStorage};
pub use strategy::{ExecutionStrategy, WorkPiece};
