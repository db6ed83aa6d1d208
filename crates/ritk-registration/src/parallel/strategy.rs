//! Execution strategies for per-worker accumulation.
//!
//! Both strategies split the active extent with [`split_extent`], hand each
//! non-empty piece to the same work routine together with the worker's own
//! slot, and run the finalizer exactly once after every piece has completed.

use std::panic;
use std::thread;

use rayon::prelude::*;
use ritk_core::image::Extent;
use serde::{Deserialize, Serialize};

use super::partition::{number_of_pieces, split_extent};
use super::storage::{WorkerSlot, WorkerStorage};
use crate::error::{RegistrationError, Result};

/// How pieces of a run are scheduled onto threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// One dedicated thread per worker, each deriving its piece from its
    /// thread index; the caller joins all threads before finalizing.
    #[default]
    FixedThreads,
    /// Pieces are scheduled on the rayon pool; slots are task-local
    /// accumulators created on first use.
    DynamicTasks,
}

/// Piece handed to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkPiece {
    /// Thread index (fixed threads) or piece index (dynamic tasks).
    pub index: usize,
    pub extent: Extent,
}

impl ExecutionStrategy {
    /// Run `work` over `workers` pieces of `extent`, then pass every slot to
    /// `finalize`.
    ///
    /// `finalize` runs on the calling thread only after all pieces have
    /// finished; it is the single consumer of the slots.
    pub fn execute<T, W, F, R>(self, extent: Extent, workers: usize, work: W, finalize: F) -> Result<R>
    where
        T: Send,
        W: Fn(&mut WorkerSlot<T>, WorkPiece) + Sync,
        F: FnOnce(WorkerStorage<T>) -> R,
    {
        let storage = match self {
            ExecutionStrategy::FixedThreads => run_fixed_threads(extent, workers, &work)?,
            ExecutionStrategy::DynamicTasks => run_dynamic_tasks(extent, workers, &work),
        };
        Ok(finalize(storage))
    }
}

fn run_fixed_threads<T, W>(extent: Extent, workers: usize, work: &W) -> Result<WorkerStorage<T>>
where
    T: Send,
    W: Fn(&mut WorkerSlot<T>, WorkPiece) + Sync,
{
    let workers = workers.max(1);
    let mut storage = WorkerStorage::with_workers(workers);

    thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::with_capacity(workers);
        for (thread_id, slot) in storage.slots_mut().iter_mut().enumerate() {
            let handle = thread::Builder::new()
                .name(format!("ritk-worker-{thread_id}"))
                .spawn_scoped(scope, move || {
                    let (piece, total) = split_extent(&extent, thread_id, workers);
                    if thread_id < total && !piece.is_empty() {
                        work(slot, WorkPiece { index: thread_id, extent: piece });
                    }
                })
                .map_err(RegistrationError::WorkerSpawn)?;
            handles.push(handle);
        }

        for handle in handles {
            if let Err(payload) = handle.join() {
                panic::resume_unwind(payload);
            }
        }
        Ok(())
    })?;

    Ok(storage)
}

fn run_dynamic_tasks<T, W>(extent: Extent, workers: usize, work: &W) -> WorkerStorage<T>
where
    T: Send,
    W: Fn(&mut WorkerSlot<T>, WorkPiece) + Sync,
{
    let pieces = number_of_pieces(&extent, workers);
    let slots: Vec<WorkerSlot<T>> = (0..pieces)
        .into_par_iter()
        .fold(WorkerSlot::default, |mut slot, index| {
            let (piece, _) = split_extent(&extent, index, pieces);
            if !piece.is_empty() {
                work(&mut slot, WorkPiece { index, extent: piece });
            }
            slot
        })
        .collect();
    slots.into_iter().collect()
}
