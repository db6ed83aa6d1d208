//! Configuration for mutual information evaluation.

use std::fmt;
use std::thread;

use ritk_core::image::ScalarKind;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parallel::ExecutionStrategy;
use crate::validation;

/// Parameters of a mutual information run.
///
/// Set before a run and read-only during it. Every field has a default, so
/// partial configurations deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutualInformationConfig {
    /// Bins along the first (x) and second (y) intensity axes.
    pub number_of_bins: [usize; 2],
    /// Intensity at the centre of bin 0 on each axis.
    pub bin_origin: [f64; 2],
    /// Intensity width of one bin on each axis.
    pub bin_spacing: [f64; 2],
    /// Representation of the emitted joint histogram image.
    pub output_scalar_kind: ScalarKind,
    /// Threads (fixed strategy) or requested pieces (dynamic strategy).
    pub number_of_workers: usize,
    /// How work is scheduled.
    pub execution_strategy: ExecutionStrategy,
}

impl Default for MutualInformationConfig {
    fn default() -> Self {
        Self {
            number_of_bins: [64, 64],
            bin_origin: [0.0, 0.0],
            bin_spacing: [1.0, 1.0],
            output_scalar_kind: ScalarKind::F32,
            number_of_workers: default_workers(),
            execution_strategy: ExecutionStrategy::FixedThreads,
        }
    }
}

fn default_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

impl MutualInformationConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of bins on both axes.
    pub fn with_bins(mut self, x: usize, y: usize) -> Self {
        self.number_of_bins = [x, y];
        self
    }

    /// Set the intensity at the centre of bin 0.
    pub fn with_bin_origin(mut self, x: f64, y: f64) -> Self {
        self.bin_origin = [x, y];
        self
    }

    /// Set the intensity width of a bin.
    pub fn with_bin_spacing(mut self, x: f64, y: f64) -> Self {
        self.bin_spacing = [x, y];
        self
    }

    /// Set the joint histogram's output representation.
    pub fn with_output_scalar_kind(mut self, kind: ScalarKind) -> Self {
        self.output_scalar_kind = kind;
        self
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.number_of_workers = workers;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Check that the configuration can drive a run.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` for zero bins or bin counts beyond
    /// `i32::MAX`, non-positive or non-finite spacing, non-finite origin,
    /// or zero workers.
    pub fn validate(&self) -> Result<()> {
        validation::validate_number_of_bins(self.number_of_bins)?;
        validation::validate_bin_origin(self.bin_origin)?;
        validation::validate_bin_spacing(self.bin_spacing)?;
        validation::validate_workers(self.number_of_workers)
    }
}

impl fmt::Display for MutualInformationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of bins: ({}, {})", self.number_of_bins[0], self.number_of_bins[1])?;
        writeln!(f, "Bin origin: ({}, {})", self.bin_origin[0], self.bin_origin[1])?;
        writeln!(f, "Bin spacing: ({}, {})", self.bin_spacing[0], self.bin_spacing[1])?;
        writeln!(f, "Output scalar type: {}", self.output_scalar_kind)?;
        writeln!(f, "Number of workers: {}", self.number_of_workers)?;
        write!(f, "Execution strategy: {:?}", self.execution_strategy)
    }
}
