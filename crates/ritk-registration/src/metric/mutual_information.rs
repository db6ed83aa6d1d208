//! Mutual Information metric implementation.
//!
//! Computes the joint intensity histogram of two images in parallel, then
//! the mutual information
//! MI(A, B) = H(A) + H(B) - H(A, B)
//! and the normalized mutual information (Studholme 1999)
//! NMI(A, B) = (H(A) + H(B)) / H(A, B)
//! where H is the Shannon entropy.

use std::sync::Arc;

use ritk_core::image::{Extent, ScalarImage};

use super::config::MutualInformationConfig;
use super::histogram::{BinMapping, JointHistogram};
use super::kernel::{BinningKernel, InputView, RunContext};
use super::reduction::{reduce, JointStatistics};
use super::trait_::{Metric, MetricInputs, MetricValue};
use crate::error::{Result, ScalarRole};
use crate::parallel::{number_of_pieces, WorkPiece, WorkerSlot};
use crate::progress::{ProgressCallback, ProgressTracker};
use crate::validation;

/// Placement of the joint histogram image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputGeometry {
    /// `[0, nx - 1, 0, ny - 1, 0, 0]`.
    pub whole_extent: Extent,
    /// Bin origin on x and y, 0 on z.
    pub origin: [f64; 3],
    /// Bin spacing on x and y, 1 on z.
    pub spacing: [f64; 3],
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct MutualInformationOutput {
    /// Joint histogram over the requested output extent, cast to the
    /// configured output kind. Row `y` holds second-image bin `y`.
    pub joint_histogram: ScalarImage,
    pub statistics: JointStatistics,
    /// Kernel the run used.
    pub kernel: BinningKernel,
}

impl MutualInformationOutput {
    pub fn mutual_information(&self) -> f64 {
        self.statistics.mutual_information
    }

    pub fn normalized_mutual_information(&self) -> f64 {
        self.statistics.normalized_mutual_information
    }
}

/// Mutual information between two scalar images.
///
/// Each run splits the active extent among workers, accumulates one private
/// joint histogram per worker without synchronization, and merges them
/// after every worker has finished.
///
/// # Examples
/// ```rust
/// use ritk_core::image::ScalarImage;
/// use ritk_registration::metric::{MetricInputs, MutualInformation, MutualInformationConfig};
///
/// let a = ScalarImage::from_vec([4, 4, 1], vec![0u8; 16]).unwrap();
/// let b = ScalarImage::from_vec([4, 4, 1], vec![1u8; 16]).unwrap();
/// let metric = MutualInformation::new(MutualInformationConfig::new().with_bins(2, 2)).unwrap();
///
/// let output = metric.execute(&MetricInputs::new(&a, &b)).unwrap();
/// assert_eq!(output.mutual_information(), 0.0);
/// assert_eq!(output.normalized_mutual_information(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct MutualInformation {
    config: MutualInformationConfig,
    mapping: BinMapping,
    progress: ProgressTracker,
}

impl MutualInformation {
    /// Create a new Mutual Information metric.
    ///
    /// # Arguments
    /// * `config` - Bin geometry, output kind and scheduling
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` when `config` fails validation.
    pub fn new(config: MutualInformationConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            tracing::error!("Rejected mutual information configuration: {}", err);
            return Err(err);
        }
        let mapping = BinMapping::new(config.number_of_bins, config.bin_origin, config.bin_spacing);
        Ok(Self {
            config,
            mapping,
            progress: ProgressTracker::new(),
        })
    }

    /// Metric with 64 x 64 unit bins starting at intensity 0.
    pub fn with_defaults() -> Self {
        let config = MutualInformationConfig::default();
        let mapping = BinMapping::new(config.number_of_bins, config.bin_origin, config.bin_spacing);
        Self {
            config,
            mapping,
            progress: ProgressTracker::new(),
        }
    }

    pub fn config(&self) -> &MutualInformationConfig {
        &self.config
    }

    /// Register an observer for run progress.
    pub fn add_progress_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.progress.add_callback(callback);
    }

    /// Geometry of the joint histogram image.
    pub fn output_geometry(&self) -> OutputGeometry {
        let [nx, ny] = self.config.number_of_bins;
        let [ox, oy] = self.config.bin_origin;
        let [sx, sy] = self.config.bin_spacing;
        OutputGeometry {
            whole_extent: Extent::from_dims([nx, ny, 1]),
            origin: [ox, oy, 0.0],
            spacing: [sx, sy, 1.0],
        }
    }

    /// Run over the whole output extent.
    pub fn execute(&self, inputs: &MetricInputs<'_>) -> Result<MutualInformationOutput> {
        self.execute_with_output_extent(inputs, self.output_geometry().whole_extent)
    }

    /// Run, writing only the histogram cells inside `output_extent`.
    ///
    /// The statistics always cover the complete histogram.
    ///
    /// # Errors
    /// * `UnsupportedScalarType` - an input holds 64-bit integers
    /// * `InvalidConfiguration` - `output_extent` is empty or leaves the
    ///   whole output extent
    /// * `WorkerSpawn` - a worker thread could not be started
    pub fn execute_with_output_extent(
        &self,
        inputs: &MetricInputs<'_>,
        output_extent: Extent,
    ) -> Result<MutualInformationOutput> {
        self.run(inputs, output_extent).map_err(|err| {
            tracing::error!("Mutual information run aborted: {}", err);
            self.progress.error(&err.to_string());
            err
        })
    }

    fn run(&self, inputs: &MetricInputs<'_>, output_extent: Extent) -> Result<MutualInformationOutput> {
        let geometry = self.output_geometry();
        validation::validate_output_extent(&geometry.whole_extent, &output_extent)?;

        let first = InputView::new(inputs.first, ScalarRole::FirstInput)?;
        let second = InputView::new(inputs.second, ScalarRole::SecondInput)?;
        let kernel = BinningKernel::select(&self.mapping, &first, &second);
        let context = RunContext {
            first,
            second,
            stencil: inputs.stencil,
            mapping: self.mapping,
            kernel,
        };

        let mut output = ScalarImage::zeros(output_extent, 1, self.config.output_scalar_kind)?
            .with_origin(geometry.origin)
            .with_spacing(geometry.spacing);

        let extent = inputs.active_extent();
        let workers = self.config.number_of_workers;
        let strategy = self.config.execution_strategy;
        let num_bins = self.config.number_of_bins;
        tracing::debug!(
            "Mutual information over {} with {:?}: {} workers, {} pieces, {:?} kernel",
            extent,
            strategy,
            workers,
            number_of_pieces(&extent, workers),
            kernel
        );

        let report = |fraction: f64| self.progress.update(fraction);
        let reporting = !self.progress.is_empty();
        self.progress.start();

        let statistics = strategy.execute(
            extent,
            workers,
            |slot: &mut WorkerSlot<JointHistogram>, piece: WorkPiece| {
                tracing::trace!("Worker piece {} over {}", piece.index, piece.extent);
                let histogram = slot.get_or_create(|| JointHistogram::new(num_bins));
                let progress = (reporting && piece.index == 0).then_some(&report as &dyn Fn(f64));
                context.accumulate(piece.extent, histogram, progress);
            },
            |storage| reduce(storage, num_bins, &mut output),
        )?;

        self.progress.complete(statistics);
        Ok(MutualInformationOutput {
            joint_histogram: output,
            statistics,
            kernel,
        })
    }
}

impl Default for MutualInformation {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Metric for MutualInformation {
    /// Normalized mutual information of the inputs.
    fn evaluate(&self, inputs: &MetricInputs<'_>) -> Result<MetricValue> {
        let output = self.execute(inputs)?;
        Ok(MetricValue::new(output.normalized_mutual_information()))
    }

    fn name(&self) -> &'static str {
        "MutualInformation"
    }
}
