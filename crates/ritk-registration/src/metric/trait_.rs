//! Metric trait for image similarity measurement.
//!
//! This module defines the core Metric trait that similarity metrics
//! implement so an optimizer can use them as (part of) its objective.

use ritk_core::image::{Extent, ScalarImage};
use ritk_core::stencil::ImageStencil;

use crate::error::Result;

/// The two images a metric compares, plus optional restrictions.
///
/// The first image drives the x-bin axis and the second the y-bin axis.
#[derive(Debug, Clone, Copy)]
pub struct MetricInputs<'a> {
    pub first: &'a ScalarImage,
    pub second: &'a ScalarImage,
    /// Inclusion mask; voxels outside it contribute nothing.
    pub stencil: Option<&'a ImageStencil>,
    /// Additional voxel region the run is restricted to.
    pub region: Option<Extent>,
}

impl<'a> MetricInputs<'a> {
    pub fn new(first: &'a ScalarImage, second: &'a ScalarImage) -> Self {
        Self {
            first,
            second,
            stencil: None,
            region: None,
        }
    }

    /// Restrict accumulation to voxels inside `stencil`.
    pub fn with_stencil(mut self, stencil: &'a ImageStencil) -> Self {
        self.stencil = Some(stencil);
        self
    }

    /// Restrict accumulation to `region`.
    pub fn with_region(mut self, region: Extent) -> Self {
        self.region = Some(region);
        self
    }

    /// Voxels both images cover, limited to the region if one is set.
    pub fn active_extent(&self) -> Extent {
        let extent = self.first.extent().intersect(&self.second.extent());
        match self.region {
            Some(region) => extent.intersect(&region),
            None => extent,
        }
    }
}

/// Similarity value returned by a metric; larger means more similar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValue {
    pub value: f64,
}

impl MetricValue {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// Value to minimize.
    pub fn loss(&self) -> f64 {
        -self.value
    }
}

/// Metric trait for measuring similarity between images.
pub trait Metric {
    /// Calculate the similarity of the two inputs.
    ///
    /// # Arguments
    /// * `inputs` - The images to compare, with optional mask and region
    ///
    /// # Returns
    /// The similarity, or the error that aborted the evaluation
    fn evaluate(&self, inputs: &MetricInputs<'_>) -> Result<MetricValue>;

    /// Get the name of this metric.
    fn name(&self) -> &'static str;
}
