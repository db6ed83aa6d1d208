//! Image types and operations.
//!
//! This module provides voxel extents, the closed set of scalar pixel
//! kinds, typed pixel buffers and the ScalarImage that ties them together.

pub mod extent;
pub mod scalar;
pub mod image;

pub use extent::Extent;
pub use scalar::{Scalar, ScalarBuffer, ScalarKind};
pub use image::ScalarImage;
