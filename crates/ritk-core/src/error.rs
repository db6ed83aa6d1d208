//! Error types for image construction.

use thiserror::Error;

use crate::image::Extent;

/// Errors raised when image or stencil data is inconsistent with its geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Buffer length does not match extent and component count.
    #[error("buffer holds {actual} values but extent {extent} with {components} component(s) needs {expected}")]
    BufferLength {
        extent: Extent,
        components: usize,
        expected: usize,
        actual: usize,
    },

    /// An image must carry at least one component per voxel.
    #[error("number of components must be at least 1")]
    NoComponents,

    /// Mask length does not match the extent.
    #[error("mask holds {actual} values but extent {extent} needs {expected}")]
    MaskLength {
        extent: Extent,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, ImageError>;
