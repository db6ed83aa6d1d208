//! Scalar image type with voxel extent and physical metadata.
//!
//! This module provides the ScalarImage struct which couples a typed pixel
//! buffer with the voxel index box it covers and the physical placement of
//! that box (origin and spacing).

use super::extent::Extent;
use super::scalar::{Scalar, ScalarBuffer, ScalarKind};
use crate::error::{ImageError, Result};

/// Image with typed scalar components laid out x-fastest.
///
/// The buffer covers exactly the image's extent: voxel `(x, y, z)` lives at
/// element `((z - zmin) * ny + (y - ymin)) * nx + (x - xmin)`, multiplied by
/// the number of components. Extents need not start at zero.
///
/// # Examples
/// ```rust
/// use ritk_core::image::{Extent, ScalarImage};
///
/// let image = ScalarImage::from_vec([4, 4, 1], vec![0u8; 16]).unwrap();
/// assert_eq!(image.extent(), Extent::new(0, 3, 0, 3, 0, 0));
/// assert_eq!(image.voxel_offset(1, 2, 0), Some(9));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarImage {
    /// Voxel index box covered by the buffer.
    extent: Extent,
    /// Physical coordinate of voxel index (0, 0, 0).
    origin: [f64; 3],
    /// Physical distance between voxels along each axis.
    spacing: [f64; 3],
    /// Components stored per voxel.
    components: usize,
    /// The pixel data.
    data: ScalarBuffer,
}

impl ScalarImage {
    /// Create an image over `extent` from an existing buffer.
    ///
    /// # Errors
    /// Fails when `components` is zero or the buffer length is not
    /// `extent.num_voxels() * components`.
    pub fn new(extent: Extent, components: usize, data: impl Into<ScalarBuffer>) -> Result<Self> {
        let data = data.into();
        if components == 0 {
            return Err(ImageError::NoComponents);
        }
        let expected = extent.num_voxels() * components;
        if data.len() != expected {
            return Err(ImageError::BufferLength {
                extent,
                components,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            extent,
            origin: [0.0; 3],
            spacing: [1.0; 3],
            components,
            data,
        })
    }

    /// Single-component image with its extent starting at the origin.
    pub fn from_vec<T: Scalar>(dims: [usize; 3], data: Vec<T>) -> Result<Self> {
        Self::new(Extent::from_dims(dims), 1, data)
    }

    /// Zero-filled image of the given kind.
    pub fn zeros(extent: Extent, components: usize, kind: ScalarKind) -> Result<Self> {
        let len = extent.num_voxels() * components;
        Self::new(extent, components, ScalarBuffer::zeros(kind, len))
    }

    /// Set the physical origin.
    pub fn with_origin(mut self, origin: [f64; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// Set the physical spacing.
    pub fn with_spacing(mut self, spacing: [f64; 3]) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    pub fn components(&self) -> usize {
        self.components
    }

    pub fn data(&self) -> &ScalarBuffer {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ScalarBuffer {
        &mut self.data
    }

    pub fn into_data(self) -> ScalarBuffer {
        self.data
    }

    pub fn scalar_kind(&self) -> ScalarKind {
        self.data.kind()
    }

    /// Voxel counts along each axis.
    pub fn dims(&self) -> [usize; 3] {
        self.extent.dims()
    }

    /// Element index of component 0 of voxel `(x, y, z)`, or `None` when the
    /// voxel lies outside the extent.
    pub fn voxel_offset(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.extent.contains(x, y, z) {
            return None;
        }
        let [nx, ny, _] = self.extent.dims();
        let ix = (x - self.extent.min(0)) as usize;
        let iy = (y - self.extent.min(1)) as usize;
        let iz = (z - self.extent.min(2)) as usize;
        Some(((iz * ny + iy) * nx + ix) * self.components)
    }

    /// Read one component of one voxel as `f64`.
    pub fn get_f64(&self, x: i32, y: i32, z: i32, component: usize) -> Option<f64> {
        if component >= self.components {
            return None;
        }
        let offset = self.voxel_offset(x, y, z)?;
        self.data.get_f64(offset + component)
    }
}
