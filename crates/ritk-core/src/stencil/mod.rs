//! Inclusion masks over voxel extents.
//!
//! A stencil restricts which voxels take part in an accumulation. It is
//! stored run-length encoded per `(y, z)` row and consumed through the
//! [`SpanIterator`], which yields contiguous in-mask runs along x.

pub mod stencil;
pub mod iterator;

pub use stencil::ImageStencil;
pub use iterator::{Span, SpanIterator};
