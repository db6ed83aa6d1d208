pub mod error;
pub mod image;
pub mod stencil;

pub use error::ImageError;
pub use image::{Extent, Scalar, ScalarBuffer, ScalarImage, ScalarKind};
pub use stencil::{ImageStencil, Span, SpanIterator};
