//! Binning kernels that stream masked spans into a worker's histogram.
//!
//! The pixel kinds of both inputs are resolved once per run into
//! [`InputSlice`]s; each piece then dispatches once to a kernel
//! monomorphized for the pair of kinds, so the per-voxel loop is free of
//! dynamic dispatch.

use ritk_core::image::{Extent, Scalar, ScalarBuffer, ScalarImage};
use ritk_core::stencil::{ImageStencil, SpanIterator};

use super::histogram::{BinMapping, JointHistogram};
use crate::error::{RegistrationError, Result, ScalarRole};

/// Component storage of an input whose kind the kernels accept.
///
/// 64-bit integer buffers have no variant and are rejected when the view is
/// built.
#[derive(Debug, Clone, Copy)]
pub enum InputSlice<'a> {
    I8(&'a [i8]),
    U8(&'a [u8]),
    I16(&'a [i16]),
    U16(&'a [u16]),
    I32(&'a [i32]),
    U32(&'a [u32]),
    F32(&'a [f32]),
    F64(&'a [f64]),
}

macro_rules! match_input_slice {
    ($slice:expr, $data:ident => $body:expr) => {
        match $slice {
            InputSlice::I8($data) => $body,
            InputSlice::U8($data) => $body,
            InputSlice::I16($data) => $body,
            InputSlice::U16($data) => $body,
            InputSlice::I32($data) => $body,
            InputSlice::U32($data) => $body,
            InputSlice::F32($data) => $body,
            InputSlice::F64($data) => $body,
        }
    };
}

impl<'a> InputSlice<'a> {
    fn from_buffer(buffer: &'a ScalarBuffer) -> Option<Self> {
        Some(match buffer {
            ScalarBuffer::I8(data) => InputSlice::I8(data),
            ScalarBuffer::U8(data) => InputSlice::U8(data),
            ScalarBuffer::I16(data) => InputSlice::I16(data),
            ScalarBuffer::U16(data) => InputSlice::U16(data),
            ScalarBuffer::I32(data) => InputSlice::I32(data),
            ScalarBuffer::U32(data) => InputSlice::U32(data),
            ScalarBuffer::F32(data) => InputSlice::F32(data),
            ScalarBuffer::F64(data) => InputSlice::F64(data),
            ScalarBuffer::I64(_) | ScalarBuffer::U64(_) => return None,
        })
    }
}

/// An input image together with its resolved component storage.
#[derive(Debug, Clone, Copy)]
pub struct InputView<'a> {
    pub image: &'a ScalarImage,
    pub data: InputSlice<'a>,
}

impl<'a> InputView<'a> {
    /// Resolve the image's kind, failing for kinds the kernels do not accept.
    pub fn new(image: &'a ScalarImage, role: ScalarRole) -> Result<Self> {
        let data = InputSlice::from_buffer(image.data())
            .ok_or_else(|| RegistrationError::unsupported_scalar(role, image.scalar_kind()))?;
        Ok(Self { image, data })
    }
}

/// Which accumulation loop a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinningKernel {
    /// Read intensities as `f64` and apply the affine bin mapping.
    Affine,
    /// Use raw bytes as bin coordinates; integer-only.
    PreScaled,
}

impl BinningKernel {
    /// Choose the kernel for a pair of inputs under `mapping`.
    pub fn select(mapping: &BinMapping, first: &InputView<'_>, second: &InputView<'_>) -> Self {
        match (first.data, second.data) {
            (InputSlice::U8(_), InputSlice::U8(_)) if mapping.is_byte_identity() => BinningKernel::PreScaled,
            _ => BinningKernel::Affine,
        }
    }
}

/// Everything a worker needs for one run, shared read-only by all workers.
pub struct RunContext<'a> {
    pub first: InputView<'a>,
    pub second: InputView<'a>,
    pub stencil: Option<&'a ImageStencil>,
    pub mapping: BinMapping,
    pub kernel: BinningKernel,
}

impl RunContext<'_> {
    /// Accumulate every in-mask voxel pair of `extent` into `histogram`.
    ///
    /// The extent is first clipped to both inputs; an empty intersection
    /// contributes nothing.
    pub fn accumulate(&self, extent: Extent, histogram: &mut JointHistogram, progress: Option<&dyn Fn(f64)>) {
        let extent = extent
            .intersect(&self.first.image.extent())
            .intersect(&self.second.image.extent());
        if extent.is_empty() {
            return;
        }

        let mut spans = SpanIterator::new(extent, self.stencil);
        if let Some(progress) = progress {
            spans = spans.with_progress(progress);
        }

        match (self.kernel, self.first.data, self.second.data) {
            (BinningKernel::PreScaled, InputSlice::U8(a), InputSlice::U8(b)) => {
                accumulate_prescaled(a, b, self.first.image, self.second.image, spans, histogram)
            }
            (_, first, second) => match_input_slice!(first, a => match_input_slice!(second, b => {
                accumulate_affine(a, b, self.first.image, self.second.image, spans, &self.mapping, histogram)
            })),
        }
    }
}

fn accumulate_affine<T1: Scalar, T2: Scalar>(
    first: &[T1],
    second: &[T2],
    first_image: &ScalarImage,
    second_image: &ScalarImage,
    spans: SpanIterator<'_>,
    mapping: &BinMapping,
    histogram: &mut JointHistogram,
) {
    let (inc_a, inc_b) = (first_image.components(), second_image.components());
    for span in spans {
        let (Some(a), Some(b)) = (
            first_image.voxel_offset(span.x_begin, span.y, span.z),
            second_image.voxel_offset(span.x_begin, span.y, span.z),
        ) else {
            continue;
        };
        let xs = first[a..].iter().step_by(inc_a);
        let ys = second[b..].iter().step_by(inc_b);
        for (&x, &y) in xs.zip(ys).take(span.len()) {
            let (xi, yi) = mapping.bin_pair(x.as_(), y.as_());
            histogram.increment(xi, yi);
        }
    }
}

fn accumulate_prescaled(
    first: &[u8],
    second: &[u8],
    first_image: &ScalarImage,
    second_image: &ScalarImage,
    spans: SpanIterator<'_>,
    histogram: &mut JointHistogram,
) {
    let [nx, ny] = histogram.num_bins();
    let (xmax, ymax) = (nx - 1, ny - 1);
    let (inc_a, inc_b) = (first_image.components(), second_image.components());
    for span in spans {
        let (Some(a), Some(b)) = (
            first_image.voxel_offset(span.x_begin, span.y, span.z),
            second_image.voxel_offset(span.x_begin, span.y, span.z),
        ) else {
            continue;
        };
        let xs = first[a..].iter().step_by(inc_a);
        let ys = second[b..].iter().step_by(inc_b);
        for (&x, &y) in xs.zip(ys).take(span.len()) {
            histogram.increment((x as usize).min(xmax), (y as usize).min(ymax));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ritk_core::image::ScalarKind;

    fn context<'a>(a: &'a ScalarImage, b: &'a ScalarImage, mapping: BinMapping, kernel: BinningKernel) -> RunContext<'a> {
        RunContext {
            first: InputView::new(a, ScalarRole::FirstInput).unwrap(),
            second: InputView::new(b, ScalarRole::SecondInput).unwrap(),
            stencil: None,
            mapping,
            kernel,
        }
    }

    #[test]
    fn test_64_bit_integers_rejected() {
        let image = ScalarImage::from_vec([2, 1, 1], vec![1i64, 2]).unwrap();
        let err = InputView::new(&image, ScalarRole::SecondInput).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::UnsupportedScalarType { role: ScalarRole::SecondInput, kind: ScalarKind::I64 }
        ));
    }

    #[test]
    fn test_kernel_selection() {
        let bytes = ScalarImage::from_vec([2, 1, 1], vec![0u8, 1]).unwrap();
        let shorts = ScalarImage::from_vec([2, 1, 1], vec![0u16, 1]).unwrap();
        let a = InputView::new(&bytes, ScalarRole::FirstInput).unwrap();
        let b = InputView::new(&shorts, ScalarRole::SecondInput).unwrap();

        let identity = BinMapping::new([64, 64], [0.0, 0.0], [1.0, 1.0]);
        let scaled = BinMapping::new([64, 64], [0.0, 0.0], [4.0, 4.0]);
        assert_eq!(BinningKernel::select(&identity, &a, &a), BinningKernel::PreScaled);
        assert_eq!(BinningKernel::select(&scaled, &a, &a), BinningKernel::Affine);
        assert_eq!(BinningKernel::select(&identity, &a, &b), BinningKernel::Affine);
    }

    #[test]
    fn test_mixed_kinds_and_components() {
        // first image has two components; only component 0 is binned
        let a = ScalarImage::new(Extent::from_dims([3, 1, 1]), 2, vec![0.0f32, 9.0, 1.0, 9.0, 2.0, 9.0]).unwrap();
        let b = ScalarImage::from_vec([3, 1, 1], vec![2i16, 2, -5]).unwrap();
        let mapping = BinMapping::new([3, 3], [0.0, 0.0], [1.0, 1.0]);
        let ctx = context(&a, &b, mapping, BinningKernel::Affine);

        let mut hist = JointHistogram::new([3, 3]);
        ctx.accumulate(Extent::from_dims([3, 1, 1]), &mut hist, None);
        assert_eq!(hist.get(0, 2), 1);
        assert_eq!(hist.get(1, 2), 1);
        assert_eq!(hist.get(2, 0), 1);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn test_prescaled_clamps_to_last_bin() {
        let a = ScalarImage::from_vec([4, 1, 1], vec![0u8, 3, 200, 255]).unwrap();
        let mapping = BinMapping::new([4, 4], [0.0, 0.0], [1.0, 1.0]);

        let mut fast = JointHistogram::new([4, 4]);
        context(&a, &a, mapping, BinningKernel::PreScaled).accumulate(a.extent(), &mut fast, None);
        let mut generic = JointHistogram::new([4, 4]);
        context(&a, &a, mapping, BinningKernel::Affine).accumulate(a.extent(), &mut generic, None);

        assert_eq!(fast.get(3, 3), 3);
        assert_eq!(fast, generic);
    }

    #[test]
    fn test_extent_clipped_to_both_inputs() {
        let a = ScalarImage::from_vec([4, 1, 1], vec![1u8; 4]).unwrap();
        let b = ScalarImage::new(Extent::new(2, 5, 0, 0, 0, 0), 1, vec![2u8; 4]).unwrap();
        let mapping = BinMapping::new([4, 4], [0.0, 0.0], [1.0, 1.0]);
        let ctx = context(&a, &b, mapping, BinningKernel::Affine);

        let mut hist = JointHistogram::new([4, 4]);
        ctx.accumulate(Extent::new(0, 5, 0, 0, 0, 0), &mut hist, None);
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.get(1, 2), 2);
    }
}
