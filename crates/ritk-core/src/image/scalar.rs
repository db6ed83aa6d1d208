//! Scalar pixel kinds and typed pixel buffers.
//!
//! The set of pixel representations is closed: every image buffer is one of
//! the [`ScalarKind`] variants, and algorithms dispatch on the kind once per
//! region rather than once per voxel.

use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric representation of a pixel component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// Every supported kind, narrowest integers first.
    pub const ALL: [ScalarKind; 10] = [
        ScalarKind::I8,
        ScalarKind::U8,
        ScalarKind::I16,
        ScalarKind::U16,
        ScalarKind::I32,
        ScalarKind::U32,
        ScalarKind::I64,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::I8 => "i8",
            ScalarKind::U8 => "u8",
            ScalarKind::I16 => "i16",
            ScalarKind::U16 => "u16",
            ScalarKind::I32 => "i32",
            ScalarKind::U32 => "u32",
            ScalarKind::I64 => "i64",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive pixel component type.
pub trait Scalar: Copy + Default + Send + Sync + PartialOrd + AsPrimitive<f64> + 'static {
    const KIND: ScalarKind;

    /// Convert a histogram count with `as` semantics (wrapping/saturating
    /// exactly as the primitive cast does, no range check).
    fn from_count(count: u64) -> Self;

    /// Borrow the buffer's storage if it holds this type.
    fn slice(buffer: &ScalarBuffer) -> Option<&[Self]>;

    fn into_buffer(data: Vec<Self>) -> ScalarBuffer;
}

/// Typed storage for image components.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarBuffer {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Expand `$body` once per [`ScalarBuffer`] variant with `$data` bound to the
/// variant's vector (or a reference to it, following the scrutinee).
#[macro_export]
macro_rules! match_scalar_buffer {
    ($buffer:expr, $data:ident => $body:expr) => {
        match $buffer {
            $crate::image::ScalarBuffer::I8($data) => $body,
            $crate::image::ScalarBuffer::U8($data) => $body,
            $crate::image::ScalarBuffer::I16($data) => $body,
            $crate::image::ScalarBuffer::U16($data) => $body,
            $crate::image::ScalarBuffer::I32($data) => $body,
            $crate::image::ScalarBuffer::U32($data) => $body,
            $crate::image::ScalarBuffer::I64($data) => $body,
            $crate::image::ScalarBuffer::U64($data) => $body,
            $crate::image::ScalarBuffer::F32($data) => $body,
            $crate::image::ScalarBuffer::F64($data) => $body,
        }
    };
}

macro_rules! impl_scalar {
    ($t:ty, $variant:ident) => {
        impl Scalar for $t {
            const KIND: ScalarKind = ScalarKind::$variant;

            #[inline]
            fn from_count(count: u64) -> Self {
                <u64 as AsPrimitive<$t>>::as_(count)
            }

            fn slice(buffer: &ScalarBuffer) -> Option<&[Self]> {
                match buffer {
                    ScalarBuffer::$variant(data) => Some(data.as_slice()),
                    _ => None,
                }
            }

            fn into_buffer(data: Vec<Self>) -> ScalarBuffer {
                ScalarBuffer::$variant(data)
            }
        }
    };
}

impl_scalar!(i8, I8);
impl_scalar!(u8, U8);
impl_scalar!(i16, I16);
impl_scalar!(u16, U16);
impl_scalar!(i32, I32);
impl_scalar!(u32, U32);
impl_scalar!(i64, I64);
impl_scalar!(u64, U64);
impl_scalar!(f32, F32);
impl_scalar!(f64, F64);

impl ScalarBuffer {
    /// Allocate a zero-filled buffer of the given kind.
    pub fn zeros(kind: ScalarKind, len: usize) -> Self {
        match kind {
            ScalarKind::I8 => ScalarBuffer::I8(vec![0; len]),
            ScalarKind::U8 => ScalarBuffer::U8(vec![0; len]),
            ScalarKind::I16 => ScalarBuffer::I16(vec![0; len]),
            ScalarKind::U16 => ScalarBuffer::U16(vec![0; len]),
            ScalarKind::I32 => ScalarBuffer::I32(vec![0; len]),
            ScalarKind::U32 => ScalarBuffer::U32(vec![0; len]),
            ScalarKind::I64 => ScalarBuffer::I64(vec![0; len]),
            ScalarKind::U64 => ScalarBuffer::U64(vec![0; len]),
            ScalarKind::F32 => ScalarBuffer::F32(vec![0.0; len]),
            ScalarKind::F64 => ScalarBuffer::F64(vec![0.0; len]),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarBuffer::I8(_) => ScalarKind::I8,
            ScalarBuffer::U8(_) => ScalarKind::U8,
            ScalarBuffer::I16(_) => ScalarKind::I16,
            ScalarBuffer::U16(_) => ScalarKind::U16,
            ScalarBuffer::I32(_) => ScalarKind::I32,
            ScalarBuffer::U32(_) => ScalarKind::U32,
            ScalarBuffer::I64(_) => ScalarKind::I64,
            ScalarBuffer::U64(_) => ScalarKind::U64,
            ScalarBuffer::F32(_) => ScalarKind::F32,
            ScalarBuffer::F64(_) => ScalarKind::F64,
        }
    }

    pub fn len(&self) -> usize {
        match_scalar_buffer!(self, data => data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read one component as `f64`.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match_scalar_buffer!(self, data => data.get(index).map(|&v| AsPrimitive::<f64>::as_(v)))
    }

    /// Borrow the storage as `T`, if the kinds match.
    pub fn as_slice<T: Scalar>(&self) -> Option<&[T]> {
        T::slice(self)
    }

    /// Store a run of counts starting at `offset`, converting each with a
    /// plain `as` cast. Values outside the target range wrap or saturate as
    /// the primitive conversion defines; no validation is done.
    ///
    /// # Panics
    /// Panics if the run does not fit in the buffer.
    pub fn write_counts(&mut self, offset: usize, counts: &[u64]) {
        match_scalar_buffer!(self, data => cast_counts(&mut data[offset..offset + counts.len()], counts))
    }
}

fn cast_counts<T: Scalar>(dst: &mut [T], counts: &[u64]) {
    for (d, &c) in dst.iter_mut().zip(counts) {
        *d = T::from_count(c);
    }
}

impl<T: Scalar> From<Vec<T>> for ScalarBuffer {
    fn from(data: Vec<T>) -> Self {
        T::into_buffer(data)
    }
}
