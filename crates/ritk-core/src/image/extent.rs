//! Voxel index extents.
//!
//! An extent is an axis-aligned box of voxel indices stored as
//! `[xmin, xmax, ymin, ymax, zmin, zmax]` with inclusive bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive 3D voxel index box.
///
/// Any axis with `max < min` makes the extent empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent([i32; 6]);

impl Extent {
    /// Create an extent from inclusive bounds on each axis.
    pub const fn new(xmin: i32, xmax: i32, ymin: i32, ymax: i32, zmin: i32, zmax: i32) -> Self {
        Self([xmin, xmax, ymin, ymax, zmin, zmax])
    }

    /// Extent starting at the origin with the given dimensions.
    ///
    /// A zero dimension produces an empty extent.
    pub fn from_dims(dims: [usize; 3]) -> Self {
        Self::new(
            0,
            dims[0] as i32 - 1,
            0,
            dims[1] as i32 - 1,
            0,
            dims[2] as i32 - 1,
        )
    }

    /// The canonical empty extent.
    pub const fn empty() -> Self {
        Self([0, -1, 0, -1, 0, -1])
    }

    /// Raw bounds.
    pub fn bounds(&self) -> [i32; 6] {
        self.0
    }

    /// Lower bound on `axis` (0 = x, 1 = y, 2 = z).
    pub fn min(&self, axis: usize) -> i32 {
        self.0[2 * axis]
    }

    /// Upper bound on `axis` (inclusive).
    pub fn max(&self, axis: usize) -> i32 {
        self.0[2 * axis + 1]
    }

    /// Replace the bounds on one axis.
    pub fn with_axis(mut self, axis: usize, min: i32, max: i32) -> Self {
        self.0[2 * axis] = min;
        self.0[2 * axis + 1] = max;
        self
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.max(axis) < self.min(axis))
    }

    /// Number of voxels along each axis; zero on every axis when empty.
    pub fn dims(&self) -> [usize; 3] {
        if self.is_empty() {
            return [0; 3];
        }
        let mut dims = [0usize; 3];
        for (axis, d) in dims.iter_mut().enumerate() {
            *d = (self.max(axis) as i64 - self.min(axis) as i64 + 1) as usize;
        }
        dims
    }

    pub fn num_voxels(&self) -> usize {
        self.dims().iter().product()
    }

    /// Whether the voxel index lies inside the extent.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.0[0]
            && x <= self.0[1]
            && y >= self.0[2]
            && y <= self.0[3]
            && z >= self.0[4]
            && z <= self.0[5]
    }

    /// Whether `other` lies entirely inside this extent. An empty extent is
    /// contained in anything.
    pub fn contains_extent(&self, other: &Extent) -> bool {
        other.is_empty()
            || (0..3).all(|axis| {
                other.min(axis) >= self.min(axis) && other.max(axis) <= self.max(axis)
            })
    }

    /// Intersection of two extents. The result may be empty.
    pub fn intersect(&self, other: &Extent) -> Extent {
        let mut out = [0i32; 6];
        for axis in 0..3 {
            out[2 * axis] = self.min(axis).max(other.min(axis));
            out[2 * axis + 1] = self.max(axis).min(other.max(axis));
        }
        Extent(out)
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<[i32; 6]> for Extent {
    fn from(bounds: [i32; 6]) -> Self {
        Self(bounds)
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "[{}..{}, {}..{}, {}..{}]",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_and_voxels() {
        let ext = Extent::new(0, 3, 1, 2, 5, 5);
        assert_eq!(ext.dims(), [4, 2, 1]);
        assert_eq!(ext.num_voxels(), 8);
        assert!(!ext.is_empty());
    }

    #[test]
    fn test_empty_extent() {
        let ext = Extent::empty();
        assert!(ext.is_empty());
        assert_eq!(ext.num_voxels(), 0);
        assert_eq!(Extent::from_dims([4, 0, 1]).num_voxels(), 0);
    }

    #[test]
    fn test_intersect() {
        let a = Extent::new(0, 9, 0, 9, 0, 0);
        let b = Extent::new(5, 14, -3, 4, 0, 2);
        assert_eq!(a.intersect(&b), Extent::new(5, 9, 0, 4, 0, 0));

        let c = Extent::new(20, 30, 0, 9, 0, 0);
        assert!(a.intersect(&c).is_empty());
    }

    #[test]
    fn test_contains() {
        let ext = Extent::new(-1, 1, 0, 0, 0, 3);
        assert!(ext.contains(-1, 0, 3));
        assert!(!ext.contains(2, 0, 0));
        assert!(ext.contains_extent(&Extent::new(0, 1, 0, 0, 1, 2)));
        assert!(ext.contains_extent(&Extent::empty()));
        assert!(!ext.contains_extent(&Extent::new(0, 2, 0, 0, 0, 0)));
    }
}
