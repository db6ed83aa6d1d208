//! Run-length encoded inclusion mask.

use serde::{Deserialize, Serialize};

use crate::error::{ImageError, Result};
use crate::image::Extent;

/// Inclusion mask stored as sorted, disjoint x-ranges for every row.
///
/// Voxels outside the stencil's extent are never inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStencil {
    extent: Extent,
    /// One entry per `(y, z)` row, y fastest; inclusive `(x_begin, x_end)`.
    rows: Vec<Vec<(i32, i32)>>,
}

impl ImageStencil {
    /// Stencil over `extent` with nothing inside.
    pub fn new(extent: Extent) -> Self {
        let [_, ny, nz] = extent.dims();
        Self {
            extent,
            rows: vec![Vec::new(); ny * nz],
        }
    }

    /// Stencil with every voxel of `extent` inside.
    pub fn full(extent: Extent) -> Self {
        let mut stencil = Self::new(extent);
        if !extent.is_empty() {
            let span = (extent.min(0), extent.max(0));
            for row in &mut stencil.rows {
                row.push(span);
            }
        }
        stencil
    }

    /// Build a stencil by evaluating `inside` at every voxel of `extent`.
    pub fn from_fn(extent: Extent, mut inside: impl FnMut(i32, i32, i32) -> bool) -> Self {
        let mut stencil = Self::new(extent);
        if extent.is_empty() {
            return stencil;
        }
        for z in extent.min(2)..=extent.max(2) {
            for y in extent.min(1)..=extent.max(1) {
                let mut start = None;
                for x in extent.min(0)..=extent.max(0) {
                    match (inside(x, y, z), start) {
                        (true, None) => start = Some(x),
                        (false, Some(s)) => {
                            stencil.insert_span(y, z, s, x - 1);
                            start = None;
                        }
                        _ => {}
                    }
                }
                if let Some(s) = start {
                    stencil.insert_span(y, z, s, extent.max(0));
                }
            }
        }
        stencil
    }

    /// Build a stencil from a dense x-fastest mask covering `extent`.
    pub fn from_mask(extent: Extent, mask: &[bool]) -> Result<Self> {
        let expected = extent.num_voxels();
        if mask.len() != expected {
            return Err(ImageError::MaskLength {
                extent,
                expected,
                actual: mask.len(),
            });
        }
        let [nx, ny, _] = extent.dims();
        let (x0, y0, z0) = (extent.min(0), extent.min(1), extent.min(2));
        Ok(Self::from_fn(extent, |x, y, z| {
            let index = (((z - z0) as usize * ny) + (y - y0) as usize) * nx + (x - x0) as usize;
            mask[index]
        }))
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    fn row_index(&self, y: i32, z: i32) -> Option<usize> {
        let e = &self.extent;
        if e.is_empty() || y < e.min(1) || y > e.max(1) || z < e.min(2) || z > e.max(2) {
            return None;
        }
        let ny = e.dims()[1];
        Some((z - e.min(2)) as usize * ny + (y - e.min(1)) as usize)
    }

    /// Mark `x_begin..=x_end` of row `(y, z)` as inside.
    ///
    /// The range is clipped to the stencil extent and merged with any
    /// overlapping or adjacent ranges already present. Rows outside the
    /// extent are ignored.
    pub fn insert_span(&mut self, y: i32, z: i32, x_begin: i32, x_end: i32) {
        let Some(index) = self.row_index(y, z) else {
            return;
        };
        let x_begin = x_begin.max(self.extent.min(0));
        let x_end = x_end.min(self.extent.max(0));
        if x_begin > x_end {
            return;
        }

        let row = &mut self.rows[index];
        row.push((x_begin, x_end));
        row.sort_unstable();

        let mut merged: Vec<(i32, i32)> = Vec::with_capacity(row.len());
        for &(b, e) in row.iter() {
            match merged.last_mut() {
                Some(last) if b <= last.1.saturating_add(1) => last.1 = last.1.max(e),
                _ => merged.push((b, e)),
            }
        }
        *row = merged;
    }

    /// In-mask ranges of row `(y, z)`, sorted and disjoint.
    pub fn spans(&self, y: i32, z: i32) -> &[(i32, i32)] {
        match self.row_index(y, z) {
            Some(index) => &self.rows[index],
            None => &[],
        }
    }

    pub fn is_inside(&self, x: i32, y: i32, z: i32) -> bool {
        self.spans(y, z).iter().any(|&(b, e)| x >= b && x <= e)
    }

    /// Number of voxels inside the stencil.
    pub fn count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .map(|&(b, e)| (e - b + 1) as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_merges_overlaps_and_adjacency() {
        let mut stencil = ImageStencil::new(Extent::new(0, 9, 0, 0, 0, 0));
        stencil.insert_span(0, 0, 5, 6);
        stencil.insert_span(0, 0, 0, 1);
        stencil.insert_span(0, 0, 2, 3);
        stencil.insert_span(0, 0, 6, 20);
        assert_eq!(stencil.spans(0, 0), &[(0, 3), (5, 9)]);
        assert_eq!(stencil.count(), 9);
    }

    #[test]
    fn test_rows_outside_extent_are_ignored() {
        let mut stencil = ImageStencil::new(Extent::new(0, 3, 0, 3, 0, 0));
        stencil.insert_span(7, 0, 0, 3);
        stencil.insert_span(0, 1, 0, 3);
        assert_eq!(stencil.count(), 0);
        assert!(stencil.spans(7, 0).is_empty());
        assert!(!stencil.is_inside(0, 7, 0));
    }

    #[test]
    fn test_from_fn_matches_predicate() {
        let extent = Extent::new(-2, 5, 0, 3, 0, 1);
        let predicate = |x: i32, y: i32, z: i32| (x + y + z) % 3 != 0;
        let stencil = ImageStencil::from_fn(extent, predicate);
        for z in 0..=1 {
            for y in 0..=3 {
                for x in -2..=5 {
                    assert_eq!(stencil.is_inside(x, y, z), predicate(x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_from_mask_length_checked() {
        let extent = Extent::from_dims([2, 2, 1]);
        assert!(ImageStencil::from_mask(extent, &[true; 3]).is_err());

        let stencil = ImageStencil::from_mask(extent, &[true, false, false, true]).unwrap();
        assert!(stencil.is_inside(0, 0, 0));
        assert!(!stencil.is_inside(1, 0, 0));
        assert!(stencil.is_inside(1, 1, 0));
        assert_eq!(stencil.count(), 2);
    }

    #[test]
    fn test_full() {
        let extent = Extent::from_dims([3, 2, 2]);
        assert_eq!(ImageStencil::full(extent).count(), 12);
        assert_eq!(ImageStencil::full(Extent::empty()).count(), 0);
    }
}
