//! Span iteration over an extent restricted by an optional stencil.

use super::stencil::ImageStencil;
use crate::image::Extent;

/// Number of progress reports issued over a full traversal.
const PROGRESS_STEPS: usize = 50;

/// Contiguous in-mask run of voxels along x, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x_begin: i32,
    pub x_end: i32,
    pub y: i32,
    pub z: i32,
}

impl Span {
    pub fn len(&self) -> usize {
        (self.x_end - self.x_begin + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.x_end < self.x_begin
    }
}

/// Yields the in-mask spans of an extent row by row, z slowest.
///
/// Without a stencil every row of the extent is a single span. Each
/// iterator owns its own cursor, so any number of them may walk disjoint
/// (or overlapping) sub-extents concurrently.
pub struct SpanIterator<'a> {
    extent: Extent,
    stencil: Option<&'a ImageStencil>,
    y: i32,
    z: i32,
    /// Next stencil range to examine in the current row.
    range_index: usize,
    finished: bool,
    progress: Option<&'a dyn Fn(f64)>,
    rows_total: usize,
    rows_done: usize,
    report_every: usize,
}

impl<'a> SpanIterator<'a> {
    pub fn new(extent: Extent, stencil: Option<&'a ImageStencil>) -> Self {
        let [_, ny, nz] = extent.dims();
        let rows_total = ny * nz;
        Self {
            extent,
            stencil,
            y: extent.min(1),
            z: extent.min(2),
            range_index: 0,
            finished: extent.is_empty(),
            progress: None,
            rows_total,
            rows_done: 0,
            report_every: (rows_total / PROGRESS_STEPS).max(1),
        }
    }

    /// Report the fraction of rows visited to `progress` as traversal
    /// advances.
    pub fn with_progress(mut self, progress: &'a dyn Fn(f64)) -> Self {
        self.progress = Some(progress);
        self
    }

    fn advance_row(&mut self) {
        self.range_index = 0;
        self.rows_done += 1;
        if let Some(progress) = self.progress {
            if self.rows_done % self.report_every == 0 || self.rows_done == self.rows_total {
                progress(self.rows_done as f64 / self.rows_total as f64);
            }
        }

        self.y += 1;
        if self.y > self.extent.max(1) {
            self.y = self.extent.min(1);
            self.z += 1;
            if self.z > self.extent.max(2) {
                self.finished = true;
            }
        }
    }
}

impl Iterator for SpanIterator<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let (x_min, x_max) = (self.extent.min(0), self.extent.max(0));
        while !self.finished {
            let (y, z) = (self.y, self.z);
            match self.stencil {
                None => {
                    self.advance_row();
                    return Some(Span { x_begin: x_min, x_end: x_max, y, z });
                }
                Some(stencil) => {
                    let ranges = stencil.spans(y, z);
                    while self.range_index < ranges.len() {
                        let (b, e) = ranges[self.range_index];
                        self.range_index += 1;
                        let span = Span {
                            x_begin: b.max(x_min),
                            x_end: e.min(x_max),
                            y,
                            z,
                        };
                        if !span.is_empty() {
                            return Some(span);
                        }
                    }
                    self.advance_row();
                }
            }
        }
        None
    }
}
