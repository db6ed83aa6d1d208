//! Joint histogram storage and the intensity-to-bin mapping.

/// Affine map from an intensity pair to a clamped 2D bin coordinate.
///
/// Bin `k` on an axis is centred on intensity `origin + k * spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinMapping {
    num_bins: [usize; 2],
    origin: [f64; 2],
    spacing: [f64; 2],
    shift: [f64; 2],
    scale: [f64; 2],
    max: [f64; 2],
}

impl BinMapping {
    /// Create a mapping. Callers validate that bins are non-zero and spacing
    /// is positive.
    pub fn new(num_bins: [usize; 2], origin: [f64; 2], spacing: [f64; 2]) -> Self {
        Self {
            num_bins,
            origin,
            spacing,
            shift: [-origin[0], -origin[1]],
            scale: [1.0 / spacing[0], 1.0 / spacing[1]],
            max: [(num_bins[0] - 1) as f64, (num_bins[1] - 1) as f64],
        }
    }

    pub fn num_bins(&self) -> [usize; 2] {
        self.num_bins
    }

    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    pub fn spacing(&self) -> [f64; 2] {
        self.spacing
    }

    /// Bin index along one axis.
    ///
    /// The value is clamped to `[0, bins - 1]` in real space before rounding
    /// with `+0.5` truncation, so out-of-range intensities land in the edge
    /// bins. NaN lands in bin 0.
    #[inline]
    pub fn bin(&self, axis: usize, value: f64) -> usize {
        let v = (value + self.shift[axis]) * self.scale[axis];
        let v = if v > 0.0 { v } else { 0.0 };
        let v = if v < self.max[axis] { v } else { self.max[axis] };
        (v + 0.5) as usize
    }

    /// Bin coordinate of an intensity pair.
    #[inline]
    pub fn bin_pair(&self, x: f64, y: f64) -> (usize, usize) {
        (self.bin(0, x), self.bin(1, y))
    }

    /// Whether raw byte values can be used directly as bin coordinates.
    ///
    /// True when bin 0 is centred on intensity 0 and the last bin on
    /// intensity `bins - 1` along both axes, both rounded to the nearest
    /// integer.
    pub fn is_byte_identity(&self) -> bool {
        (0..2).all(|axis| {
            let last = self.max[axis];
            (self.origin[axis] + 0.5).floor() == 0.0
                && (self.origin[axis] + self.spacing[axis] * last + 0.5).floor() == last
        })
    }
}

/// Dense row-major table of counts over `nx * ny` bins.
///
/// Cell `(xi, yi)` counts the voxel pairs whose first intensity fell in bin
/// `xi` and second intensity in bin `yi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointHistogram {
    nx: usize,
    ny: usize,
    counts: Vec<u64>,
}

impl JointHistogram {
    /// Zero-filled histogram.
    pub fn new(num_bins: [usize; 2]) -> Self {
        let [nx, ny] = num_bins;
        Self {
            nx,
            ny,
            counts: vec![0; nx * ny],
        }
    }

    pub fn num_bins(&self) -> [usize; 2] {
        [self.nx, self.ny]
    }

    #[inline]
    pub fn increment(&mut self, xi: usize, yi: usize) {
        self.counts[yi * self.nx + xi] += 1;
    }

    pub fn get(&self, xi: usize, yi: usize) -> u64 {
        self.counts[yi * self.nx + xi]
    }

    /// Counts of bin row `yi` (all first-image bins for one second-image bin).
    pub fn row(&self, yi: usize) -> &[u64] {
        &self.counts[yi * self.nx..(yi + 1) * self.nx]
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum over all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
