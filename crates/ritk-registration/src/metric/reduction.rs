//! Reduction of per-worker histograms into the output image and entropies.

use ritk_core::image::{Extent, ScalarImage};
use serde::{Deserialize, Serialize};

use super::histogram::JointHistogram;
use crate::parallel::WorkerStorage;

/// Entropies and information measures of one completed run.
///
/// Entropies are Shannon entropies in nats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointStatistics {
    /// Number of voxel pairs accumulated across all workers.
    pub voxel_count: u64,
    /// Number of non-zero joint histogram cells.
    pub occupied_cells: usize,
    /// Marginal entropy of the first input, `H(A)`.
    pub first_entropy: f64,
    /// Marginal entropy of the second input, `H(B)`.
    pub second_entropy: f64,
    /// Joint entropy `H(A,B)`.
    pub joint_entropy: f64,
    /// `H(A) + H(B) - H(A,B)`.
    pub mutual_information: f64,
    /// `(H(A) + H(B)) / H(A,B)`.
    pub normalized_mutual_information: f64,
}

impl Default for JointStatistics {
    fn default() -> Self {
        Self::degenerate(0, 0)
    }
}

impl JointStatistics {
    /// Floor values for a histogram with no spread: MI is 0 and NMI is 1.
    fn degenerate(voxel_count: u64, occupied_cells: usize) -> Self {
        Self {
            voxel_count,
            occupied_cells,
            first_entropy: 0.0,
            second_entropy: 0.0,
            joint_entropy: 0.0,
            mutual_information: 0.0,
            normalized_mutual_information: 1.0,
        }
    }

    /// Build statistics from the `sum(c * ln c)` accumulators.
    fn from_sums(voxel_count: u64, occupied_cells: usize, x_sum: f64, y_sum: f64, xy_sum: f64) -> Self {
        // A single occupied cell makes every entropy zero; NMI would be 0/0.
        if voxel_count == 0 || occupied_cells <= 1 {
            return Self::degenerate(voxel_count, occupied_cells);
        }

        let n = voxel_count as f64;
        let log_n = n.ln();
        let entropy = |sum: f64| -sum / n + log_n;

        let first_entropy = entropy(x_sum);
        let second_entropy = entropy(y_sum);
        let joint_entropy = entropy(xy_sum);
        Self {
            voxel_count,
            occupied_cells,
            first_entropy,
            second_entropy,
            joint_entropy,
            mutual_information: first_entropy + second_entropy - joint_entropy,
            normalized_mutual_information: (first_entropy + second_entropy) / joint_entropy,
        }
    }
}

#[inline]
fn c_log_c(count: u64) -> f64 {
    let c = count as f64;
    c * c.ln()
}

/// Merge every worker's histogram row by row.
///
/// Rows and columns inside `output`'s extent are written to its buffer with
/// an unchecked cast; entropies always cover the full `nx * ny` histogram.
/// The worker histograms are consumed and released here.
pub fn reduce(storage: WorkerStorage<JointHistogram>, num_bins: [usize; 2], output: &mut ScalarImage) -> JointStatistics {
    let [nx, ny] = num_bins;
    let histograms: Vec<JointHistogram> = storage.into_iter().collect();

    let whole = Extent::new(0, nx as i32 - 1, 0, ny as i32 - 1, 0, 0);
    let written = output.extent().intersect(&whole);
    let (col_begin, col_end) = (written.min(0).max(0) as usize, written.max(0).max(0) as usize);

    let mut row = vec![0u64; nx];
    let mut x_hist = vec![0u64; nx];
    let mut y_sum = 0.0;
    let mut xy_sum = 0.0;
    let mut occupied_cells = 0;

    for yi in 0..ny {
        row.fill(0);
        for histogram in &histograms {
            for (acc, &count) in row.iter_mut().zip(histogram.row(yi)) {
                *acc += count;
            }
        }

        let mut a = 0u64;
        for (xi, &count) in row.iter().enumerate() {
            a += count;
            x_hist[xi] += count;
            if count > 0 {
                xy_sum += c_log_c(count);
                occupied_cells += 1;
            }
        }
        if a > 0 {
            y_sum += c_log_c(a);
        }

        if !written.is_empty() && written.contains(col_begin as i32, yi as i32, 0) {
            if let Some(offset) = output.voxel_offset(col_begin as i32, yi as i32, 0) {
                output.data_mut().write_counts(offset, &row[col_begin..=col_end]);
            }
        }
    }

    let x_sum: f64 = x_hist.iter().filter(|&&c| c > 0).map(|&c| c_log_c(c)).sum();
    let voxel_count: u64 = x_hist.iter().sum();

    let statistics = JointStatistics::from_sums(voxel_count, occupied_cells, x_sum, y_sum, xy_sum);
    tracing::debug!(
        "Reduced {} worker histograms: {} voxel pairs in {} cells, MI {:.6}, NMI {:.6}",
        histograms.len(),
        statistics.voxel_count,
        statistics.occupied_cells,
        statistics.mutual_information,
        statistics.normalized_mutual_information
    );
    statistics
}
