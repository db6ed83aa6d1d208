//! Extent partitioning for parallel execution.

use ritk_core::image::Extent;

/// Split `extent` into at most `requested` slabs and return slab `piece`.
///
/// The split runs along the slowest-varying axis that has more than one
/// voxel (z, then y, then x), so every slab is a contiguous set of whole
/// rows whenever z or y can be split. Slabs are disjoint and together cover
/// the extent.
///
/// Returns the slab and the number of slabs actually produced, which may be
/// fewer than `requested`. Pieces at or beyond that count receive an empty
/// extent and must be skipped.
pub fn split_extent(extent: &Extent, piece: usize, requested: usize) -> (Extent, usize) {
    let requested = requested.max(1);

    let mut axis = 2;
    while extent.min(axis) >= extent.max(axis) {
        if axis == 0 {
            // a single voxel (or nothing) cannot be split
            let whole = if piece == 0 { *extent } else { Extent::empty() };
            return (whole, 1);
        }
        axis -= 1;
    }

    let (min, max) = (extent.min(axis), extent.max(axis));
    let range = (max as i64 - min as i64 + 1) as usize;
    let per_piece = range.div_ceil(requested);
    let total = range.div_ceil(per_piece);

    if piece >= total {
        return (Extent::empty(), total);
    }

    let begin = min + (piece * per_piece) as i32;
    let end = if piece + 1 == total {
        max
    } else {
        begin + per_piece as i32 - 1
    };
    (extent.with_axis(axis, begin, end), total)
}

/// Number of slabs `split_extent` produces for `requested` pieces.
pub fn number_of_pieces(extent: &Extent, requested: usize) -> usize {
    split_extent(extent, 0, requested).1
}
