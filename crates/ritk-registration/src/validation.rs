//! Validation utilities for metric configuration and run geometry.
//!
//! This module provides the checks applied before a run starts, so a run
//! that begins never fails on its parameters.

use ritk_core::image::Extent;

use crate::error::{RegistrationError, Result};

const AXES: [&str; 2] = ["x", "y"];

/// Validate histogram bin counts.
///
/// Each axis needs at least one bin and must fit an `i32` extent, and the
/// dense `nx * ny` table must be addressable.
pub fn validate_number_of_bins(num_bins: [usize; 2]) -> Result<()> {
    for (axis, &bins) in AXES.iter().zip(&num_bins) {
        if bins == 0 {
            return Err(RegistrationError::invalid_configuration(format!(
                "Number of {} bins must be at least 1",
                axis
            )));
        }
        if i32::try_from(bins).is_err() {
            return Err(RegistrationError::invalid_configuration(format!(
                "Number of {} bins must not exceed {}, got {}",
                axis,
                i32::MAX,
                bins
            )));
        }
    }
    if num_bins[0].checked_mul(num_bins[1]).is_none() {
        return Err(RegistrationError::invalid_configuration(format!(
            "Joint histogram of {} x {} bins is too large",
            num_bins[0], num_bins[1]
        )));
    }
    Ok(())
}

/// Validate bin spacing; must be finite and positive.
pub fn validate_bin_spacing(spacing: [f64; 2]) -> Result<()> {
    for (axis, &s) in AXES.iter().zip(&spacing) {
        if !s.is_finite() || s <= 0.0 {
            return Err(RegistrationError::invalid_configuration(format!(
                "Bin spacing on {} must be positive and finite, got {}",
                axis, s
            )));
        }
    }
    Ok(())
}

/// Validate bin origin; must be finite.
pub fn validate_bin_origin(origin: [f64; 2]) -> Result<()> {
    for (axis, &o) in AXES.iter().zip(&origin) {
        if !o.is_finite() {
            return Err(RegistrationError::invalid_configuration(format!(
                "Bin origin on {} must be finite, got {}",
                axis, o
            )));
        }
    }
    Ok(())
}

/// Validate worker count.
pub fn validate_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(RegistrationError::invalid_configuration(
            "Number of workers must be at least 1",
        ));
    }
    Ok(())
}

/// Validate a requested output extent against the histogram's whole extent.
pub fn validate_output_extent(whole: &Extent, requested: &Extent) -> Result<()> {
    if requested.is_empty() || !whole.contains_extent(requested) {
        return Err(RegistrationError::invalid_configuration(format!(
            "Output extent {} is not inside the histogram extent {}",
            requested, whole
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_number_of_bins() {
        assert!(validate_number_of_bins([64, 64]).is_ok());
        assert!(validate_number_of_bins([1, 1]).is_ok());
        assert!(validate_number_of_bins([0, 64]).is_err());
        assert!(validate_number_of_bins([64, 0]).is_err());
        assert!(validate_number_of_bins([i32::MAX as usize, 1]).is_ok());
        assert!(validate_number_of_bins([1 << 31, 1]).is_err());
        assert!(validate_number_of_bins([1, 1 << 31]).is_err());
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_validate_number_of_bins_table_size() {
        assert!(validate_number_of_bins([1 << 16, 1 << 16]).is_err());
    }

    #[test]
    fn test_validate_bin_spacing() {
        assert!(validate_bin_spacing([1.0, 0.25]).is_ok());
        assert!(validate_bin_spacing([0.0, 1.0]).is_err());
        assert!(validate_bin_spacing([1.0, -2.0]).is_err());
        assert!(validate_bin_spacing([f64::INFINITY, 1.0]).is_err());
        assert!(validate_bin_spacing([1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_validate_bin_origin() {
        assert!(validate_bin_origin([-100.0, 3.5]).is_ok());
        assert!(validate_bin_origin([f64::NAN, 0.0]).is_err());
    }

    #[test]
    fn test_validate_workers() {
        assert!(validate_workers(1).is_ok());
        assert!(validate_workers(0).is_err());
    }

    #[test]
    fn test_validate_output_extent() {
        let whole = Extent::new(0, 63, 0, 63, 0, 0);
        assert!(validate_output_extent(&whole, &whole).is_ok());
        assert!(validate_output_extent(&whole, &Extent::new(10, 20, 0, 5, 0, 0)).is_ok());
        assert!(validate_output_extent(&whole, &Extent::new(0, 64, 0, 63, 0, 0)).is_err());
        assert!(validate_output_extent(&whole, &Extent::new(0, 63, 0, 63, 0, 1)).is_err());
        assert!(validate_output_extent(&whole, &Extent::empty()).is_err());
    }
}
