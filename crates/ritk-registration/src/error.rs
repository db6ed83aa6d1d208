//! Error types for registration operations.
//!
//! This module provides structured error types for metric evaluation and
//! the optimizer contract, enabling better error handling and debugging.

use std::fmt;

use ritk_core::image::ScalarKind;
use ritk_core::ImageError;
use thiserror::Error;

/// Which buffer of a metric run carried an unsupported representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarRole {
    /// Image driving the x-bin axis.
    FirstInput,
    /// Image driving the y-bin axis.
    SecondInput,
    /// Emitted joint histogram.
    Output,
}

impl fmt::Display for ScalarRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarRole::FirstInput => "first input",
            ScalarRole::SecondInput => "second input",
            ScalarRole::Output => "output",
        })
    }
}

/// Main error type for registration operations.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A buffer uses a pixel representation the kernels do not handle.
    #[error("Unsupported {role} scalar type: {kind}")]
    UnsupportedScalarType { role: ScalarRole, kind: ScalarKind },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Image data inconsistent with its geometry.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// A worker thread could not be started.
    #[error("Failed to start worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// Error in optimizer operation.
    #[error("Optimizer error: {0}")]
    OptimizerError(String),
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

impl RegistrationError {
    /// Create an unsupported scalar type error.
    pub fn unsupported_scalar(role: ScalarRole, kind: ScalarKind) -> Self {
        Self::UnsupportedScalarType { role, kind }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an optimizer error.
    pub fn optimizer(msg: impl Into<String>) -> Self {
        Self::OptimizerError(msg.into())
    }
}
