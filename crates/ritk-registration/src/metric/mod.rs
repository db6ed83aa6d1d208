//! Metric implementations.
//!
//! This module contains the mutual information metric together with the
//! joint histogram, binning kernels and reduction stage it is built from.

pub mod config;
pub mod histogram;
pub mod kernel;
pub mod mutual_information;
pub mod reduction;
pub mod trait_;

pub use config::MutualInformationConfig;
pub use histogram::{BinMapping, JointHistogram};
pub use kernel::BinningKernel;
pub use mutual_information::{MutualInformation, MutualInformationOutput, OutputGeometry};
pub use reduction::JointStatistics;
pub use trait_::{Metric, MetricInputs, MetricValue};
