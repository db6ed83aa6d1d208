//! Optimizer interface.
//!
//! Metrics in this crate are evaluated repeatedly by an external
//! derivative-free minimizer; this module defines that contract.

pub mod trait_;

pub use trait_::{Minimizer, Minimum, Objective};
