//! Optimizer contract for parameter search.
//!
//! A registration driver minimizes an objective over transform parameters;
//! a similarity metric is usually (part of) that objective. This module
//! only fixes the interface between the two.

use crate::error::Result;

/// Function of a parameter vector to be minimized.
pub trait Objective {
    /// Evaluate the objective at `parameters`.
    fn evaluate(&mut self, parameters: &[f64]) -> Result<f64>;
}

impl<F> Objective for F
where
    F: FnMut(&[f64]) -> Result<f64>,
{
    fn evaluate(&mut self, parameters: &[f64]) -> Result<f64> {
        self(parameters)
    }
}

/// Best point found by a minimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Parameters at the minimum.
    pub parameters: Vec<f64>,
    /// Objective value at `parameters`.
    pub value: f64,
    /// Number of objective evaluations spent.
    pub evaluations: usize,
}

/// Derivative-free minimizer.
///
/// # Examples
///
/// ```rust
/// use ritk_registration::optimizer::{Minimizer, Minimum, Objective};
/// use ritk_registration::Result;
///
/// /// Evaluates only the starting point.
/// struct Identity;
///
/// impl Minimizer for Identity {
///     fn minimize(&mut self, objective: &mut dyn Objective, initial: &[f64]) -> Result<Minimum> {
///         let value = objective.evaluate(initial)?;
///         Ok(Minimum { parameters: initial.to_vec(), value, evaluations: 1 })
///     }
/// }
///
/// let mut objective = |p: &[f64]| -> Result<f64> { Ok(p[0] * p[0]) };
/// let minimum = Identity.minimize(&mut objective, &[3.0]).unwrap();
/// assert_eq!(minimum.value, 9.0);
/// ```
pub trait Minimizer {
    /// Search for parameters minimizing `objective`, starting at `initial`.
    ///
    /// # Arguments
    /// * `objective` - The function to minimize
    /// * `initial` - Starting parameters
    ///
    /// # Returns
    /// The best parameters found, or the first error the objective raised
    fn minimize(&mut self, objective: &mut dyn Objective, initial: &[f64]) -> Result<Minimum>;
}
