//! WLS Solutions
use nalgebra::DVector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{Error, Vector3};

/// Reason the solver stopped iterating.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// Update norm fell below tolerance
    Converged,
    /// Iteration cap reached: best effort estimate
    #[default]
    MaxIterations,
    /// Normal equations could not be inverted (or the geometry degenerated):
    /// iteration aborted, last valid estimate is returned.
    SingularMatrix,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Converged => write!(f, "converged"),
            Self::MaxIterations => write!(f, "max iterations"),
            Self::SingularMatrix => write!(f, "singular matrix"),
        }
    }
}

/// [Solution] of a WLS run. Always carries a best effort estimate,
/// check [Solution::converged] before trusting it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Estimated position (m)
    pub position_m: Vector3<f64>,
    /// Estimated clock bias (m), when part of the state
    pub clock_bias_m: Option<f64>,
    /// Number of updates applied to the initial guess
    pub iterations: usize,
    /// True when the update norm fell below tolerance
    pub converged: bool,
    /// Why the solver stopped
    pub termination: Termination,
    /// Observation weights used in the last iteration,
    /// in the order of the proposed observations.
    pub weights: Vec<f64>,
    /// Norm of the last applied update (m)
    pub update_norm_m: f64,
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "x={:.3} y={:.3} z={:.3}",
            self.position_m[0], self.position_m[1], self.position_m[2]
        )?;
        if let Some(clock_bias_m) = self.clock_bias_m {
            write!(f, " cb={:.3}", clock_bias_m)?;
        }
        write!(f, " ({} after {} iterations)", self.termination, self.iterations)
    }
}

impl Solution {
    /// Number of estimated parameters: 3, or 4 with clock bias.
    pub fn dimension(&self) -> usize {
        if self.clock_bias_m.is_some() {
            4
        } else {
            3
        }
    }

    /// Estimated state vector (x, y, z[, cb])
    pub fn state(&self) -> DVector<f64> {
        let mut state = self.position_m.iter().copied().collect::<Vec<_>>();
        if let Some(clock_bias_m) = self.clock_bias_m {
            state.push(clock_bias_m);
        }
        DVector::from_vec(state)
    }

    /// Range to given satellite, as modeled at this estimate (m)
    pub fn modeled_range_m(&self, sv_position_m: &Vector3<f64>) -> f64 {
        (sv_position_m - self.position_m).norm() + self.clock_bias_m.unwrap_or(0.0)
    }

    /// Converts this best effort [Solution] into a strict [Result].
    pub fn into_result(self) -> Result<Self, Error> {
        match self.termination {
            Termination::Converged => Ok(self),
            Termination::SingularMatrix => Err(Error::SingularMatrix),
            Termination::MaxIterations => Err(Error::NonConvergence {
                iterations: self.iterations,
            }),
        }
    }
}
