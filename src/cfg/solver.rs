//! Solver configuration preset

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::Error;

const fn default_max_iterations() -> usize {
    10
}

const fn default_tolerance() -> f64 {
    1.0E-6
}

const fn default_regularization() -> f64 {
    1.0E-6
}

const fn default_epsilon() -> f64 {
    0.1
}

/// Observation [Weighting] policy, applied at every iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Weighting {
    /// All observations contribute equally: plain iterative least squares.
    Uniform,
    /// w = 1 / (epsilon + |residual|).
    /// Most discordant observations contribute the least to the next update.
    InverseResidual {
        /// Prevents the weight from blowing up on null residuals.
        #[cfg_attr(feature = "serde", serde(default = "default_epsilon"))]
        epsilon: f64,
    },
}

impl Default for Weighting {
    fn default() -> Self {
        Self::InverseResidual {
            epsilon: default_epsilon(),
        }
    }
}

impl Weighting {
    /// Weight attributed to an observation with this residual (in meters)
    pub fn weight(&self, residual_m: f64) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::InverseResidual { epsilon } => 1.0 / (epsilon + residual_m.abs()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverOpts {
    /// Maximal number of Gauss-Newton iterations
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
    /// Iteration stops once the update norm falls below this value
    #[cfg_attr(feature = "serde", serde(default = "default_tolerance"))]
    pub tolerance: f64,
    /// Added to the diagonal of JᵀWJ prior inversion
    #[cfg_attr(feature = "serde", serde(default = "default_regularization"))]
    pub regularization: f64,
    /// Observation [Weighting]
    #[cfg_attr(feature = "serde", serde(default))]
    pub weighting: Weighting,
}

impl Default for SolverOpts {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            regularization: default_regularization(),
            weighting: Weighting::default(),
        }
    }
}

impl SolverOpts {
    /// Parameter settings for precise convergence, when the iteration
    /// budget is not a concern.
    pub fn precise_preset() -> Self {
        Self {
            max_iterations: 50,
            tolerance: 1.0E-9,
            ..Default::default()
        }
    }

    /// Copies and returns [SolverOpts] with updated iteration cap
    pub fn with_max_iterations(&self, max_iterations: usize) -> Self {
        let mut s = self.clone();
        s.max_iterations = max_iterations;
        s
    }

    /// Copies and returns [SolverOpts] with updated tolerance
    pub fn with_tolerance(&self, tolerance: f64) -> Self {
        let mut s = self.clone();
        s.tolerance = tolerance;
        s
    }

    /// Copies and returns [SolverOpts] with updated regularization term
    pub fn with_regularization(&self, regularization: f64) -> Self {
        let mut s = self.clone();
        s.regularization = regularization;
        s
    }

    /// Copies and returns [SolverOpts] with updated [Weighting]
    pub fn with_weighting(&self, weighting: Weighting) -> Self {
        let mut s = self.clone();
        s.weighting = weighting;
        s
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidSolverOpts("max_iterations must be positive"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidSolverOpts("tolerance must be positive"));
        }
        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            return Err(Error::InvalidSolverOpts(
                "regularization must be null or positive",
            ));
        }
        if let Weighting::InverseResidual { epsilon } = self.weighting {
            if !(epsilon.is_finite() && epsilon > 0.0) {
                return Err(Error::InvalidSolverOpts("epsilon must be positive"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{SolverOpts, Weighting};
    use crate::prelude::Error;

    #[test]
    fn default_opts() {
        let opts = SolverOpts::default();
        assert_eq!(opts.max_iterations, 10);
        assert_eq!(opts.tolerance, 1.0E-6);
        assert_eq!(opts.regularization, 1.0E-6);
        assert_eq!(opts.weighting, Weighting::InverseResidual { epsilon: 0.1 });
        assert!(opts.validate().is_ok());

        let precise = SolverOpts::precise_preset();
        assert!(precise.max_iterations > opts.max_iterations);
        assert!(precise.tolerance < opts.tolerance);
        assert_eq!(precise.weighting, opts.weighting);
        assert!(precise.validate().is_ok());
    }

    #[test]
    fn weight_decreases_with_residual() {
        let weighting = Weighting::default();
        assert_eq!(weighting.weight(0.0), 10.0);
        assert!(weighting.weight(1.0) > weighting.weight(10.0));
        assert_eq!(weighting.weight(-5.0), weighting.weight(5.0));
        assert_eq!(Weighting::Uniform.weight(1000.0), 1.0);
    }

    #[test]
    fn invalid_opts() {
        for (opts, reason) in [
            (
                SolverOpts::default().with_max_iterations(0),
                "max_iterations must be positive",
            ),
            (
                SolverOpts::default().with_tolerance(0.0),
                "tolerance must be positive",
            ),
            (
                SolverOpts::default().with_tolerance(f64::NAN),
                "tolerance must be positive",
            ),
            (
                SolverOpts::default().with_regularization(-1.0),
                "regularization must be null or positive",
            ),
            (
                SolverOpts::default().with_weighting(Weighting::InverseResidual { epsilon: 0.0 }),
                "epsilon must be positive",
            ),
        ] {
            assert_eq!(opts.validate(), Err(Error::InvalidSolverOpts(reason)));
        }
    }
}
