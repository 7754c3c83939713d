//! Robust WLS position solver
use log::{debug, warn};

use nalgebra::{allocator::Allocator, DefaultAllocator, DimName, OMatrix, OVector, U3, U4};

use crate::prelude::{
    Apriori, Error, Observation, Solution, SolverOpts, Termination, Vector3, Weighting,
};

/// Weighted normal equations JᵀWJ Δ = JᵀWr, formed at one state.
struct NormalEquations<D: DimName>
where
    DefaultAllocator: Allocator<D> + Allocator<D, D>,
{
    /// JᵀWJ (regularized)
    n: OMatrix<f64, D, D>,
    /// JᵀWr
    b: OVector<f64, D>,
    /// Per observation weights
    weights: Vec<f64>,
}

impl<D: DimName> NormalEquations<D>
where
    DefaultAllocator: Allocator<D> + Allocator<D, D>,
{
    /// Forms [NormalEquations] at state `x`.
    /// Returns None when the estimate coincides with one satellite
    /// (line of sight is then undefined).
    fn new(
        observations: &[Observation],
        x: &OVector<f64, D>,
        weighting: &Weighting,
        regularization: f64,
    ) -> Option<Self> {
        let with_clock = D::USIZE > 3;
        let position = Vector3::new(x[0], x[1], x[2]);
        let clock_bias = if with_clock { x[3] } else { 0.0 };

        let mut n = OMatrix::<f64, D, D>::zeros();
        let mut b = OVector::<f64, D>::zeros();
        let mut weights = Vec::with_capacity(observations.len());

        for obs in observations.iter() {
            let rho = obs.range_m(&position);
            if !(rho > 0.0 && rho.is_finite()) {
                return None;
            }

            let residual = obs.pseudo_range_m - (rho + clock_bias);
            let w = weighting.weight(residual);

            let mut h = OVector::<f64, D>::zeros();
            h[0] = (position[0] - obs.position_m[0]) / rho;
            h[1] = (position[1] - obs.position_m[1]) / rho;
            h[2] = (position[2] - obs.position_m[2]) / rho;
            if with_clock {
                h[3] = 1.0;
            }

            n.ger(w, &h, &h, 1.0);
            b.axpy(w * residual, &h, 1.0);
            weights.push(w);
        }

        for i in 0..D::USIZE {
            n[(i, i)] += regularization;
        }

        Some(Self { n, b, weights })
    }

    /// Solves for the state update Δ
    fn solve(&self) -> Result<OVector<f64, D>, Error> {
        let n_inv = self.n.clone().try_inverse().ok_or(Error::SingularMatrix)?;
        let dx = n_inv * &self.b;
        if dx.iter().all(|dx| dx.is_finite()) {
            Ok(dx)
        } else {
            Err(Error::SingularMatrix)
        }
    }
}

/// [Solver] estimates the receiver position (and possibly its clock bias)
/// from a set of pseudo range [Observation]s, by iteratively reweighted
/// least squares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solver {
    /// [SolverOpts]
    pub opts: SolverOpts,
}

impl Solver {
    /// Creates a new [Solver]
    pub fn new(opts: SolverOpts) -> Self {
        Self { opts }
    }

    /// Number of observations required to estimate the state:
    /// strictly more than the number of parameters.
    pub fn min_observations(include_clock_bias: bool) -> usize {
        if include_clock_bias {
            U4::USIZE + 1
        } else {
            U3::USIZE + 1
        }
    }

    /// [Solution] resolution attempt.
    /// ## Inputs
    /// - observations: pseudo range [Observation]s. Ground truth is never used.
    /// - apriori: [Apriori] we iterate from
    /// - include_clock_bias: estimate the clock bias as 4th parameter
    /// ## Returns
    /// - [Solution], always best effort: check [Solution::converged].
    /// - [Error::InsufficientObservations] when the system is under determined.
    /// - [Error::InvalidSolverOpts] on invalid parametrization.
    pub fn solve(
        &self,
        observations: &[Observation],
        apriori: &Apriori,
        include_clock_bias: bool,
    ) -> Result<Solution, Error> {
        self.opts.validate()?;

        let required = Self::min_observations(include_clock_bias);
        if observations.len() < required {
            return Err(Error::InsufficientObservations {
                required,
                provided: observations.len(),
            });
        }

        if include_clock_bias {
            Ok(self.resolve::<U4>(observations, apriori))
        } else {
            Ok(self.resolve::<U3>(observations, apriori))
        }
    }

    /// Weights attributed to each [Observation] at given state.
    pub fn weights(
        &self,
        observations: &[Observation],
        position_m: &Vector3<f64>,
        clock_bias_m: f64,
    ) -> Vec<f64> {
        observations
            .iter()
            .map(|obs| {
                let residual = obs.pseudo_range_m - (obs.range_m(position_m) + clock_bias_m);
                self.opts.weighting.weight(residual)
            })
            .collect()
    }

    fn resolve<D: DimName>(&self, observations: &[Observation], apriori: &Apriori) -> Solution
    where
        DefaultAllocator: Allocator<D> + Allocator<D, D>,
    {
        let with_clock = D::USIZE > 3;

        let mut x = OVector::<f64, D>::zeros();
        x[0] = apriori.position_m[0];
        x[1] = apriori.position_m[1];
        x[2] = apriori.position_m[2];
        if with_clock {
            x[3] = apriori.clock_bias_m;
        }

        let mut iterations = 0;
        let mut weights = vec![1.0; observations.len()];
        let mut update_norm_m = f64::INFINITY;
        let mut termination = Termination::MaxIterations;

        for iter in 0..self.opts.max_iterations {
            let Some(equations) = NormalEquations::<D>::new(
                observations,
                &x,
                &self.opts.weighting,
                self.opts.regularization,
            ) else {
                warn!("(i={}) degenerate geometry: estimate located at satellite", iter);
                termination = Termination::SingularMatrix;
                break;
            };

            weights = equations.weights.clone();

            let dx = match equations.solve() {
                Ok(dx) => dx,
                Err(e) => {
                    warn!("(i={}) {}: aborting", iter, e);
                    termination = Termination::SingularMatrix;
                    break;
                },
            };

            x += &dx;
            iterations += 1;
            update_norm_m = dx.norm();

            debug!(
                "(i={}) |dx|={:.6E} x={:.3} y={:.3} z={:.3}",
                iter, update_norm_m, x[0], x[1], x[2]
            );

            if update_norm_m < self.opts.tolerance {
                termination = Termination::Converged;
                break;
            }
        }

        if termination == Termination::MaxIterations {
            warn!(
                "no convergence after {} iterations (|dx|={:.6E})",
                iterations, update_norm_m
            );
        }

        Solution {
            position_m: Vector3::new(x[0], x[1], x[2]),
            clock_bias_m: if with_clock { Some(x[3]) } else { None },
            iterations,
            converged: termination == Termination::Converged,
            termination,
            weights,
            update_norm_m,
        }
    }
}
