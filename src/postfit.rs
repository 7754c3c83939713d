//! Postfit residuals evaluation.
//!
//! Residuals are the signal presentation layers threshold or color-code
//! to suggest outlier-like behavior. No outlier decision is made here.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{Error, Observation, Solution};

/// Signed residual (measurement - modeled range) of each [Observation],
/// modeled at the [Solution].
pub fn residuals(observations: &[Observation], solution: &Solution) -> Vec<f64> {
    observations
        .iter()
        .map(|obs| obs.pseudo_range_m - solution.modeled_range_m(&obs.position_m))
        .collect()
}

/// Returns copies of the [Observation]s with residuals evaluated at the [Solution].
pub fn evaluate(observations: &[Observation], solution: &Solution) -> Vec<Observation> {
    observations
        .iter()
        .zip(residuals(observations, solution))
        .map(|(obs, residual)| obs.with_residual(residual))
        .collect()
}

/// [ResidualSummary] of evaluated [Observation]s
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResidualSummary {
    /// Root mean square of the residuals (m)
    pub rms_m: f64,
    /// Largest absolute residual (m)
    pub max_abs_m: f64,
    /// Identifier of the [Observation] with largest absolute residual
    pub worst_id: u32,
}

impl ResidualSummary {
    /// Summarizes evaluated [Observation]s.
    /// Returns None when no observations are provided,
    /// [Error::Unestimated] when one residual is missing.
    pub fn from_observations(observations: &[Observation]) -> Result<Option<Self>, Error> {
        let residuals = observations
            .iter()
            .map(|obs| obs.residual_m.map(|r| (obs.id, r)).ok_or(Error::Unestimated))
            .collect::<Result<Vec<_>, Error>>()?;

        let Some(&(first_id, first)) = residuals.first() else {
            return Ok(None);
        };

        let (worst_id, max_abs_m) = residuals.iter().skip(1).fold(
            (first_id, first.abs()),
            |(worst_id, max_abs), (id, r)| {
                if r.abs() > max_abs {
                    (*id, r.abs())
                } else {
                    (worst_id, max_abs)
                }
            },
        );

        let sum_sq = residuals.iter().map(|(_, r)| r * r).sum::<f64>();

        Ok(Some(Self {
            rms_m: (sum_sq / residuals.len() as f64).sqrt(),
            max_abs_m,
            worst_id,
        }))
    }
}
