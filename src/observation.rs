#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{SatelliteGeometry, Vector3};

/// Simulation ground truth, attached to each [Observation].
/// Never accessed by the solver.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroundTruth {
    /// Injected bias (m), null when not an outlier
    pub bias_m: f64,
    /// True when a bias was injected
    pub is_outlier: bool,
}

/// One pseudo range [Observation] per satellite in sight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Satellite identifier, unique within the [Round]
    pub id: u32,
    /// Satellite position (m)
    pub position_m: Vector3<f64>,
    /// Azimuth angle from RX position
    pub azimuth_deg: f64,
    /// Elevation angle from RX position
    pub elevation_deg: f64,
    /// Simulated pseudo range (m)
    pub pseudo_range_m: f64,
    /// Signed postfit residual (m), available once estimated.
    pub residual_m: Option<f64>,
    truth: GroundTruth,
}

impl Observation {
    /// Builds a new [Observation] from [SatelliteGeometry] and pseudo range (m).
    pub fn new(geometry: &SatelliteGeometry, pseudo_range_m: f64) -> Self {
        Self {
            id: geometry.id,
            position_m: geometry.position_m,
            azimuth_deg: geometry.azimuth_deg,
            elevation_deg: geometry.elevation_deg,
            pseudo_range_m,
            residual_m: None,
            truth: GroundTruth::default(),
        }
    }

    /// Copies and returns [Observation] with attached [GroundTruth]
    pub fn with_ground_truth(&self, truth: GroundTruth) -> Self {
        let mut s = self.clone();
        s.truth = truth;
        s
    }

    /// Copies and returns [Observation] with updated residual (m)
    pub(crate) fn with_residual(&self, residual_m: f64) -> Self {
        let mut s = self.clone();
        s.residual_m = Some(residual_m);
        s
    }

    /// Simulation [GroundTruth]
    pub fn ground_truth(&self) -> GroundTruth {
        self.truth
    }

    /// Injected bias (m), null when not an outlier
    pub fn bias_m(&self) -> f64 {
        self.truth.bias_m
    }

    /// True when this [Observation] was deliberately biased
    pub fn is_outlier(&self) -> bool {
        self.truth.is_outlier
    }

    /// Geometric range from given position (m)
    pub fn range_m(&self, position_m: &Vector3<f64>) -> f64 {
        (self.position_m - position_m).norm()
    }
}
