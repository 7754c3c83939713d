//! Pseudo range measurements simulation, with outlier injection.
use std::collections::BTreeSet;

use log::{debug, trace};
use rand::Rng;

use crate::prelude::{Config, Error, GroundTruth, Observation, SatelliteGeometry, Vector3};

/// [MeasurementSimulator] draws one pseudo range per satellite:
/// true geometric range + outlier bias + clock bias + noise.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSimulator {
    /// Probability for each measurement to be an outlier
    pub outlier_probability: f64,
    /// Outlier bias range [min, max) (m)
    pub bias_range: (f64, f64),
    /// Noise is uniformly drawn in [-a, a) (m)
    pub noise_amplitude_m: f64,
}

impl Default for MeasurementSimulator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl MeasurementSimulator {
    /// Builds [MeasurementSimulator] from round [Config]
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            outlier_probability: cfg.outlier_probability,
            bias_range: cfg.bias_range,
            noise_amplitude_m: cfg.noise_amplitude_m,
        }
    }

    /// Uniform draws require a finite interval width.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.outlier_probability) {
            return Err(Error::InvalidConfig("outlier_probability must lie in [0, 1]"));
        }
        let (min, max) = self.bias_range;
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || max < min {
            return Err(Error::InvalidConfig("invalid bias_range"));
        }
        if !(max - min).is_finite() {
            return Err(Error::InvalidConfig("bias_range is too wide"));
        }
        let a = self.noise_amplitude_m;
        if !(a.is_finite() && a >= 0.0) {
            return Err(Error::InvalidConfig(
                "noise_amplitude_m must be null or positive",
            ));
        }
        if !(2.0 * a).is_finite() {
            return Err(Error::InvalidConfig("noise_amplitude_m is too large"));
        }
        Ok(())
    }

    fn draw_bias<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (min, max) = self.bias_range;
        if max > min {
            rng.random_range(min..max)
        } else {
            min
        }
    }

    fn draw_noise<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let a = self.noise_amplitude_m;
        if a > 0.0 {
            rng.random_range(-a..a)
        } else {
            0.0
        }
    }

    /// Simulates one [Observation] per [SatelliteGeometry].
    /// ## Input
    /// - rng: random source, seed it for reproducible rounds
    /// - geometries: satellites in sight
    /// - true_position_m: receiver ground truth
    /// - true_clock_bias_m: clock bias common to all measurements
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        geometries: &[SatelliteGeometry],
        true_position_m: &Vector3<f64>,
        true_clock_bias_m: f64,
    ) -> Result<Vec<Observation>, Error> {
        self.validate()?;

        let observations = geometries
            .iter()
            .map(|geometry| {
                let is_outlier = rng.random_bool(self.outlier_probability);
                let bias_m = if is_outlier { self.draw_bias(rng) } else { 0.0 };

                let range_m = geometry.range_m(true_position_m);
                let noise_m = self.draw_noise(rng);
                let pseudo_range_m = range_m + bias_m + true_clock_bias_m + noise_m;

                trace!(
                    "sv={} range={:.3} bias={:.3} noise={:.3} pr={:.3}",
                    geometry.id,
                    range_m,
                    bias_m,
                    noise_m,
                    pseudo_range_m
                );

                Observation::new(geometry, pseudo_range_m)
                    .with_ground_truth(GroundTruth { bias_m, is_outlier })
            })
            .collect::<Vec<_>>();

        debug!(
            "simulated {} measurements, {} outliers",
            observations.len(),
            observations.iter().filter(|obs| obs.is_outlier()).count()
        );

        Ok(observations)
    }
}

/// Identifiers of the [Observation]s that were deliberately biased.
pub fn outlier_ids(observations: &[Observation]) -> BTreeSet<u32> {
    observations
        .iter()
        .filter_map(|obs| if obs.is_outlier() { Some(obs.id) } else { None })
        .collect()
}
