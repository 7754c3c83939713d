#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::DEFAULT_RX_POSITION_M,
    prelude::{Apriori, Error, MeasurementSimulator, Vector3},
};

mod solver;
pub use solver::{SolverOpts, Weighting};

fn default_satellite_count() -> usize {
    Difficulty::Easy.satellite_count()
}

fn default_outlier_probability() -> f64 {
    Difficulty::Easy.outlier_probability()
}

fn default_bias_range() -> (f64, f64) {
    (10.0, 20.0)
}

fn default_noise_amplitude() -> f64 {
    0.5
}

fn default_true_position() -> Vector3<f64> {
    let (x, y, z) = DEFAULT_RX_POSITION_M;
    Vector3::new(x, y, z)
}

/// [Difficulty] level: more satellites, more outliers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Difficulty {
    /// 10 satellites, 10% outliers
    #[default]
    Easy,
    /// 15 satellites, 20% outliers
    Medium,
    /// 20 satellites, 30% outliers
    Hard,
}

impl Difficulty {
    /// Number of satellites in sight
    pub const fn satellite_count(&self) -> usize {
        match self {
            Self::Easy => 10,
            Self::Medium => 15,
            Self::Hard => 20,
        }
    }

    /// Probability for each measurement to be an outlier
    pub const fn outlier_probability(&self) -> f64 {
        match self {
            Self::Easy => 0.1,
            Self::Medium => 0.2,
            Self::Hard => 0.3,
        }
    }
}

/// Round [Config]uration. This is the only thing that persists
/// from one [Round] to another.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Number of satellites requested to the geometry provider
    #[cfg_attr(feature = "serde", serde(default = "default_satellite_count"))]
    pub satellite_count: usize,
    /// Probability for each measurement to be an outlier, in [0, 1]
    #[cfg_attr(feature = "serde", serde(default = "default_outlier_probability"))]
    pub outlier_probability: f64,
    /// Outlier bias is uniformly drawn in [bias_range.0, bias_range.1) (m)
    #[cfg_attr(feature = "serde", serde(default = "default_bias_range"))]
    pub bias_range: (f64, f64),
    /// Measurement noise is uniformly drawn in [-a, a) (m)
    #[cfg_attr(feature = "serde", serde(default = "default_noise_amplitude"))]
    pub noise_amplitude_m: f64,
    /// Estimate the clock bias as a fourth state parameter
    #[cfg_attr(feature = "serde", serde(default))]
    pub include_clock_bias: bool,
    /// Clock bias applied to every simulated measurement (m)
    #[cfg_attr(feature = "serde", serde(default))]
    pub true_clock_bias_m: f64,
    /// Receiver ground truth (m)
    #[cfg_attr(feature = "serde", serde(default = "default_true_position"))]
    pub true_position: Vector3<f64>,
    /// Solver initial guess
    #[cfg_attr(feature = "serde", serde(default))]
    pub apriori: Apriori,
    /// [SolverOpts]
    #[cfg_attr(feature = "serde", serde(default))]
    pub solver: SolverOpts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            satellite_count: default_satellite_count(),
            outlier_probability: default_outlier_probability(),
            bias_range: default_bias_range(),
            noise_amplitude_m: default_noise_amplitude(),
            include_clock_bias: false,
            true_clock_bias_m: 0.0,
            true_position: default_true_position(),
            apriori: Apriori::default(),
            solver: SolverOpts::default(),
        }
    }
}

impl Config {
    /// [Config] preset for this [Difficulty] level.
    /// Everything else is left to defaults.
    pub fn preset(difficulty: Difficulty) -> Self {
        Self::default()
            .with_satellite_count(difficulty.satellite_count())
            .with_outlier_probability(difficulty.outlier_probability())
    }

    /// Copies and returns [Config] with updated number of satellites
    pub fn with_satellite_count(&self, satellite_count: usize) -> Self {
        let mut s = self.clone();
        s.satellite_count = satellite_count;
        s
    }

    /// Copies and returns [Config] with updated outlier probability
    pub fn with_outlier_probability(&self, probability: f64) -> Self {
        let mut s = self.clone();
        s.outlier_probability = probability;
        s
    }

    /// Copies and returns [Config] with updated outlier bias range (m)
    pub fn with_bias_range(&self, min_m: f64, max_m: f64) -> Self {
        let mut s = self.clone();
        s.bias_range = (min_m, max_m);
        s
    }

    /// Copies and returns [Config] with updated noise amplitude (m)
    pub fn with_noise_amplitude(&self, amplitude_m: f64) -> Self {
        let mut s = self.clone();
        s.noise_amplitude_m = amplitude_m;
        s
    }

    /// Copies and returns [Config] with clock bias simulated and estimated.
    pub fn with_clock_bias(&self, clock_bias_m: f64) -> Self {
        let mut s = self.clone();
        s.include_clock_bias = true;
        s.true_clock_bias_m = clock_bias_m;
        s
    }

    /// Copies and returns [Config] with clock bias neither simulated nor estimated.
    pub fn without_clock_bias(&self) -> Self {
        let mut s = self.clone();
        s.include_clock_bias = false;
        s.true_clock_bias_m = 0.0;
        s
    }

    /// Copies and returns [Config] with updated receiver ground truth (m)
    pub fn with_true_position(&self, position_m: Vector3<f64>) -> Self {
        let mut s = self.clone();
        s.true_position = position_m;
        s
    }

    /// Copies and returns [Config] with updated [Apriori]
    pub fn with_apriori(&self, apriori: Apriori) -> Self {
        let mut s = self.clone();
        s.apriori = apriori;
        s
    }

    /// Copies and returns [Config] with updated [SolverOpts]
    pub fn with_solver_opts(&self, opts: SolverOpts) -> Self {
        let mut s = self.clone();
        s.solver = opts;
        s
    }

    /// Verifies this [Config] prior running a [Round].
    pub fn validate(&self) -> Result<(), Error> {
        if self.satellite_count == 0 {
            return Err(Error::InvalidConfig("satellite_count must be positive"));
        }
        MeasurementSimulator::from_config(self).validate()?;
        if !self.true_clock_bias_m.is_finite() {
            return Err(Error::InvalidConfig("true_clock_bias_m must be finite"));
        }
        self.solver.validate()
    }
}
