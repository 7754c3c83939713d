#![doc = include_str!("../README.md")]

// private modules
mod apriori;
mod cfg;
mod constants;
mod error;
mod geometry;
mod observation;
mod postfit;
mod round;
mod simulator;
mod solutions;
mod solver;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::apriori::Apriori;
    pub use crate::cfg::{Config, Difficulty, SolverOpts, Weighting};
    pub use crate::error::Error;
    pub use crate::geometry::{
        ecef_from_geodetic, look_angles, FixedSky, GeometryProvider, RandomSky,
        SatelliteGeometry,
    };
    pub use crate::observation::{GroundTruth, Observation};
    pub use crate::postfit::{evaluate, residuals, ResidualSummary};
    pub use crate::round::Round;
    pub use crate::simulator::{outlier_ids, MeasurementSimulator};
    pub use crate::solutions::{Solution, Termination};
    pub use crate::solver::Solver;
    // re-export
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
