//! Simulation [Round]: one simulate-then-estimate cycle.
use std::collections::BTreeSet;

use log::{debug, info, warn};
use rand::Rng;

use crate::{
    postfit::{evaluate, residuals, ResidualSummary},
    prelude::{
        Apriori, Config, Error, GeometryProvider, MeasurementSimulator, Observation, Solution,
        Solver, Vector3,
    },
    simulator::outlier_ids,
};

/// [Round] owns a fixed set of [Observation]s, the receiver ground truth
/// and the outcome of one solver run. Starting a new [Round] simply means
/// dropping this one: nothing is shared between rounds, except the [Config].
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    observations: Vec<Observation>,
    outlier_ids: BTreeSet<u32>,
    true_position_m: Vector3<f64>,
    true_clock_bias_m: f64,
    include_clock_bias: bool,
    apriori: Apriori,
    solver: Solver,
    solution: Option<Solution>,
}

impl Round {
    /// Simulates a new [Round].
    /// ## Inputs
    /// - cfg: [Config] preset
    /// - provider: [GeometryProvider] that supplies the satellites in sight
    /// - rng: random source, seed it for reproducible rounds
    pub fn simulate<P: GeometryProvider + ?Sized, R: Rng + ?Sized>(
        cfg: &Config,
        provider: &mut P,
        rng: &mut R,
    ) -> Result<Self, Error> {
        cfg.validate()?;

        let mut geometries = provider.satellites(&cfg.true_position, cfg.satellite_count)?;

        let total = geometries.len();
        geometries.retain(|sv| sv.in_sight());
        if geometries.len() < total {
            debug!(
                "discarded {} satellite(s) below horizon",
                total - geometries.len()
            );
        }

        let mut ids = BTreeSet::new();
        if !geometries.iter().all(|sv| ids.insert(sv.id)) {
            return Err(Error::Geometry("duplicate satellite identifier".to_string()));
        }

        let simulator = MeasurementSimulator::from_config(cfg);

        let observations = simulator.simulate(
            rng,
            &geometries,
            &cfg.true_position,
            cfg.true_clock_bias_m,
        )?;

        Ok(Self::from_observations(cfg, observations))
    }

    /// Builds a [Round] from already simulated [Observation]s.
    pub fn from_observations(cfg: &Config, observations: Vec<Observation>) -> Self {
        let outlier_ids = outlier_ids(&observations);

        info!(
            "new round: {} satellites, {} outliers",
            observations.len(),
            outlier_ids.len()
        );

        Self {
            observations,
            outlier_ids,
            true_position_m: cfg.true_position,
            true_clock_bias_m: cfg.true_clock_bias_m,
            include_clock_bias: cfg.include_clock_bias,
            apriori: cfg.apriori,
            solver: Solver::new(cfg.solver.clone()),
            solution: None,
        }
    }

    /// Runs the solver and evaluates the postfit residuals.
    /// The [Solution] is best effort: check [Solution::converged].
    pub fn estimate(&mut self) -> Result<&Solution, Error> {
        let solution =
            self.solver
                .solve(&self.observations, &self.apriori, self.include_clock_bias)?;

        if solution.converged {
            info!("{}", solution);
        } else {
            warn!("{}", solution);
        }

        self.observations = evaluate(&self.observations, &solution);
        Ok(&*self.solution.insert(solution))
    }

    /// [Observation]s of this [Round], with residuals once estimated.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Ground truth: identifiers of the biased [Observation]s.
    pub fn outlier_ids(&self) -> &BTreeSet<u32> {
        &self.outlier_ids
    }

    /// Receiver ground truth (m)
    pub fn true_position_m(&self) -> Vector3<f64> {
        self.true_position_m
    }

    /// Clock bias applied to every measurement (m)
    pub fn true_clock_bias_m(&self) -> f64 {
        self.true_clock_bias_m
    }

    /// [Solution], once estimated
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Signed residuals, once estimated.
    pub fn residuals(&self) -> Result<Vec<f64>, Error> {
        let solution = self.solution.as_ref().ok_or(Error::Unestimated)?;
        Ok(residuals(&self.observations, solution))
    }

    /// [ResidualSummary], once estimated.
    pub fn summary(&self) -> Result<Option<ResidualSummary>, Error> {
        if self.solution.is_none() {
            return Err(Error::Unestimated);
        }
        ResidualSummary::from_observations(&self.observations)
    }

    /// 3D distance between estimate and ground truth (m), once estimated.
    pub fn position_error_m(&self) -> Option<f64> {
        self.solution
            .as_ref()
            .map(|solution| (solution.position_m - self.true_position_m).norm())
    }
}
