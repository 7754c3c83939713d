use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Not enough observations were proposed, with respect to the number of
    /// estimated parameters (3, or 4 when the clock bias is estimated).
    /// The normal equations only have a unique solution when the
    /// observation count strictly exceeds the parameter count.
    #[error("not enough observations: {provided} provided, {required} required")]
    InsufficientObservations { required: usize, provided: usize },

    /// Bad geometry or degenerate input may cause the algebric calculations
    /// to wind up here, even after regularization.
    #[error("failed to invert normal equations (singular matrix)")]
    SingularMatrix,

    /// Iteration cap was reached before the update norm fell below tolerance.
    #[error("no convergence after {iterations} iterations")]
    NonConvergence { iterations: usize },

    /// Invalid round [Config]uration
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Invalid [SolverOpts]
    #[error("invalid solver options: {0}")]
    InvalidSolverOpts(&'static str),

    /// [GeometryProvider] failed to deliver the satellites in sight.
    #[error("geometry provider error: {0}")]
    Geometry(String),

    /// Residuals only exist once the [Round] has been estimated.
    #[error("round has not been estimated yet")]
    Unestimated,
}
