//! Error types for positioning, optimization and configuration

use thiserror::Error;

/// Result type for trilateration
pub type TrilaterationResult<T> = Result<T, TrilaterationError>;

/// Errors reported by [`Trilaterator::trilaterate`](crate::Trilaterator::trilaterate)
///
/// All input checks run before any optimization work is done.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrilaterationError {
    /// Fewer than one or more than `max` measurements supplied
    #[error("must provide 1-{max} measurements, got {count}")]
    InvalidMeasurementCount { count: usize, max: usize },

    /// A measurement weight is zero, negative or NaN
    #[error("weights must be positive: measurement {index} has weight {weight}")]
    NonPositiveWeight { index: usize, weight: f64 },

    /// A measurement distance is negative or NaN
    #[error("distances must not be negative: measurement {index} has distance {distance}")]
    NegativeDistance { index: usize, distance: f64 },

    /// The minimizer did not produce a result
    #[error("optimization failed: {0}")]
    OptimizationFailure(#[from] MinimizeError),
}

/// Failures of the derivative-free minimizer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MinimizeError {
    /// Initial point has no coordinates
    #[error("initial point must have at least one dimension")]
    EmptyInitialPoint,

    /// Objective is NaN or infinite at the initial point
    #[error("objective is not finite at the initial point: {value}")]
    NonFiniteObjective { value: f64 },

    /// Iteration cap reached before the convergence test passed
    #[error("no convergence after {iterations} iterations (best value {best_value})")]
    MaxIterationsReached { iterations: usize, best_value: f64 },

    /// Returned point does not have the dimension of the initial point
    #[error("minimizer returned {actual} coordinates, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Minimizer settings out of range
    #[error("invalid minimizer setting {parameter} = {value}: {reason}")]
    InvalidSettings {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Rejected coordinates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("settings serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Optimizer settings rejected
    #[error(transparent)]
    Optimizer(#[from] MinimizeError),
}
