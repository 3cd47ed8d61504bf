//! Input validation and error types

pub mod error;
pub mod measurements;

pub use error::{
    ConfigError, MinimizeError, PositionError, TrilaterationError, TrilaterationResult,
};
pub use measurements::{validate_count, validate_measurements, weighted_centroid};
