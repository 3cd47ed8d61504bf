//! Core data types for geolocation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::{haversine_distance, vincenty_distance};
use crate::validation::PositionError;

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude, -90 (south) to +90 (north)
    pub latitude: f64,
    /// Longitude, -180 (west) to +180 (east)
    pub longitude: f64,
}

impl Position {
    /// The (0, 0) placeholder returned alongside an error by
    /// [`Trilaterator::trilaterate_or_empty`](crate::Trilaterator::trilaterate_or_empty).
    /// It is a real point in the Gulf of Guinea, not "no position".
    pub const EMPTY: Position = Position {
        latitude: 0.0,
        longitude: 0.0,
    };

    /// Create a position without range checks
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a position, rejecting non-finite or out-of-range coordinates
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, PositionError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(PositionError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(PositionError::LongitudeOutOfRange(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Whether both coordinates are finite and within their ranges
    pub fn is_valid(&self) -> bool {
        Self::try_new(self.latitude, self.longitude).is_ok()
    }

    /// Great-circle distance to `other` on a spherical Earth (m)
    pub fn haversine_distance_to(&self, other: &Position) -> f64 {
        haversine_distance(*self, *other)
    }

    /// Geodesic distance to `other` on the WGS-84 ellipsoid (m)
    pub fn vincenty_distance_to(&self, other: &Position) -> f64 {
        vincenty_distance(*self, *other)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Distance observation from a known reference point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Reference latitude (decimal degrees)
    pub lat: f64,
    /// Reference longitude (decimal degrees)
    pub lon: f64,
    /// Observed distance from the reference point to the target (m), must be >= 0
    pub distance: f64,
    /// Reliability of the observation, must be > 0 (higher = more trusted)
    pub weight: f64,
}

impl Measurement {
    pub fn new(lat: f64, lon: f64, distance: f64, weight: f64) -> Self {
        Self {
            lat,
            lon,
            distance,
            weight,
        }
    }

    /// Reference point as a position
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon)
    }
}

/// Result of a successful trilateration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Best-fit position
    pub position: Position,
    /// Square root of the weighted residual sum divided by the measurement count (m)
    pub accuracy: f64,
    /// Minimizer iterations spent (0 for the single-measurement case)
    pub iterations: usize,
    /// Objective evaluations spent
    pub evaluations: usize,
}

impl Estimate {
    /// Split into the `(position, accuracy)` pair
    pub fn into_parts(self) -> (Position, f64) {
        (self.position, self.accuracy)
    }
}
