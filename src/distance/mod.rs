//! Geodetic distance between positions
//!
//! Two models are provided:
//!
//! * [`haversine_distance`] treats the Earth as a sphere of radius
//!   [`EARTH_RADIUS_M`](crate::core::EARTH_RADIUS_M). Cheap, roughly 0.5% off the true geodesic.
//! * [`vincenty_distance`] iterates on the WGS-84 ellipsoid. Sub-millimetre
//!   accurate, several times more expensive.
//!
//! Both return meters and never fail. Code that needs "some distance" takes a
//! [`DistanceFunction`], which plain functions and closures already implement.

pub mod haversine;
pub mod vincenty;

pub use haversine::haversine_distance;
pub use vincenty::vincenty_distance;

use serde::{Deserialize, Serialize};

use crate::core::Position;

/// Distance strategy: a pure, symmetric mapping of two positions to meters
pub trait DistanceFunction: Send + Sync {
    fn distance(&self, a: Position, b: Position) -> f64;
}

impl<F> DistanceFunction for F
where
    F: Fn(Position, Position) -> f64 + Send + Sync,
{
    fn distance(&self, a: Position, b: Position) -> f64 {
        self(a, b)
    }
}

/// Built-in distance models, selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMethod {
    #[default]
    Haversine,
    Vincenty,
}

impl DistanceFunction for DistanceMethod {
    fn distance(&self, a: Position, b: Position) -> f64 {
        match self {
            DistanceMethod::Haversine => haversine_distance(a, b),
            DistanceMethod::Vincenty => vincenty_distance(a, b),
        }
    }
}
