//! Physical constants and system parameters

/// Mean Earth radius used by the spherical model (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS-84 semi-major axis (m)
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// WGS-84 semi-minor axis (m)
pub const WGS84_SEMI_MINOR_AXIS_M: f64 = 6_356_752.314245;

/// WGS-84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// Maximum number of lambda iterations in the Vincenty inverse formula
pub const VINCENTY_MAX_ITERATIONS: usize = 100;

/// Lambda convergence threshold for the Vincenty inverse formula (rad)
pub const VINCENTY_CONVERGENCE_THRESHOLD: f64 = 1e-12;

/// Default upper bound on measurements accepted per trilateration call
pub const DEFAULT_MAX_MEASUREMENTS: usize = 3;
