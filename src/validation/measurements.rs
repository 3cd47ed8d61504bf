//! Eager checks on a measurement set before estimation

use log::debug;

use crate::core::Measurement;
use crate::validation::error::{TrilaterationError, TrilaterationResult};

/// Check that `count` lies in `1..=max`
pub fn validate_count(count: usize, max: usize) -> TrilaterationResult<()> {
    if count < 1 || count > max {
        debug!("rejecting {} measurements (bound {})", count, max);
        return Err(TrilaterationError::InvalidMeasurementCount { count, max });
    }
    Ok(())
}

/// Check weights and distances
///
/// Every weight is checked before any distance, so a set with both a bad
/// weight and a bad distance reports the weight.
pub fn validate_measurements(measurements: &[Measurement]) -> TrilaterationResult<()> {
    for (index, m) in measurements.iter().enumerate() {
        // negated so NaN is rejected too
        if !(m.weight > 0.0) {
            debug!("measurement {} has non-positive weight {}", index, m.weight);
            return Err(TrilaterationError::NonPositiveWeight {
                index,
                weight: m.weight,
            });
        }
    }

    for (index, m) in measurements.iter().enumerate() {
        if !(m.distance >= 0.0) {
            debug!("measurement {} has negative distance {}", index, m.distance);
            return Err(TrilaterationError::NegativeDistance {
                index,
                distance: m.distance,
            });
        }
    }

    Ok(())
}

/// Weighted centroid of the reference points, as `(lat, lon)`
///
/// Callers must have validated the weights; the total weight is then positive.
pub fn weighted_centroid(measurements: &[Measurement]) -> (f64, f64) {
    let mut lat = 0.0;
    let mut lon = 0.0;
    let mut total_weight = 0.0;
    for m in measurements {
        lat += m.lat * m.weight;
        lon += m.lon * m.weight;
        total_weight += m.weight;
    }
    (lat / total_weight, lon / total_weight)
}
