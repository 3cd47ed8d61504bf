//! Position estimation from distance measurements
//!
//! The estimate is the point minimizing the weighted sum of squared
//! differences between the modelled distance to each reference point and the
//! observed distance:
//!
//! ```text
//! F(p) = Σ weight_i · (d(p, ref_i) − distance_i)²
//! ```
//!
//! `d` is the configured [`DistanceFunction`], so every objective evaluation
//! computes one distance per measurement. The search starts at the weighted
//! centroid of the reference points.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use nalgebra::DVector;

use crate::algorithms::nelder_mead::{Minimizer, NelderMead};
use crate::core::{Estimate, Measurement, Position, DEFAULT_MAX_MEASUREMENTS};
use crate::distance::{DistanceFunction, DistanceMethod};
use crate::validation::{
    validate_count, validate_measurements, weighted_centroid, MinimizeError,
    TrilaterationError, TrilaterationResult,
};

/// Trilaterator configuration
#[derive(Clone)]
pub struct TrilateratorConfig {
    /// Distance model used inside the objective. Defaults to Haversine.
    pub distance_function: Arc<dyn DistanceFunction>,
    /// Largest number of measurements accepted per call (the smallest is always 1).
    /// Defaults to 3.
    pub max_measurements: usize,
}

impl Default for TrilateratorConfig {
    fn default() -> Self {
        Self {
            distance_function: Arc::new(DistanceMethod::Haversine),
            max_measurements: DEFAULT_MAX_MEASUREMENTS,
        }
    }
}

impl fmt::Debug for TrilateratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrilateratorConfig")
            .field("distance_function", &"<dyn DistanceFunction>")
            .field("max_measurements", &self.max_measurements)
            .finish()
    }
}

impl TrilateratorConfig {
    /// Use `distance_function` instead of Haversine, e.g. [`vincenty_distance`](crate::distance::vincenty_distance)
    pub fn with_distance_function<D>(mut self, distance_function: D) -> Self
    where
        D: DistanceFunction + 'static,
    {
        self.distance_function = Arc::new(distance_function);
        self
    }

    pub fn with_max_measurements(mut self, max_measurements: usize) -> Self {
        self.max_measurements = max_measurements;
        self
    }
}

/// Weighted least-squares position estimator
///
/// Holds only immutable configuration, so one instance can serve any number
/// of threads.
#[derive(Debug, Clone)]
pub struct Trilaterator<M = NelderMead> {
    config: TrilateratorConfig,
    minimizer: M,
}

impl Default for Trilaterator<NelderMead> {
    fn default() -> Self {
        Self::new()
    }
}

impl Trilaterator<NelderMead> {
    /// Haversine distances, up to 3 measurements, default Nelder-Mead settings
    pub fn new() -> Self {
        Self::with_config(TrilateratorConfig::default())
    }

    pub fn with_config(config: TrilateratorConfig) -> Self {
        Self::with_minimizer(config, NelderMead::new())
    }
}

impl<M: Minimizer> Trilaterator<M> {
    /// Use a different minimizer for the least-squares search
    pub fn with_minimizer(config: TrilateratorConfig, minimizer: M) -> Self {
        Self { config, minimizer }
    }

    pub fn config(&self) -> &TrilateratorConfig {
        &self.config
    }

    pub fn minimizer(&self) -> &M {
        &self.minimizer
    }

    /// Estimate a position from 1 to `max_measurements` measurements
    ///
    /// A single measurement is returned as is: its reference point is the
    /// position and its distance the accuracy. Otherwise all weights must be
    /// positive and all distances non-negative, and the accuracy of the
    /// best fit is `sqrt(F_min) / n`.
    pub fn trilaterate(&self, measurements: &[Measurement]) -> TrilaterationResult<Estimate> {
        validate_count(measurements.len(), self.config.max_measurements)?;

        if let [single] = measurements {
            debug!("single measurement, returning reference point {}", single.position());
            return Ok(Estimate {
                position: single.position(),
                accuracy: single.distance,
                iterations: 0,
                evaluations: 0,
            });
        }

        validate_measurements(measurements)?;

        let (initial_lat, initial_lon) = weighted_centroid(measurements);
        debug!(
            "trilaterating {} measurements from {}",
            measurements.len(),
            Position::new(initial_lat, initial_lon)
        );

        let distance_function = &self.config.distance_function;
        let objective = |x: &DVector<f64>| {
            let candidate = Position::new(x[0], x[1]);
            measurements.iter().fold(0.0, |sum, m| {
                let diff = distance_function.distance(candidate, m.position()) - m.distance;
                sum + m.weight * diff * diff
            })
        };

        let minimum = self
            .minimizer
            .minimize(&objective, DVector::from_vec(vec![initial_lat, initial_lon]))
            .map_err(|e| {
                warn!("trilateration of {} measurements failed: {}", measurements.len(), e);
                TrilaterationError::from(e)
            })?;

        let (latitude, longitude) = match minimum.point.as_slice() {
            &[latitude, longitude] => (latitude, longitude),
            other => {
                let err = MinimizeError::DimensionMismatch {
                    expected: 2,
                    actual: other.len(),
                };
                warn!("trilateration of {} measurements failed: {}", measurements.len(), err);
                return Err(err.into());
            }
        };
        let position = Position::new(latitude, longitude);
        let accuracy = minimum.value.sqrt() / measurements.len() as f64;
        debug!(
            "estimated {} with accuracy {:.3} m after {} iterations",
            position, accuracy, minimum.iterations
        );

        Ok(Estimate {
            position,
            accuracy,
            iterations: minimum.iterations,
            evaluations: minimum.evaluations,
        })
    }

    /// [`trilaterate`](Self::trilaterate) in `(position, accuracy, error)` form
    ///
    /// On error the position is [`Position::EMPTY`] and the accuracy 0; both
    /// must be ignored.
    pub fn trilaterate_or_empty(
        &self,
        measurements: &[Measurement],
    ) -> (Position, f64, Option<TrilaterationError>) {
        match self.trilaterate(measurements) {
            Ok(estimate) => (estimate.position, estimate.accuracy, None),
            Err(e) => (Position::EMPTY, 0.0, Some(e)),
        }
    }
}

/// Trilaterate with the default configuration
pub fn trilaterate(measurements: &[Measurement]) -> TrilaterationResult<Estimate> {
    Trilaterator::new().trilaterate(measurements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::nelder_mead::{Minimum, NelderMeadSettings};
    use crate::distance::{haversine_distance, vincenty_distance};
    use crate::validation::MinimizeError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_reference_measurements() -> Vec<Measurement> {
        vec![
            Measurement::new(47.41331043239206, 8.536443579900189, 0.7686246100397739, 1.0),
            Measurement::new(47.41321841412086, 8.536437101250389, 0.8767123872968682, 1.0),
            Measurement::new(47.41330944456364, 8.536520373280595, 1.4839817889675653, 1.0),
        ]
    }

    fn create_beacon_measurements() -> Vec<Measurement> {
        vec![
            Measurement::new(47.4133, 8.5364, 500.0, 1.0),
            Measurement::new(47.4100, 8.5400, 300.0, 1.0),
            Measurement::new(47.4120, 8.5450, 400.0, 1.0),
        ]
    }

    fn rounded(estimate: &Estimate) -> (String, String, String) {
        (
            format!("{:.4}", estimate.position.latitude),
            format!("{:.4}", estimate.position.longitude),
            format!("{:.2}", estimate.accuracy),
        )
    }

    struct FailingMinimizer;

    impl Minimizer for FailingMinimizer {
        fn minimize(
            &self,
            _objective: &dyn Fn(&DVector<f64>) -> f64,
            _initial: DVector<f64>,
        ) -> Result<Minimum, MinimizeError> {
            Err(MinimizeError::MaxIterationsReached {
                iterations: 7,
                best_value: 1.5,
            })
        }
    }

    #[test]
    fn test_reference_scenario() {
        let estimate = Trilaterator::new()
            .trilaterate(&create_reference_measurements())
            .unwrap();

        assert!((estimate.position.longitude - 8.536464538143443).abs() < 1e-12);
        assert!((estimate.position.latitude - 47.413276910646324).abs() < 1e-12);
        assert!((estimate.accuracy - 2.637536791157061).abs() < 1e-12);
        assert!(estimate.iterations > 0);
    }

    #[test]
    fn test_free_function_matches_default() {
        let measurements = create_reference_measurements();
        assert_eq!(
            trilaterate(&measurements).unwrap(),
            Trilaterator::new().trilaterate(&measurements).unwrap()
        );
    }

    #[test]
    fn test_beacon_scenario_haversine() {
        let estimate = Trilaterator::new()
            .trilaterate(&create_beacon_measurements())
            .unwrap();
        assert_eq!(
            rounded(&estimate),
            ("47.4094".to_string(), "8.5423".to_string(), "57.54".to_string())
        );
    }

    #[test]
    fn test_beacon_scenario_vincenty() {
        let config = TrilateratorConfig::default().with_distance_function(vincenty_distance);
        let estimate = Trilaterator::with_config(config)
            .trilaterate(&create_beacon_measurements())
            .unwrap();
        assert_eq!(
            rounded(&estimate),
            ("47.4095".to_string(), "8.5423".to_string(), "57.60".to_string())
        );
    }

    #[test]
    fn test_beacon_scenario_weighted() {
        let mut measurements = create_beacon_measurements();
        measurements[1].weight = 2.0;
        measurements[2].weight = 0.5;

        let estimate = Trilaterator::new().trilaterate(&measurements).unwrap();
        assert_eq!(
            rounded(&estimate),
            ("47.4124".to_string(), "8.5418".to_string(), "45.52".to_string())
        );
    }

    #[test]
    fn test_heavier_weight_pulls_estimate() {
        let trilaterator = Trilaterator::new();
        let measurements = create_reference_measurements();
        let anchor = measurements[0].position();

        let baseline = trilaterator.trilaterate(&measurements).unwrap();

        let mut weighted = measurements.clone();
        weighted[0].weight = 4.0;
        let pulled = trilaterator.trilaterate(&weighted).unwrap();

        let before = haversine_distance(baseline.position, anchor);
        let after = haversine_distance(pulled.position, anchor);
        assert!(after < before, "{} should be below {}", after, before);
    }

    #[test]
    fn test_single_measurement_short_circuits() {
        let measurement = Measurement::new(47.4133, 8.5364, 12.5, 1.0);
        let estimate = Trilaterator::new().trilaterate(&[measurement]).unwrap();

        assert_eq!(estimate.position, Position::new(47.4133, 8.5364));
        assert_eq!(estimate.accuracy, 12.5);
        assert_eq!(estimate.iterations, 0);
    }

    #[test]
    fn test_single_measurement_skips_value_checks() {
        let measurement = Measurement::new(47.4133, 8.5364, -1.0, 0.0);
        let estimate = Trilaterator::new().trilaterate(&[measurement]).unwrap();
        assert_eq!(estimate.accuracy, -1.0);
    }

    #[test]
    fn test_invalid_measurement_count() {
        let trilaterator = Trilaterator::new();

        assert_eq!(
            trilaterator.trilaterate(&[]),
            Err(TrilaterationError::InvalidMeasurementCount { count: 0, max: 3 })
        );

        let mut measurements = create_beacon_measurements();
        measurements.push(Measurement::new(47.4110, 8.5380, 250.0, 1.0));
        assert_eq!(
            trilaterator.trilaterate(&measurements),
            Err(TrilaterationError::InvalidMeasurementCount { count: 4, max: 3 })
        );
    }

    #[test]
    fn test_raised_measurement_bound() {
        let config = TrilateratorConfig::default().with_max_measurements(5);
        let mut measurements = create_beacon_measurements();
        measurements.push(Measurement::new(47.4110, 8.5380, 250.0, 1.0));

        let estimate = Trilaterator::with_config(config)
            .trilaterate(&measurements)
            .unwrap();
        assert!(estimate.position.is_valid());
        assert!(estimate.accuracy.is_finite());
    }

    #[test]
    fn test_rejects_non_positive_weight() {
        for weight in [0.0, -2.0] {
            let mut measurements = create_reference_measurements();
            measurements[1].weight = weight;
            assert_eq!(
                Trilaterator::new().trilaterate(&measurements),
                Err(TrilaterationError::NonPositiveWeight { index: 1, weight })
            );
        }
    }

    #[test]
    fn test_rejects_negative_distance() {
        let mut measurements = create_reference_measurements();
        measurements[2].distance = -0.1;
        assert_eq!(
            Trilaterator::new().trilaterate(&measurements),
            Err(TrilaterationError::NegativeDistance {
                index: 2,
                distance: -0.1
            })
        );
    }

    #[test]
    fn test_validation_runs_before_optimization() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = TrilateratorConfig::default().with_distance_function(
            move |a: Position, b: Position| {
                counter.fetch_add(1, Ordering::SeqCst);
                haversine_distance(a, b)
            },
        );

        let mut measurements = create_reference_measurements();
        measurements[0].weight = 0.0;
        assert!(Trilaterator::with_config(config)
            .trilaterate(&measurements)
            .is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_one_distance_per_measurement_per_evaluation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = TrilateratorConfig::default().with_distance_function(
            move |a: Position, b: Position| {
                counter.fetch_add(1, Ordering::SeqCst);
                haversine_distance(a, b)
            },
        );

        let estimate = Trilaterator::with_config(config)
            .trilaterate(&create_reference_measurements())
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3 * estimate.evaluations);
    }

    #[test]
    fn test_minimizer_failure_is_propagated() {
        let trilaterator =
            Trilaterator::with_minimizer(TrilateratorConfig::default(), FailingMinimizer);
        assert_eq!(
            trilaterator.trilaterate(&create_reference_measurements()),
            Err(TrilaterationError::OptimizationFailure(
                MinimizeError::MaxIterationsReached {
                    iterations: 7,
                    best_value: 1.5
                }
            ))
        );
    }

    struct FlatMinimizer;

    impl Minimizer for FlatMinimizer {
        fn minimize(
            &self,
            objective: &dyn Fn(&DVector<f64>) -> f64,
            initial: DVector<f64>,
        ) -> Result<Minimum, MinimizeError> {
            Ok(Minimum {
                value: objective(&initial),
                point: DVector::from_vec(vec![initial[0]]),
                iterations: 1,
                evaluations: 1,
            })
        }
    }

    #[test]
    fn test_wrong_dimension_from_minimizer_is_an_error() {
        let trilaterator = Trilaterator::with_minimizer(TrilateratorConfig::default(), FlatMinimizer);
        assert_eq!(
            trilaterator.trilaterate(&create_reference_measurements()),
            Err(TrilaterationError::OptimizationFailure(
                MinimizeError::DimensionMismatch {
                    expected: 2,
                    actual: 1
                }
            ))
        );
    }

    #[test]
    fn test_iteration_cap_surfaces_as_optimization_failure() {
        let minimizer = NelderMead::with_settings(NelderMeadSettings {
            max_iterations: 3,
            ..Default::default()
        })
        .unwrap();
        let trilaterator = Trilaterator::with_minimizer(TrilateratorConfig::default(), minimizer);

        let err = trilaterator
            .trilaterate(&create_reference_measurements())
            .unwrap_err();
        assert!(matches!(
            err,
            TrilaterationError::OptimizationFailure(MinimizeError::MaxIterationsReached { .. })
        ));
    }

    #[test]
    fn test_trilaterate_or_empty() {
        let trilaterator = Trilaterator::new();

        let (position, accuracy, err) = trilaterator.trilaterate_or_empty(&[]);
        assert_eq!(position, Position::EMPTY);
        assert_eq!(accuracy, 0.0);
        assert!(matches!(
            err,
            Some(TrilaterationError::InvalidMeasurementCount { .. })
        ));

        let measurements = create_reference_measurements();
        let (position, accuracy, err) = trilaterator.trilaterate_or_empty(&measurements);
        let estimate = trilaterator.trilaterate(&measurements).unwrap();
        assert!(err.is_none());
        assert_eq!((position, accuracy), estimate.into_parts());
    }

    #[test]
    fn test_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Trilaterator>();

        let trilaterator = Trilaterator::new();
        let measurements = create_reference_measurements();
        let expected = trilaterator.trilaterate(&measurements).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| trilaterator.trilaterate(&measurements).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_config_debug_and_defaults() {
        let config = TrilateratorConfig::default();
        assert_eq!(config.max_measurements, 3);
        assert!(format!("{:?}", config).contains("max_measurements: 3"));
    }
}
