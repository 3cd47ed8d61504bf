//! Derivative-free minimization with the Nelder-Mead simplex method

use std::cell::Cell;

use log::trace;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::validation::MinimizeError;

/// Best point found by a [`Minimizer`]
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Argument of the smallest objective value seen
    pub point: DVector<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Simplex iterations performed
    pub iterations: usize,
    /// Objective evaluations performed
    pub evaluations: usize,
}

/// Minimizes a scalar objective from an initial guess
///
/// Implementations must return a point with as many coordinates as
/// `initial`; callers reject anything else with
/// [`MinimizeError::DimensionMismatch`].
pub trait Minimizer {
    fn minimize(
        &self,
        objective: &dyn Fn(&DVector<f64>) -> f64,
        initial: DVector<f64>,
    ) -> Result<Minimum, MinimizeError>;
}

/// Nelder-Mead coefficients and stopping rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMeadSettings {
    /// Offset added to each coordinate of the initial point to build the simplex
    pub initial_step: f64,
    /// Reflection coefficient
    pub reflection: f64,
    /// Expansion coefficient
    pub expansion: f64,
    /// Contraction coefficient
    pub contraction: f64,
    /// Shrink coefficient
    pub shrink: f64,
    /// Improvement of the best value that resets the stall counter
    pub function_tolerance: f64,
    /// Consecutive iterations without such an improvement before stopping
    pub stall_iterations: usize,
    /// Hard iteration cap; reaching it is a failure
    pub max_iterations: usize,
}

impl Default for NelderMeadSettings {
    fn default() -> Self {
        Self {
            initial_step: 0.05,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            function_tolerance: 1e-10,
            stall_iterations: 100,
            max_iterations: 10_000,
        }
    }
}

impl NelderMeadSettings {
    /// Check coefficient ranges
    pub fn validate(&self) -> Result<(), MinimizeError> {
        let invalid = |parameter, value, reason| {
            Err(MinimizeError::InvalidSettings {
                parameter,
                value,
                reason,
            })
        };

        if !(self.initial_step > 0.0) || !self.initial_step.is_finite() {
            return invalid("initial_step", self.initial_step, "must be positive and finite");
        }
        if !(self.reflection > 0.0) {
            return invalid("reflection", self.reflection, "must be positive");
        }
        if !(self.expansion > 1.0) || self.expansion <= self.reflection {
            return invalid("expansion", self.expansion, "must exceed 1 and the reflection coefficient");
        }
        if !(self.contraction > 0.0 && self.contraction < 1.0) {
            return invalid("contraction", self.contraction, "must lie in (0, 1)");
        }
        if !(self.shrink > 0.0 && self.shrink < 1.0) {
            return invalid("shrink", self.shrink, "must lie in (0, 1)");
        }
        if !(self.function_tolerance >= 0.0) {
            return invalid("function_tolerance", self.function_tolerance, "must not be negative");
        }
        if self.stall_iterations == 0 {
            return invalid("stall_iterations", 0.0, "must be at least 1");
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations", 0.0, "must be at least 1");
        }
        Ok(())
    }
}

/// Nelder-Mead simplex minimizer
///
/// Vertices are kept sorted by objective value. Each iteration reflects the
/// worst vertex through the centroid of the others, then expands, contracts
/// or shrinks the whole simplex towards the best vertex. The search stops once
/// the best value has not improved by more than `function_tolerance` for
/// `stall_iterations` iterations in a row.
#[derive(Debug, Clone, Default)]
pub struct NelderMead {
    settings: NelderMeadSettings,
}

impl NelderMead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: NelderMeadSettings) -> Result<Self, MinimizeError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &NelderMeadSettings {
        &self.settings
    }
}

impl Minimizer for NelderMead {
    fn minimize(
        &self,
        objective: &dyn Fn(&DVector<f64>) -> f64,
        initial: DVector<f64>,
    ) -> Result<Minimum, MinimizeError> {
        let s = &self.settings;
        let dim = initial.len();
        if dim == 0 {
            return Err(MinimizeError::EmptyInitialPoint);
        }

        let evaluations = Cell::new(0usize);
        let evaluate = |x: &DVector<f64>| {
            evaluations.set(evaluations.get() + 1);
            objective(x)
        };

        let initial_value = evaluate(&initial);
        if !initial_value.is_finite() {
            return Err(MinimizeError::NonFiniteObjective {
                value: initial_value,
            });
        }

        let mut simplex: Vec<(DVector<f64>, f64)> = Vec::with_capacity(dim + 1);
        simplex.push((initial.clone(), initial_value));
        for axis in 0..dim {
            let mut vertex = initial.clone();
            vertex[axis] += s.initial_step;
            let value = evaluate(&vertex);
            simplex.push((vertex, value));
        }

        let worst = dim;
        let mut best_seen: Option<f64> = None;
        let mut stalled = 0;

        for iteration in 0..s.max_iterations {
            // NaN sorts last, so it is always the first vertex replaced
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

            let best_value = simplex[0].1;
            match best_seen {
                Some(best) if best_value < best && best - best_value > s.function_tolerance => {
                    best_seen = Some(best_value);
                    stalled = 0;
                }
                Some(_) => {
                    stalled += 1;
                    if stalled >= s.stall_iterations {
                        trace!(
                            "simplex converged after {} iterations, best value {}",
                            iteration,
                            best_value
                        );
                        let (point, value) = simplex.swap_remove(0);
                        return Ok(Minimum {
                            point,
                            value,
                            iterations: iteration,
                            evaluations: evaluations.get(),
                        });
                    }
                }
                None => best_seen = Some(best_value),
            }

            let centroid = simplex[..worst]
                .iter()
                .fold(DVector::<f64>::zeros(dim), |acc, (vertex, _)| acc + vertex)
                / dim as f64;

            let reflected = &centroid + (&centroid - &simplex[worst].0) * s.reflection;
            let reflected_value = evaluate(&reflected);

            if reflected_value < simplex[0].1 {
                let expanded = &centroid + (&reflected - &centroid) * s.expansion;
                let expanded_value = evaluate(&expanded);
                trace!("iteration {}: expand ({})", iteration, expanded_value.min(reflected_value));
                simplex[worst] = if expanded_value < reflected_value {
                    (expanded, expanded_value)
                } else {
                    (reflected, reflected_value)
                };
                continue;
            }

            if reflected_value < simplex[worst - 1].1 {
                trace!("iteration {}: reflect ({})", iteration, reflected_value);
                simplex[worst] = (reflected, reflected_value);
                continue;
            }

            if reflected_value < simplex[worst].1 {
                let contracted = &centroid + (&reflected - &centroid) * s.contraction;
                let contracted_value = evaluate(&contracted);
                if contracted_value <= reflected_value {
                    trace!("iteration {}: outside contraction ({})", iteration, contracted_value);
                    simplex[worst] = (contracted, contracted_value);
                    continue;
                }
            } else {
                let contracted = &centroid + (&simplex[worst].0 - &centroid) * s.contraction;
                let contracted_value = evaluate(&contracted);
                if contracted_value < simplex[worst].1 {
                    trace!("iteration {}: inside contraction ({})", iteration, contracted_value);
                    simplex[worst] = (contracted, contracted_value);
                    continue;
                }
            }

            trace!("iteration {}: shrink", iteration);
            let best = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                let shrunk = &best + (&vertex.0 - &best) * s.shrink;
                let value = evaluate(&shrunk);
                *vertex = (shrunk, value);
            }
        }

        let best_value = simplex
            .iter()
            .map(|(_, value)| *value)
            .fold(f64::INFINITY, f64::min);
        Err(MinimizeError::MaxIterationsReached {
            iterations: s.max_iterations,
            best_value,
        })
    }
}
