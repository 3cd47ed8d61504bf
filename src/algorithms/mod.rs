//! Core positioning algorithms

pub mod nelder_mead;
pub mod trilateration;

pub use nelder_mead::{Minimizer, Minimum, NelderMead, NelderMeadSettings};
pub use trilateration::{trilaterate, Trilaterator, TrilateratorConfig};
