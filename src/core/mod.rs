//! Core types and constants for geolocation

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
