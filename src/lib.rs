//! Geolocation primitives
//!
//! Distances between geographic coordinates and position estimation from
//! noisy distance observations to known reference points (indoor positioning,
//! beacon localization, GPS-denied navigation).
//!
//! ```
//! use geolocation::{haversine_distance, vincenty_distance, Position};
//!
//! let zurich = Position::new(47.3769, 8.5417);
//! let bern = Position::new(46.9480, 7.4474);
//! assert_eq!(format!("{:.2}", haversine_distance(zurich, bern) / 1000.0), "95.49");
//! assert_eq!(format!("{:.2}", vincenty_distance(zurich, bern) / 1000.0), "95.70");
//! ```
//!
//! ```
//! use geolocation::{vincenty_distance, Measurement, Trilaterator, TrilateratorConfig};
//!
//! let trilaterator = Trilaterator::with_config(
//!     TrilateratorConfig::default().with_distance_function(vincenty_distance),
//! );
//! let estimate = trilaterator.trilaterate(&[
//!     Measurement::new(47.4133, 8.5364, 500.0, 1.0),
//!     Measurement::new(47.4100, 8.5400, 300.0, 1.0),
//!     Measurement::new(47.4120, 8.5450, 400.0, 1.0),
//! ])?;
//! assert_eq!(format!("{:.2}", estimate.accuracy), "57.60");
//! # Ok::<(), geolocation::TrilaterationError>(())
//! ```

pub mod core;
pub mod distance;
pub mod algorithms;
pub mod validation;
pub mod utils;

// Re-export commonly used types
pub use self::core::{Estimate, Measurement, Position};
pub use distance::{haversine_distance, vincenty_distance, DistanceFunction, DistanceMethod};
pub use algorithms::{
    trilaterate, Minimizer, Minimum, NelderMead, NelderMeadSettings, Trilaterator,
    TrilateratorConfig,
};
pub use validation::{ConfigError, MinimizeError, PositionError, TrilaterationError};
pub use utils::TrilaterationSettings;
