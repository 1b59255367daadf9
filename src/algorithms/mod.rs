//! Geodetic distance computations

pub mod distance;

pub use distance::{enu_displacement, enu_distance_m, great_circle_m};
