//! Core types and constants for location-fix arbitration

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
