//! Core data types for location-fix arbitration

use serde::{Deserialize, Serialize};

/// A single reported geographic position with timestamp, accuracy, and provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Fix acquisition time in milliseconds (provider clock)
    pub timestamp_ms: u64,
    /// Estimated horizontal error radius in meters; smaller is better
    pub accuracy_m: f32,
    /// Identifier of the subsystem that produced the fix (e.g. "network", "satellite")
    pub provider: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl LocationFix {
    /// Create a fix with the given fields
    pub fn new(
        timestamp_ms: u64,
        accuracy_m: f32,
        provider: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            timestamp_ms,
            accuracy_m,
            provider: provider.into(),
            latitude,
            longitude,
        }
    }

    /// Check whether two fixes came from the same provider
    pub fn same_provider(&self, other: &LocationFix) -> bool {
        self.provider == other.provider
    }
}
