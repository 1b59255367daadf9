//! Arbitration thresholds and earth model parameters

/// Minimum interval before a new fix is considered at all (ms)
pub const DEBOUNCE_WINDOW_MS: i64 = 10_000;

/// Age beyond which the held fix is presumed invalidated by movement (ms)
pub const FRESHNESS_WINDOW_MS: i64 = 120_000;

/// Displacement treated as genuine relocation rather than jitter (meters)
pub const MOVEMENT_THRESHOLD_M: f64 = 10.0;

/// Accuracy loss tolerated when the provider is unchanged (meters)
pub const ACCURACY_TOLERANCE_M: f32 = 200.0;

/// Earth semi-major axis in meters (WGS84)
pub const EARTH_RADIUS_WGS84: f64 = 6378137.0;
