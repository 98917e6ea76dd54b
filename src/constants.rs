//! Application-wide constants.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "AprilTag Board Generator";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "tagboard";

/// Millimeters per inch, the basis of every DPI conversion.
pub const MM_PER_INCH: f64 = 25.4;
