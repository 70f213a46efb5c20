//! # Simulated wheel encoder

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A quadrature encoder on a wheel, driven from the simulated wheel speed.
#[derive(Debug, Clone)]
pub struct EncoderSim {
    /// Distance travelled per encoder count.
    ///
    /// Units: meters
    distance_per_count_m: f64,

    /// Units: meters
    distance_m: f64,

    /// Units: meters/second
    rate_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl EncoderSim {
    /// Create a new encoder for a wheel of the given diameter.
    pub fn new(counts_per_revolution: u32, wheel_diameter_m: f64) -> Self {
        Self {
            distance_per_count_m: PI * wheel_diameter_m / counts_per_revolution.max(1) as f64,
            distance_m: 0.0,
            rate_ms: 0.0,
        }
    }

    /// Advance the encoder by `dt_s` at the given wheel speed.
    pub fn update(&mut self, rate_ms: f64, dt_s: f64) {
        self.rate_ms = rate_ms;
        self.distance_m += rate_ms * dt_s;
    }

    pub fn distance(&self) -> f64 {
        self.distance_m
    }

    pub fn rate(&self) -> f64 {
        self.rate_ms
    }

    /// Number of whole counts seen since the last reset.
    pub fn count(&self) -> i64 {
        (self.distance_m / self.distance_per_count_m).trunc() as i64
    }

    pub fn distance_per_count(&self) -> f64 {
        self.distance_per_count_m
    }
}
