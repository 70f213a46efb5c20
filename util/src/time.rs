//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Convert a period in seconds into a whole number of cycles of `cycle_period_s`, rounding up so
/// that a period shorter than one cycle still lasts a cycle.
pub fn seconds_to_cycles(period_s: f64, cycle_period_s: f64) -> u64 {
    if period_s <= 0.0 || cycle_period_s <= 0.0 {
        return 0;
    }

    (period_s / cycle_period_s - 1e-9).ceil() as u64
}
