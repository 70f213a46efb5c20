//! Arcade drive calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::WheelCommand;
use util::maths::{clamp, desaturate, square_with_sign};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Arcade drive inverse kinematics.
///
/// `left = speed + rotation` and `right = speed - rotation`. If either side exceeds unit range
/// both are scaled down by the same factor, so that the ratio between turning and driving is
/// kept. Inputs outside [-1, 1] (or `NaN`) are clamped first.
pub fn arcade(speed: f64, rotation: f64, square_inputs: bool) -> WheelCommand {
    let mut speed = clamp(speed, -1.0, 1.0);
    let mut rotation = clamp(rotation, -1.0, 1.0);

    if square_inputs {
        speed = square_with_sign(speed);
        rotation = square_with_sign(rotation);
    }

    let (left, right) = desaturate(speed + rotation, speed - rotation);

    WheelCommand::new(left, right)
}
