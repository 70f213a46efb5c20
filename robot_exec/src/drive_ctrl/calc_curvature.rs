//! Curvature drive calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::WheelCommand;
use util::maths::{clamp, desaturate};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Curvature drive inverse kinematics.
///
/// In constant curvature mode the rotation is scaled by the magnitude of the speed, so that
/// `left = speed + |speed| * rotation` and `right = speed - |speed| * rotation`. At zero speed the
/// rotation is fully suppressed.
///
/// With `allow_turn_in_place` the rotation is applied directly as a turn rate
/// (`left = speed + rotation`, `right = speed - rotation`).
///
/// In both cases saturated outputs are scaled down together, keeping their ratio.
pub fn curvature(speed: f64, rotation: f64, allow_turn_in_place: bool) -> WheelCommand {
    let speed = clamp(speed, -1.0, 1.0);
    let rotation = clamp(rotation, -1.0, 1.0);

    let turn = if allow_turn_in_place {
        rotation
    }
    else {
        speed.abs() * rotation
    };

    let (left, right) = desaturate(speed + turn, speed - turn);

    WheelCommand::new(left, right)
}
