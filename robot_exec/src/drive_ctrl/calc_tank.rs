//! Tank drive calculations

// Internal imports
use super::WheelCommand;
use util::maths::{clamp, square_with_sign};

/// Tank drive inverse kinematics.
///
/// Each side is passed straight through (squared with sign if `square_inputs` is set) and
/// clamped to [-1, 1]. There is no coupling between the two sides.
pub fn tank(left: f64, right: f64, square_inputs: bool) -> WheelCommand {
    let mut left = clamp(left, -1.0, 1.0);
    let mut right = clamp(right, -1.0, 1.0);

    if square_inputs {
        left = square_with_sign(left);
        right = square_with_sign(right);
    }

    WheelCommand::new(left, right)
}
