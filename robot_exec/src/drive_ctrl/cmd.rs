//! Commands passed into DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A demand for the two drive motors, as a fraction of full output.
///
/// Both sides are always within [-1, 1]. The sign convention is "forward is positive" for both
/// sides, any mechanical inversion is applied by DriveCtrl when writing to the motors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelCommand {
    /// Left side demand.
    pub left: f64,

    /// Right side demand.
    pub right: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A drive request executed by DriveCtrl.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveCmd {
    /// Single stick drive, combining a forward speed and a rotation rate.
    Arcade {
        /// Speed along the X axis, forward is positive.
        speed: f64,

        /// Rotation around the Z axis. Positive rotation drives the left side faster.
        rotation: f64,

        /// If set, decreases the input sensitivity at low speeds.
        square_inputs: bool,
    },

    /// Independent left and right side speeds.
    Tank {
        left: f64,
        right: f64,
        square_inputs: bool,
    },

    /// Rotation controls the curvature of the path instead of the rotation rate.
    Curvature {
        speed: f64,
        rotation: f64,

        /// If set, `rotation` controls the turn rate at low speeds so that the robot can turn in
        /// place.
        allow_turn_in_place: bool,
    },

    /// Set both motors to zero.
    Stop,
}

/// Kinematic drive modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveMode {
    Arcade,
    Tank,
    Curvature,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WheelCommand {
    /// Both sides stopped.
    pub const ZERO: WheelCommand = WheelCommand { left: 0.0, right: 0.0 };

    /// Create a new command, clamping both sides into [-1, 1].
    pub fn new(left: f64, right: f64) -> Self {
        Self {
            left: util::maths::clamp(left, -1.0, 1.0),
            right: util::maths::clamp(right, -1.0, 1.0),
        }
    }

    /// Scale both sides by `factor`, keeping the result within [-1, 1].
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.left * factor, self.right * factor)
    }

    /// Returns true if both sides are zero.
    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

impl DriveCmd {
    /// The kinematic mode used by this command, or `None` for a stop.
    pub fn mode(&self) -> Option<DriveMode> {
        match self {
            DriveCmd::Arcade { .. } => Some(DriveMode::Arcade),
            DriveCmd::Tank { .. } => Some(DriveMode::Tank),
            DriveCmd::Curvature { .. } => Some(DriveMode::Curvature),
            DriveCmd::Stop => None,
        }
    }

    /// Returns true if any of the axis demands in the command is nonzero.
    pub fn has_demand(&self) -> bool {
        match *self {
            DriveCmd::Arcade { speed, rotation, .. }
            | DriveCmd::Curvature { speed, rotation, .. } => speed != 0.0 || rotation != 0.0,
            DriveCmd::Tank { left, right, .. } => left != 0.0 || right != 0.0,
            DriveCmd::Stop => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wheel_command_new_clamps() {
        assert_eq!(WheelCommand::new(1.5, -2.0), WheelCommand { left: 1.0, right: -1.0 });
        assert_eq!(WheelCommand::new(f64::NAN, 0.5), WheelCommand { left: 0.0, right: 0.5 });
    }

    #[test]
    fn test_wheel_command_scaled() {
        let w = WheelCommand::new(1.0, -0.5).scaled(0.5);
        assert_eq!(w, WheelCommand { left: 0.5, right: -0.25 });
    }

    #[test]
    fn test_drive_cmd_json() {
        let cmd: DriveCmd = serde_json::from_str(
            r#"{"arcade": {"speed": 0.5, "rotation": 0.0, "square_inputs": false}}"#
        ).unwrap();
        assert_eq!(cmd.mode(), Some(DriveMode::Arcade));
        assert!(cmd.has_demand());

        let stop: DriveCmd = serde_json::from_str(r#""stop""#).unwrap();
        assert_eq!(stop, DriveCmd::Stop);
        assert!(!stop.has_demand());
    }
}
