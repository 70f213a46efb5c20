//! # Two motor drivetrain model
//!
//! Converts the left and right motor outputs of a differential drivetrain into wheel and chassis
//! speeds. Motor dynamics are ignored: wheels reach their demanded speed immediately.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::apply_deadband;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Ground speed of each side of the drivetrain.
///
/// Units: meters/second
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
}

/// Velocity of the chassis in its own frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChassisSpeeds {
    /// Forward velocity.
    ///
    /// Units: meters/second
    pub vx: f64,

    /// Sideways velocity, always zero for a differential drivetrain.
    ///
    /// Units: meters/second
    pub vy: f64,

    /// Counter-clockwise angular velocity.
    ///
    /// Units: radians/second
    pub omega: f64,
}

/// A drivetrain with one motor (or gearbox) per side.
pub struct TwoMotorDrivetrain {
    track_width_m: f64,
    max_speed_ms: f64,
    deadzone: Box<dyn Fn(f64) -> f64>,

    /// Wheel speeds from the last calculation.
    pub wheel_speeds: WheelSpeeds,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// A motor deadzone: outputs below `deadzone` produce no motion, outputs above it are rescaled so
/// that full output still gives full speed.
pub fn linear_deadzone(deadzone: f64) -> impl Fn(f64) -> f64 + Copy {
    move |motor_input| apply_deadband(motor_input, deadzone)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TwoMotorDrivetrain {
    /// Create a new drivetrain model.
    ///
    /// `deadzone` is applied to each motor output before scaling by `max_speed_ms`, use
    /// [`linear_deadzone`] for a typical motor.
    pub fn new<F>(track_width_m: f64, max_speed_ms: f64, deadzone: F) -> Self
    where
        F: Fn(f64) -> f64 + 'static
    {
        Self {
            track_width_m,
            max_speed_ms,
            deadzone: Box::new(deadzone),
            wheel_speeds: WheelSpeeds::default(),
        }
    }

    /// Calculate the chassis speeds for the given motor outputs.
    ///
    /// Outputs are positive when the wheel drives the robot forward.
    pub fn calculate(&mut self, left_output: f64, right_output: f64) -> ChassisSpeeds {
        self.wheel_speeds = WheelSpeeds {
            left: (self.deadzone)(left_output) * self.max_speed_ms,
            right: (self.deadzone)(right_output) * self.max_speed_ms,
        };

        self.to_chassis_speeds(self.wheel_speeds)
    }

    /// Forward kinematics of the differential drive.
    pub fn to_chassis_speeds(&self, wheels: WheelSpeeds) -> ChassisSpeeds {
        ChassisSpeeds {
            vx: (wheels.left + wheels.right) / 2.0,
            vy: 0.0,
            omega: (wheels.right - wheels.left) / self.track_width_m,
        }
    }
}
