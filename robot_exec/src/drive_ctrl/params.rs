//! Parameters structure for DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

use crate::motor::MotorId;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for drive control.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {

    // ---- MOTORS ----

    /// Device number of the left drive motor.
    pub left_motor_device: u8,

    /// Device number of the right drive motor.
    pub right_motor_device: u8,

    /// If set the right motor demand is negated before being sent to the motor, as the right side
    /// is mechanically mirrored.
    pub invert_right: bool,

    // ---- INPUT SHAPING ----

    /// Inputs with a magnitude below this value are treated as zero, larger inputs are rescaled so
    /// that the output is continuous. Zero passes inputs through unchanged.
    pub deadband: f64,

    /// Multiplier applied to the wheel outputs, limits the top speed of the drivetrain.
    pub max_output: f64,

    // ---- MOTOR SAFETY ----

    /// If set the motors are stopped when no drive demand has been received for longer than
    /// `safety_expiration_s`.
    pub safety_enabled: bool,

    /// Time without a drive demand after which the motors are stopped.
    ///
    /// Units: seconds
    pub safety_expiration_s: f64,

    /// Period of the periodic tick, used to convert the safety expiration into cycles.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            left_motor_device: 0,
            right_motor_device: 1,
            invert_right: true,
            deadband: 0.0,
            max_output: 1.0,
            safety_enabled: true,
            safety_expiration_s: 0.1,
            cycle_period_s: 0.02,
        }
    }
}

impl Params {
    /// Device number of the given drive motor.
    pub fn motor_device(&self, id: MotorId) -> u8 {
        match id {
            MotorId::Left => self.left_motor_device,
            MotorId::Right => self.right_motor_device,
        }
    }

    /// Number of periodic ticks without a demand before the motor safety stops the motors.
    pub fn safety_expiration_cycles(&self) -> u64 {
        util::time::seconds_to_cycles(self.safety_expiration_s, self.cycle_period_s)
    }
}
