//! Parameters structure for the physics simulation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the physics simulation.
///
/// Defaults describe the XRP educational robot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {

    // ---- PHYSICAL ----

    /// Units: meters
    pub wheel_diameter_m: f64,

    /// Distance between the left and right wheels.
    ///
    /// Units: meters
    pub track_width_m: f64,

    // ---- MOTORS ----

    /// Characteristics of each drive motor.
    pub motor: MotorParams,

    /// Ground speed of a wheel at full output.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Fraction of full output below which the drivetrain doesn't move.
    pub deadzone: f64,

    // ---- ENCODERS ----

    /// Encoder counts per revolution of the wheel.
    pub counts_per_revolution: u32,

    // ---- FIELD ----

    /// Starting pose of the robot on the field as `[x_m, y_m, heading_rad]`.
    pub initial_pose: [f64; 3],

    /// Size of the field as `[length_m, width_m]`. The robot's position is kept inside it.
    pub field_size_m: [f64; 2],
}

/// DC motor characteristics, measured at the nominal voltage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorParams {
    /// Units: volts
    pub nominal_voltage: f64,

    /// Units: newton meters
    pub stall_torque_nm: f64,

    /// Units: amps
    pub stall_current_a: f64,

    /// Units: amps
    pub free_current_a: f64,

    /// Speed of the output shaft under no load.
    ///
    /// Units: revolutions/minute
    pub free_speed_rpm: f64,

    /// Number of motors driving one gearbox.
    pub motor_count: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            wheel_diameter_m: 0.060,
            track_width_m: 0.155,
            motor: MotorParams::default(),
            max_speed_ms: 0.6,
            deadzone: 0.1,
            counts_per_revolution: 585,
            initial_pose: [0.5, 2.0, 0.0],
            field_size_m: [17.5, 8.0],
        }
    }
}

impl Default for MotorParams {
    fn default() -> Self {
        Self {
            nominal_voltage: 4.5,
            stall_torque_nm: 1.0,
            stall_current_a: 1.2,
            free_current_a: 0.01,
            free_speed_rpm: 90.0,
            motor_count: 1,
        }
    }
}
