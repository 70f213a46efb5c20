//! # DC motor model
//!
//! Steady state model of a brushed DC motor:
//!
//! ```text
//! V = I * R + w / Kv
//! T = I * Kt
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::f64::consts::PI;

use super::MotorParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A DC motor, or a gearbox of identical motors.
#[derive(Debug, Clone, Copy)]
pub struct DcMotor {
    /// Units: volts
    pub nominal_voltage: f64,

    /// Combined stall torque of all motors.
    ///
    /// Units: newton meters
    pub stall_torque_nm: f64,

    /// Combined stall current of all motors.
    ///
    /// Units: amps
    pub stall_current_a: f64,

    /// Combined free current of all motors.
    ///
    /// Units: amps
    pub free_current_a: f64,

    /// Units: radians/second
    pub free_speed_rads: f64,

    /// Winding resistance.
    ///
    /// Units: ohms
    pub resistance_ohm: f64,

    /// Velocity constant.
    ///
    /// Units: radians/second/volt
    pub kv: f64,

    /// Torque constant.
    ///
    /// Units: newton meters/amp
    pub kt: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DcMotor {
    /// Build a motor model from its measured characteristics.
    pub fn new(params: &MotorParams) -> Self {
        let n = params.motor_count.max(1) as f64;

        let stall_torque_nm = params.stall_torque_nm * n;
        let stall_current_a = params.stall_current_a * n;
        let free_current_a = params.free_current_a * n;
        let free_speed_rads = params.free_speed_rpm * 2.0 * PI / 60.0;

        let resistance_ohm = params.nominal_voltage / stall_current_a;

        Self {
            nominal_voltage: params.nominal_voltage,
            stall_torque_nm,
            stall_current_a,
            free_current_a,
            free_speed_rads,
            resistance_ohm,
            kv: free_speed_rads / (params.nominal_voltage - resistance_ohm * free_current_a),
            kt: stall_torque_nm / stall_current_a,
        }
    }

    /// Current drawn at the given speed (rad/s) and applied voltage.
    pub fn current(&self, speed_rads: f64, voltage: f64) -> f64 {
        -1.0 / self.kv / self.resistance_ohm * speed_rads + voltage / self.resistance_ohm
    }

    /// Torque produced by the given current.
    pub fn torque(&self, current_a: f64) -> f64 {
        current_a * self.kt
    }

    /// Voltage needed to produce the given torque at the given speed.
    pub fn voltage(&self, torque_nm: f64, speed_rads: f64) -> f64 {
        speed_rads / self.kv + torque_nm / self.kt * self.resistance_ohm
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn xrp_motor() -> DcMotor {
        DcMotor::new(&MotorParams::default())
    }

    #[test]
    fn test_derived_constants() {
        let m = xrp_motor();

        assert!((m.resistance_ohm - 3.75).abs() < 1e-9);
        assert!((m.free_speed_rads - 3.0 * PI).abs() < 1e-9);
        assert!((m.kt - 1.0 / 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_stall_and_free_current() {
        let m = xrp_motor();

        assert!((m.current(0.0, m.nominal_voltage) - m.stall_current_a).abs() < 1e-9);
        assert!((m.current(m.free_speed_rads, m.nominal_voltage) - m.free_current_a).abs() < 1e-9);
        assert!((m.torque(m.stall_current_a) - m.stall_torque_nm).abs() < 1e-9);
    }

    #[test]
    fn test_voltage_inverts_current() {
        let m = xrp_motor();
        let speed = 4.0;
        let v = 3.0;

        let torque = m.torque(m.current(speed, v));
        assert!((m.voltage(torque, speed) - v).abs() < 1e-9);
    }

    #[test]
    fn test_motor_count_scales_stall() {
        let params = MotorParams { motor_count: 2, ..MotorParams::default() };
        let m = DcMotor::new(&params);

        assert!((m.stall_current_a - 2.4).abs() < 1e-9);
        assert!((m.stall_torque_nm - 2.0).abs() < 1e-9);
    }
}
