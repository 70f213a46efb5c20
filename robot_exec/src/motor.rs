//! # Motor outputs
//!
//! The drivetrain writes its demands through the [`MotorOutput`] trait so that the same drive
//! code can run against simulated or real motor controllers.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::cell::Cell;
use std::rc::Rc;
use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A motor controller output channel.
pub trait MotorOutput {
    /// Set the commanded output as a fraction of full output in [-1, 1].
    ///
    /// Must accept a value at any time, regardless of what was previously commanded.
    fn set(&mut self, value: f64);

    /// Get the last commanded output.
    fn get(&self) -> f64;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The drive motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorId {
    Left,
    Right,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A simulated motor.
///
/// Clones share the same output, so one clone can be handed to the drivetrain while another is
/// read by the physics simulation.
#[derive(Debug, Clone, Default)]
pub struct SimMotor {
    value: Rc<Cell<f64>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimMotor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MotorOutput for SimMotor {
    fn set(&mut self, value: f64) {
        self.value.set(value);
    }

    fn get(&self) -> f64 {
        self.value.get()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sim_motor_clones_share_output() {
        let mut m = SimMotor::new();
        let reader = m.clone();

        m.set(0.75);
        assert_eq!(reader.get(), 0.75);
    }
}
