//! # Robot Executable Parameters
//!
//! This module provide parameters for the robot executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::{command::AutoRoutine, match_ctrl::MatchParams};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RobotExecParams {

    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Square the driver's axes in teleop, reducing sensitivity at low speeds.
    pub teleop_square_inputs: bool,

    /// If false the robot runs without driver input.
    pub driver_controller_enabled: bool,

    /// Routine run in autonomous.
    pub auto_routine: AutoRoutine,

    /// Timeline used when no match script is given.
    pub timed_match: MatchParams,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for RobotExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.02,
            teleop_square_inputs: false,
            driver_controller_enabled: true,
            auto_routine: AutoRoutine::None,
            timed_match: MatchParams::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_exec_params() {
        let p: RobotExecParams = util::params::from_str(
            r#"
            cycle_period_s = 0.05
            teleop_square_inputs = true

            [auto_routine]
            type = "drive_timed"
            speed = 0.5
            rotation = 0.0
            duration_s = 3.0

            [timed_match]
            autonomous_s = 10.0
            "#
        ).unwrap();

        assert_eq!(p.cycle_period_s, 0.05);
        assert!(p.teleop_square_inputs);
        assert!(p.driver_controller_enabled);
        assert_eq!(
            p.auto_routine,
            AutoRoutine::DriveTimed { speed: 0.5, rotation: 0.0, duration_s: 3.0 }
        );
        assert_eq!(p.timed_match.autonomous_s, 10.0);
        assert_eq!(p.timed_match.teleop_s, 135.0);
    }

    #[test]
    fn test_empty_params_are_defaults() {
        let p: RobotExecParams = util::params::from_str("").unwrap();
        assert_eq!(p.auto_routine, AutoRoutine::None);
        assert_eq!(p.cycle_period_s, 0.02);
    }
}
