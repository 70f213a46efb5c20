//! # Autonomous routines
//!
//! Routines which can be selected for the autonomous period from the executable's parameters.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use super::{AutonomousCommand, Command, CommandBuilder, CommandError, RoutineCommand};
use crate::drive_ctrl::Drivetrain;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Selection of the autonomous routine.
///
/// In a TOML parameter file:
///
/// ```toml
/// [auto_routine]
/// type = "drive_timed"
/// speed = 0.5
/// rotation = 0.0
/// duration_s = 2.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AutoRoutine {
    /// No autonomous command.
    None,

    /// Arcade drive at a fixed demand for a duration, then stop.
    DriveTimed {
        speed: f64,
        rotation: f64,
        duration_s: f64,
    },
}

impl Default for AutoRoutine {
    fn default() -> Self {
        AutoRoutine::None
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build the autonomous command for a routine, or `None` if no routine is selected.
pub fn build_routine(routine: &AutoRoutine)
    -> Result<Option<Box<dyn AutonomousCommand>>, CommandError>
{
    match *routine {
        AutoRoutine::None => Ok(None),
        AutoRoutine::DriveTimed { speed, rotation, duration_s } => {
            // Validate the routine now rather than at the start of autonomous
            drive_timed(speed, rotation, duration_s)?;

            let auto = RoutineCommand::new("DriveTimed", move || {
                drive_timed(speed, rotation, duration_s).map(|c| Box::new(c) as Box<dyn Command>)
            });

            Ok(Some(Box::new(auto)))
        }
    }
}

/// Arcade drive at the given demand until the timeout, stopping on end.
fn drive_timed(speed: f64, rotation: f64, duration_s: f64)
    -> Result<impl Command, CommandError>
{
    CommandBuilder::new("DriveTimed")
        .on_step(move |d| d.arcade_drive(speed, rotation, false))
        .on_stop(|d, _| d.stop())
        .with_timeout(duration_s)
        .build()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::CommandScheduler;
    use crate::drive_ctrl::{DriveCtrl, WheelCommand};

    #[test]
    fn test_none_builds_nothing() {
        assert!(build_routine(&AutoRoutine::None).unwrap().is_none());
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let r = AutoRoutine::DriveTimed { speed: 0.5, rotation: 0.0, duration_s: 0.0 };
        assert!(matches!(build_routine(&r), Err(CommandError::InvalidTimeout(_))));
    }

    #[test]
    fn test_parse_routine() {
        let r: AutoRoutine = toml::from_str(
            "type = \"drive_timed\"\nspeed = 0.5\nrotation = 0.1\nduration_s = 2.0"
        ).unwrap();
        assert_eq!(r, AutoRoutine::DriveTimed { speed: 0.5, rotation: 0.1, duration_s: 2.0 });

        let r: AutoRoutine = toml::from_str("type = \"none\"").unwrap();
        assert_eq!(r, AutoRoutine::None);
    }

    #[test]
    fn test_drive_timed_drives_then_stops() {
        let mut sched = CommandScheduler::new();
        let mut drive = DriveCtrl::default();

        let r = AutoRoutine::DriveTimed { speed: 0.5, rotation: 0.0, duration_s: 0.1 };
        let mut auto = build_routine(&r).unwrap().unwrap();
        auto.schedule(&mut sched);

        sched.run(&mut drive, 0.0, true);
        assert_eq!(drive.output(), WheelCommand { left: 0.5, right: 0.5 });
        assert!(auto.is_running(&sched));

        let mut t = 0.0;
        while auto.is_running(&sched) && t < 1.0 {
            t += 0.02;
            sched.run(&mut drive, t, true);
        }

        assert!(!auto.is_running(&sched));
        assert!(t >= 0.1 && t < 0.2);
        assert_eq!(drive.output(), WheelCommand::ZERO);
    }
}
