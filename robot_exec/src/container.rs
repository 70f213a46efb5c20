//! # Robot container
//!
//! Holds everything the mode sequencer drives: the drivetrain, the command scheduler, the
//! driver input and the autonomous command. Everything is injected on construction.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;

use crate::{
    command::{AutonomousCommand, CommandScheduler},
    drive_ctrl::Drivetrain,
    input::DriverInput,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The robot's subsystems and collaborators.
pub struct RobotContainer<D> {
    /// The drive subsystem.
    pub drive: D,

    /// Scheduler running every active command.
    pub scheduler: CommandScheduler,

    /// Driver input, `None` if no controller is connected.
    pub input: Option<Box<dyn DriverInput>>,

    /// Command run during autonomous, `None` if no routine is selected.
    pub auto_cmd: Option<Box<dyn AutonomousCommand>>,

    /// Time at which the robot was last enabled.
    start_time_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<D: Drivetrain> RobotContainer<D> {
    /// Create a container with no driver input and no autonomous command.
    pub fn new(drive: D) -> Self {
        Self {
            drive,
            scheduler: CommandScheduler::new(),
            input: None,
            auto_cmd: None,
            start_time_s: 0.0,
        }
    }

    /// Set the driver input.
    pub fn with_input(mut self, input: Box<dyn DriverInput>) -> Self {
        self.input = Some(input);
        self
    }

    /// Set the autonomous command.
    pub fn with_autonomous(mut self, auto_cmd: Option<Box<dyn AutonomousCommand>>) -> Self {
        if let Some(ref a) = auto_cmd {
            debug!("Autonomous command: {}", a.name());
        }
        self.auto_cmd = auto_cmd;
        self
    }

    /// The autonomous command, if any.
    pub fn autonomous_command(&self) -> Option<&dyn AutonomousCommand> {
        self.auto_cmd.as_deref()
    }

    /// Record the time at which the robot was enabled.
    pub fn set_start_time(&mut self, now_s: f64) {
        self.start_time_s = now_s;
    }

    /// Time since the robot was last enabled.
    pub fn enabled_time(&self, now_s: f64) -> f64 {
        now_s - self.start_time_s
    }
}
