//! # Command module
//!
//! Commands are small state machines run by the [`CommandScheduler`] once per tick:
//!
//! ```text
//! Initializing --start--> Executing --is_done--> Finished
//!       |                     |
//!       +-------cancel--------+--> Interrupted
//! ```

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod auto;
mod builder;
mod routines;
mod scheduler;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use auto::*;
pub use builder::*;
pub use routines::*;
pub use scheduler::*;

#[cfg(test)]
pub(crate) use scheduler::test::RecordingCommand;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;
use crate::drive_ctrl::Drivetrain;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A routine run by the command scheduler.
pub trait Command {
    /// Name of the command, used in logs.
    fn name(&self) -> &str;

    /// Called once when the command starts executing.
    fn start(&mut self, drive: &mut dyn Drivetrain, now_s: f64);

    /// Called once per tick while the command is executing.
    fn step(&mut self, drive: &mut dyn Drivetrain, now_s: f64);

    /// Returns true once the command has finished its work.
    fn is_done(&self) -> bool;

    /// Called once when the command ends, either because it finished or because it was
    /// cancelled (`interrupted` is set).
    fn stop(&mut self, drive: &mut dyn Drivetrain, interrupted: bool);

    /// If false (the default) the command is cancelled when the robot is disabled.
    fn runs_when_disabled(&self) -> bool {
        false
    }
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The lifecycle state of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandState {
    /// Scheduled but not yet started.
    Initializing,
    /// Started and being stepped every tick.
    Executing,
    /// Ended after reporting it was done.
    Finished,
    /// Ended by a cancel.
    Interrupted,
}

/// Errors which can occur while building commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Command timeout must be a positive number of seconds, found {0}")]
    InvalidTimeout(f64),

    #[error("Command name cannot be empty")]
    EmptyName,
}
