//! # Autonomous command
//!
//! The routine selected to run during the autonomous period. The mode sequencer schedules it on
//! entry to autonomous and cancels it when autonomous is left.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, error};

use super::{Command, CommandError, CommandHandle, CommandScheduler};
use crate::drive_ctrl::Drivetrain;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A routine which can be scheduled and cancelled by the mode sequencer.
pub trait AutonomousCommand {
    /// Name of the routine, used in logs.
    fn name(&self) -> &str;

    /// Give the routine to the scheduler. Scheduling a routine which is already scheduled does
    /// nothing.
    fn schedule(&mut self, sched: &mut CommandScheduler);

    /// Cancel the routine. Cancelling a routine which is not running does nothing.
    fn cancel(&mut self, sched: &mut CommandScheduler, drive: &mut dyn Drivetrain);

    /// Returns true while the routine is scheduled or executing.
    fn is_running(&self, sched: &CommandScheduler) -> bool;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

type CommandFactory = Box<dyn FnMut() -> Result<Box<dyn Command>, CommandError>>;

/// An autonomous command which builds a fresh [`Command`] every time it is scheduled.
pub struct RoutineCommand {
    name: String,
    factory: CommandFactory,
    handle: Option<CommandHandle>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RoutineCommand {
    pub fn new<S, F>(name: S, factory: F) -> Self
    where
        S: Into<String>,
        F: FnMut() -> Result<Box<dyn Command>, CommandError> + 'static
    {
        Self {
            name: name.into(),
            factory: Box::new(factory),
            handle: None,
        }
    }
}

impl AutonomousCommand for RoutineCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn schedule(&mut self, sched: &mut CommandScheduler) {
        if self.is_running(sched) {
            debug!("{} is already scheduled", self.name);
            return
        }

        match (self.factory)() {
            Ok(cmd) => self.handle = Some(sched.schedule(cmd)),
            Err(e) => error!("Could not build {}: {}", self.name, e)
        }
    }

    fn cancel(&mut self, sched: &mut CommandScheduler, drive: &mut dyn Drivetrain) {
        if let Some(handle) = self.handle.take() {
            sched.cancel(handle, drive);
        }
    }

    fn is_running(&self, sched: &CommandScheduler) -> bool {
        match self.handle {
            Some(h) => sched.is_scheduled(h),
            None => false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::RecordingCommand;
    use crate::drive_ctrl::DriveCtrl;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_routine(log: &Rc<RefCell<Vec<String>>>, steps: Option<u32>) -> RoutineCommand {
        let log = log.clone();
        RoutineCommand::new("Recording", move || {
            Ok(Box::new(RecordingCommand::new(log.clone(), steps)) as Box<dyn Command>)
        })
    }

    #[test]
    fn test_schedule_is_idempotent() {
        let mut sched = CommandScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut auto = recording_routine(&log, None);

        assert!(!auto.is_running(&sched));
        auto.schedule(&mut sched);
        auto.schedule(&mut sched);
        assert!(auto.is_running(&sched));
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn test_double_cancel() {
        let mut sched = CommandScheduler::new();
        let mut drive = DriveCtrl::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut auto = recording_routine(&log, None);

        auto.schedule(&mut sched);
        sched.run(&mut drive, 0.0, true);

        auto.cancel(&mut sched, &mut drive);
        auto.cancel(&mut sched, &mut drive);

        assert!(!auto.is_running(&sched));
        assert_eq!(log.borrow().iter().filter(|l| *l == "stop(true)").count(), 1);
    }

    #[test]
    fn test_factory_error_schedules_nothing() {
        let mut sched = CommandScheduler::new();
        let mut auto = RoutineCommand::new("Broken", || Err(CommandError::EmptyName));

        auto.schedule(&mut sched);
        assert!(!auto.is_running(&sched));
        assert!(sched.is_empty());
    }

    #[test]
    fn test_reschedule_after_finish() {
        let mut sched = CommandScheduler::new();
        let mut drive = DriveCtrl::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut auto = recording_routine(&log, Some(1));

        auto.schedule(&mut sched);
        sched.run(&mut drive, 0.0, true);
        assert!(!auto.is_running(&sched));

        auto.schedule(&mut sched);
        assert!(auto.is_running(&sched));
        sched.run(&mut drive, 0.02, true);

        assert_eq!(log.borrow().iter().filter(|l| *l == "start").count(), 2);
    }
}
