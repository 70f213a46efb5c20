//! # Command scheduler
//!
//! Owns every scheduled command and advances them once per tick.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};

use super::{Command, CommandState};
use crate::drive_ctrl::Drivetrain;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Identifies a command given to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandHandle(u64);

/// A command and its bookkeeping.
struct Scheduled {
    handle: CommandHandle,
    cmd: Box<dyn Command>,
    state: CommandState,
    start_time_s: f64,
}

/// Runs commands cooperatively, one step per command per tick.
#[derive(Default)]
pub struct CommandScheduler {
    next_id: u64,
    scheduled: Vec<Scheduled>,
    now_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CommandScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a command, which will be started on the next run.
    pub fn schedule(&mut self, cmd: Box<dyn Command>) -> CommandHandle {
        let handle = CommandHandle(self.next_id);
        self.next_id += 1;

        debug!("Scheduled {}", cmd.name());

        self.scheduled.push(Scheduled {
            handle,
            cmd,
            state: CommandState::Initializing,
            start_time_s: self.now_s,
        });

        handle
    }

    /// Returns true if the command is waiting to start or executing.
    pub fn is_scheduled(&self, handle: CommandHandle) -> bool {
        self.scheduled.iter().any(|s| s.handle == handle)
    }

    /// State of a scheduled command, or `None` if it is not (or no longer) scheduled.
    pub fn state(&self, handle: CommandHandle) -> Option<CommandState> {
        self.scheduled
            .iter()
            .find(|s| s.handle == handle)
            .map(|s| s.state)
    }

    /// Number of scheduled commands.
    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }

    /// Cancel a command.
    ///
    /// Commands which have started are stopped with the interrupted flag set. Cancelling a
    /// command which is not scheduled does nothing.
    pub fn cancel(&mut self, handle: CommandHandle, drive: &mut dyn Drivetrain) {
        if let Some(idx) = self.scheduled.iter().position(|s| s.handle == handle) {
            let s = self.scheduled.remove(idx);
            self.interrupt(s, drive);
        }
    }

    /// Cancel every scheduled command.
    pub fn cancel_all(&mut self, drive: &mut dyn Drivetrain) {
        if !self.scheduled.is_empty() {
            debug!("Cancelling all {} scheduled commands", self.scheduled.len());
        }

        for s in std::mem::take(&mut self.scheduled) {
            self.interrupt(s, drive);
        }
    }

    /// Advance all commands by one tick.
    ///
    /// Pending commands are started, executing commands are stepped, and commands reporting
    /// they are done are stopped and removed. While disabled, commands which do not run when
    /// disabled are cancelled instead.
    pub fn run(&mut self, drive: &mut dyn Drivetrain, now_s: f64, enabled: bool) {
        self.now_s = now_s;

        let mut remaining = Vec::with_capacity(self.scheduled.len());

        for mut s in std::mem::take(&mut self.scheduled) {
            if !enabled && !s.cmd.runs_when_disabled() {
                self.interrupt(s, drive);
                continue;
            }

            if s.state == CommandState::Initializing {
                s.start_time_s = now_s;
                s.state = CommandState::Executing;
                info!("** Started {} at {:.2} s **", s.cmd.name(), now_s);
                s.cmd.start(drive, now_s);
            }

            s.cmd.step(drive, now_s);

            if s.cmd.is_done() {
                s.cmd.stop(drive, false);
                s.state = CommandState::Finished;
                info!(
                    "** Ended {} at {:.1} s after {:.1} s **",
                    s.cmd.name(),
                    now_s,
                    now_s - s.start_time_s
                );
            }
            else {
                remaining.push(s);
            }
        }

        self.scheduled = remaining;
    }

    /// Stop a command which has been removed from the schedule.
    fn interrupt(&self, mut s: Scheduled, drive: &mut dyn Drivetrain) {
        if s.state == CommandState::Executing {
            s.cmd.stop(drive, true);
            info!(
                "** Interrupted {} at {:.1} s after {:.1} s **",
                s.cmd.name(),
                self.now_s,
                self.now_s - s.start_time_s
            );
        }
        else {
            debug!("Cancelled {} before it started", s.cmd.name());
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::drive_ctrl::DriveCtrl;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A command which records the hooks called on it.
    pub(crate) struct RecordingCommand {
        pub(crate) log: Rc<RefCell<Vec<String>>>,
        pub(crate) steps_until_done: Option<u32>,
        pub(crate) steps: u32,
        pub(crate) when_disabled: bool,
    }

    impl RecordingCommand {
        pub(crate) fn new(log: Rc<RefCell<Vec<String>>>, steps_until_done: Option<u32>) -> Self {
            Self { log, steps_until_done, steps: 0, when_disabled: false }
        }
    }

    impl Command for RecordingCommand {
        fn name(&self) -> &str {
            "Recording"
        }

        fn start(&mut self, _: &mut dyn Drivetrain, _: f64) {
            self.log.borrow_mut().push("start".into());
        }

        fn step(&mut self, _: &mut dyn Drivetrain, _: f64) {
            self.steps += 1;
            self.log.borrow_mut().push("step".into());
        }

        fn is_done(&self) -> bool {
            self.steps_until_done.map_or(false, |n| self.steps >= n)
        }

        fn stop(&mut self, _: &mut dyn Drivetrain, interrupted: bool) {
            self.log.borrow_mut().push(format!("stop({})", interrupted));
        }

        fn runs_when_disabled(&self) -> bool {
            self.when_disabled
        }
    }

    #[test]
    fn test_lifecycle_to_finished() {
        let mut sched = CommandScheduler::new();
        let mut drive = DriveCtrl::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let h = sched.schedule(Box::new(RecordingCommand::new(log.clone(), Some(2))));
        assert_eq!(sched.state(h), Some(CommandState::Initializing));

        sched.run(&mut drive, 0.0, true);
        assert_eq!(sched.state(h), Some(CommandState::Executing));

        sched.run(&mut drive, 0.02, true);
        assert!(!sched.is_scheduled(h));
        assert!(sched.is_empty());

        assert_eq!(*log.borrow(), vec!["start", "step", "step", "stop(false)"]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut sched = CommandScheduler::new();
        let mut drive = DriveCtrl::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let h = sched.schedule(Box::new(RecordingCommand::new(log.clone(), None)));
        sched.run(&mut drive, 0.0, true);

        sched.cancel(h, &mut drive);
        sched.cancel(h, &mut drive);

        assert!(!sched.is_scheduled(h));
        assert_eq!(*log.borrow(), vec!["start", "step", "stop(true)"]);
    }

    #[test]
    fn test_cancel_before_start_does_not_stop() {
        let mut sched = CommandScheduler::new();
        let mut drive = DriveCtrl::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let h = sched.schedule(Box::new(RecordingCommand::new(log.clone(), None)));
        sched.cancel(h, &mut drive);

        assert!(!sched.is_scheduled(h));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let mut sched = CommandScheduler::new();
        let mut drive = DriveCtrl::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let a = sched.schedule(Box::new(RecordingCommand::new(log.clone(), None)));
        let b = sched.schedule(Box::new(RecordingCommand::new(log.clone(), None)));
        sched.run(&mut drive, 0.0, true);
        assert_eq!(sched.len(), 2);

        sched.cancel_all(&mut drive);
        assert!(!sched.is_scheduled(a));
        assert!(!sched.is_scheduled(b));
        assert_eq!(log.borrow().iter().filter(|l| *l == "stop(true)").count(), 2);

        // Nothing left to cancel
        sched.cancel_all(&mut drive);
        assert_eq!(log.borrow().iter().filter(|l| *l == "stop(true)").count(), 2);
    }

    #[test]
    fn test_disabled_cancels_commands() {
        let mut sched = CommandScheduler::new();
        let mut drive = DriveCtrl::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let normal = sched.schedule(Box::new(RecordingCommand::new(log.clone(), None)));
        let mut keeper = RecordingCommand::new(log.clone(), None);
        keeper.when_disabled = true;
        let keeper = sched.schedule(Box::new(keeper));

        sched.run(&mut drive, 0.0, true);
        sched.run(&mut drive, 0.02, false);

        assert!(!sched.is_scheduled(normal));
        assert!(sched.is_scheduled(keeper));
    }
}
