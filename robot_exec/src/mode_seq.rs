//! # Mode sequencer
//!
//! Runs the robot's mode lifecycle. The sequencer holds no thread of its own: the executable
//! calls [`ModeSequencer::run_cycle`] once per cycle, which applies every mode change reported by
//! match control through [`ModeSequencer::set_mode`] and then calls [`ModeSequencer::tick`].
//!
//! Transition actions:
//!
//! | Transition             | Action                                                  |
//! |------------------------|---------------------------------------------------------|
//! | Enter `Disabled`       | Stop the drive                                          |
//! | Enter `Autonomous`     | Schedule the autonomous command, if there is one        |
//! | Exit `Autonomous`      | Cancel the autonomous command                           |
//! | Enter `Teleop`         | Cancel the autonomous command if not already cancelled  |
//! | Enter `Test`           | Cancel all scheduled commands                           |

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::{
    container::RobotContainer,
    drive_ctrl::Drivetrain,
    match_ctrl::MatchControl,
    periodic::Periodic,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Operating mode of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotMode {
    Disabled,
    Autonomous,
    Teleop,
    Test,
}

impl Default for RobotMode {
    fn default() -> Self {
        RobotMode::Disabled
    }
}

impl RobotMode {
    /// Returns true for every mode except `Disabled`.
    pub fn is_enabled(&self) -> bool {
        *self != RobotMode::Disabled
    }
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The mode lifecycle sequencer.
pub struct ModeSequencer<D> {
    container: RobotContainer<D>,
    mode: RobotMode,

    /// Square the driver's axes in teleop.
    teleop_square_inputs: bool,

    num_ticks: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<D: Drivetrain + Periodic> ModeSequencer<D> {
    /// Create a sequencer in the `Disabled` mode.
    pub fn new(container: RobotContainer<D>, teleop_square_inputs: bool) -> Self {
        Self {
            container,
            mode: RobotMode::Disabled,
            teleop_square_inputs,
            num_ticks: 0,
        }
    }

    /// The current mode.
    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    /// Number of ticks executed.
    pub fn num_ticks(&self) -> u64 {
        self.num_ticks
    }

    pub fn container(&self) -> &RobotContainer<D> {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut RobotContainer<D> {
        &mut self.container
    }

    /// Change mode, running the exit actions of the current mode then the entry actions of the
    /// new one. Changing to the current mode does nothing.
    pub fn set_mode(&mut self, mode: RobotMode, now_s: f64) {
        if mode == self.mode {
            return
        }

        info!("Mode change {:?} -> {:?} at {:.2} s", self.mode, mode, now_s);

        let prev = self.mode;
        self.mode = mode;

        // ---- EXIT ----

        let mut auto_cancelled = false;
        if prev == RobotMode::Autonomous {
            auto_cancelled = self.cancel_autonomous();
        }

        // ---- ENTRY ----

        match mode {
            RobotMode::Disabled => {
                self.container.drive.stop();
            },
            RobotMode::Autonomous => {
                self.container.set_start_time(now_s);

                let c = &mut self.container;
                match c.auto_cmd {
                    Some(ref mut a) => {
                        info!("Scheduling autonomous command {}", a.name());
                        a.schedule(&mut c.scheduler);
                    },
                    None => debug!("No autonomous command configured")
                }
            },
            RobotMode::Teleop => {
                self.container.set_start_time(now_s);

                if !auto_cancelled {
                    self.cancel_autonomous();
                }
            },
            RobotMode::Test => {
                let c = &mut self.container;
                c.scheduler.cancel_all(&mut c.drive);
            }
        }
    }

    /// Run one tick: the mode's periodic action, the drive's periodic tick and then the command
    /// scheduler.
    pub fn tick(&mut self, now_s: f64) {
        if self.mode == RobotMode::Teleop {
            self.teleop_periodic();
        }

        let c = &mut self.container;

        c.drive.periodic();
        c.scheduler.run(&mut c.drive, now_s, self.mode.is_enabled());

        self.num_ticks += 1;
    }

    /// Run one cycle at `now_s`: apply the mode changes from match control in order, then tick.
    pub fn run_cycle(&mut self, match_ctrl: &mut dyn MatchControl, now_s: f64) {
        for mode in match_ctrl.modes(now_s) {
            self.set_mode(mode, now_s);
        }

        self.tick(now_s);
    }

    /// Drive from one reading of the driver's axes. Pushing the stick forward gives a negative
    /// speed axis, so it is negated.
    fn teleop_periodic(&mut self) {
        let c = &mut self.container;

        if let Some(ref mut input) = c.input {
            let axes = input.poll();
            c.drive.arcade_drive(-axes.speed, axes.rotation, self.teleop_square_inputs);
        }
    }

    /// Cancel the autonomous command, returning true if there was one to cancel.
    fn cancel_autonomous(&mut self) -> bool {
        let c = &mut self.container;

        match c.auto_cmd {
            Some(ref mut a) => {
                if a.is_running(&c.scheduler) {
                    info!("Cancelling autonomous command {}", a.name());
                }
                a.cancel(&mut c.scheduler, &mut c.drive);
                true
            },
            None => false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::{AutonomousCommand, CommandScheduler};
    use crate::command::RecordingCommand;
    use crate::drive_ctrl::{DriveCtrl, WheelCommand};
    use crate::input::{ControlInput, SharedInput};
    use crate::match_ctrl::{MatchParams, MatchScript, TimedMatch};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        schedules: u32,
        cancels: u32,
        running: bool,
    }

    /// Autonomous command counting calls made on it.
    struct CountingAuto(Rc<RefCell<Counts>>);

    impl AutonomousCommand for CountingAuto {
        fn name(&self) -> &str {
            "Counting"
        }

        fn schedule(&mut self, _: &mut CommandScheduler) {
            let mut c = self.0.borrow_mut();
            c.schedules += 1;
            c.running = true;
        }

        fn cancel(&mut self, _: &mut CommandScheduler, _: &mut dyn Drivetrain) {
            let mut c = self.0.borrow_mut();
            c.cancels += 1;
            c.running = false;
        }

        fn is_running(&self, _: &CommandScheduler) -> bool {
            self.0.borrow().running
        }
    }

    fn counting_seq() -> (ModeSequencer<DriveCtrl>, Rc<RefCell<Counts>>) {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let container = RobotContainer::new(DriveCtrl::default())
            .with_autonomous(Some(Box::new(CountingAuto(counts.clone()))));
        (ModeSequencer::new(container, false), counts)
    }

    #[test]
    fn test_initial_mode() {
        let (seq, _) = counting_seq();
        assert_eq!(seq.mode(), RobotMode::Disabled);
        assert!(!seq.mode().is_enabled());
    }

    #[test]
    fn test_autonomous_schedules_once() {
        let (mut seq, counts) = counting_seq();

        seq.set_mode(RobotMode::Autonomous, 1.0);
        seq.set_mode(RobotMode::Autonomous, 1.02);
        for i in 0..10 {
            seq.tick(1.0 + 0.02 * i as f64);
        }

        assert_eq!(counts.borrow().schedules, 1);
        assert_eq!(counts.borrow().cancels, 0);
        assert!((seq.container().enabled_time(2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_auto_to_teleop_cancels_once() {
        let (mut seq, counts) = counting_seq();

        seq.set_mode(RobotMode::Autonomous, 0.0);
        seq.tick(0.0);
        seq.set_mode(RobotMode::Teleop, 15.0);

        assert_eq!(counts.borrow().cancels, 1);
    }

    #[test]
    fn test_auto_to_teleop_cancels_once_after_finish() {
        let (mut seq, counts) = counting_seq();

        seq.set_mode(RobotMode::Autonomous, 0.0);
        counts.borrow_mut().running = false;
        seq.set_mode(RobotMode::Teleop, 15.0);

        assert_eq!(counts.borrow().cancels, 1);
    }

    #[test]
    fn test_no_autonomous_command() {
        let mut seq = ModeSequencer::new(RobotContainer::new(DriveCtrl::default()), false);

        seq.set_mode(RobotMode::Autonomous, 0.0);
        seq.tick(0.0);
        seq.set_mode(RobotMode::Teleop, 15.0);
        seq.tick(15.0);

        assert_eq!(seq.mode(), RobotMode::Teleop);
        assert!(seq.container().scheduler.is_empty());
    }

    #[test]
    fn test_test_mode_cancels_all() {
        let (mut seq, _) = counting_seq();
        let log = Rc::new(RefCell::new(Vec::new()));

        seq.set_mode(RobotMode::Teleop, 0.0);
        let h = seq.container_mut()
            .scheduler
            .schedule(Box::new(RecordingCommand::new(log.clone(), None)));
        seq.tick(0.0);
        assert!(seq.container().scheduler.is_scheduled(h));

        seq.set_mode(RobotMode::Test, 1.0);
        assert!(seq.container().scheduler.is_empty());
        assert_eq!(log.borrow().last().map(String::as_str), Some("stop(true)"));
    }

    #[test]
    fn test_teleop_negates_speed() {
        let input = SharedInput::new();
        let container = RobotContainer::new(DriveCtrl::default())
            .with_input(Box::new(input.clone()));
        let mut seq = ModeSequencer::new(container, false);

        input.set(ControlInput { speed: -0.5, rotation: 0.0 });

        // No driving while disabled
        seq.tick(0.0);
        assert_eq!(seq.container().drive.output(), WheelCommand::ZERO);

        seq.set_mode(RobotMode::Teleop, 0.0);
        seq.tick(0.02);
        assert_eq!(seq.container().drive.output(), WheelCommand { left: 0.5, right: 0.5 });
    }

    #[test]
    fn test_disabled_stops_drive() {
        let input = SharedInput::new();
        let container = RobotContainer::new(DriveCtrl::default())
            .with_input(Box::new(input.clone()));
        let mut seq = ModeSequencer::new(container, false);

        input.set(ControlInput { speed: -1.0, rotation: 0.0 });
        seq.set_mode(RobotMode::Teleop, 0.0);
        seq.tick(0.0);
        assert!(!seq.container().drive.output().is_zero());

        seq.set_mode(RobotMode::Disabled, 1.0);
        assert_eq!(seq.container().drive.output(), WheelCommand::ZERO);
    }

    #[test]
    fn test_tick_runs_drive_periodic() {
        let (mut seq, _) = counting_seq();

        for i in 0..5 {
            seq.tick(i as f64 * 0.02);
        }

        assert_eq!(seq.num_ticks(), 5);
        assert_eq!(seq.container().drive.num_periodic(), 5);
    }

    #[test]
    fn test_modes_in_one_cycle_each_run() {
        let (mut seq, counts) = counting_seq();
        let mut script = MatchScript::parse(
            r#"
            1.0: {"mode": "autonomous"};
            1.0: {"mode": "teleop"};
            "#,
            SharedInput::new()
        ).unwrap();

        seq.run_cycle(&mut script, 0.98);
        assert_eq!(counts.borrow().schedules, 0);

        seq.run_cycle(&mut script, 1.0);
        assert_eq!(counts.borrow().schedules, 1);
        assert_eq!(counts.borrow().cancels, 1);
        assert_eq!(seq.mode(), RobotMode::Teleop);
    }

    #[test]
    fn test_replay_demo_script() {
        let period_s = 0.02;
        let input = SharedInput::new();
        let counts = Rc::new(RefCell::new(Counts::default()));
        let container = RobotContainer::new(DriveCtrl::default())
            .with_input(Box::new(input.clone()))
            .with_autonomous(Some(Box::new(CountingAuto(counts.clone()))));
        let mut seq = ModeSequencer::new(container, false);

        let mut script = MatchScript::parse(
            include_str!("../../scripts/teleop_demo.ms"),
            input
        ).unwrap();

        let mut teleop_output = None;
        let mut num_cycles: u64 = 0;

        loop {
            let now_s = num_cycles as f64 * period_s;
            seq.run_cycle(&mut script, now_s);
            num_cycles += 1;

            // Driving straight forward
            if num_cycles == 250 {
                assert_eq!(seq.mode(), RobotMode::Teleop);
                teleop_output = Some(seq.container().drive.output());
            }

            if script.is_finished(now_s) || num_cycles > 10_000 {
                break
            }
        }

        assert_eq!(teleop_output, Some(WheelCommand { left: 0.8, right: 0.8 }));
        assert_eq!(counts.borrow().schedules, 1);
        assert_eq!(counts.borrow().cancels, 1);
        assert_eq!(seq.mode(), RobotMode::Disabled);
        assert_eq!(seq.container().drive.output(), WheelCommand::ZERO);
        assert_eq!(seq.num_ticks(), num_cycles);
    }

    #[test]
    fn test_timed_match() {
        let (mut seq, counts) = counting_seq();
        let mut m = TimedMatch::new(MatchParams {
            pre_match_s: 0.1,
            autonomous_s: 0.5,
            teleop_s: 0.5,
            test_s: 0.0,
        });

        let mut modes = vec![seq.mode()];
        let mut num_cycles: u64 = 0;

        loop {
            let now_s = num_cycles as f64 * 0.02;
            seq.run_cycle(&mut m, now_s);
            num_cycles += 1;

            if modes.last() != Some(&seq.mode()) {
                modes.push(seq.mode());
            }

            if m.is_finished(now_s) {
                break
            }
        }

        assert_eq!(
            modes,
            vec![
                RobotMode::Disabled,
                RobotMode::Autonomous,
                RobotMode::Teleop,
                RobotMode::Disabled
            ]
        );
        assert_eq!(counts.borrow().schedules, 1);
        assert_eq!(counts.borrow().cancels, 1);
    }
}
