//! # Command builder
//!
//! Builds a [`Command`] out of closures, so that simple routines don't need their own type.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::{Command, CommandError};
use crate::drive_ctrl::Drivetrain;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

type DriveFn = Box<dyn FnMut(&mut dyn Drivetrain)>;
type StopFn = Box<dyn FnMut(&mut dyn Drivetrain, bool)>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Builder for a [`BuiltCommand`].
///
/// ```ignore
/// let cmd = CommandBuilder::new("DriveForward")
///     .on_step(|d| d.arcade_drive(0.5, 0.0, false))
///     .on_stop(|d, _| d.stop())
///     .with_timeout(2.0)
///     .build()?;
/// ```
pub struct CommandBuilder {
    name: String,
    on_start: Option<DriveFn>,
    on_step: Option<DriveFn>,
    on_stop: Option<StopFn>,
    timeout_s: Option<f64>,
    run_once: bool,
    runs_when_disabled: bool,
}

/// A command assembled by a [`CommandBuilder`].
pub struct BuiltCommand {
    name: String,
    on_start: Option<DriveFn>,
    on_step: Option<DriveFn>,
    on_stop: Option<StopFn>,
    timeout_s: Option<f64>,
    run_once: bool,
    runs_when_disabled: bool,

    start_time_s: f64,
    elapsed_s: f64,
    num_steps: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CommandBuilder {
    /// Start building a command with the given name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            on_start: None,
            on_step: None,
            on_stop: None,
            timeout_s: None,
            run_once: false,
            runs_when_disabled: false,
        }
    }

    /// Action run when the command starts.
    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut dyn Drivetrain) + 'static
    {
        self.on_start = Some(Box::new(f));
        self
    }

    /// Action run on every tick while executing.
    pub fn on_step<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut dyn Drivetrain) + 'static
    {
        self.on_step = Some(Box::new(f));
        self
    }

    /// Action run when the command ends. The flag is set if the command was interrupted.
    pub fn on_stop<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut dyn Drivetrain, bool) + 'static
    {
        self.on_stop = Some(Box::new(f));
        self
    }

    /// Finish the command once it has been executing for `timeout_s` seconds.
    pub fn with_timeout(mut self, timeout_s: f64) -> Self {
        self.timeout_s = Some(timeout_s);
        self
    }

    /// Finish the command after its first step.
    pub fn run_once(mut self) -> Self {
        self.run_once = true;
        self
    }

    /// Keep running the command while the robot is disabled.
    pub fn runs_when_disabled(mut self) -> Self {
        self.runs_when_disabled = true;
        self
    }

    /// Build the command.
    ///
    /// A command with neither a timeout nor `run_once` runs until it is cancelled.
    pub fn build(self) -> Result<BuiltCommand, CommandError> {
        if self.name.trim().is_empty() {
            return Err(CommandError::EmptyName)
        }

        if let Some(t) = self.timeout_s {
            if !(t > 0.0) || !t.is_finite() {
                return Err(CommandError::InvalidTimeout(t))
            }
        }

        Ok(BuiltCommand {
            name: self.name,
            on_start: self.on_start,
            on_step: self.on_step,
            on_stop: self.on_stop,
            timeout_s: self.timeout_s,
            run_once: self.run_once,
            runs_when_disabled: self.runs_when_disabled,
            start_time_s: 0.0,
            elapsed_s: 0.0,
            num_steps: 0,
        })
    }
}

impl BuiltCommand {
    /// Time spent executing, as of the last step.
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }
}

impl Command for BuiltCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, drive: &mut dyn Drivetrain, now_s: f64) {
        self.start_time_s = now_s;
        self.elapsed_s = 0.0;
        self.num_steps = 0;

        if let Some(ref mut f) = self.on_start {
            f(drive);
        }
    }

    fn step(&mut self, drive: &mut dyn Drivetrain, now_s: f64) {
        self.elapsed_s = now_s - self.start_time_s;

        if let Some(ref mut f) = self.on_step {
            f(drive);
        }

        self.num_steps += 1;
    }

    fn is_done(&self) -> bool {
        if self.run_once && self.num_steps > 0 {
            return true
        }

        match self.timeout_s {
            Some(t) => self.elapsed_s >= t,
            None => false
        }
    }

    fn stop(&mut self, drive: &mut dyn Drivetrain, interrupted: bool) {
        if let Some(ref mut f) = self.on_stop {
            f(drive, interrupted);
        }
    }

    fn runs_when_disabled(&self) -> bool {
        self.runs_when_disabled
    }
}
