//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use serde::Serialize;

// Internal
use super::{
    Params,
    DriveCmd, WheelCommand, Drivetrain,
    arcade, curvature, tank};
use crate::{
    motor::{MotorId, MotorOutput, SimMotor},
    periodic::Periodic};
use util::{
    params,
    maths::apply_deadband,
    module::State,
    archive::{Archived, Archiver},
    session::{self, Session}};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive control module state.
///
/// Owns the left and right motor outputs and applies exactly one wheel command per call. Drive
/// control never fails at runtime: invalid demands are clamped to the nearest valid command.
pub struct DriveCtrl {

    pub(crate) params: Params,

    left_motor: Box<dyn MotorOutput>,
    right_motor: Box<dyn MotorOutput>,

    pub(crate) report: StatusReport,

    pub(crate) current_cmd: Option<DriveCmd>,

    pub(crate) output: WheelCommand,
    arch_output: Archiver,

    /// Number of periodic ticks executed.
    num_periodic: u64,

    /// Number of periodic ticks since the last drive demand.
    cycles_since_feed: u64,
}

/// Input data to drive control.
#[derive(Default)]
pub struct InputData {
    /// The drive command to be executed, or `None` if there is no new
    /// command on this cycle.
    pub cmd: Option<DriveCmd>
}

/// Status report for DriveCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// An input was outside [-1, 1] or not a number and has been clamped.
    pub input_clamped: bool,

    /// The motor safety stopped the motors on the last periodic tick, as no demand was received in
    /// time.
    pub safety_stopped: bool,
}

/// A single row of the output archive.
#[derive(Serialize)]
struct OutputRecord {
    time_s: f64,
    num_periodic: u64,
    left: f64,
    right: f64,
    left_motor: f64,
    right_motor: f64,
    input_clamped: bool,
    safety_stopped: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DriveCtrl {
    fn default() -> Self {
        Self::new(Box::new(SimMotor::new()), Box::new(SimMotor::new()))
    }
}

impl DriveCtrl {

    /// Create a new drive control using the default parameters.
    pub fn new(left_motor: Box<dyn MotorOutput>, right_motor: Box<dyn MotorOutput>) -> Self {
        Self::with_params(Params::default(), left_motor, right_motor)
    }

    /// Create a new drive control with the given parameters.
    pub fn with_params(
        params: Params,
        left_motor: Box<dyn MotorOutput>,
        right_motor: Box<dyn MotorOutput>
    ) -> Self {
        Self {
            params,
            left_motor,
            right_motor,
            report: StatusReport::default(),
            current_cmd: None,
            output: WheelCommand::ZERO,
            arch_output: Archiver::default(),
            num_periodic: 0,
            cycles_since_feed: 0,
        }
    }

    /// The parameters in use.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The last command executed.
    pub fn current_cmd(&self) -> Option<DriveCmd> {
        self.current_cmd
    }

    /// The status report of the last command or periodic tick.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// Number of periodic ticks executed since creation.
    pub fn num_periodic(&self) -> u64 {
        self.num_periodic
    }

    /// Read back the value sent to a motor, including any inversion.
    pub fn motor_output(&self, id: MotorId) -> f64 {
        match id {
            MotorId::Left => self.left_motor.get(),
            MotorId::Right => self.right_motor.get(),
        }
    }

    /// Calculate the wheel command for a drive command, applying the deadband and the maximum
    /// output.
    fn calc_wheel_cmd(&mut self, cmd: &DriveCmd) -> WheelCommand {
        let db = self.params.deadband;

        let wheel_cmd = match *cmd {
            DriveCmd::Arcade { speed, rotation, square_inputs } => {
                let (speed, rotation) = (self.shape(speed, db), self.shape(rotation, db));
                arcade(speed, rotation, square_inputs)
            },
            DriveCmd::Tank { left, right, square_inputs } => {
                let (left, right) = (self.shape(left, db), self.shape(right, db));
                tank(left, right, square_inputs)
            },
            DriveCmd::Curvature { speed, rotation, allow_turn_in_place } => {
                let (speed, rotation) = (self.shape(speed, db), self.shape(rotation, db));
                curvature(speed, rotation, allow_turn_in_place)
            },
            DriveCmd::Stop => return WheelCommand::ZERO
        };

        wheel_cmd.scaled(self.params.max_output)
    }

    /// Clamp an input into [-1, 1] and apply the deadband, flagging invalid inputs in the
    /// status report.
    fn shape(&mut self, value: f64, deadband: f64) -> f64 {
        let clamped = util::maths::clamp(value, -1.0, 1.0);

        if clamped != value {
            self.report.input_clamped = true;
        }

        apply_deadband(clamped, deadband)
    }

    /// Write a wheel command to the motors.
    fn write_motors(&mut self, wheel_cmd: WheelCommand) {
        let right = match self.params.invert_right {
            true => -wheel_cmd.right,
            false => wheel_cmd.right
        };

        self.left_motor.set(wheel_cmd.left);
        self.right_motor.set(right);

        self.output = wheel_cmd;
    }

    /// Log a drive command, only logging demands to keep idle logs quiet.
    fn log_cmd(cmd: &DriveCmd) {
        match cmd {
            DriveCmd::Arcade { speed, rotation, square_inputs } if cmd.has_demand() => debug!(
                "arcade_drive: speed: {}, rotation: {}, square_inputs: {}",
                speed, rotation, square_inputs
            ),
            DriveCmd::Tank { left, right, square_inputs } => trace!(
                "tank_drive: speed: {}/{}, square_inputs: {}",
                left, right, square_inputs
            ),
            DriveCmd::Curvature { speed, rotation, allow_turn_in_place }
                if cmd.has_demand() => debug!(
                    "curvature_drive: speed: {}, rotation: {}, allow_turn_in_place: {}",
                    speed, rotation, allow_turn_in_place
                ),
            DriveCmd::Stop => debug!("stop"),
            _ => ()
        }
    }
}

impl Drivetrain for DriveCtrl {
    fn drive(&mut self, cmd: DriveCmd) -> WheelCommand {
        // Clear the status report
        self.report = StatusReport::default();

        Self::log_cmd(&cmd);

        if let Some(mode) = cmd.mode() {
            if self.current_cmd.and_then(|c| c.mode()) != Some(mode) {
                debug!("Drive mode changed to {:?}", mode);
            }
        }

        let wheel_cmd = self.calc_wheel_cmd(&cmd);
        self.write_motors(wheel_cmd);

        // Feed the motor safety
        self.cycles_since_feed = 0;
        self.current_cmd = Some(cmd);

        wheel_cmd
    }

    fn output(&self) -> WheelCommand {
        self.output
    }
}

impl Periodic for DriveCtrl {
    /// Count the tick and run the motor safety check.
    ///
    /// `safety_stopped` in the status report is only set on the tick which stopped the motors.
    fn periodic(&mut self) {
        self.num_periodic += 1;
        self.report.safety_stopped = false;

        self.cycles_since_feed = self.cycles_since_feed.saturating_add(1);

        if self.params.safety_enabled
            && self.cycles_since_feed > self.params.safety_expiration_cycles()
            && !self.output.is_zero()
        {
            warn!(
                "DriveCtrl output not updated often enough (no demand for {} cycles), stopping \
                motors",
                self.cycles_since_feed
            );
            self.write_motors(WheelCommand::ZERO);
            self.report.safety_stopped = true;
        }
    }
}

impl State for DriveCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = WheelCommand;
    type StatusReport = StatusReport;
    type ProcError = std::convert::Infallible;

    /// Initialise the DriveCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Load the parameters
        self.params = params::load(init_data)?;

        // Initialise the archiver, archiving is best effort so failures are only logged
        self.arch_output = match Archiver::from_path(session, "drive_ctrl/output.csv") {
            Ok(a) => a,
            Err(e) => {
                warn!("Could not create the DriveCtrl output archive: {}", e);
                Archiver::default()
            }
        };

        debug!("DriveCtrl parameters: {:?}", self.params);
        debug!(
            "Drive motors on devices {} (left) and {} (right)",
            self.params.motor_device(MotorId::Left),
            self.params.motor_device(MotorId::Right)
        );

        Ok(())
    }

    /// Perform cyclic processing of drive control.
    ///
    /// If there is no new command the previous output is held, the motor safety in the periodic
    /// tick is responsible for stopping stale outputs.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        if let Some(cmd) = input_data.cmd {
            self.drive(cmd);
        }

        Ok((self.output, self.report))
    }
}

impl Archived for DriveCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_output.serialise(OutputRecord {
            time_s: session::get_elapsed_seconds(),
            num_periodic: self.num_periodic,
            left: self.output.left,
            right: self.output.right,
            left_motor: self.motor_output(MotorId::Left),
            right_motor: self.motor_output(MotorId::Right),
            input_clamped: self.report.input_clamped,
            safety_stopped: self.report.safety_stopped,
        })
    }
}
