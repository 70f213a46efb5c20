//! Main robot executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Match control: determine the robot mode
//!         - Mode sequencing:
//!             - Mode transitions
//!             - Mode periodic processing (teleop driving)
//!             - Drive control periodic processing (motor safety)
//!             - Command scheduling (autonomous routines)
//!         - Physics simulation
//!         - Archiving
//!
//! # Modules
//!
//! All modules (e.g. `drive_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use robot_lib::{
    command::build_routine,
    container::RobotContainer,
    drive_ctrl::{DriveCtrl, Drivetrain},
    input::SharedInput,
    match_ctrl::{MatchControl, MatchScript, TimedMatch},
    mode_seq::{ModeSequencer, RobotMode},
    motor::SimMotor,
    params::RobotExecParams,
    sim::{PhysicsEngine, SimParams},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use structopt::StructOpt;

// Internal
use util::{
    host,
    archive::Archived,
    module::State,
    logger::{logger_init, parse_level},
    session::Session,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Command line arguments.
#[derive(Debug, StructOpt)]
#[structopt(name = "robot_exec", about = "Differential drive robot executable")]
struct Opt {
    /// Match script to replay. If not given a timed match is run.
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Minimum log level (info, debug or trace).
    #[structopt(long, default_value = "info")]
    log_level: String,

    /// Stop after this many cycles.
    #[structopt(long)]
    max_cycles: Option<u64>,

    /// Run cycles back to back instead of in real time.
    #[structopt(long)]
    fast: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "robot_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    let log_level = parse_level(&opt.log_level)
        .ok_or_else(|| eyre!("Unknown log level \"{}\"", opt.log_level))?;
    logger_init(log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Robot Executable\n");
    info!("Running on: {}", host::get_host_desc());
    info!("Session directory: {:?}\n", session.session_root);

    debug!("CLI arguments: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let exec_params: RobotExecParams = util::params::load("robot_exec.toml")
        .wrap_err("Could not load exec params")?;

    let sim_params: SimParams = util::params::load("sim.toml")
        .wrap_err("Could not load sim params")?;

    info!("Exec parameters loaded");

    if !(exec_params.cycle_period_s > 0.0) {
        return Err(eyre!(
            "Cycle period must be positive, found {} s", exec_params.cycle_period_s
        ));
    }

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let left_motor = SimMotor::new();
    let right_motor = SimMotor::new();

    let mut drive = DriveCtrl::new(
        Box::new(left_motor.clone()),
        Box::new(right_motor.clone())
    );
    drive.init("drive_ctrl.toml", &session)
        .wrap_err("Failed to initialise DriveCtrl")?;
    info!("DriveCtrl init complete");

    let invert_right = drive.params().invert_right;

    let auto_cmd = build_routine(&exec_params.auto_routine)
        .wrap_err("Failed to build the autonomous routine")?;

    let input = SharedInput::new();

    let mut container = RobotContainer::new(drive).with_autonomous(auto_cmd);
    if exec_params.driver_controller_enabled {
        container = container.with_input(Box::new(input.clone()));
    }
    else {
        info!("Driver controller disabled");
    }

    let mut seq = ModeSequencer::new(container, exec_params.teleop_square_inputs);

    info!("Module initialisation complete\n");

    // ---- INITIALISE MATCH CONTROL ----

    let mut match_ctrl: Box<dyn MatchControl> = match opt.script {
        Some(ref path) => {
            info!("Loading match script from {:?}", path);

            let script = MatchScript::new(path, input)
                .wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} events\n",
                script.duration_s(),
                script.num_events()
            );

            Box::new(script)
        },
        None => {
            info!(
                "No script provided, running a timed match lasting {:.02} s\n",
                exec_params.timed_match.total_s()
            );
            Box::new(TimedMatch::new(exec_params.timed_match))
        }
    };

    // ---- INITIALISE SIMULATION ----

    let mut physics = match match_ctrl.is_simulation() {
        true => {
            let mut p = PhysicsEngine::new(
                sim_params,
                invert_right,
                Box::new(left_motor),
                Box::new(right_motor)
            );
            p.init_archive(&session);
            info!("PhysicsEngine initialised");
            Some(p)
        },
        false => {
            warn!("Not a simulated match, the physics engine will not be run");
            None
        }
    };

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let mut num_cycles: u64 = 0;
    let mut now_s: f64;

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Match time advances by exactly one period per cycle
        now_s = num_cycles as f64 * exec_params.cycle_period_s;

        // ---- MATCH CONTROL AND ROBOT PROCESSING ----

        seq.run_cycle(match_ctrl.as_mut(), now_s);

        // ---- SIMULATION ----

        if let Some(ref mut p) = physics {
            p.update_sim(exec_params.cycle_period_s);
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = seq.container_mut().drive.write() {
            warn!("Could not write DriveCtrl archive: {}", e);
        }
        if let Some(ref mut p) = physics {
            if let Err(e) = p.write() {
                warn!("Could not write PhysicsEngine archive: {}", e);
            }
        }

        // Increment cycle counter
        num_cycles += 1;

        // ---- END CONDITIONS ----

        if match_ctrl.is_finished(now_s) {
            info!("End of match reached, stopping");
            break
        }

        if let Some(max) = opt.max_cycles {
            if num_cycles >= max {
                info!("Maximum number of cycles ({}) reached, stopping", max);
                break
            }
        }

        // ---- CYCLE MANAGEMENT ----

        if opt.fast {
            continue
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            )
        }
    }

    // ---- SHUTDOWN ----

    seq.set_mode(RobotMode::Disabled, now_s);
    seq.container_mut().drive.stop();

    info!("{} cycles executed", num_cycles);
    if let Some(ref p) = physics {
        let [x, y, heading] = p.state().pose;
        info!("Final pose: ({:.3} m, {:.3} m, {:.3} rad)", x, y, heading);
    }

    info!("End of execution");

    Ok(())
}
