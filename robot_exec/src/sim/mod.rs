//! # Physics simulation
//!
//! Simulates the robot's motion on the field from the outputs written to its simulated motors.
//! Each call to [`PhysicsEngine::update_sim`] advances the simulation by one step:
//!
//! - read the left and right motor outputs, undoing the right side inversion
//! - calculate wheel and chassis speeds from the two motor drivetrain model
//! - integrate the robot's pose on the field, keeping it inside the field
//! - advance the wheel encoders

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod dc_motor;
mod drivetrain;
mod encoder;
mod params;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use dc_motor::*;
pub use drivetrain::*;
pub use encoder::*;
pub use params::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use nalgebra::{Isometry2, Vector2};
use serde::Serialize;

// Internal
use crate::motor::MotorOutput;
use util::{
    archive::{Archived, Archiver},
    maths::clamp,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The physics engine.
pub struct PhysicsEngine {
    params: SimParams,
    invert_right: bool,

    left_motor: Box<dyn MotorOutput>,
    right_motor: Box<dyn MotorOutput>,

    motor_model: DcMotor,
    drivetrain: TwoMotorDrivetrain,

    left_encoder: EncoderSim,
    right_encoder: EncoderSim,

    /// Pose of the robot in the field frame.
    pose: Isometry2<f64>,

    state: SimState,
    arch_state: Archiver,
}

/// State of the simulation after an update.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SimState {
    /// Simulation time.
    ///
    /// Units: seconds
    pub time_s: f64,

    /// Motor outputs with the right side inversion undone.
    pub left_output: f64,
    pub right_output: f64,

    pub wheel_speeds: WheelSpeeds,
    pub chassis_speeds: ChassisSpeeds,

    /// Pose on the field as `[x_m, y_m, heading_rad]`.
    pub pose: [f64; 3],

    pub left_count: i64,
    pub right_count: i64,

    /// Estimated current drawn by each motor.
    ///
    /// Units: amps
    pub left_current_a: f64,
    pub right_current_a: f64,
}

/// A single row of the state archive.
#[derive(Serialize)]
struct StateRecord {
    time_s: f64,
    left_output: f64,
    right_output: f64,
    left_speed_ms: f64,
    right_speed_ms: f64,
    vx_ms: f64,
    omega_rads: f64,
    x_m: f64,
    y_m: f64,
    heading_rad: f64,
    left_count: i64,
    right_count: i64,
    left_current_a: f64,
    right_current_a: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PhysicsEngine {
    /// Create a new physics engine reading the given motors.
    ///
    /// `invert_right` must match the drivetrain's inversion of the right motor.
    pub fn new(
        params: SimParams,
        invert_right: bool,
        left_motor: Box<dyn MotorOutput>,
        right_motor: Box<dyn MotorOutput>
    ) -> Self {
        let [x, y, heading] = params.initial_pose;

        let left_encoder = EncoderSim::new(params.counts_per_revolution, params.wheel_diameter_m);
        let right_encoder = EncoderSim::new(params.counts_per_revolution, params.wheel_diameter_m);

        debug!(
            "Simulated encoders: {} counts/rev, {:.6} m/count",
            params.counts_per_revolution,
            left_encoder.distance_per_count()
        );

        Self {
            invert_right,
            left_motor,
            right_motor,
            motor_model: DcMotor::new(&params.motor),
            drivetrain: TwoMotorDrivetrain::new(
                params.track_width_m,
                params.max_speed_ms,
                linear_deadzone(params.deadzone)
            ),
            left_encoder,
            right_encoder,
            pose: Isometry2::new(Vector2::new(x, y), heading),
            state: SimState {
                pose: params.initial_pose,
                ..SimState::default()
            },
            arch_state: Archiver::default(),
            params,
        }
    }

    /// Archive the simulation state into the session.
    pub fn init_archive(&mut self, session: &Session) {
        self.arch_state = match Archiver::from_path(session, "sim/state.csv") {
            Ok(a) => a,
            Err(e) => {
                warn!("Could not create the simulation state archive: {}", e);
                Archiver::default()
            }
        };
    }

    /// The state after the last update.
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Pose of the robot in the field frame.
    pub fn pose(&self) -> Isometry2<f64> {
        self.pose
    }

    /// Advance the simulation by `tm_diff` seconds.
    pub fn update_sim(&mut self, tm_diff: f64) -> SimState {
        // ---- MOTORS ----

        let left_output = self.left_motor.get();
        let right_output = match self.invert_right {
            true => -self.right_motor.get(),
            false => self.right_motor.get()
        };

        let moving = left_output != 0.0 || right_output != 0.0;

        if moving {
            trace!("Motor outputs: left: {}, right: {}", left_output, right_output);
        }

        // ---- DRIVETRAIN ----

        let chassis = self.drivetrain.calculate(left_output, right_output);
        let wheels = self.drivetrain.wheel_speeds;

        if moving {
            trace!(
                "Chassis speeds: vx: {:.4} m/s, omega: {:.4} rad/s, wheels: {:.4}/{:.4} m/s",
                chassis.vx, chassis.omega, wheels.left, wheels.right
            );
        }

        // ---- POSE ----

        self.pose = integrate_pose(&self.pose, &chassis, tm_diff);
        self.clamp_to_field();

        // ---- ENCODERS ----

        self.left_encoder.update(wheels.left, tm_diff);
        self.right_encoder.update(wheels.right, tm_diff);

        if moving {
            trace!(
                "Encoders: left: {:.4} m/{:.4} m/s, right: {:.4} m/{:.4} m/s",
                self.left_encoder.distance(), self.left_encoder.rate(),
                self.right_encoder.distance(), self.right_encoder.rate()
            );
        }

        // ---- STATE ----

        self.state = SimState {
            time_s: self.state.time_s + tm_diff,
            left_output,
            right_output,
            wheel_speeds: wheels,
            chassis_speeds: chassis,
            pose: [
                self.pose.translation.vector.x,
                self.pose.translation.vector.y,
                self.pose.rotation.angle()
            ],
            left_count: self.left_encoder.count(),
            right_count: self.right_encoder.count(),
            left_current_a: self.motor_current(left_output, wheels.left),
            right_current_a: self.motor_current(right_output, wheels.right),
        };

        self.state
    }

    /// Estimated motor current for an output and the resulting wheel speed. The wheel speed is
    /// mapped onto the motor's free speed, with full speed at the free speed.
    fn motor_current(&self, output: f64, wheel_speed_ms: f64) -> f64 {
        if self.params.max_speed_ms <= 0.0 {
            return 0.0
        }

        let speed_rads = wheel_speed_ms / self.params.max_speed_ms
            * self.motor_model.free_speed_rads;

        self.motor_model.current(speed_rads, output * self.motor_model.nominal_voltage)
    }

    /// Keep the robot's position inside the field.
    fn clamp_to_field(&mut self) {
        let [length_m, width_m] = self.params.field_size_m;
        let t = &mut self.pose.translation.vector;

        t.x = clamp(t.x, 0.0, length_m);
        t.y = clamp(t.y, 0.0, width_m);
    }
}

impl Archived for PhysicsEngine {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let s = &self.state;

        self.arch_state.serialise(StateRecord {
            time_s: s.time_s,
            left_output: s.left_output,
            right_output: s.right_output,
            left_speed_ms: s.wheel_speeds.left,
            right_speed_ms: s.wheel_speeds.right,
            vx_ms: s.chassis_speeds.vx,
            omega_rads: s.chassis_speeds.omega,
            x_m: s.pose[0],
            y_m: s.pose[1],
            heading_rad: s.pose[2],
            left_count: s.left_count,
            right_count: s.right_count,
            left_current_a: s.left_current_a,
            right_current_a: s.right_current_a,
        })
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Move a pose along a constant velocity arc for `dt_s` seconds.
fn integrate_pose(pose: &Isometry2<f64>, chassis: &ChassisSpeeds, dt_s: f64) -> Isometry2<f64> {
    let dx = chassis.vx * dt_s;
    let dy = chassis.vy * dt_s;
    let dtheta = chassis.omega * dt_s;

    // Small angles use the straight line approximation
    let (s, c) = if dtheta.abs() < 1e-9 {
        (1.0 - dtheta * dtheta / 6.0, dtheta / 2.0)
    }
    else {
        (dtheta.sin() / dtheta, (1.0 - dtheta.cos()) / dtheta)
    };

    let delta = Isometry2::new(
        Vector2::new(dx * s - dy * c, dx * c + dy * s),
        dtheta
    );

    pose * delta
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::motor::SimMotor;
    use std::f64::consts::PI;

    fn sim(params: SimParams) -> (PhysicsEngine, SimMotor, SimMotor) {
        let left = SimMotor::new();
        let right = SimMotor::new();
        let engine = PhysicsEngine::new(
            params, true, Box::new(left.clone()), Box::new(right.clone())
        );
        (engine, left, right)
    }

    fn run(engine: &mut PhysicsEngine, seconds: f64) -> SimState {
        let steps = (seconds / 0.02).round() as usize;
        let mut state = engine.state();
        for _ in 0..steps {
            state = engine.update_sim(0.02);
        }
        state
    }

    #[test]
    fn test_idle() {
        let (mut engine, _, _) = sim(SimParams::default());

        let s = run(&mut engine, 1.0);
        assert_eq!(s.pose, [0.5, 2.0, 0.0]);
        assert_eq!(s.left_count, 0);
        assert_eq!(s.left_current_a, 0.0);
    }

    #[test]
    fn test_straight_line() {
        let (mut engine, mut left, mut right) = sim(SimParams::default());

        // Right motor is inverted on the robot
        left.set(1.0);
        right.set(-1.0);

        let s = run(&mut engine, 1.0);
        assert!((s.time_s - 1.0).abs() < 1e-9);
        assert!((s.pose[0] - 1.1).abs() < 1e-9);
        assert!((s.pose[1] - 2.0).abs() < 1e-9);
        assert!(s.pose[2].abs() < 1e-12);

        // Both encoders see the same distance
        assert_eq!(s.left_count, s.right_count);
        assert!(s.left_count > 0);

        // At full speed the motors draw their free current
        assert!((s.left_current_a - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_turn_in_place() {
        let (mut engine, mut left, mut right) = sim(SimParams::default());

        left.set(-1.0);
        right.set(-1.0);

        let s = run(&mut engine, 0.1);
        let expected = 1.2 / 0.155 * 0.1;
        assert!((s.pose[2] - expected).abs() < 1e-9);
        assert!((s.pose[0] - 0.5).abs() < 1e-9);
        assert!(s.left_count < 0 && s.right_count > 0);
    }

    #[test]
    fn test_arc_is_exact() {
        let pose = Isometry2::new(Vector2::new(0.0, 0.0), 0.0);
        let chassis = ChassisSpeeds { vx: 1.0, vy: 0.0, omega: PI / 2.0 };

        // Quarter circle of radius 2/pi in a single step
        let p = integrate_pose(&pose, &chassis, 1.0);
        let r = 2.0 / PI;
        assert!((p.translation.vector.x - r).abs() < 1e-9);
        assert!((p.translation.vector.y - r).abs() < 1e-9);
        assert!((p.rotation.angle() - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pose_kept_on_field() {
        let (mut engine, mut left, mut right) = sim(SimParams::default());

        left.set(-1.0);
        right.set(1.0);

        let s = run(&mut engine, 2.0);
        assert_eq!(s.pose[0], 0.0);
        assert!((s.pose[1] - 2.0).abs() < 1e-9);
    }
}
