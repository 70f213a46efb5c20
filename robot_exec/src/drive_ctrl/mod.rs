//! Drive control module
//!
//! Converts driver or autonomous drive requests into left/right motor demands for a two motor
//! differential drivetrain.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;
mod calc_arcade;
mod calc_curvature;
mod calc_tank;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use params::*;
pub use state::*;
pub use calc_arcade::arcade;
pub use calc_curvature::curvature;
pub use calc_tank::tank;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Interface to a differential drivetrain.
///
/// Every call replaces the previous demand immediately, there is no queueing of commands.
pub trait Drivetrain {
    /// Execute a drive command, returning the wheel command that was applied.
    fn drive(&mut self, cmd: DriveCmd) -> WheelCommand;

    /// The wheel command currently applied to the motors.
    fn output(&self) -> WheelCommand;

    /// Arcade drive: `speed` along the X axis, `rotation` around the Z axis, both in [-1, 1].
    fn arcade_drive(&mut self, speed: f64, rotation: f64, square_inputs: bool) {
        self.drive(DriveCmd::Arcade { speed, rotation, square_inputs });
    }

    /// Tank drive: independent left and right speeds in [-1, 1].
    fn tank_drive(&mut self, left: f64, right: f64, square_inputs: bool) {
        self.drive(DriveCmd::Tank { left, right, square_inputs });
    }

    /// Curvature drive: `rotation` controls the curvature of the path rather than the turn rate,
    /// unless `allow_turn_in_place` is set.
    fn curvature_drive(&mut self, speed: f64, rotation: f64, allow_turn_in_place: bool) {
        self.drive(DriveCmd::Curvature { speed, rotation, allow_turn_in_place });
    }

    /// Stop both motors.
    fn stop(&mut self) {
        self.drive(DriveCmd::Stop);
    }
}
