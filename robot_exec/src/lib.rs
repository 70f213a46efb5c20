//! # Robot library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the robot crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command framework - commands, the scheduler and the autonomous routines
pub mod command;

/// Robot container - holds the subsystems and collaborators driven by the mode sequencer
pub mod container;

/// Drive control module - converts drive requests into left and right motor demands
pub mod drive_ctrl;

/// Driver input - the driver's axes
pub mod input;

/// Match control - decides which mode the robot should be in
pub mod match_ctrl;

/// Mode sequencer - runs the disabled/autonomous/teleop/test lifecycle
pub mod mode_seq;

/// Motor outputs - the motor controller interface and simulated motors
pub mod motor;

/// Executable parameters
pub mod params;

/// Periodic participants - things serviced once per tick
pub mod periodic;

/// Physics simulation - moves the simulated robot around the field
pub mod sim;
