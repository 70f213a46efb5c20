//! # Driver input
//!
//! Driver input is read through the [`DriverInput`] trait, polled at most once per tick.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::cell::Cell;
use std::rc::Rc;
use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single reading of the driver's axes.
///
/// Values are the raw device axes in [-1, 1]. On most joysticks pushing the stick forward gives a
/// negative `speed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    /// Forward axis (Y on the device).
    pub speed: f64,

    /// Turn axis (X on the device).
    pub rotation: f64,
}

/// Driver input whose axes are set from elsewhere in the executable, a match script for example.
///
/// Clones share the same axes.
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    axes: Rc<Cell<ControlInput>>,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of driver axes.
pub trait DriverInput {
    /// Read the current axes.
    fn poll(&mut self) -> ControlInput;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SharedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the axes returned by subsequent polls.
    pub fn set(&self, input: ControlInput) {
        self.axes.set(input);
    }
}

impl DriverInput for SharedInput {
    fn poll(&mut self) -> ControlInput {
        self.axes.get()
    }
}
