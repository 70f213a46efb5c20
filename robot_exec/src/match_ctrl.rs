//! # Match control
//!
//! Match control decides which mode the robot should be in. Two sources are provided:
//!
//! - [`TimedMatch`], which runs a standard match timeline.
//! - [`MatchScript`], which replays a script of mode changes and driver inputs.
//!
//! Scripts are made of `<time>: <json>;` entries, where the time is in seconds since the start of
//! the match:
//!
//! ```text
//! 1.0: {"mode": "autonomous"};
//! 16.0: {"mode": "teleop"};
//! 16.5: {"axes": {"speed": -0.5, "rotation": 0.0}};
//! 20.0: {"mode": "disabled"};
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use log::debug;
use regex::RegexBuilder;
use serde::Deserialize;
use thiserror::Error;

// Internal
use crate::{
    input::{ControlInput, SharedInput},
    mode_seq::RobotMode,
};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of mode changes.
pub trait MatchControl {
    /// The modes the robot should pass through at `now_s`, in order. Empty if there is no demand.
    fn modes(&mut self, now_s: f64) -> Vec<RobotMode>;

    /// Returns true if the match is simulated.
    fn is_simulation(&self) -> bool;

    /// Returns true once the match is over.
    fn is_finished(&self, now_s: f64) -> bool;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Durations of the periods of a timed match.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    /// Time spent disabled before autonomous starts.
    pub pre_match_s: f64,

    /// Length of the autonomous period.
    pub autonomous_s: f64,

    /// Length of the teleop period.
    pub teleop_s: f64,

    /// Length of the test period after teleop, zero for no test period.
    pub test_s: f64,
}

/// A match following the standard timeline: disabled, autonomous, teleop, an optional test
/// period, then disabled again.
#[derive(Debug, Clone)]
pub struct TimedMatch {
    params: MatchParams,
}

/// A scripted event.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Change the robot mode.
    Mode(RobotMode),

    /// Set the driver's axes.
    Axes(ControlInput),
}

/// An event which is scripted to occur at a specific time.
#[derive(Debug, Clone)]
struct TimedEvent {
    exec_time_s: f64,
    event: ScriptEvent,
}

/// A match replayed from a script.
///
/// Axes events are written into the [`SharedInput`] given on construction, mode events are
/// returned from [`MatchControl::modes`]. Every mode event is returned, even when several fall
/// due in the same cycle.
pub struct MatchScript {
    _script_path: Option<PathBuf>,
    events: VecDeque<TimedEvent>,
    duration_s: f64,
    input: SharedInput,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error("Script contains an invalid timestamp: {0}. Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid event at {0} s: {1}")]
    InvalidEvent(f64, serde_json::Error),

    #[error("Could not build the script parser: {0}")]
    ParserError(regex::Error),
}

/// Events due for execution.
#[derive(Debug, PartialEq)]
pub enum PendingEvents {
    None,
    Some(Vec<ScriptEvent>),
    EndOfScript,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            pre_match_s: 1.0,
            autonomous_s: 15.0,
            teleop_s: 135.0,
            test_s: 0.0,
        }
    }
}

impl MatchParams {
    /// Total length of the match.
    pub fn total_s(&self) -> f64 {
        self.pre_match_s + self.autonomous_s + self.teleop_s + self.test_s.max(0.0)
    }
}

impl TimedMatch {
    pub fn new(params: MatchParams) -> Self {
        Self { params }
    }
}

impl MatchControl for TimedMatch {
    fn modes(&mut self, now_s: f64) -> Vec<RobotMode> {
        let p = &self.params;

        let auto_start = p.pre_match_s;
        let teleop_start = auto_start + p.autonomous_s;
        let test_start = teleop_start + p.teleop_s;

        let mode = if now_s < auto_start {
            RobotMode::Disabled
        }
        else if now_s < teleop_start {
            RobotMode::Autonomous
        }
        else if now_s < test_start {
            RobotMode::Teleop
        }
        else if now_s < p.total_s() {
            RobotMode::Test
        }
        else {
            RobotMode::Disabled
        };

        vec![mode]
    }

    fn is_simulation(&self) -> bool {
        true
    }

    fn is_finished(&self, now_s: f64) -> bool {
        now_s >= self.params.total_s()
    }
}

impl MatchScript {
    /// Load a script from the given path.
    pub fn new<P: AsRef<Path>>(script_path: P, input: SharedInput) -> Result<Self, ScriptError> {
        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        let script = fs::read_to_string(&path).map_err(ScriptError::ScriptLoadError)?;

        let mut s = Self::parse(&script, input)?;
        s._script_path = Some(path);

        Ok(s)
    }

    /// Parse a script from a string.
    pub fn parse(script: &str, input: SharedInput) -> Result<Self, ScriptError> {
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::ParserError)?;

        let mut events = Vec::new();

        for cap in re.captures_iter(script) {
            let (time_str, payload) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue
            };

            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            let event: ScriptEvent = serde_json::from_str(payload)
                .map_err(|e| ScriptError::InvalidEvent(exec_time_s, e))?;

            events.push(TimedEvent { exec_time_s, event });
        }

        if events.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        // Stable, so events at the same time keep their script order
        events.sort_by(|a, b| {
            a.exec_time_s
                .partial_cmp(&b.exec_time_s)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let duration_s = events.last().map_or(0.0, |e| e.exec_time_s);

        Ok(Self {
            _script_path: None,
            events: events.into(),
            duration_s,
            input,
        })
    }

    /// Pop every event whose execution time has been reached.
    pub fn get_pending(&mut self, now_s: f64) -> PendingEvents {
        if self.events.is_empty() {
            return PendingEvents::EndOfScript
        }

        let mut pending = vec![];

        while let Some(e) = self.events.front() {
            if e.exec_time_s > now_s {
                break
            }

            if let Some(e) = self.events.pop_front() {
                pending.push(e.event);
            }
        }

        if pending.is_empty() {
            PendingEvents::None
        }
        else {
            PendingEvents::Some(pending)
        }
    }

    /// Number of events remaining.
    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    /// Time of the last event.
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }
}

impl MatchControl for MatchScript {
    fn modes(&mut self, now_s: f64) -> Vec<RobotMode> {
        let mut modes = vec![];

        if let PendingEvents::Some(events) = self.get_pending(now_s) {
            for event in events {
                debug!("Script event at {:.2} s: {:?}", now_s, event);

                match event {
                    ScriptEvent::Mode(m) => modes.push(m),
                    ScriptEvent::Axes(axes) => self.input.set(axes)
                }
            }
        }

        modes
    }

    fn is_simulation(&self) -> bool {
        true
    }

    fn is_finished(&self, now_s: f64) -> bool {
        self.events.is_empty() && now_s >= self.duration_s
    }
}
