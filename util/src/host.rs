//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::env;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable pointing at the root of the robot software checkout.
///
/// The `params` and `sessions` directories are resolved relative to this root.
pub const SW_ROOT_ENV_VAR: &str = "ROBOT_SW_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the software root directory from the environment.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// Describe the host the executable is running on, as `<os>/<arch>`.
pub fn get_host_desc() -> String {
    format!("{}/{}", env::consts::OS, env::consts::ARCH)
}
