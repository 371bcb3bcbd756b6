//! Host platform utility functions

use std::path::PathBuf;

/// Name of the environment variable pointing at the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "OTTER_SW_ROOT";

/// Get the software root directory from the `OTTER_SW_ROOT` environment
/// variable.
///
/// The root directory contains the `params`, `paths`, and `sessions`
/// directories used by the executables.
pub fn get_otter_sw_root() -> Result<PathBuf, std::env::VarError> {
    let root = std::env::var(SW_ROOT_ENV_VAR)?;
    Ok(PathBuf::from(root))
}
