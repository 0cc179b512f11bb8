//! Process exit codes shared by every command

/// Command completed
pub const EXIT_SUCCESS: i32 = 0;

/// Command failed, or doctor reported warnings
pub const EXIT_WARNING: i32 = 1;

/// Invalid input or configuration, or doctor reported errors
pub const EXIT_ERROR: i32 = 2;
