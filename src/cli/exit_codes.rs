//! exit codes for condctl commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error;
//! specific codes help scripts distinguish between failure types

/// general or unknown error
pub const ERROR: i32 = 1;

/// condition parsed but is not complete enough to save
pub const INCOMPLETE: i32 = 2;

/// input is not a readable condition
pub const PARSE_ERROR: i32 = 3;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;

/// display info could not be fetched
pub const RESOLVE_FAILED: i32 = 6;
