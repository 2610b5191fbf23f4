//! Application-wide constants.

/// Minimum accepted password length for registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Default lifetime of an issued session token, in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Default directory for the local storage backend's collections.
pub const DEFAULT_DATA_DIR: &str = "./data";
