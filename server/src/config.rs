//! Application configuration constants
//!
//! Central location for validation boundaries, defaults and file names
//! used throughout the server.

// ===== Habit Limits =====

/// First valid weekday index (Sunday)
pub const MIN_WEEK_DAY: u8 = 0;
/// Last valid weekday index (Saturday)
pub const MAX_WEEK_DAY: u8 = 6;

/// Maximum habit title length in characters.
/// Keeps the day list and summary payloads bounded.
pub const MAX_HABIT_TITLE_LENGTH: usize = 200;

// ===== Server Defaults =====

/// Default bind address for the HTTP listener
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 3333;

// ===== Calendar =====

/// Default reference offset from UTC, in minutes
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 0;

/// Largest offset accepted in either direction (UTC+14 / UTC-14)
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

// ===== Files =====

/// Directory used when `HABITS_DATA_DIR` is not set
pub const DEFAULT_DATA_DIR: &str = "data";

/// SQLite database file inside the data directory
pub const DATABASE_FILE_NAME: &str = "habits.db";

/// Settings file inside the data directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";
