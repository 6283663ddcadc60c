//! Storage keys and file names

/// Draft-store key holding the last committed `{year, sequence}`
pub const ORDER_COUNTER_KEY: &str = "sow_order_counter";

/// Application directory under the platform config/data dirs
pub const APP_DIR_NAME: &str = "sow-tools";

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default remote table
pub const DEFAULT_REMOTE_TABLE: &str = "documents";

pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

pub const REMOTE_URL_ENV: &str = "SOW_REMOTE_URL";
pub const REMOTE_KEY_ENV: &str = "SOW_REMOTE_KEY";
