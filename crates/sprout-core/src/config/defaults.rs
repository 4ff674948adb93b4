//! Serde default values for configuration fields.

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_name() -> String {
    "Sprout".to_string()
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_db_path() -> String {
    "~/.sprout/data/sprout.db".to_string()
}

pub(super) fn default_max_connections() -> u32 {
    4
}

pub(super) fn default_max_lifetime_secs() -> u64 {
    1800
}

pub(super) fn default_idle_timeout_secs() -> u64 {
    600
}

pub(super) fn default_poll_interval() -> u64 {
    60
}

pub(super) fn default_send_hour() -> u32 {
    12
}

pub(super) fn default_notify_limit() -> i64 {
    100
}
