//! Localized strings for bot replies.
//!
//! Uses a simple `t(key)` function for static strings and `format_*`-style
//! helpers for strings with interpolation. All user-facing text is Russian.

mod format;
mod labels;

#[cfg(test)]
mod tests;

pub use format::*;

/// Return the static string for `key`, or `"???"` for unknown keys.
pub fn t(key: &str) -> &'static str {
    labels::lookup(key).unwrap_or("???")
}
