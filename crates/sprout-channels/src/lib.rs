//! # sprout-channels
//!
//! Messaging platform integrations for Sprout.

pub mod telegram;
