//! # sprout-store
//!
//! Persistent storage for users, watering scenarios, plants, wizard
//! scratchpads, and sent notifications (SQLite-backed).

pub mod store;

pub use store::Store;
