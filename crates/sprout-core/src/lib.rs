//! # sprout-core
//!
//! Core entities, traits, configuration, and error handling for Sprout.

pub mod config;
pub mod entities;
pub mod error;
pub mod message;
pub mod step;
pub mod traits;
pub mod watering;
