//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the session crates:
//! - Logging and tracing infrastructure
//! - Player configuration
//! - Event bus carrying player and gesture notifications
//!
//! ## Overview
//!
//! Nothing in here knows about engines or views. It establishes the logging
//! conventions, the configuration surface and the outward notification
//! channel used by `core-playback`, `core-layout` and `core-service`.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
