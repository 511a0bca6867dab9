//! Core service façade.
//!
//! This crate wires host-provided bridge implementations (media engine,
//! layout animator, floating-window presenter, display queries) into the
//! shared session core. Hosts construct one [`SessionBinder`] per process (or
//! per test) and drive it from their UI thread:
//!
//! ```ignore
//! let bridges = HostBridges::new(engine_factory, animator, presenter, display);
//! let mut binder = SessionBinder::new(PlayerConfig::default(), bridges)?;
//!
//! binder.attach(&view)?;
//! binder.play(&view, "https://cdn.example.com/clip.mp4")?;
//!
//! // Whenever the engine has posted callbacks:
//! binder.dispatch_engine_callbacks();
//! ```

pub mod binder;
pub mod error;

pub use binder::{HostBridges, SessionBinder};
pub use error::{CoreError, Result};

pub use core_layout::{
    Commit, CommitTarget, ScrollAction, ScrollInput, ScrollResponse, TouchPoint, TransitionState,
};
