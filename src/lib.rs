//! Drag-to-float video session core.
//!
//! This crate re-exports the session façade from `core-service` together with
//! the configuration, logging and event types a host needs to drive it, so a
//! host application can depend on `floatview` alone.

pub use core_runtime::config::{PlayerConfig, PlayerConfigBuilder};
pub use core_runtime::events::{CoreEvent, EventBus, EventStream, GestureEvent, PlayerEvent};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
pub use core_service::{
    Commit, CommitTarget, CoreError, HostBridges, Result, ScrollAction, ScrollInput,
    ScrollResponse, SessionBinder, TouchPoint, TransitionState,
};
