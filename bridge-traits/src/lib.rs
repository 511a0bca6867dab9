//! # Host Bridge Traits
//!
//! Contracts between the video session core and the host platform.
//!
//! ## Overview
//!
//! The core never decodes video, draws views or schedules animations itself.
//! Each of those capabilities is a trait implemented by the host (Android view
//! system, a desktop toolkit, a test double):
//!
//! - [`MediaEngine`](media::MediaEngine) / [`MediaEngineFactory`](media::MediaEngineFactory) -
//!   decoder + renderer, created lazily, reporting lifecycle through
//!   [`EngineCallbackSink`](media::EngineCallbackSink)
//! - [`PlayerView`](view::PlayerView) - the view that shows the session and
//!   its transport controls
//! - [`LayoutAnimator`](layout::LayoutAnimator) - live bounds and commit animations
//! - [`MiniWindowPresenter`](layout::MiniWindowPresenter) - floating window hand-off
//! - [`DisplayInfo`](layout::DisplayInfo) - display metrics, orientation, overlay permission
//! - [`LoggerSink`](logging::LoggerSink) - mirror structured logs to the host
//!
//! ## Threading
//!
//! Everything except [`EngineCallbackSink`](media::EngineCallbackSink) and
//! [`LoggerSink`](logging::LoggerSink) is used from the single owning (UI)
//! thread, so the view and layout traits carry no `Send`/`Sync` bounds.
//! Engines that produce callbacks elsewhere must post them on the sink.

pub mod error;
pub mod layout;
pub mod logging;
pub mod media;
pub mod view;

pub use error::{BridgeError, Result};

pub use layout::{
    AnimationTicket, DisplayInfo, DisplayMetrics, LayoutAnimator, MiniWindowPresenter,
    Orientation, Rect, Size,
};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{
    EngineCallback, EngineCallbackSink, InfoKind, MediaEngine, MediaEngineFactory, PlayState,
    SurfaceHandle,
};
pub use view::{PlayerView, ViewId};
