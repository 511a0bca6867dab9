//! Media engine bridge traits and supporting playback types.
//!
//! The host owns the actual decoder/renderer. The core only drives it through
//! [`MediaEngine`] and learns about its lifecycle through [`EngineCallback`]
//! values posted on an [`EngineCallbackSink`]. Engines may post from any
//! thread; the core drains the queue on its owning thread before touching
//! session state.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Info code reported when the first video frame has been rendered.
pub const MEDIA_INFO_VIDEO_RENDERING_START: i32 = 3;
/// Info code reported when the engine pauses internally to buffer data.
pub const MEDIA_INFO_BUFFERING_START: i32 = 701;
/// Info code reported when the engine resumes after buffering.
pub const MEDIA_INFO_BUFFERING_END: i32 = 702;

/// Playback lifecycle state of the shared session.
///
/// Variants are declared in ascending order, so the derived [`Ord`] gives the
/// total order used by "at least prepared" style checks:
/// `None < Idle < Preparing < Prepared < Playing..BufferingPaused < Completed, Error`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    /// No engine has been created yet.
    #[default]
    None,
    Idle,
    Preparing,
    Prepared,
    Playing,
    Paused,
    BufferingPlaying,
    BufferingPaused,
    Completed,
    Error,
}

impl PlayState {
    /// Returns `true` once the engine can answer duration/position queries.
    pub fn is_prepared(&self) -> bool {
        *self >= PlayState::Prepared
    }

    /// Returns `true` while frames are advancing (or about to, once buffering ends).
    pub fn is_playing(&self) -> bool {
        matches!(self, PlayState::Playing | PlayState::BufferingPlaying)
    }

    /// Returns `true` for the per-cycle terminal states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlayState::Completed | PlayState::Error)
    }
}

/// Classified `what` code of an engine info callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    VideoRenderingStart,
    BufferingStart,
    BufferingEnd,
    Other(i32),
}

impl InfoKind {
    pub fn from_code(what: i32) -> Self {
        match what {
            MEDIA_INFO_VIDEO_RENDERING_START => InfoKind::VideoRenderingStart,
            MEDIA_INFO_BUFFERING_START => InfoKind::BufferingStart,
            MEDIA_INFO_BUFFERING_END => InfoKind::BufferingEnd,
            other => InfoKind::Other(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            InfoKind::VideoRenderingStart => MEDIA_INFO_VIDEO_RENDERING_START,
            InfoKind::BufferingStart => MEDIA_INFO_BUFFERING_START,
            InfoKind::BufferingEnd => MEDIA_INFO_BUFFERING_END,
            InfoKind::Other(code) => *code,
        }
    }
}

/// Lifecycle notification emitted by a [`MediaEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCallback {
    Prepared,
    Completion,
    BufferingUpdate { percent: i32 },
    SeekComplete,
    Error { what: i32, extra: i32 },
    Info { kind: InfoKind, extra: i32 },
    VideoSizeChanged { width: i32, height: i32 },
}

impl EngineCallback {
    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            EngineCallback::Prepared => "prepared",
            EngineCallback::Completion => "completion",
            EngineCallback::BufferingUpdate { .. } => "buffering_update",
            EngineCallback::SeekComplete => "seek_complete",
            EngineCallback::Error { .. } => "error",
            EngineCallback::Info { .. } => "info",
            EngineCallback::VideoSizeChanged { .. } => "video_size_changed",
        }
    }
}

/// Sending half of the engine callback queue.
///
/// Cloneable and `Send`, so engines can post from decoder or network threads.
/// Posting never blocks; callbacks are applied when the owning thread drains
/// the queue.
#[derive(Debug, Clone)]
pub struct EngineCallbackSink {
    sender: UnboundedSender<EngineCallback>,
}

impl EngineCallbackSink {
    pub fn new(sender: UnboundedSender<EngineCallback>) -> Self {
        Self { sender }
    }

    /// Queue a callback for the owning thread. Returns `false` once the
    /// session that owns the queue has been dropped.
    pub fn post(&self, callback: EngineCallback) -> bool {
        self.sender.send(callback).is_ok()
    }

    /// Returns `true` if the receiving session is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Opaque rendering surface handle supplied by the host surface provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Host media engine (decoder + renderer).
///
/// All commands are fire-and-forget: readiness is reported later through
/// [`EngineCallback::Prepared`], never by blocking. Replacing the surface with
/// [`MediaEngine::set_surface`] must keep prepared/playing state intact.
pub trait MediaEngine {
    fn set_source(&mut self, url: &str) -> Result<()>;

    fn prepare_async(&mut self) -> Result<()>;

    fn start(&mut self);

    fn pause(&mut self);

    fn stop(&mut self) -> Result<()>;

    fn reset(&mut self) -> Result<()>;

    fn seek_to(&mut self, position_ms: u32);

    /// Attach a rendering surface, or detach the current one with `None`.
    fn set_surface(&mut self, surface: Option<SurfaceHandle>);

    fn is_playing(&self) -> bool;

    /// Total duration in milliseconds. Only meaningful once prepared.
    fn duration(&self) -> u32;

    /// Current playback offset in milliseconds. Only meaningful once prepared.
    fn current_position(&self) -> u32;
}

/// Creates the media engine lazily, the first time a session needs one.
pub trait MediaEngineFactory {
    /// Build an engine that reports its lifecycle on `callbacks`.
    fn create(&self, callbacks: EngineCallbackSink) -> Result<Box<dyn MediaEngine>>;
}
