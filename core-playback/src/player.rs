//! # Video Player State Machine
//!
//! Owns the single media session: the lazily created engine, the current
//! [`PlayState`], the playing URL, the resume-position cache and the weakly
//! bound view.
//!
//! ## Lifecycle
//!
//! ```text
//! None ──ensure_engine──▶ Idle ──play_url──▶ Preparing ──Prepared──▶ Prepared ──start──▶ Playing
//!                                                                                   │  ▲
//!                                                            pause / buffering ◀────┘  │
//!                                                            Paused, Buffering* ───────┘
//! Completion ──▶ Completed        Error ──▶ Error        (play_url restarts the cycle)
//! ```
//!
//! Every state assignment is followed immediately by a
//! [`PlayerEvent::PlayStateChanged`] on the event bus; there is no batching.
//!
//! ## Callbacks
//!
//! The engine reports readiness, completion, errors and buffering through an
//! [`EngineCallbackSink`](bridge_traits::EngineCallbackSink). Nothing is applied until the owner calls
//! [`VideoPlayer::dispatch_pending`] on its own thread.

use crate::dispatch::EngineCallbackQueue;
use crate::error::{PlaybackError, Result};
use crate::position_cache::PositionCache;
use crate::view::ViewBinding;
use bridge_traits::{
    EngineCallback, InfoKind, MediaEngine, MediaEngineFactory, PlayState, PlayerView, Size,
    ViewId,
};
use core_runtime::events::{CoreEvent, EventBus, PlayerEvent};
use core_runtime::logging::redact_url;
use std::rc::Rc;
use tracing::{debug, instrument, trace, warn};

/// The shared video session.
pub struct VideoPlayer {
    factory: Box<dyn MediaEngineFactory>,
    engine: Option<Box<dyn MediaEngine>>,
    callbacks: EngineCallbackQueue,
    state: PlayState,
    playing_url: String,
    current_position: u32,
    /// Last size reported by the engine for the current source.
    video_size: Option<Size>,
    position_cache: PositionCache,
    view: Option<ViewBinding>,
    /// Completion callbacks are ignored while disarmed (during prepare, after
    /// an error and after a completion has been handled).
    completion_armed: bool,
    events: EventBus,
}

impl VideoPlayer {
    /// Create a session without an engine. The engine is built on the first
    /// attach or play request.
    pub fn new(
        factory: Box<dyn MediaEngineFactory>,
        position_cache: PositionCache,
        events: EventBus,
    ) -> Self {
        Self {
            factory,
            engine: None,
            callbacks: EngineCallbackQueue::new(),
            state: PlayState::None,
            playing_url: String::new(),
            current_position: 0,
            video_size: None,
            position_cache,
            view: None,
            completion_armed: false,
            events,
        }
    }

    // ------------------------------------------------------------------
    // Engine and view binding
    // ------------------------------------------------------------------

    /// Build the engine if none exists yet. A fresh engine puts the session
    /// in `Idle`.
    pub fn ensure_engine(&mut self) -> Result<()> {
        self.engine_or_create().map(|_| ())
    }

    fn engine_or_create(&mut self) -> Result<&mut Box<dyn MediaEngine>> {
        let engine = match &mut self.engine {
            Some(engine) => engine,
            slot @ None => {
                let engine = self
                    .factory
                    .create(self.callbacks.sink())
                    .map_err(PlaybackError::EngineUnavailable)?;
                debug!("Media engine created");
                self.state = PlayState::Idle;
                self.events
                    .emit(CoreEvent::Player(PlayerEvent::PlayStateChanged {
                        state: PlayState::Idle,
                    }))
                    .ok();
                slot.insert(engine)
            }
        };
        Ok(engine)
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Bind `view` and hand its surface to the engine, detaching whatever
    /// surface was attached before.
    pub fn bind_view(&mut self, view: &Rc<dyn PlayerView>) -> Result<()> {
        let id = view.id();
        let surface = view.surface();
        let previous = self.view.as_ref().map(ViewBinding::id);

        let engine = self.engine_or_create()?;
        engine.set_surface(None);
        engine.set_surface(surface);

        if let Some(previous) = previous.filter(|previous| *previous != id) {
            debug!(%previous, view = %id, "Rebinding session to a new view");
        }
        self.view = Some(ViewBinding::new(view));
        Ok(())
    }

    /// Clear the binding if `id` is the bound view. Playback continues
    /// without a surface.
    pub fn unbind_view(&mut self, id: ViewId) -> bool {
        if !self.is_bound_to(id) {
            return false;
        }

        self.view = None;
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.set_surface(None);
        }
        debug!(view = %id, "View detached, session continues headless");
        true
    }

    /// Re-attach the bound view's current surface. Used after the host
    /// recreated it (reparenting, window hand-off); never re-prepares.
    pub fn refresh_surface(&mut self, id: ViewId) -> bool {
        let Some(view) = self.bound_view().filter(|view| view.id() == id) else {
            return false;
        };
        let Some(engine) = self.engine.as_deref_mut() else {
            return false;
        };

        engine.set_surface(view.surface());
        trace!(view = %id, "Surface refreshed");
        true
    }

    pub fn is_bound_to(&self, id: ViewId) -> bool {
        self.view
            .as_ref()
            .is_some_and(|binding| binding.is_bound_to(id))
    }

    pub fn bound_view_id(&self) -> Option<ViewId> {
        self.view.as_ref().map(ViewBinding::id)
    }

    /// The bound view, if it is still alive.
    pub fn bound_view(&self) -> Option<Rc<dyn PlayerView>> {
        self.view.as_ref().and_then(ViewBinding::live)
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// Start a new playback cycle for `url` on `view`.
    ///
    /// Stop/reset failures are logged and tolerated. If the engine rejects the
    /// source or the prepare request, the error is returned and the session
    /// keeps its previous state, URL and binding.
    #[instrument(skip_all, fields(url = %redact_url(url)))]
    pub fn play_url(&mut self, view: &Rc<dyn PlayerView>, url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(PlaybackError::EmptySource);
        }

        let engine = self.engine_or_create()?;

        if engine.is_playing() {
            if let Err(e) = engine.stop() {
                warn!(error = %e, "Failed to stop engine before switching source");
            }
        }
        if let Err(e) = engine.reset() {
            warn!(error = %e, "Failed to reset engine before switching source");
        }

        engine.set_source(url).map_err(|source| {
            warn!(error = %source, "Engine rejected source");
            PlaybackError::SourceRejected {
                url: redact_url(url),
                source,
            }
        })?;
        engine.prepare_async().map_err(|source| {
            warn!(error = %source, "Engine refused to prepare");
            PlaybackError::PrepareFailed {
                url: redact_url(url),
                source,
            }
        })?;

        self.completion_armed = false;
        self.bind_view(view)?;
        self.playing_url = url.to_string();
        self.current_position = 0;
        self.video_size = None;
        self.transition(PlayState::Preparing);
        Ok(())
    }

    /// Start or resume, seeking to the cached resume position if one exists.
    pub fn start(&mut self) {
        let Some(engine) = self.engine.as_deref_mut() else {
            return;
        };

        engine.start();
        if let Some(position) = self.position_cache.get(&self.playing_url) {
            debug!(position_ms = position, "Resuming from cached position");
            engine.seek_to(position);
        }

        self.completion_armed = true;
        let next = match self.state {
            PlayState::BufferingPaused => PlayState::BufferingPlaying,
            _ => PlayState::Playing,
        };
        self.transition(next);
    }

    /// Pause and remember the current position for the playing URL.
    pub fn pause(&mut self) {
        let Some(engine) = self.engine.as_deref_mut() else {
            return;
        };
        engine.pause();

        self.current_position = self.current_position();
        if !self.playing_url.is_empty() {
            if let Some((evicted, _)) = self
                .position_cache
                .put(&self.playing_url, self.current_position)
            {
                trace!(url = %redact_url(&evicted), "Evicted resume position");
            }
        }

        let next = match self.state {
            PlayState::BufferingPlaying => PlayState::BufferingPaused,
            _ => PlayState::Paused,
        };
        self.transition(next);
    }

    /// Stop the engine, keeping the resume position. The session returns to
    /// `Idle` and needs a new `play_url` to continue.
    pub fn stop(&mut self) {
        if self.engine.is_none() {
            return;
        }

        let position = self.current_position();
        if !self.playing_url.is_empty() && self.state.is_prepared() && !self.state.is_terminal() {
            self.position_cache.put(&self.playing_url, position);
        }

        if let Some(engine) = self.engine.as_deref_mut() {
            if let Err(e) = engine.stop() {
                warn!(error = %e, "Failed to stop engine");
            }
        }

        self.completion_armed = false;
        self.current_position = position;
        self.transition(PlayState::Idle);
    }

    pub fn seek_to(&mut self, position_ms: u32) {
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.seek_to(position_ms);
        }
    }

    /// Total duration in ms, 0 until prepared.
    pub fn duration(&self) -> u32 {
        match self.engine.as_deref() {
            Some(engine) if self.state.is_prepared() => engine.duration(),
            _ => 0,
        }
    }

    /// Current offset in ms, 0 until prepared.
    pub fn current_position(&self) -> u32 {
        match self.engine.as_deref() {
            Some(engine) if self.state.is_prepared() => engine.current_position(),
            _ => 0,
        }
    }

    /// Last position snapshot taken on pause or seek completion.
    pub fn last_known_position(&self) -> u32 {
        self.current_position
    }

    pub fn is_playing(&self) -> bool {
        self.engine
            .as_deref()
            .is_some_and(|engine| engine.is_playing())
    }

    /// `None` while no engine exists.
    pub fn current_state(&self) -> PlayState {
        if self.engine.is_none() {
            return PlayState::None;
        }
        self.state
    }

    /// Whether playback is active for full-screen change notifications.
    pub fn is_active(&self) -> bool {
        self.current_state().is_playing()
    }

    /// Size of the current video, once the engine has reported a usable one.
    pub fn video_size(&self) -> Option<Size> {
        self.video_size
    }

    pub fn playing_url(&self) -> &str {
        &self.playing_url
    }

    pub fn position_cache(&self) -> &PositionCache {
        &self.position_cache
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ------------------------------------------------------------------
    // Engine callbacks
    // ------------------------------------------------------------------

    /// Apply every queued engine callback in arrival order. Returns how many
    /// were applied.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(callback) = self.callbacks.try_next() {
            self.handle_engine_callback(callback);
            applied += 1;
        }
        applied
    }

    pub fn handle_engine_callback(&mut self, callback: EngineCallback) {
        trace!(callback = callback.name(), state = ?self.state, "Engine callback");
        match callback {
            EngineCallback::Prepared => self.on_prepared(),
            EngineCallback::Completion => self.on_completion(),
            EngineCallback::BufferingUpdate { percent } => self.on_buffering_update(percent),
            EngineCallback::SeekComplete => self.on_seek_complete(),
            EngineCallback::Error { what, extra } => {
                self.on_error(what, extra);
            }
            EngineCallback::Info { kind, extra } => self.on_info(kind, extra),
            EngineCallback::VideoSizeChanged { width, height } => {
                self.on_video_size_changed(width, height)
            }
        }
    }

    pub fn on_prepared(&mut self) {
        self.transition(PlayState::Prepared);
        self.start();
    }

    pub fn on_completion(&mut self) {
        if !self.completion_armed {
            debug!("Ignoring completion while disarmed");
            return;
        }

        self.transition(PlayState::Completed);
        self.position_cache.remove(&self.playing_url);
        self.completion_armed = false;
    }

    pub fn on_seek_complete(&mut self) {
        self.current_position = self.current_position();
        if let Some(engine) = self.engine.as_deref_mut() {
            if !engine.is_playing() {
                engine.start();
            }
        }
    }

    /// Surface the error on the bound view and enter `Error`. The engine is
    /// kept; a later `play_url` recovers. Always reports the error as handled.
    pub fn on_error(&mut self, what: i32, extra: i32) -> bool {
        warn!(what, extra, url = %redact_url(&self.playing_url), "Media engine error");

        if let Some(view) = self.bound_view() {
            view.show_notice(&format!("{} {}", what, extra));
        }

        self.transition(PlayState::Error);
        self.events
            .emit(CoreEvent::Player(PlayerEvent::ErrorReported { what, extra }))
            .ok();
        self.completion_armed = false;
        true
    }

    pub fn on_info(&mut self, kind: InfoKind, extra: i32) {
        trace!(code = kind.code(), extra, "Engine info");
        match kind {
            InfoKind::VideoRenderingStart => {
                self.state = PlayState::Playing;
                self.completion_armed = true;
            }
            InfoKind::BufferingStart => {
                self.state = match self.state {
                    PlayState::Paused | PlayState::BufferingPaused => PlayState::BufferingPaused,
                    _ => PlayState::BufferingPlaying,
                };
            }
            InfoKind::BufferingEnd => match self.state {
                PlayState::BufferingPlaying => self.state = PlayState::Playing,
                PlayState::BufferingPaused => self.state = PlayState::Paused,
                _ => {}
            },
            InfoKind::Other(_) => {}
        }
        self.notify_state();
    }

    pub fn on_video_size_changed(&mut self, width: i32, height: i32) {
        let size = Size::new(width, height);
        self.video_size = size.aspect_ratio().map(|_| size);
        if let Some(view) = self.bound_view() {
            view.on_video_size_changed(width, height);
        }
        self.events
            .emit(CoreEvent::Player(PlayerEvent::VideoSizeChanged { width, height }))
            .ok();
    }

    pub fn on_buffering_update(&mut self, percent: i32) {
        trace!(percent, "Buffering update");
    }

    fn transition(&mut self, state: PlayState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "Play state transition");
        }
        self.state = state;
        self.notify_state();
    }

    fn notify_state(&self) {
        self.events
            .emit(CoreEvent::Player(PlayerEvent::PlayStateChanged {
                state: self.current_state(),
            }))
            .ok();
    }
}

impl std::fmt::Debug for VideoPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoPlayer")
            .field("state", &self.current_state())
            .field("playing_url", &redact_url(&self.playing_url))
            .field("view", &self.view)
            .field("completion_armed", &self.completion_armed)
            .field("position_cache", &self.position_cache)
            .finish()
    }
}
