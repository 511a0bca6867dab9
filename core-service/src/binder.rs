//! # Session Binder
//!
//! Routes host views, touch input and animation completions to the shared
//! [`VideoPlayer`] and to one [`MiniLayoutTransition`] per attached view.
//!
//! The binder owns the session and every host collaborator it needs. It is
//! used from the host's UI thread only; engine callbacks posted from other
//! threads are applied by [`SessionBinder::dispatch_engine_callbacks`].

use crate::error::Result;
use bridge_traits::{
    AnimationTicket, DisplayInfo, LayoutAnimator, MediaEngineFactory, MiniWindowPresenter,
    PlayState, PlayerView, Size, ViewId,
};
use core_layout::{
    Commit, CommitTarget, GestureFrame, MiniLayoutSpec, MiniLayoutTransition, ScrollAction,
    ScrollInput, ScrollResponse, TransitionState,
};
use core_playback::{PositionCache, VideoPlayer, ViewBinding};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{CoreEvent, EventBus, EventStream, GestureEvent};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info, instrument};

/// Host collaborators the binder drives.
pub struct HostBridges {
    pub engine_factory: Box<dyn MediaEngineFactory>,
    pub animator: Rc<dyn LayoutAnimator>,
    pub presenter: Rc<dyn MiniWindowPresenter>,
    pub display: Rc<dyn DisplayInfo>,
}

impl HostBridges {
    /// Construct a bridge bundle from explicit host handles.
    pub fn new(
        engine_factory: Box<dyn MediaEngineFactory>,
        animator: Rc<dyn LayoutAnimator>,
        presenter: Rc<dyn MiniWindowPresenter>,
        display: Rc<dyn DisplayInfo>,
    ) -> Self {
        Self {
            engine_factory,
            animator,
            presenter,
            display,
        }
    }
}

struct AttachedView {
    binding: ViewBinding,
    transition: MiniLayoutTransition,
}

/// Primary façade exposed to host applications.
pub struct SessionBinder {
    config: PlayerConfig,
    player: VideoPlayer,
    animator: Rc<dyn LayoutAnimator>,
    presenter: Rc<dyn MiniWindowPresenter>,
    display: Rc<dyn DisplayInfo>,
    views: HashMap<ViewId, AttachedView>,
    events: EventBus,
}

impl SessionBinder {
    pub fn new(config: PlayerConfig, bridges: HostBridges) -> Result<Self> {
        Self::with_event_bus(config, bridges, EventBus::default())
    }

    /// Like [`SessionBinder::new`], publishing on a caller-provided bus.
    pub fn with_event_bus(
        config: PlayerConfig,
        bridges: HostBridges,
        events: EventBus,
    ) -> Result<Self> {
        config.validate()?;
        let cache = PositionCache::with_capacity(config.position_cache_capacity)?;
        let player = VideoPlayer::new(bridges.engine_factory, cache, events.clone());

        info!(
            position_cache_capacity = config.position_cache_capacity,
            "Session binder created"
        );
        Ok(Self {
            config,
            player,
            animator: bridges.animator,
            presenter: bridges.presenter,
            display: bridges.display,
            views: HashMap::new(),
            events,
        })
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    /// Read access to the session for queries the binder does not forward.
    pub fn player(&self) -> &VideoPlayer {
        &self.player
    }

    // ------------------------------------------------------------------
    // View lifecycle
    // ------------------------------------------------------------------

    /// Bind `view` to the session, creating the engine on first use, and
    /// hand the view's surface to it.
    #[instrument(skip_all, fields(view = %view.id()))]
    pub fn attach(&mut self, view: &Rc<dyn PlayerView>) -> Result<()> {
        self.player.bind_view(view)?;
        self.register(view).reset_for_attach();
        debug!("View attached");
        Ok(())
    }

    /// Forget `view_id`. When it is the bound view the session keeps playing
    /// without a surface until another view attaches.
    pub fn detach(&mut self, view_id: ViewId) -> bool {
        let known = self.views.remove(&view_id).is_some();
        let was_bound = self.player.unbind_view(view_id);
        debug!(view = %view_id, known, was_bound, "View detached");
        known || was_bound
    }

    /// The host recreated the surface of `view_id`; rebind it without
    /// re-preparing.
    pub fn on_surface_replaced(&mut self, view_id: ViewId) -> bool {
        self.player.refresh_surface(view_id)
    }

    /// Visibility of a view changed. Only the bound view of an active session
    /// reports a full-screen change (hidden means full screen).
    pub fn on_visibility_changed(&mut self, view_id: ViewId, visible: bool) {
        if !self.player.is_bound_to(view_id) || !self.player.is_active() {
            return;
        }
        self.emit(GestureEvent::FullScreenChanged {
            view_id,
            full_screen: !visible,
        });
    }

    fn register(&mut self, view: &Rc<dyn PlayerView>) -> &mut MiniLayoutTransition {
        let spec = self.layout_spec();
        self.prune_dead_views();
        let attached = self
            .views
            .entry(view.id())
            .or_insert_with(|| AttachedView {
                binding: ViewBinding::new(view),
                transition: MiniLayoutTransition::new(spec),
            });
        attached.binding = ViewBinding::new(view);
        attached.transition.set_spec(spec);
        &mut attached.transition
    }

    /// Drop entries of views the host released without detaching.
    fn prune_dead_views(&mut self) {
        let before = self.views.len();
        self.views.retain(|_, attached| attached.binding.live().is_some());
        let pruned = before - self.views.len();
        if pruned > 0 {
            debug!(pruned, "Pruned dead views");
        }
    }

    /// Size of the video shown in `view_id`, known only for the bound view.
    fn content_size(&self, view_id: ViewId) -> Option<Size> {
        if !self.player.is_bound_to(view_id) {
            return None;
        }
        self.player.video_size()
    }

    fn layout_spec(&self) -> MiniLayoutSpec {
        MiniLayoutSpec::from_config(&self.config, self.display.metrics().density)
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// Play `url` on `view`. On failure the session is left unchanged.
    pub fn play(&mut self, view: &Rc<dyn PlayerView>, url: &str) -> Result<()> {
        self.player.play_url(view, url)?;
        self.register(view).clear_view_ratio();
        Ok(())
    }

    pub fn start(&mut self) {
        self.player.start();
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn seek_to(&mut self, position_ms: u32) {
        self.player.seek_to(position_ms);
    }

    pub fn duration(&self) -> u32 {
        self.player.duration()
    }

    pub fn current_position(&self) -> u32 {
        self.player.current_position()
    }

    pub fn current_state(&self) -> PlayState {
        self.player.current_state()
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Apply queued engine callbacks on the calling (owning) thread.
    pub fn dispatch_engine_callbacks(&mut self) -> usize {
        self.player.dispatch_pending()
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    pub fn on_touch_down(&mut self, view_id: ViewId) {
        if let Some(attached) = self.views.get_mut(&view_id) {
            attached.transition.on_touch_down();
        }
    }

    /// Feed one scroll sample of `view_id`. The response tells the host
    /// whether the sample was consumed and whether ancestors must stop
    /// intercepting.
    pub fn on_scroll(&mut self, view_id: ViewId, input: &ScrollInput) -> ScrollResponse {
        let content = self.content_size(view_id);
        let Some(attached) = self.views.get_mut(&view_id) else {
            return ScrollResponse::ignored();
        };
        let Some(view) = attached.binding.live() else {
            return ScrollResponse::ignored();
        };

        let frame = GestureFrame {
            measured: view.measured_size(),
            content,
            display: self.display.metrics(),
            orientation: self.display.orientation(),
        };
        let response = attached.transition.on_scroll(input, &frame);

        match response.action {
            ScrollAction::Ignored => {}
            ScrollAction::Scrub { distance_x } => view.on_scrub(distance_x),
            ScrollAction::DragStarted => {
                view.hide_controls();
                self.emit(GestureEvent::StartEnterMiniLayout { view_id });
            }
            ScrollAction::DragUpdated { bounds } => self.animator.apply_bounds(view_id, bounds),
        }
        response
    }

    /// End of a gesture. Returns the commit animation started, if the
    /// release ended a drag.
    pub fn on_touch_up(&mut self, view_id: ViewId) -> Option<Commit> {
        let attached = self.views.get_mut(&view_id)?;
        let metrics = self.display.metrics();
        let display = &self.display;
        let commit = attached
            .transition
            .on_touch_up(&metrics, || display.can_draw_overlays())?;

        self.begin_commit(view_id, commit);
        Some(commit)
    }

    /// Animate `view_id` back to its full layout.
    pub fn start_full_view_animation(&mut self, view_id: ViewId) -> Option<Commit> {
        let attached = self.views.get_mut(&view_id)?;
        let view = attached.binding.live()?;
        let commit = attached
            .transition
            .start_full_view_animation(view.measured_size(), view.parent_size())?;

        view.hide_controls();
        self.begin_commit(view_id, commit);
        Some(commit)
    }

    /// Animate `view_id` into the mini window without a drag.
    pub fn start_mini_window_animation(&mut self, view_id: ViewId) -> Option<Commit> {
        let metrics = self.display.metrics();
        let content = self.content_size(view_id);
        let attached = self.views.get_mut(&view_id)?;
        let view = attached.binding.live()?;
        let commit = attached.transition.start_mini_window_animation(
            view.measured_size(),
            content,
            &metrics,
        )?;

        view.hide_controls();
        self.begin_commit(view_id, commit);
        Some(commit)
    }

    fn begin_commit(&self, view_id: ViewId, commit: Commit) {
        info!(
            view = %view_id,
            layout = ?commit.target,
            ticket = commit.ticket.0,
            "Committing layout"
        );
        self.animator
            .animate_to(view_id, commit.bounds, commit.ticket);
    }

    /// The host finished the animation identified by `ticket`.
    ///
    /// Returning to full restores match-parent sizing, shows the controls,
    /// reattaches the surface and announces `ReturnFullViewLayout`. Entering
    /// mini hands the view to the floating presenter.
    pub fn on_animation_end(
        &mut self,
        view_id: ViewId,
        ticket: AnimationTicket,
    ) -> Option<CommitTarget> {
        let attached = self.views.get_mut(&view_id)?;
        let target = attached.transition.on_animation_end(ticket)?;
        let Some(view) = attached.binding.live() else {
            debug!(view = %view_id, "Animation ended for a dead view");
            return Some(target);
        };

        match target {
            CommitTarget::Full => {
                self.animator.restore_match_parent(view_id);
                view.show_controls();
                self.player.refresh_surface(view_id);
                self.emit(GestureEvent::ReturnFullViewLayout { view_id });
            }
            CommitTarget::Mini => {
                self.presenter.show_mini_window(view_id);
                self.emit(GestureEvent::MiniWindowPresented { view_id });
            }
        }
        info!(view = %view_id, layout = ?target, "Layout committed");
        Some(target)
    }

    /// Whether the current gesture of `view_id` is a landscape scrub.
    pub fn scroll_to_change_position(&self, view_id: ViewId) -> bool {
        self.views
            .get(&view_id)
            .is_some_and(|attached| attached.transition.scroll_to_change_position())
    }

    pub fn transition_state(&self, view_id: ViewId) -> Option<TransitionState> {
        self.views
            .get(&view_id)
            .map(|attached| attached.transition.state())
    }

    pub fn attached_views(&self) -> usize {
        self.views.len()
    }

    fn emit(&self, event: GestureEvent) {
        self.events.emit(CoreEvent::Gesture(event)).ok();
    }
}

impl std::fmt::Debug for SessionBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBinder")
            .field("player", &self.player)
            .field("attached_views", &self.views.len())
            .finish()
    }
}
