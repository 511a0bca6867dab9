//! # Mini Layout Transition State Machine
//!
//! Tracks one view's drag-to-float gesture and the commit animation that
//! follows it.
//!
//! ## State Machine
//!
//! ```text
//!         horizontal rightward scroll          release / programmatic
//! Idle ────────────────────────────▶ Dragging ───────────────────────▶ AnimatingToFull
//!  ▲                                    │                             AnimatingToMini
//!  │                                    └── programmatic trigger ──┐         │
//!  │                                                               ▼         │
//!  └──────────────────────── animation end (matching ticket) ◀───────────────┘
//! ```
//!
//! The machine is pure: it never calls the host. Every input returns what the
//! caller should do (scrub, hide controls, apply live bounds, start an
//! animation with an [`AnimationTicket`]).

use crate::geometry::{
    compute_full_bounds, compute_mini_bounds, drag_progress, interpolate_bounds, MiniLayoutSpec,
};
use bridge_traits::{AnimationTicket, DisplayMetrics, Orientation, Rect, Size};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

// ============================================================================
// Inputs and outputs
// ============================================================================

/// Gesture state of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionState {
    #[default]
    Idle,
    Dragging,
    AnimatingToFull,
    AnimatingToMini,
}

impl TransitionState {
    pub fn is_animating(&self) -> bool {
        matches!(
            self,
            TransitionState::AnimatingToFull | TransitionState::AnimatingToMini
        )
    }
}

/// Layout a commit animation ends in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitTarget {
    Full,
    Mini,
}

/// An animation the caller must start; the host reports its end with `ticket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub target: CommitTarget,
    pub bounds: Rect,
    pub ticket: AnimationTicket,
}

/// A touch position in view-local and raw (display) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub raw_x: f32,
    pub raw_y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32, raw_x: f32, raw_y: f32) -> Self {
        Self { x, y, raw_x, raw_y }
    }
}

/// One scroll sample of a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollInput {
    /// Where the gesture went down.
    pub start: TouchPoint,
    /// Where it is now.
    pub current: TouchPoint,
    /// Distance since the previous sample, positive when moving left/up.
    pub distance_x: f32,
    pub distance_y: f32,
}

/// Host facts sampled for a scroll sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureFrame {
    /// Current measured size of the view.
    pub measured: Size,
    /// Size of the video being shown, once the engine has reported it.
    pub content: Option<Size>,
    pub display: DisplayMetrics,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAction {
    /// Not a gesture this machine handles.
    Ignored,
    /// Landscape scrub: forward the distance to the seek handler.
    Scrub { distance_x: f32 },
    /// Drag began: hide transport controls and announce the mini transition.
    DragStarted,
    /// Drag moved: apply these live bounds.
    DragUpdated { bounds: Rect },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollResponse {
    pub action: ScrollAction,
    /// Whether ancestors must stop intercepting the touch stream.
    pub disallow_intercept: bool,
}

impl ScrollResponse {
    pub fn ignored() -> Self {
        Self {
            action: ScrollAction::Ignored,
            disallow_intercept: false,
        }
    }

    fn tracking(action: ScrollAction) -> Self {
        Self {
            action,
            disallow_intercept: true,
        }
    }

    /// Whether the scroll sample was consumed.
    pub fn consumed(&self) -> bool {
        !matches!(self.action, ScrollAction::Ignored)
    }
}

// ============================================================================
// Transition
// ============================================================================

#[derive(Debug, Clone)]
pub struct MiniLayoutTransition {
    spec: MiniLayoutSpec,
    state: TransitionState,
    /// Orientation of the current gesture, sampled on its first scroll.
    gesture_orientation: Option<Orientation>,
    scroll_to_position: bool,
    last_raw_x: f32,
    /// Nominal width driven by accumulated horizontal displacement.
    drag_width: f32,
    /// Video width / height, cached per attach once the video size is known.
    view_ratio: Option<f32>,
    full_bounds: Rect,
    mini_bounds: Rect,
    current_bounds: Rect,
    next_ticket: u64,
    pending: Option<(AnimationTicket, CommitTarget)>,
}

impl MiniLayoutTransition {
    pub fn new(spec: MiniLayoutSpec) -> Self {
        Self {
            spec,
            state: TransitionState::Idle,
            gesture_orientation: None,
            scroll_to_position: false,
            last_raw_x: 0.0,
            drag_width: 0.0,
            view_ratio: None,
            full_bounds: Rect::default(),
            mini_bounds: Rect::default(),
            current_bounds: Rect::default(),
            next_ticket: 0,
            pending: None,
        }
    }

    pub fn spec(&self) -> &MiniLayoutSpec {
        &self.spec
    }

    /// Replace the pixel spec, e.g. after a density change.
    pub fn set_spec(&mut self, spec: MiniLayoutSpec) {
        self.spec = spec;
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn full_bounds(&self) -> Rect {
        self.full_bounds
    }

    pub fn mini_bounds(&self) -> Rect {
        self.mini_bounds
    }

    pub fn current_bounds(&self) -> Rect {
        self.current_bounds
    }

    pub fn view_ratio(&self) -> Option<f32> {
        self.view_ratio
    }

    /// Forget the cached content ratio, e.g. when a new source starts.
    pub fn clear_view_ratio(&mut self) {
        self.view_ratio = None;
    }

    /// Whether the current gesture is a landscape scrub-to-seek.
    pub fn scroll_to_change_position(&self) -> bool {
        self.scroll_to_position
    }

    /// Forget the gesture and cached ratio of the previous attachment. An
    /// in-flight commit animation is kept and still completes.
    pub fn reset_for_attach(&mut self) {
        if self.state == TransitionState::Dragging {
            self.state = TransitionState::Idle;
        }
        self.gesture_orientation = None;
        self.scroll_to_position = false;
        self.view_ratio = None;
    }

    /// A new gesture starts; its orientation is sampled on the next scroll.
    pub fn on_touch_down(&mut self) {
        self.gesture_orientation = None;
    }

    pub fn on_scroll(&mut self, input: &ScrollInput, frame: &GestureFrame) -> ScrollResponse {
        if self.state.is_animating() {
            trace!(state = ?self.state, "Scroll ignored while animating");
            return ScrollResponse::ignored();
        }

        let orientation = *self.gesture_orientation.get_or_insert(frame.orientation);
        if orientation == Orientation::Landscape {
            self.scroll_to_position = true;
            return ScrollResponse::tracking(ScrollAction::Scrub {
                distance_x: input.distance_x,
            });
        }
        self.scroll_to_position = false;

        if self.state == TransitionState::Idle
            && input.distance_x.abs() > input.distance_y.abs()
            && input.start.x < input.current.x
        {
            self.begin_drag(input.current.raw_x, frame);
            return ScrollResponse::tracking(ScrollAction::DragStarted);
        }

        if self.state == TransitionState::Dragging {
            let dx = input.current.raw_x - self.last_raw_x;
            let full_width = self.full_bounds.width() as f32;
            let mini_width = (self.mini_bounds.width() as f32).min(full_width);
            // Clamped so a reversal past an endpoint responds immediately.
            self.drag_width = (self.drag_width - dx).clamp(mini_width, full_width);
            let progress = drag_progress(&self.full_bounds, &self.mini_bounds, self.drag_width);
            self.current_bounds = interpolate_bounds(&self.full_bounds, &self.mini_bounds, progress);
            self.last_raw_x = input.current.raw_x;
            return ScrollResponse::tracking(ScrollAction::DragUpdated {
                bounds: self.current_bounds,
            });
        }

        ScrollResponse::ignored()
    }

    fn begin_drag(&mut self, raw_x: f32, frame: &GestureFrame) {
        self.state = TransitionState::Dragging;
        self.last_raw_x = raw_x;
        self.compute_locations(frame.measured, frame.content, &frame.display);
        self.current_bounds = self.full_bounds;
        self.drag_width = self.full_bounds.width() as f32;
        debug!(
            full = ?self.full_bounds,
            mini = ?self.mini_bounds,
            "Drag to mini window started"
        );
    }

    /// The mini window follows the video's own ratio. Until the engine has
    /// reported a size the view's measured ratio stands in, uncached.
    fn compute_locations(
        &mut self,
        measured: Size,
        content: Option<Size>,
        display: &DisplayMetrics,
    ) {
        self.full_bounds = compute_full_bounds(measured, None);
        if self.view_ratio.is_none() {
            self.view_ratio = content.and_then(|size| size.aspect_ratio());
        }
        let ratio = self
            .view_ratio
            .or_else(|| measured.aspect_ratio())
            .unwrap_or(1.0);
        self.mini_bounds = compute_mini_bounds(ratio, display, &self.spec);
    }

    /// End of a gesture. A release while dragging decides the commit:
    /// above the height threshold returns to full, otherwise the mini window
    /// when overlays are permitted, falling back to full when they are not.
    pub fn on_touch_up(
        &mut self,
        display: &DisplayMetrics,
        can_draw_overlays: impl FnOnce() -> bool,
    ) -> Option<Commit> {
        self.gesture_orientation = None;
        if self.state != TransitionState::Dragging {
            return None;
        }

        let threshold = display.height_px as f32 * self.spec.return_full_threshold;
        let commit = if self.current_bounds.height() as f32 > threshold {
            self.begin_commit(CommitTarget::Full, self.full_bounds)
        } else if can_draw_overlays() {
            self.begin_commit(CommitTarget::Mini, self.mini_bounds)
        } else {
            debug!("Overlay not permitted, returning to full layout");
            self.begin_commit(CommitTarget::Full, self.full_bounds)
        };
        Some(commit)
    }

    /// Animate back to the full layout, using the parent's area when the view
    /// has been reparented.
    pub fn start_full_view_animation(
        &mut self,
        measured: Size,
        parent: Option<Size>,
    ) -> Option<Commit> {
        if self.state.is_animating() {
            return None;
        }
        if parent.is_some() || self.full_bounds.is_empty() {
            self.full_bounds = compute_full_bounds(measured, parent);
        }
        Some(self.begin_commit(CommitTarget::Full, self.full_bounds))
    }

    /// Animate into the mini window without a drag.
    pub fn start_mini_window_animation(
        &mut self,
        measured: Size,
        content: Option<Size>,
        display: &DisplayMetrics,
    ) -> Option<Commit> {
        if self.state.is_animating() {
            return None;
        }
        self.compute_locations(measured, content, display);
        self.current_bounds = self.full_bounds;
        Some(self.begin_commit(CommitTarget::Mini, self.mini_bounds))
    }

    fn begin_commit(&mut self, target: CommitTarget, bounds: Rect) -> Commit {
        self.next_ticket += 1;
        let ticket = AnimationTicket(self.next_ticket);
        self.state = match target {
            CommitTarget::Full => TransitionState::AnimatingToFull,
            CommitTarget::Mini => TransitionState::AnimatingToMini,
        };
        self.pending = Some((ticket, target));
        debug!(layout = ?target, ?bounds, ticket = ticket.0, "Commit animation started");
        Commit {
            target,
            bounds,
            ticket,
        }
    }

    /// The host finished an animation. Returns the committed layout for the
    /// pending ticket; stale or repeated tickets yield `None`.
    pub fn on_animation_end(&mut self, ticket: AnimationTicket) -> Option<CommitTarget> {
        match self.pending {
            Some((pending, target)) if pending == ticket => {
                self.pending = None;
                self.state = TransitionState::Idle;
                self.current_bounds = match target {
                    CommitTarget::Full => self.full_bounds,
                    CommitTarget::Mini => self.mini_bounds,
                };
                Some(target)
            }
            _ => {
                trace!(ticket = ticket.0, "Ignoring stale animation end");
                None
            }
        }
    }
}

impl Default for MiniLayoutTransition {
    fn default() -> Self {
        Self::new(MiniLayoutSpec::default())
    }
}
