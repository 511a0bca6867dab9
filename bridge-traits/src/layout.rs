//! Geometry primitives and host layout/animation collaborators.

use crate::view::ViewId;
use serde::{Deserialize, Serialize};

/// Integer rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle anchored at the origin with the given size.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }
}

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Width-to-height ratio, or `None` for a degenerate size.
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width <= 0 || self.height <= 0 {
            return None;
        }
        Some(self.width as f32 / self.height as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Physical display metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width_px: i32,
    pub height_px: i32,
    /// Pixels per density-independent pixel.
    pub density: f32,
}

impl DisplayMetrics {
    pub fn new(width_px: i32, height_px: i32, density: f32) -> Self {
        Self {
            width_px,
            height_px,
            density,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width_px, self.height_px)
    }

    /// Convert density-independent pixels to whole pixels (truncating).
    pub fn dp_to_px(&self, dp: f32) -> i32 {
        (dp * self.density) as i32
    }
}

/// Token identifying one commit animation; the host hands it back exactly
/// once when the animation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationTicket(pub u64);

/// Display and permission queries.
pub trait DisplayInfo {
    fn metrics(&self) -> DisplayMetrics;

    fn orientation(&self) -> Orientation;

    /// Whether an always-on-top overlay window may be shown.
    fn can_draw_overlays(&self) -> bool;
}

/// Host layout system and animation scheduler.
pub trait LayoutAnimator {
    /// Apply live bounds to the view during a drag.
    fn apply_bounds(&self, view: ViewId, bounds: Rect);

    /// Animate the view to `target`. The host reports completion on the owning
    /// thread with the same `ticket`.
    fn animate_to(&self, view: ViewId, target: Rect, ticket: AnimationTicket);

    /// Reset the view to fill its parent (match-parent sizing).
    fn restore_match_parent(&self, view: ViewId);
}

/// Floating always-on-top window host.
pub trait MiniWindowPresenter {
    /// Take over presentation of the view in the floating mini window.
    fn show_mini_window(&self, view: ViewId);
}
