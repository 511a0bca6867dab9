//! Host view contract for the surface that displays the shared session.
//!
//! A view is owned by the host's view hierarchy, never by the core. The core
//! keeps at most a weak relation to it and asks [`PlayerView::is_alive`] before
//! every use.

use crate::layout::Size;
use crate::media::SurfaceHandle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a host video view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(Uuid);

impl ViewId {
    /// Generate a new view identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A host view able to render the session and show its transport controls.
pub trait PlayerView {
    fn id(&self) -> ViewId;

    /// `false` once the host has torn the view down.
    fn is_alive(&self) -> bool;

    /// Rendering surface currently backing the view, if it has one.
    fn surface(&self) -> Option<SurfaceHandle>;

    /// Current measured size of the view in pixels.
    fn measured_size(&self) -> Size;

    /// Size of the parent container, when the view is attached to one.
    fn parent_size(&self) -> Option<Size>;

    fn on_video_size_changed(&self, width: i32, height: i32);

    /// Show a transient, user-visible message (toast-style).
    fn show_notice(&self, message: &str);

    fn hide_controls(&self);

    fn show_controls(&self);

    /// Landscape scrub gesture: the host maps the distance onto a seek.
    fn on_scrub(&self, distance_x: f32);
}
