//! Pure bounds arithmetic for the full view and the floating mini window.
//!
//! All rectangles are in display pixels with the origin at the top-left of
//! the display. Nothing here touches a view or the host.

use bridge_traits::{DisplayMetrics, Rect, Size};
use core_runtime::config::PlayerConfig;
use serde::{Deserialize, Serialize};

/// Mini window sizing, resolved to pixels for one display density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiniLayoutSpec {
    /// Mini width for portrait or square content.
    pub min_width_px: i32,
    /// Mini height for landscape content.
    pub min_height_px: i32,
    /// Inset from the bottom-right display corner on both axes.
    pub margin_px: i32,
    /// Fraction of the display height above which a release returns to full.
    pub return_full_threshold: f32,
}

impl MiniLayoutSpec {
    pub fn from_config(config: &PlayerConfig, density: f32) -> Self {
        let to_px = |dp: f32| (dp * density) as i32;
        Self {
            min_width_px: to_px(config.min_video_width_dp),
            min_height_px: to_px(config.min_video_height_dp),
            margin_px: to_px(config.mini_layout_margin_dp),
            return_full_threshold: config.return_full_threshold,
        }
    }
}

impl Default for MiniLayoutSpec {
    fn default() -> Self {
        Self::from_config(&PlayerConfig::default(), 1.0)
    }
}

/// Full-layout bounds: the parent's area when the view has been reparented,
/// otherwise the view's own container.
pub fn compute_full_bounds(container: Size, parent: Option<Size>) -> Rect {
    Rect::from_size(parent.unwrap_or(container))
}

/// Mini window bounds anchored to the bottom-right corner of the display.
///
/// `content_ratio` is width / height. Landscape content (`ratio > 1`) keeps
/// the configured minimum height and widens; anything else keeps the minimum
/// width. A result that would not fit inside the display (after margins) is
/// scaled down with its ratio preserved, so the rectangle always lies inside
/// `display.bounds()` for positive inputs.
pub fn compute_mini_bounds(
    content_ratio: f32,
    display: &DisplayMetrics,
    spec: &MiniLayoutSpec,
) -> Rect {
    let ratio = if content_ratio.is_finite() && content_ratio > 0.0 {
        content_ratio
    } else {
        1.0
    };
    let margin = spec.margin_px.max(0);

    let mut width = if ratio > 1.0 {
        (spec.min_height_px as f32 * ratio) as i32
    } else {
        spec.min_width_px
    };
    let mut height = (width as f32 / ratio) as i32;

    let max_width = (display.width_px - 2 * margin).max(1);
    let max_height = (display.height_px - 2 * margin).max(1);
    if width > max_width || height > max_height {
        let scale = (max_width as f32 / width as f32).min(max_height as f32 / height as f32);
        width = (width as f32 * scale) as i32;
        height = (height as f32 * scale) as i32;
    }
    let width = width.max(1);
    let height = height.max(1);

    let left = display.width_px - width - margin;
    let top = display.height_px - height - margin;
    Rect::new(left, top, left + width, top + height)
}

/// How far a drag of nominal `width` has travelled from `full` (0.0) toward
/// `mini` (1.0), clamped to the endpoints.
pub fn drag_progress(full: &Rect, mini: &Rect, width: f32) -> f32 {
    let span = (full.width() - mini.width()) as f32;
    if span <= 0.0 {
        return 0.0;
    }
    ((full.width() as f32 - width) / span).clamp(0.0, 1.0)
}

/// Edge-wise linear interpolation between `full` (progress 0) and `mini`
/// (progress 1).
pub fn interpolate_bounds(full: &Rect, mini: &Rect, progress: f32) -> Rect {
    let t = progress.clamp(0.0, 1.0);
    let lerp = |from: i32, to: i32| from + ((to - from) as f32 * t).round() as i32;
    Rect::new(
        lerp(full.left, mini.left),
        lerp(full.top, mini.top),
        lerp(full.right, mini.right),
        lerp(full.bottom, mini.bottom),
    )
}
