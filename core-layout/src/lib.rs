//! # Layout Module
//!
//! Geometry and gesture handling for the drag-to-float transition.
//!
//! ## Overview
//!
//! - [`geometry`] - full and mini window bounds, drag interpolation
//! - [`transition`] - the per-view [`MiniLayoutTransition`] state machine that
//!   turns touch input into live bounds and commit animations
//!
//! Nothing in this crate talks to the host or owns playback resources; the
//! service layer applies the returned actions.

pub mod geometry;
pub mod transition;

pub use geometry::{
    compute_full_bounds, compute_mini_bounds, drag_progress, interpolate_bounds, MiniLayoutSpec,
};
pub use transition::{
    Commit, CommitTarget, GestureFrame, MiniLayoutTransition, ScrollAction, ScrollInput,
    ScrollResponse, TouchPoint, TransitionState,
};
