//! # Playback Module
//!
//! The shared video session: engine lifecycle, play state and resume
//! positions.
//!
//! ## Overview
//!
//! This module handles:
//! - The [`VideoPlayer`] state machine driving a host [`MediaEngine`](bridge_traits::MediaEngine)
//! - Resume positions per source URL in a bounded LRU [`PositionCache`]
//! - A weak [`ViewBinding`] to the view currently showing the session
//! - Marshalling engine callbacks onto the owning thread ([`EngineCallbackQueue`])
//!
//! ## Usage
//!
//! ```ignore
//! let cache = PositionCache::with_capacity(config.position_cache_capacity)?;
//! let mut player = VideoPlayer::new(factory, cache, events.clone());
//!
//! player.play_url(&view, "https://cdn.example.com/clip.mp4")?;
//! // ... later, on the owning thread:
//! player.dispatch_pending();
//! ```

pub mod dispatch;
pub mod error;
pub mod player;
pub mod position_cache;
pub mod view;

pub use dispatch::EngineCallbackQueue;
pub use error::{PlaybackError, Result};
pub use player::VideoPlayer;
pub use position_cache::PositionCache;
pub use view::ViewBinding;
