//! # Event Bus System
//!
//! Outward notifications of the video session, published over
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! Every listener contract of the session is one variant of [`CoreEvent`]:
//!
//! - [`PlayerEvent`] - playback state changes, video size changes, engine errors
//! - [`GestureEvent`] - mini-window transition milestones and full-screen changes
//!
//! [`EventBus::emit`] is synchronous: by the time it returns, the event sits in
//! every subscriber's queue. There is no batching or coalescing, so a consumer
//! draining with `try_recv` after an operation observes every transition that
//! operation caused, in order.
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::PlayState;
//! use core_runtime::events::{CoreEvent, EventBus, PlayerEvent};
//!
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Player(PlayerEvent::PlayStateChanged {
//!     state: PlayState::Playing,
//! }))
//! .ok();
//!
//! assert!(matches!(
//!     rx.try_recv(),
//!     Ok(CoreEvent::Player(PlayerEvent::PlayStateChanged { state: PlayState::Playing }))
//! ));
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind by `n` events; it can
//!   keep receiving newer ones.
//! - **`RecvError::Closed`**: every sender was dropped, i.e. the session is gone.

use bridge_traits::{PlayState, ViewId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError, TryRecvError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Player(PlayerEvent),
    Gesture(GestureEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Player(e) => e.description(),
            CoreEvent::Gesture(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Player(PlayerEvent::ErrorReported { .. }) => EventSeverity::Error,
            CoreEvent::Player(PlayerEvent::PlayStateChanged { state })
                if *state == PlayState::Completed =>
            {
                EventSeverity::Info
            }
            CoreEvent::Gesture(GestureEvent::ReturnFullViewLayout { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Player Events
// ============================================================================

/// Events raised by the playback state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    /// The session moved to a new state (also re-sent when an engine callback
    /// confirms the current one).
    PlayStateChanged { state: PlayState },
    /// The engine reported new intrinsic video dimensions.
    VideoSizeChanged { width: i32, height: i32 },
    /// The engine reported a runtime error; the session is now in `Error`.
    ErrorReported { what: i32, extra: i32 },
}

impl PlayerEvent {
    fn description(&self) -> &str {
        match self {
            PlayerEvent::PlayStateChanged { .. } => "Play state changed",
            PlayerEvent::VideoSizeChanged { .. } => "Video size changed",
            PlayerEvent::ErrorReported { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Gesture Events
// ============================================================================

/// Events raised by the mini-window transition and view visibility tracking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum GestureEvent {
    /// A shrink drag started on the view.
    StartEnterMiniLayout { view_id: ViewId },
    /// The view finished animating back to the full layout.
    ReturnFullViewLayout { view_id: ViewId },
    /// The view finished animating to the mini bounds and was handed to the
    /// floating window presenter.
    MiniWindowPresented { view_id: ViewId },
    /// Visibility of the actively playing view changed.
    FullScreenChanged { view_id: ViewId, full_screen: bool },
}

impl GestureEvent {
    fn description(&self) -> &str {
        match self {
            GestureEvent::StartEnterMiniLayout { .. } => "Started entering mini layout",
            GestureEvent::ReturnFullViewLayout { .. } => "Returned to full view layout",
            GestureEvent::MiniWindowPresented { .. } => "Mini window presented",
            GestureEvent::FullScreenChanged { .. } => "Full screen changed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to session events.
///
/// Cloning the bus clones the sending side; every clone publishes to the same
/// subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if nobody is listening.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let gestures = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Gesture(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned from `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking receive. Returns `None` when no matching event is queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Lagged(n)) => return Some(Err(RecvError::Lagged(n))),
                Err(TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drain every queued matching event.
    pub fn drain(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
