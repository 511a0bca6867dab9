//! Engine callback queue.
//!
//! Engines post [`EngineCallback`]s from whatever thread they run on; the
//! session drains them on its owning thread, so state is only ever mutated
//! serially.

use bridge_traits::{EngineCallback, EngineCallbackSink};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

pub struct EngineCallbackQueue {
    sender: UnboundedSender<EngineCallback>,
    receiver: UnboundedReceiver<EngineCallback>,
}

impl EngineCallbackQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// A new sending half for an engine.
    pub fn sink(&self) -> EngineCallbackSink {
        EngineCallbackSink::new(self.sender.clone())
    }

    /// Next queued callback, if any. Never blocks.
    pub fn try_next(&mut self) -> Option<EngineCallback> {
        match self.receiver.try_recv() {
            Ok(callback) => Some(callback),
            // The queue holds its own sender, so it is never disconnected.
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Default for EngineCallbackQueue {
    fn default() -> Self {
        Self::new()
    }
}
