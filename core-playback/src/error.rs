//! # Playback Error Types

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors surfaced by the playback state machine.
///
/// Only session creation and `play_url` can fail; every transport command on a
/// missing engine is a silent no-op rather than an error.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The host factory could not create a media engine.
    #[error("Media engine unavailable: {0}")]
    EngineUnavailable(#[source] BridgeError),

    /// The engine refused the new source; the session is unchanged.
    #[error("Source rejected ({url}): {source}")]
    SourceRejected {
        url: String,
        #[source]
        source: BridgeError,
    },

    /// The engine accepted the source but refused to start preparing it.
    #[error("Prepare request failed ({url}): {source}")]
    PrepareFailed {
        url: String,
        #[source]
        source: BridgeError,
    },

    /// An empty source URL was requested.
    #[error("Source URL is empty")]
    EmptySource,

    /// Position cache capacity must be non-zero.
    #[error("Invalid position cache capacity: {0}")]
    InvalidCapacity(usize),
}

impl PlaybackError {
    /// Returns `true` if the engine rejected the requested source or prepare call.
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            PlaybackError::SourceRejected { .. }
                | PlaybackError::PrepareFailed { .. }
                | PlaybackError::EmptySource
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
