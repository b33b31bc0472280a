//! Error types for the sound-effect engine
//!
//! Backend and catalog failures are the only fallible surfaces. Scheduling
//! itself never returns errors: a trigger that cannot be honored degrades
//! to silence (see the crate-level docs).

use thiserror::Error;

/// Errors reported by an audio backend
#[derive(Error, Debug)]
pub enum AudioError {
    /// Backend has not been initialized or lost its output device
    #[error("audio backend is not initialized")]
    BackendNotInitialized,

    /// Backend initialization failed
    #[error("audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Playback could not be started
    #[error("playback failed: {0}")]
    PlaybackFailed(String),

    /// Audio data could not be decoded
    #[error("failed to decode audio data: {0}")]
    DecodeFailed(String),

    /// The handle does not refer to a loaded asset
    #[error("invalid asset handle")]
    InvalidHandle,
}

/// Errors reported while building a sound catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO error while reading a variant file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A sound name was defined twice
    #[error("sound '{0}' is already defined")]
    DuplicateName(String),

    /// A round-robin group exceeds the fixed variant limit
    #[error("sound '{name}' has {count} variants (limit {limit})")]
    GroupTooLarge {
        /// Offending sound name
        name: String,
        /// Number of variants requested
        count: usize,
        /// Maximum group size
        limit: usize,
    },

    /// The backend rejected a variant asset
    #[error(transparent)]
    Backend(#[from] AudioError),
}
