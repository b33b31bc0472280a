//! Audio backend implementations
//!
//! Platform-independent abstraction over audio playback libraries. The
//! scheduling core only ever talks to [`AudioBackend`]; it never manages
//! device initialization or shutdown beyond constructing a backend.
//!
//! # Threading
//! Backends are NOT required to be `Send + Sync`. The whole pipeline runs
//! synchronously on the game's simulation thread.

pub mod null_backend;

#[cfg(feature = "rodio-backend")]
pub mod rodio_backend;

#[cfg(test)]
pub mod mock;

pub use null_backend::NullBackend;

use crate::error::AudioError;

/// Handle to a loaded audio asset
///
/// Handles are minted by [`AudioBackend::load_asset`] and stay valid until
/// the asset is unloaded. The scheduling core treats them as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(u32);

impl AssetHandle {
    /// Create a handle from a raw id
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id backing this handle
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Audio device trait for platform abstraction
///
/// Volume and pan are normalized at this boundary: volume `0.0` (silent) to
/// `1.0` (full), pan `-1.0` (left) to `1.0` (right). Implementations must
/// remember the last volume/pan set for an asset and apply them when the
/// asset is next played, so callers may configure a voice before starting it.
pub trait AudioBackend {
    /// Load an audio asset from raw encoded bytes (WAV, OGG, MP3, or FLAC)
    ///
    /// # Errors
    /// - `DecodeFailed` if the data is not a playable audio format
    fn load_asset(&mut self, data: &[u8]) -> Result<AssetHandle, AudioError>;

    /// Unload an asset, stopping it first if it is playing
    fn unload_asset(&mut self, asset: AssetHandle);

    /// Start (or restart from the beginning) playback of an asset
    ///
    /// # Errors
    /// - `InvalidHandle` if the asset is not loaded
    /// - `PlaybackFailed` if the device rejects the sound
    fn play(&mut self, asset: AssetHandle) -> Result<(), AudioError>;

    /// Stop playback of an asset; no-op if it is not playing
    fn stop(&mut self, asset: AssetHandle);

    /// Check whether an asset is actively producing sound
    fn is_playing(&self, asset: AssetHandle) -> bool;

    /// Set the volume for an asset (0.0 = silent, 1.0 = full volume)
    fn set_volume(&mut self, asset: AssetHandle, volume: f32);

    /// Set the stereo pan for an asset (-1.0 = left, 1.0 = right)
    fn set_pan(&mut self, asset: AssetHandle, pan: f32);

    /// Stop all playing sounds
    fn stop_all(&mut self);
}
