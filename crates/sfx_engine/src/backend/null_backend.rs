//! Silent audio backend
//!
//! Accepts every call and produces no sound. Used when the player disables
//! audio or no output device is available; the game keeps triggering
//! effects and the scheduler keeps running, nothing is audible.

use super::{AssetHandle, AudioBackend};
use crate::error::AudioError;
use std::collections::HashSet;

/// Backend that plays nothing
///
/// `load_asset` hands out handles without inspecting the data, `play`
/// always succeeds, and `is_playing` always reports `false`, so triggers
/// flow through the scheduler exactly as they would with a real device.
#[derive(Debug, Default)]
pub struct NullBackend {
    loaded: HashSet<AssetHandle>,
    next_id: u32,
}

impl NullBackend {
    /// Create a new silent backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for NullBackend {
    fn load_asset(&mut self, _data: &[u8]) -> Result<AssetHandle, AudioError> {
        let handle = AssetHandle::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.loaded.insert(handle);
        Ok(handle)
    }

    fn unload_asset(&mut self, asset: AssetHandle) {
        self.loaded.remove(&asset);
    }

    fn play(&mut self, asset: AssetHandle) -> Result<(), AudioError> {
        if self.loaded.contains(&asset) {
            Ok(())
        } else {
            Err(AudioError::InvalidHandle)
        }
    }

    fn stop(&mut self, _asset: AssetHandle) {}

    fn is_playing(&self, _asset: AssetHandle) -> bool {
        false
    }

    fn set_volume(&mut self, _asset: AssetHandle, _volume: f32) {}

    fn set_pan(&mut self, _asset: AssetHandle, _pan: f32) {}

    fn stop_all(&mut self) {}
}
