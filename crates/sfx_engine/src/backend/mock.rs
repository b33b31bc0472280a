//! Scripted backend for unit tests
//!
//! Records every device call and lets tests control which assets report
//! as playing, finish sounds "naturally", and inject playback failures.

use super::{AssetHandle, AudioBackend};
use crate::error::AudioError;
use std::collections::{HashMap, HashSet};

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `play` was invoked (recorded even when the play is rejected)
    Play(AssetHandle),
    /// `stop` was invoked
    Stop(AssetHandle),
    /// `set_volume` was invoked with the normalized volume
    SetVolume(AssetHandle, f32),
    /// `set_pan` was invoked with the normalized pan
    SetPan(AssetHandle, f32),
}

/// Backend test double with observable device traffic
#[derive(Debug, Default)]
pub struct MockBackend {
    next_id: u32,
    loaded: HashSet<AssetHandle>,
    playing: HashSet<AssetHandle>,
    rejected: HashSet<AssetHandle>,
    volumes: HashMap<AssetHandle, f32>,
    pans: HashMap<AssetHandle, f32>,
    /// Every device call in invocation order
    pub calls: Vec<Call>,
}

impl MockBackend {
    /// Create an empty mock backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `n` dummy assets and return their handles
    pub fn load_n(&mut self, n: usize) -> Vec<AssetHandle> {
        (0..n).map(|_| self.load_asset(&[]).unwrap()).collect()
    }

    /// Make every future `play` of this asset fail
    pub fn reject(&mut self, asset: AssetHandle) {
        self.rejected.insert(asset);
    }

    /// Simulate the asset reaching the end of its data
    pub fn finish(&mut self, asset: AssetHandle) {
        self.playing.remove(&asset);
    }

    /// Last normalized volume set for an asset
    pub fn volume_of(&self, asset: AssetHandle) -> Option<f32> {
        self.volumes.get(&asset).copied()
    }

    /// Last normalized pan set for an asset
    pub fn pan_of(&self, asset: AssetHandle) -> Option<f32> {
        self.pans.get(&asset).copied()
    }

    /// Number of `play` calls recorded so far
    pub fn play_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Play(_)))
            .count()
    }
}

impl AudioBackend for MockBackend {
    fn load_asset(&mut self, _data: &[u8]) -> Result<AssetHandle, AudioError> {
        let handle = AssetHandle::new(self.next_id);
        self.next_id += 1;
        self.loaded.insert(handle);
        Ok(handle)
    }

    fn unload_asset(&mut self, asset: AssetHandle) {
        self.playing.remove(&asset);
        self.loaded.remove(&asset);
    }

    fn play(&mut self, asset: AssetHandle) -> Result<(), AudioError> {
        self.calls.push(Call::Play(asset));
        if !self.loaded.contains(&asset) {
            return Err(AudioError::InvalidHandle);
        }
        if self.rejected.contains(&asset) {
            return Err(AudioError::PlaybackFailed("rejected by test".into()));
        }
        self.playing.insert(asset);
        Ok(())
    }

    fn stop(&mut self, asset: AssetHandle) {
        self.calls.push(Call::Stop(asset));
        self.playing.remove(&asset);
    }

    fn is_playing(&self, asset: AssetHandle) -> bool {
        self.playing.contains(&asset)
    }

    fn set_volume(&mut self, asset: AssetHandle, volume: f32) {
        self.calls.push(Call::SetVolume(asset, volume));
        self.volumes.insert(asset, volume);
    }

    fn set_pan(&mut self, asset: AssetHandle, pan: f32) {
        self.calls.push(Call::SetPan(asset, pan));
        self.pans.insert(asset, pan);
    }

    fn stop_all(&mut self) {
        self.playing.clear();
    }
}
