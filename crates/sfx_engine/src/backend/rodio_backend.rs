//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback. Rodio is pure
//! Rust and supports WAV, OGG Vorbis, MP3, and FLAC formats.
//!
//! Each loaded asset keeps its encoded bytes; playback decodes on demand
//! into a [`rodio::SpatialSink`] so the voice can be repositioned between
//! the listener's ears for stereo panning. Restarting an asset replaces its
//! sink, which gives the stop-then-restart semantics the channel pool
//! relies on.

use super::{AssetHandle, AudioBackend};
use crate::error::AudioError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, SpatialSink};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

/// Distance of each virtual ear from the listener center
const EAR_OFFSET: f32 = 1.0;

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive for the duration of playback)
    _output_stream: OutputStream,
    /// Output stream handle for creating sinks
    stream_handle: OutputStreamHandle,
    /// Encoded bytes per loaded asset
    assets: HashMap<AssetHandle, Arc<[u8]>>,
    /// Active sink per playing asset
    sinks: HashMap<AssetHandle, SpatialSink>,
    /// Last volume set per asset, applied when the asset is (re)played
    volumes: HashMap<AssetHandle, f32>,
    /// Last pan set per asset, applied when the asset is (re)played
    pans: HashMap<AssetHandle, f32>,
    next_id: u32,
}

impl RodioBackend {
    /// Create a backend on the default output device
    ///
    /// # Errors
    /// - `BackendInitFailed` if no audio output device is available
    pub fn new() -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(format!("failed to open audio output: {e}")))?;

        log::info!("Rodio audio backend initialized");

        Ok(Self {
            _output_stream: stream,
            stream_handle,
            assets: HashMap::new(),
            sinks: HashMap::new(),
            volumes: HashMap::new(),
            pans: HashMap::new(),
            next_id: 0,
        })
    }

    fn next_handle(&mut self) -> AssetHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        AssetHandle::new(id)
    }

    /// Emitter position corresponding to a normalized pan
    fn emitter_position(pan: f32) -> [f32; 3] {
        [pan.clamp(-1.0, 1.0) * EAR_OFFSET, 0.0, 0.0]
    }
}

impl AudioBackend for RodioBackend {
    fn load_asset(&mut self, data: &[u8]) -> Result<AssetHandle, AudioError> {
        let bytes: Arc<[u8]> = Arc::from(data);

        // Decode once up front so a malformed file is reported at load
        // time instead of silently failing on every trigger.
        Decoder::new(Cursor::new(Arc::clone(&bytes)))
            .map_err(|e| AudioError::DecodeFailed(e.to_string()))?;

        let handle = self.next_handle();
        self.assets.insert(handle, bytes);
        self.volumes.insert(handle, 1.0);
        self.pans.insert(handle, 0.0);
        Ok(handle)
    }

    fn unload_asset(&mut self, asset: AssetHandle) {
        if let Some(sink) = self.sinks.remove(&asset) {
            sink.stop();
        }
        self.assets.remove(&asset);
        self.volumes.remove(&asset);
        self.pans.remove(&asset);
    }

    fn play(&mut self, asset: AssetHandle) -> Result<(), AudioError> {
        let bytes = self
            .assets
            .get(&asset)
            .ok_or(AudioError::InvalidHandle)?;

        // Restart semantics: drop any previous sink for this asset.
        if let Some(old) = self.sinks.remove(&asset) {
            old.stop();
        }

        let pan = self.pans.get(&asset).copied().unwrap_or(0.0);
        let sink = SpatialSink::try_new(
            &self.stream_handle,
            Self::emitter_position(pan),
            [-EAR_OFFSET, 0.0, 0.0],
            [EAR_OFFSET, 0.0, 0.0],
        )
        .map_err(|e| AudioError::PlaybackFailed(format!("failed to create sink: {e}")))?;

        let source = Decoder::new(Cursor::new(Arc::clone(bytes)))
            .map_err(|e| AudioError::DecodeFailed(e.to_string()))?;

        sink.set_volume(self.volumes.get(&asset).copied().unwrap_or(1.0));
        sink.append(source);

        self.sinks.insert(asset, sink);
        Ok(())
    }

    fn stop(&mut self, asset: AssetHandle) {
        if let Some(sink) = self.sinks.remove(&asset) {
            sink.stop();
        }
    }

    fn is_playing(&self, asset: AssetHandle) -> bool {
        self.sinks.get(&asset).map_or(false, |sink| !sink.empty())
    }

    fn set_volume(&mut self, asset: AssetHandle, volume: f32) {
        if !self.assets.contains_key(&asset) {
            return;
        }
        self.volumes.insert(asset, volume);
        if let Some(sink) = self.sinks.get(&asset) {
            sink.set_volume(volume);
        }
    }

    fn set_pan(&mut self, asset: AssetHandle, pan: f32) {
        if !self.assets.contains_key(&asset) {
            return;
        }
        self.pans.insert(asset, pan);
        if let Some(sink) = self.sinks.get(&asset) {
            sink.set_emitter_position(Self::emitter_position(pan));
        }
    }

    fn stop_all(&mut self) {
        for (_, sink) in self.sinks.drain() {
            sink.stop();
        }
    }
}
