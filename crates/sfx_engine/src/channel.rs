//! Channel pool
//!
//! The bounded set of simultaneously-audible voices. Each slot binds one
//! variant asset to a playing channel; a variant occupies at most one slot,
//! so re-triggering it restarts the sound instead of layering it. When the
//! pool is exhausted new triggers fail and the scheduler moves on — there
//! is no queueing.
//!
//! Device-reported completion is discovered lazily: a cheap probabilistic
//! sweep in [`ChannelPool::tick`] polls a fraction of the slots each frame
//! instead of querying every voice every frame.

use crate::backend::{AssetHandle, AudioBackend};
use crate::spatial::pan_toward;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Default number of simultaneously-audible voices
pub const DEFAULT_CAPACITY: usize = 600;

/// Default per-slot, per-tick probability of polling the device for
/// completion (350 chances in 32768)
pub const DEFAULT_SWEEP_PROBABILITY: f64 = 350.0 / 32768.0;

/// Full attenuation in integer volume units (silence)
const VOLUME_FLOOR: i32 = -10_000;

/// Integer pan magnitude corresponding to fully left/right
const PAN_FULL_SCALE: i32 = 10_000;

/// Handle to an active channel slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u32);

/// State of one active voice
#[derive(Debug, Clone)]
struct ChannelSlot {
    asset: AssetHandle,
    volume: i32,
    pan: i32,
    /// Moving-source slots get a pan update every tick
    running: bool,
    position: i32,
    velocity: i32,
}

/// Fixed-capacity pool of playing voices
pub struct ChannelPool {
    capacity: usize,
    slots: HashMap<ChannelId, ChannelSlot>,
    by_asset: HashMap<AssetHandle, ChannelId>,
    next_handle_id: u32,
    sweep_probability: f64,
    sweep_rng: SmallRng,
}

impl ChannelPool {
    /// Create a pool with the given voice capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            slots: HashMap::new(),
            by_asset: HashMap::new(),
            next_handle_id: 0,
            sweep_probability: DEFAULT_SWEEP_PROBABILITY,
            sweep_rng: SmallRng::seed_from_u64(0),
        }
    }

    /// Set the per-slot, per-tick completion poll probability
    ///
    /// Tests set this to 1.0 to make slot reclamation deterministic.
    pub fn set_sweep_probability(&mut self, probability: f64) {
        self.sweep_probability = probability.clamp(0.0, 1.0);
    }

    /// Reseed the sweep dice
    pub fn reseed_sweep(&mut self, seed: u64) {
        self.sweep_rng = SmallRng::seed_from_u64(seed);
    }

    /// Whether this variant is bound to a slot and audibly playing
    ///
    /// Fails safe to `false` for variants the pool never saw.
    pub fn is_playing<B: AudioBackend>(&self, backend: &B, asset: AssetHandle) -> bool {
        self.by_asset.contains_key(&asset) && backend.is_playing(asset)
    }

    /// Start a stationary voice; returns `false` on pool exhaustion or
    /// device rejection
    pub fn play<B: AudioBackend>(
        &mut self,
        backend: &mut B,
        asset: AssetHandle,
        volume: i32,
        pan: i32,
    ) -> bool {
        self.start(backend, asset, volume, pan, None)
    }

    /// Start a moving voice whose pan tracks `position += velocity` each
    /// tick
    pub fn play_moving<B: AudioBackend>(
        &mut self,
        backend: &mut B,
        asset: AssetHandle,
        position: i32,
        velocity: i32,
        volume: i32,
        pan: i32,
    ) -> bool {
        self.start(backend, asset, volume, pan, Some((position, velocity)))
    }

    fn start<B: AudioBackend>(
        &mut self,
        backend: &mut B,
        asset: AssetHandle,
        volume: i32,
        pan: i32,
        motion: Option<(i32, i32)>,
    ) -> bool {
        // Re-trigger semantics: a variant never overlaps itself. Stop any
        // prior playback so the device restarts from position zero.
        if self.by_asset.contains_key(&asset) {
            backend.stop(asset);
        }

        let Some(id) = self.acquire(asset) else {
            return false;
        };

        backend.set_volume(asset, attenuation_to_gain(volume));
        backend.set_pan(asset, pan_to_balance(pan));

        if let Err(e) = backend.play(asset) {
            log::debug!("channel pool: device rejected asset {}: {e}", asset.id());
            self.release(asset);
            return false;
        }

        let (position, velocity) = motion.unwrap_or((0, 0));
        self.slots.insert(
            id,
            ChannelSlot {
                asset,
                volume,
                pan,
                running: motion.is_some(),
                position,
                velocity,
            },
        );
        true
    }

    /// Stop a variant's voice; idempotent, no-op if it is not bound
    pub fn stop<B: AudioBackend>(&mut self, backend: &mut B, asset: AssetHandle) {
        if self.by_asset.contains_key(&asset) {
            backend.stop(asset);
            self.release(asset);
        }
    }

    /// Adjust the volume of a bound voice; no-op otherwise
    pub fn set_volume<B: AudioBackend>(&mut self, backend: &mut B, asset: AssetHandle, volume: i32) {
        if let Some(slot) = self.slot_mut(asset) {
            slot.volume = volume;
            backend.set_volume(asset, attenuation_to_gain(volume));
        }
    }

    /// Adjust the pan of a bound voice; no-op otherwise
    pub fn set_pan<B: AudioBackend>(&mut self, backend: &mut B, asset: AssetHandle, pan: i32) {
        if let Some(slot) = self.slot_mut(asset) {
            slot.pan = pan;
            backend.set_pan(asset, pan_to_balance(pan));
        }
    }

    /// Per-frame update: advance moving voices and reclaim finished slots
    ///
    /// Moving voices step their position by their velocity and get a fresh
    /// pan relative to `listener_center_x`. Every slot is polled for
    /// completion with the configured probability and released once the
    /// device reports it silent.
    pub fn tick<B: AudioBackend>(&mut self, backend: &mut B, listener_center_x: i32) {
        let mut finished = Vec::new();

        for slot in self.slots.values_mut() {
            if slot.running {
                slot.position += slot.velocity;
                slot.pan = pan_toward(listener_center_x, slot.position);
                backend.set_pan(slot.asset, pan_to_balance(slot.pan));
            }
            if self.sweep_rng.gen_bool(self.sweep_probability) && !backend.is_playing(slot.asset) {
                finished.push(slot.asset);
            }
        }

        for asset in finished {
            self.release(asset);
        }
    }

    /// Stop every voice and empty the pool
    pub fn stop_all<B: AudioBackend>(&mut self, backend: &mut B) {
        for asset in self.by_asset.keys() {
            backend.stop(*asset);
        }
        self.slots.clear();
        self.by_asset.clear();
    }

    /// Number of currently bound voices
    pub fn active_count(&self) -> usize {
        self.slots.len()
    }

    /// Voice capacity of the pool
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current volume of a bound voice, in integer attenuation units
    pub fn volume_of(&self, asset: AssetHandle) -> Option<i32> {
        self.slot(asset).map(|s| s.volume)
    }

    /// Current pan of a bound voice, in integer pan units
    pub fn pan_of(&self, asset: AssetHandle) -> Option<i32> {
        self.slot(asset).map(|s| s.pan)
    }

    /// Reuse the variant's existing slot or claim a fresh one
    fn acquire(&mut self, asset: AssetHandle) -> Option<ChannelId> {
        if let Some(id) = self.by_asset.get(&asset) {
            return Some(*id);
        }
        if self.slots.len() >= self.capacity {
            return None;
        }
        let id = ChannelId(self.next_handle_id);
        self.next_handle_id = self.next_handle_id.wrapping_add(1);
        self.by_asset.insert(asset, id);
        Some(id)
    }

    fn release(&mut self, asset: AssetHandle) {
        if let Some(id) = self.by_asset.remove(&asset) {
            self.slots.remove(&id);
        }
    }

    fn slot(&self, asset: AssetHandle) -> Option<&ChannelSlot> {
        self.by_asset.get(&asset).and_then(|id| self.slots.get(id))
    }

    fn slot_mut(&mut self, asset: AssetHandle) -> Option<&mut ChannelSlot> {
        let id = self.by_asset.get(&asset)?;
        self.slots.get_mut(id)
    }
}

/// Convert integer attenuation units (`-10000..=0`) to a normalized gain
pub fn attenuation_to_gain(volume: i32) -> f32 {
    if volume <= VOLUME_FLOOR {
        return 0.0;
    }
    (1.0 + volume as f32 / VOLUME_FLOOR.unsigned_abs() as f32).clamp(0.0, 1.0)
}

/// Convert integer pan units (`-10000..=10000`) to a normalized balance
pub fn pan_to_balance(pan: i32) -> f32 {
    (pan as f32 / PAN_FULL_SCALE as f32).clamp(-1.0, 1.0)
}
