//! Effect scheduling
//!
//! [`EffectSystem`] is the front door of the crate: it owns the backend,
//! the catalog, the channel pool, the spatial gate, the mixer, and the
//! shared random table, and turns game-side trigger calls into voice
//! playback.
//!
//! Three trigger modes exist, each with its own policy for duplicates:
//!
//! - **multi**: any number of instances of a logical sound may play at
//!   once, bounded by its variant count. The probe starts at a random
//!   variant and walks the group circularly until an idle one is found;
//!   a fully busy group drops the trigger. Fast repeated triggers
//!   deliberately produce a clipped "machine-gun" stutter; that is the
//!   intended mix, not a defect.
//! - **single**: the whole group is scanned first; if any variant is
//!   audible the trigger is dropped, so the sound never doubles up.
//! - **unlimited**: multi-mode selection for ambient triggers that skip
//!   the audible-window test.
//!
//! Nothing here returns errors. A trigger that cannot be honored —
//! unknown id, busy group, exhausted pool, rejected playback — degrades
//! to silence and returns immediately.

use crate::backend::AudioBackend;
use crate::catalog::{SoundCatalog, SoundId};
use crate::channel::ChannelPool;
use crate::config::AudioConfig;
use crate::mixer::SfxMixer;
use crate::random::RandTable;
use crate::spatial::{FogQuery, GateConfig, SpatialGate, Viewport};

/// Duplicate policy for one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerMode {
    Multi,
    Single,
}

/// Sound-effect scheduler and owner of the audio subsystem state
///
/// All operations run synchronously on the caller's thread; call
/// [`EffectSystem::tick`] exactly once per simulation step.
pub struct EffectSystem<B: AudioBackend> {
    backend: B,
    catalog: SoundCatalog,
    channels: ChannelPool,
    gate: SpatialGate,
    mixer: SfxMixer,
    rand: RandTable,
    field_delay: u32,
    danger_alert_ticks: u32,
}

impl<B: AudioBackend> EffectSystem<B> {
    /// Create a system with default tuning
    pub fn new(backend: B, catalog: SoundCatalog) -> Self {
        Self::with_config(backend, catalog, &AudioConfig::default())
    }

    /// Create a system from explicit tuning
    pub fn with_config(backend: B, catalog: SoundCatalog, config: &AudioConfig) -> Self {
        let mut channels = ChannelPool::with_capacity(config.channel_capacity);
        channels.set_sweep_probability(config.sweep_probability);

        let mut mixer = SfxMixer::new();
        mixer.set_war_sound_level(config.war_sound_level);

        Self {
            backend,
            catalog,
            channels,
            gate: SpatialGate::new(GateConfig {
                loose_margin_x: config.loose_margin_x,
                loose_margin_y: config.loose_margin_y,
                fog_threshold: config.fog_threshold,
            }),
            mixer,
            rand: RandTable::seeded(config.random_seed),
            field_delay: 0,
            danger_alert_ticks: config.danger_alert_ticks,
        }
    }

    /// Per-frame update
    ///
    /// Recomputes the listener window from the viewport, counts the danger
    /// alert down, advances moving voices, and reclaims finished slots.
    pub fn tick(&mut self, viewport: &Viewport) {
        self.gate.retarget(viewport);
        if self.field_delay > 0 {
            self.field_delay -= 1;
        }
        let (center_x, _) = self.gate.center();
        self.channels.tick(&mut self.backend, center_x);
    }

    /// Trigger a sound with caller-supplied pan and base volume,
    /// multi-instance policy
    pub fn play_effect(&mut self, id: SoundId, pan: i32, volume: i32) {
        self.trigger(id, pan, volume, None, TriggerMode::Multi);
    }

    /// Trigger a moving-source sound; its pan follows the source across
    /// subsequent ticks
    pub fn play_moving_effect(&mut self, id: SoundId, x: i32, velocity_x: i32, pan: i32, volume: i32) {
        self.trigger(id, pan, volume, Some((x, velocity_x)), TriggerMode::Multi);
    }

    /// Trigger a sound that may only have one audible instance across its
    /// whole group
    pub fn play_single_effect(&mut self, id: SoundId, pan: i32, volume: i32) {
        self.trigger(id, pan, volume, None, TriggerMode::Single);
    }

    /// Trigger a stationary sound at a world position, gated by
    /// audibility and fog
    pub fn add_effect(&mut self, fog: Option<&dyn FogQuery>, x: i32, y: i32, id: SoundId) {
        self.add_moving_effect(fog, x, y, 0, id);
    }

    /// Trigger a moving sound at a world position, gated by audibility
    /// and fog
    pub fn add_moving_effect(
        &mut self,
        fog: Option<&dyn FogQuery>,
        x: i32,
        y: i32,
        velocity_x: i32,
        id: SoundId,
    ) {
        if !self.mixer.is_enabled() {
            return;
        }
        if let Some(cue) = self.gate.evaluate(fog, x, y) {
            self.trigger(id, cue.pan, cue.volume_bias, Some((x, velocity_x)), TriggerMode::Multi);
        }
    }

    /// Positional single-instance trigger
    pub fn add_single_effect(&mut self, fog: Option<&dyn FogQuery>, x: i32, y: i32, id: SoundId) {
        if !self.mixer.is_enabled() {
            return;
        }
        if let Some(cue) = self.gate.evaluate(fog, x, y) {
            self.trigger(id, cue.pan, cue.volume_bias, None, TriggerMode::Single);
        }
    }

    /// Ambient positional trigger: panned from the listener and fog-gated,
    /// but audible from anywhere on the map
    pub fn add_unlimited_effect(&mut self, fog: Option<&dyn FogQuery>, x: i32, y: i32, id: SoundId) {
        if !self.mixer.is_enabled() {
            return;
        }
        if let Some(pan) = self.gate.evaluate_unbounded(fog, x, y) {
            self.trigger(id, pan, 0, None, TriggerMode::Multi);
        }
    }

    /// Stop every playing effect
    pub fn stop_all(&mut self) {
        self.channels.stop_all(&mut self.backend);
    }

    /// Look up a sound id by name; `None` for unshipped sounds
    pub fn resolve(&self, name: &str) -> Option<SoundId> {
        self.catalog.resolve(name)
    }

    /// Remaining ticks of the danger alert raised by danger-flagged sounds
    ///
    /// Read by the alarm UI; counts down once per [`EffectSystem::tick`].
    pub fn field_delay(&self) -> u32 {
        self.field_delay
    }

    /// The audio backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the audio backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The sound catalog
    pub fn catalog(&self) -> &SoundCatalog {
        &self.catalog
    }

    /// The channel pool
    pub fn channels(&self) -> &ChannelPool {
        &self.channels
    }

    /// Mutable access to the channel pool (sweep tuning)
    pub fn channels_mut(&mut self) -> &mut ChannelPool {
        &mut self.channels
    }

    /// The effect mixer
    pub fn mixer(&self) -> &SfxMixer {
        &self.mixer
    }

    /// Mutable access to the effect mixer
    pub fn mixer_mut(&mut self) -> &mut SfxMixer {
        &mut self.mixer
    }

    /// The spatial gate
    pub fn gate(&self) -> &SpatialGate {
        &self.gate
    }

    /// Replace the shared random table (replay/testing hook)
    pub fn set_rand_table(&mut self, table: RandTable) {
        self.rand = table;
    }

    /// Core trigger path shared by every mode
    fn trigger(&mut self, id: SoundId, pan: i32, volume: i32, motion: Option<(i32, i32)>, mode: TriggerMode) {
        if !self.mixer.is_enabled() {
            return;
        }
        let volume = self.mixer.compose(volume);
        if !self.catalog.contains(id) {
            return;
        }

        // Danger sounds raise the alert even when the group turns out to
        // be busy or empty.
        if self.catalog.is_dangerous(id) {
            self.field_delay = self.danger_alert_ticks;
        }

        let count = self.catalog.variant_count(id);
        if count == 0 {
            return;
        }

        if mode == TriggerMode::Single {
            // Full-group scan before the probe. Kept as a separate pass:
            // folding it into the probe below would change which idle
            // variant the random start picks.
            for index in 0..count {
                if let Some(variant) = self.catalog.variant(id, index) {
                    if self.channels.is_playing(&self.backend, variant) {
                        return;
                    }
                }
            }
        }

        // Round-robin probe: random start, circular walk, one full lap.
        let mut index = self.rand.pick(count);
        for _ in 0..count {
            if let Some(variant) = self.catalog.variant(id, index) {
                if !self.channels.is_playing(&self.backend, variant) {
                    let started = match motion {
                        Some((x, velocity_x)) => self
                            .channels
                            .play_moving(&mut self.backend, variant, x, velocity_x, volume, pan),
                        None => self.channels.play(&mut self.backend, variant, volume, pan),
                    };
                    if started {
                        return;
                    }
                    // Pool exhausted or device rejection: this candidate
                    // is unusable, keep probing.
                }
            }
            index += 1;
            if index >= count {
                index = 0;
            }
        }
    }
}
