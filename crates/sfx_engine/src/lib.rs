//! # SFX Engine
//!
//! Sound-effect scheduling core for an isometric real-time-strategy game.
//!
//! ## Features
//!
//! - **Bounded Channel Pool**: fixed number of simultaneous voices, hard
//!   cap with silent drop instead of queueing
//! - **Round-Robin Variants**: each logical sound owns a small group of
//!   interchangeable assets, probed from a shared deterministic random
//!   table
//! - **Positional Gating**: viewport-relative audibility windows,
//!   fog-of-war occlusion, stereo pan from world coordinates
//! - **Moving Sources**: per-tick pan tracking for projectiles and
//!   vehicles
//! - **Pluggable Backends**: silent backend built in, Rodio playback
//!   behind the `rodio-backend` feature
//!
//! ## Quick Start
//!
//! ```
//! use sfx_engine::backend::{AudioBackend, NullBackend};
//! use sfx_engine::catalog::SoundCatalog;
//! use sfx_engine::effects::EffectSystem;
//! use sfx_engine::spatial::Viewport;
//!
//! let mut backend = NullBackend::new();
//! let shot_a = backend.load_asset(b"...").unwrap();
//! let shot_b = backend.load_asset(b"...").unwrap();
//!
//! let mut catalog = SoundCatalog::new();
//! let musket = catalog.insert("musket_fire", vec![shot_a, shot_b], true).unwrap();
//!
//! let mut sfx = EffectSystem::new(backend, catalog);
//!
//! // Once per frame: follow the camera, advance moving voices.
//! sfx.tick(&Viewport { tile_x: 0, tile_y: 0, tiles_wide: 20, tiles_high: 15 });
//!
//! // Fire from gameplay code.
//! sfx.add_effect(None, 350, 120, musket);
//! ```
//!
//! The whole pipeline runs synchronously on one thread; nothing in this
//! crate blocks, and no trigger path returns an error — audio failures
//! degrade to silence.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod backend;
pub mod catalog;
pub mod channel;
pub mod config;
pub mod effects;
pub mod error;
pub mod mixer;
pub mod random;
pub mod spatial;

pub use error::{AudioError, CatalogError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        backend::{AssetHandle, AudioBackend, NullBackend},
        catalog::{SoundBankDef, SoundCatalog, SoundId},
        channel::ChannelPool,
        config::{AudioConfig, Config},
        effects::EffectSystem,
        error::{AudioError, CatalogError},
        mixer::SfxMixer,
        spatial::{FogQuery, Viewport},
    };
}
