//! Spatial audibility gate
//!
//! Decides whether a world-positioned trigger is audible at all and, if
//! so, derives its stereo pan and an off-screen volume bias. Everything is
//! measured against a moving listener window recomputed once per tick from
//! the camera viewport, not per trigger.
//!
//! World units are isometric: a map tile spans 32 units horizontally and
//! 16 vertically, and fog visibility is sampled at a doubled vertical
//! coordinate. Both projection artifacts are load-bearing and preserved.

use serde::{Deserialize, Serialize};

/// log2 of the horizontal world-unit span of one map tile
pub const TILE_WIDTH_SHIFT: u32 = 5;

/// log2 of the vertical world-unit span of one map tile
pub const TILE_HEIGHT_SHIFT: u32 = 4;

/// Hard pan limit in integer pan units
pub const PAN_SWING: i32 = 4000;

/// Volume penalty for triggers outside the visible window but inside the
/// loose margin
pub const OFFSCREEN_BIAS: i32 = -800;

/// Camera viewport in map-tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Leftmost visible tile column
    pub tile_x: i32,
    /// Topmost visible tile row
    pub tile_y: i32,
    /// Number of visible tile columns
    pub tiles_wide: i32,
    /// Number of visible tile rows
    pub tiles_high: i32,
}

/// Visibility oracle for fog-of-war occlusion
///
/// `y_doubled` is the world y coordinate times two, matching the map
/// collaborator's addressing.
pub trait FogQuery {
    /// Visibility scalar at a world position
    fn visibility(&self, x: i32, y_doubled: i32) -> u32;
}

/// Tuning for the audibility gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Horizontal margin of the loose window beyond the visible window
    pub loose_margin_x: i32,
    /// Vertical margin of the loose window beyond the visible window
    pub loose_margin_y: i32,
    /// Minimum fog visibility for a trigger to be audible
    pub fog_threshold: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            loose_margin_x: 1024,
            loose_margin_y: 512,
            fog_threshold: 900,
        }
    }
}

/// Pan and volume bias for an accepted positional trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalCue {
    /// Stereo pan in integer units, within `[-PAN_SWING, PAN_SWING]`
    pub pan: i32,
    /// Volume bias: 0 on screen, [`OFFSCREEN_BIAS`] in the loose margin
    pub volume_bias: i32,
}

/// Axis-aligned world-space rectangle
#[derive(Debug, Clone, Copy, Default)]
struct WorldRect {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl WorldRect {
    /// Outside test with inclusive bounds: a point exactly on the edge is
    /// still inside.
    fn strictly_outside(&self, x: i32, y: i32) -> bool {
        x < self.min_x || x > self.max_x || y < self.min_y || y > self.max_y
    }

    /// Half-open containment used for the visible window
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && y >= self.min_y && x < self.max_x && y < self.max_y
    }
}

/// Pan derived from horizontal distance to the listener center
pub fn pan_toward(center_x: i32, x: i32) -> i32 {
    (x - center_x).saturating_mul(2).clamp(-PAN_SWING, PAN_SWING)
}

/// Audibility gate with a per-tick listener window
#[derive(Debug)]
pub struct SpatialGate {
    config: GateConfig,
    strict: WorldRect,
    loose: WorldRect,
    center_x: i32,
    center_y: i32,
}

impl SpatialGate {
    /// Create a gate; call [`SpatialGate::retarget`] before evaluating
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            strict: WorldRect::default(),
            loose: WorldRect::default(),
            center_x: 0,
            center_y: 0,
        }
    }

    /// Recompute the listener window from the current viewport
    ///
    /// Called once per tick so the per-trigger cost is a couple of
    /// comparisons.
    pub fn retarget(&mut self, viewport: &Viewport) {
        self.strict.min_x = viewport.tile_x << TILE_WIDTH_SHIFT;
        self.strict.max_x = (viewport.tile_x + viewport.tiles_wide) << TILE_WIDTH_SHIFT;
        self.strict.min_y = viewport.tile_y << TILE_HEIGHT_SHIFT;
        self.strict.max_y = (viewport.tile_y + viewport.tiles_high) << TILE_HEIGHT_SHIFT;

        self.center_x = (self.strict.min_x + self.strict.max_x) >> 1;
        self.center_y = (self.strict.min_y + self.strict.max_y) >> 1;

        self.loose.min_x = self.strict.min_x - self.config.loose_margin_x;
        self.loose.max_x = self.strict.max_x + self.config.loose_margin_x;
        self.loose.min_y = self.strict.min_y - self.config.loose_margin_y;
        self.loose.max_y = self.strict.max_y + self.config.loose_margin_y;
    }

    /// Listener center in world units
    pub fn center(&self) -> (i32, i32) {
        (self.center_x, self.center_y)
    }

    /// Gate a positional trigger
    ///
    /// Returns `None` when the position is outside the loose window or
    /// occluded by fog; otherwise the pan/bias to play it with.
    pub fn evaluate(&self, fog: Option<&dyn FogQuery>, x: i32, y: i32) -> Option<PositionalCue> {
        if self.loose.strictly_outside(x, y) {
            return None;
        }
        if self.fog_occluded(fog, x, y) {
            return None;
        }

        let volume_bias = if self.strict.contains(x, y) { 0 } else { OFFSCREEN_BIAS };
        Some(PositionalCue {
            pan: pan_toward(self.center_x, x),
            volume_bias,
        })
    }

    /// Gate an ambient trigger: fog occlusion and pan only, no window
    /// bounds and no off-screen bias
    pub fn evaluate_unbounded(&self, fog: Option<&dyn FogQuery>, x: i32, y: i32) -> Option<i32> {
        if self.fog_occluded(fog, x, y) {
            return None;
        }
        Some(pan_toward(self.center_x, x))
    }

    fn fog_occluded(&self, fog: Option<&dyn FogQuery>, x: i32, y: i32) -> bool {
        fog.map_or(false, |f| f.visibility(x, y << 1) < self.config.fog_threshold)
    }
}
