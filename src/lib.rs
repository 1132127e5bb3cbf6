//! Danmaku Survivors - simulation core for a top-down survival action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, weapons, projectiles, enemies, leveling)
//! - `catalog`: Static character, weapon, passive and upgrade-tree data
//! - `session`: Host-facing frame loop, HUD sampling and UI callbacks
//! - `tuning`: Data-driven caps, curves and wave tables

pub mod catalog;
pub mod error;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{SimError, SimResult};
pub use session::{HudSnapshot, LevelUpContext, Session, SessionObserver};
pub use tuning::{ExpCurve, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Host frame rate the simulation is paced against
    pub const FPS: f32 = 60.0;
    /// Simulated frames advanced per tick (game speed)
    pub const TIME_SCALE: f32 = 2.0;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions
    pub const MAP_WIDTH: f32 = 7500.0;
    pub const MAP_HEIGHT: f32 = 7500.0;
    /// Visible viewport (camera rectangle)
    pub const CANVAS_WIDTH: f32 = 1920.0;
    pub const CANVAS_HEIGHT: f32 = 1080.0;
    /// Player is kept this far inside the map edge
    pub const MAP_MARGIN: f32 = 10.0;

    /// Player body radius for contact damage
    pub const PLAYER_RADIUS: f32 = 15.0;
    /// Player hurtbox padding used against enemy bullets
    pub const PLAYER_HURT_RADIUS: f32 = 22.5;
    /// Regular enemy radius
    pub const ENEMY_RADIUS: f32 = 22.5;
    /// Boss radius
    pub const BOSS_RADIUS: f32 = 60.0;
    /// Gem capture distance
    pub const GEM_CAPTURE_RADIUS: f32 = 20.0;
    /// Gem radius
    pub const GEM_RADIUS: f32 = 4.0;

    /// Camera smooth-follow factor per tick
    pub const CAMERA_LERP: f32 = 0.1;
    /// Invulnerability after taking a hit (frames)
    pub const HIT_INVULN: f32 = 30.0;
    /// Invulnerability after a revive (frames)
    pub const REVIVE_INVULN: f32 = 180.0;
}

/// Normalize a vector, or return `fallback` when it has no length
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len > f32::EPSILON && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

/// Normalize a vector, falling back to +X for degenerate input
#[inline]
pub fn normalize_or_x(v: Vec2) -> Vec2 {
    normalize_or(v, Vec2::X)
}

/// Unit vector at `angle` radians scaled by `len`
#[inline]
pub fn polar(angle: f32, len: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * len
}

/// Angle of a vector in radians, measured from +X
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// True when `floor(time)` lands on a multiple of `every`
#[inline]
pub fn on_interval(time: f32, every: u32) -> bool {
    let every = every.max(1) as u64;
    (time.max(0.0).floor() as u64) % every == 0
}
