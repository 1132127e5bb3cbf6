//! Projectile core and behavior components
//!
//! A projectile is a required core (position, velocity, radius, damage,
//! duration, penetration) plus orthogonal components: how it moves
//! ([`Motion`]), what kind of area it is ([`ProjectileKind`]) and what it
//! does on hit ([`HitEffects`]). The tick dispatches on components instead
//! of probing optional flags.

use glam::Vec2;
use serde::Serialize;

/// Who a projectile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Owner {
    /// Fired by the player, damages enemies
    Player,
    /// Fired by an enemy, damages the player
    Enemy,
}

/// Movement component
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Motion {
    /// Plain velocity integration
    Linear,
    /// Steers toward the nearest enemy each tick
    Homing { strength: f32 },
    /// Repositioned on a circle around the player every tick
    Orbit { radius: f32, angle: f32, speed: f32 },
    /// Flies out, then steers back to the player past the half-life
    Returning,
}

/// Area component, changes how the projectile is hit-tested
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ProjectileKind {
    /// Circle overlap
    Bullet,
    /// Infinite forward rectangle along `dir`, half-width = radius
    Laser { dir: Vec2 },
    /// Pulls enemies inside `pull_radius` toward the center
    BlackHole { pull_radius: f32, strength: f32 },
    /// Freezes enemies around the player, never collides
    TimeStop { radius: f32 },
}

/// Damage-over-time payload. Each proc deals `damage * ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageOverTime {
    pub duration: f32,
    pub ratio: f32,
}

/// Fan of child projectiles on hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Split {
    pub count: u32,
    /// Total fan angle in radians
    pub spread: f32,
}

/// Retarget to the nearest enemy not yet visited
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Retarget {
    pub remaining: u32,
    pub range: f32,
}

/// Area damage on hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Explosion {
    pub radius: f32,
    /// Fraction of projectile damage dealt to everything inside
    pub ratio: f32,
}

/// On-hit component
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HitEffects {
    pub burn: Option<DamageOverTime>,
    pub poison: Option<DamageOverTime>,
    /// Stun duration in frames
    pub stun: Option<f32>,
    /// Freeze duration in frames
    pub freeze: Option<f32>,
    /// HP restored to the player per hit
    pub heal: Option<f32>,
    pub split: Option<Split>,
    pub bounce: Option<Retarget>,
    pub chain: Option<Retarget>,
    pub explosion: Option<Explosion>,
}

impl HitEffects {
    /// A bounce or chain still has hops left
    pub fn retarget_pending(&self) -> bool {
        self.bounce.is_some_and(|b| b.remaining > 0) || self.chain.is_some_and(|c| c.remaining > 0)
    }
}

/// A projectile entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projectile {
    /// Assigned when the projectile enters the simulation
    pub id: u32,
    pub owner: Owner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Remaining lifetime in frames
    pub duration: f32,
    pub max_duration: f32,
    /// Hits remaining before removal
    pub penetration: i32,
    pub knockback: f32,
    pub color: u32,
    pub sprite: Option<&'static str>,
    pub motion: Motion,
    pub kind: ProjectileKind,
    pub effects: HitEffects,
    /// Enemy ids already visited by bounce hops
    pub bounced: Vec<u32>,
    /// Enemy ids already struck by chain hops
    pub chained: Vec<u32>,
}

impl Projectile {
    /// Player projectile with penetration 1 and knockback 2
    pub fn new(pos: Vec2, vel: Vec2, damage: f32, duration: f32, radius: f32) -> Self {
        Self {
            id: 0,
            owner: Owner::Player,
            pos,
            vel,
            radius,
            damage,
            duration,
            max_duration: duration,
            penetration: 1,
            knockback: 2.0,
            color: 0xffffff,
            sprite: None,
            motion: Motion::Linear,
            kind: ProjectileKind::Bullet,
            effects: HitEffects::default(),
            bounced: Vec::new(),
            chained: Vec::new(),
        }
    }

    /// Enemy bullet
    pub fn hostile(pos: Vec2, vel: Vec2, damage: f32, duration: f32, radius: f32) -> Self {
        Self {
            owner: Owner::Enemy,
            penetration: 1,
            knockback: 0.0,
            ..Self::new(pos, vel, damage, duration, radius)
        }
    }

    pub fn pierce(mut self, penetration: i32) -> Self {
        self.penetration = penetration;
        self
    }

    pub fn knockback(mut self, knockback: f32) -> Self {
        self.knockback = knockback;
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn sprite(mut self, sprite: &'static str) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn homing(mut self, strength: f32) -> Self {
        self.motion = Motion::Homing { strength };
        self
    }

    pub fn orbit(mut self, radius: f32, angle: f32, speed: f32) -> Self {
        self.motion = Motion::Orbit {
            radius,
            angle,
            speed,
        };
        self
    }

    pub fn returning(mut self) -> Self {
        self.motion = Motion::Returning;
        self
    }

    pub fn kind(mut self, kind: ProjectileKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn explode(mut self, radius: f32, ratio: f32) -> Self {
        self.effects.explosion = Some(Explosion { radius, ratio });
        self
    }

    /// Set homing strength, keeping orbit/return motions intact
    pub fn set_homing(&mut self, strength: f32) {
        if matches!(self.motion, Motion::Linear | Motion::Homing { .. }) {
            self.motion = Motion::Homing { strength };
        }
    }

    /// Current homing strength, if any
    pub fn homing_strength(&self) -> Option<f32> {
        match self.motion {
            Motion::Homing { strength } => Some(strength),
            _ => None,
        }
    }

    /// Fraction of lifetime already spent, 0 at birth and 1 at expiry
    pub fn progress(&self) -> f32 {
        if self.max_duration <= 0.0 {
            return 1.0;
        }
        1.0 - self.duration / self.max_duration
    }

    /// Lasers, black holes and orbitals never spend penetration
    pub fn ignores_penetration(&self) -> bool {
        matches!(
            self.kind,
            ProjectileKind::Laser { .. } | ProjectileKind::BlackHole { .. }
        ) || self.is_orbital()
    }

    /// Orbitals ignore velocity; everything else integrates it
    pub fn is_orbital(&self) -> bool {
        matches!(self.motion, Motion::Orbit { .. })
    }
}
