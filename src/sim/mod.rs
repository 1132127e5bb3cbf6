//! Simulation module
//!
//! All gameplay logic lives here. The tick is a plain function over an
//! explicit [`SimulationState`]:
//! - Fixed timestep only
//! - Every random draw goes through an injected [`RandomSource`]
//! - Stable iteration order (insertion order, ids only ever grow)
//! - No rendering, UI or platform dependencies

pub mod collision;
pub mod combat;
pub mod enemy_ai;
pub mod offers;
pub mod progression;
pub mod projectile;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod stats;
pub mod tick;
pub mod weapon;

pub use collision::{circles_overlap, laser_hits, nearest_enemy};
pub use offers::{OptionKind, Rarity, UpgradeOption};
pub use progression::apply_upgrade;
pub use projectile::{HitEffects, Motion, Owner, Projectile, ProjectileKind};
pub use rng::{RandomSource, SequenceRandom, seeded};
pub use state::{
    BossKind, Camera, DamageNumber, Enemy, EnemyArchetype, GameEvent, Gem, Phase, Player, SimulationState,
};
pub use stats::{StatBonus, Stats};
pub use tick::{TickInput, tick};
pub use weapon::Weapon;
