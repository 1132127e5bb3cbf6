//! Runtime weapon state
//!
//! A [`Weapon`] is a catalog definition plus the mutable parts that change
//! during a run: level, scaled damage and cooldown, the cooldown timer and
//! the upgrade ids chosen so far (one per tier, in tier order).

use glam::Vec2;
use serde::{Serialize, Serializer};

use super::projectile::Projectile;
use super::rng::RandomSource;
use super::stats::Stats;
use crate::catalog::upgrades::{self, ModifierContext, UpgradeTier};
use crate::catalog::weapons::{FireContext, WeaponDef, weapon};
use crate::error::{SimError, SimResult};

/// Per-level damage growth
pub const LEVEL_DAMAGE_GROWTH: f32 = 1.2;
/// Per-level cooldown shrink
pub const LEVEL_COOLDOWN_SHRINK: f32 = 0.95;

fn serialize_def_id<S: Serializer>(def: &&'static WeaponDef, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(def.id)
}

/// A weapon the player holds
#[derive(Debug, Clone, Serialize)]
pub struct Weapon {
    #[serde(rename = "id", serialize_with = "serialize_def_id")]
    pub def: &'static WeaponDef,
    pub level: u32,
    pub base_damage: f32,
    /// Cooldown in simulated frames before stat and upgrade scaling
    pub cooldown_max: f32,
    /// Counts down to zero, may dip one tick below before the reset
    pub cooldown_timer: f32,
    /// Chosen upgrade ids, index = tier
    pub upgrades: Vec<&'static str>,
}

impl Weapon {
    /// Fresh level-1 weapon, ready to fire on the next tick
    pub fn new(def: &'static WeaponDef) -> Self {
        Self {
            def,
            level: 1,
            base_damage: def.base_damage,
            cooldown_max: def.cooldown,
            cooldown_timer: 0.0,
            upgrades: Vec::new(),
        }
    }

    pub fn from_id(id: &str) -> SimResult<Self> {
        weapon(id)
            .map(Self::new)
            .ok_or_else(|| SimError::UnknownWeapon(id.to_string()))
    }

    pub fn id(&self) -> &'static str {
        self.def.id
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.def.max_level
    }

    pub fn has_upgrade(&self, id: &str) -> bool {
        self.upgrades.contains(&id)
    }

    /// Raise the level by one.
    ///
    /// Returns the evolved weapon id when this level-up triggered an
    /// evolution. The evolved weapon starts at level 1 with no upgrades
    /// and keeps the current cooldown timer.
    pub fn level_up(&mut self) -> SimResult<Option<&'static str>> {
        if self.is_max_level() {
            return Err(SimError::MaxLevel(self.id().to_string()));
        }
        self.level += 1;
        self.base_damage *= LEVEL_DAMAGE_GROWTH;
        self.cooldown_max *= LEVEL_COOLDOWN_SHRINK;

        if self.is_max_level() {
            if let Some(evolved) = self.def.evolves_into.and_then(weapon) {
                let timer = self.cooldown_timer;
                *self = Weapon::new(evolved);
                self.cooldown_timer = timer;
                return Ok(Some(evolved.id));
            }
        }
        Ok(None)
    }

    /// The tier whose choices are currently on offer, if one is unlocked
    pub fn pending_tier(&self) -> Option<(usize, &'static UpgradeTier)> {
        let tree = upgrades::tree(self.id())?;
        let index = self.upgrades.len();
        let tier = tree.tiers.get(index)?;
        (self.level >= tier.unlock_level).then_some((index, tier))
    }

    /// Record a tier choice.
    ///
    /// The upgrade must belong to this weapon's tree, its tier must be the
    /// next unfilled one and the weapon must have reached the unlock level.
    pub fn choose_upgrade(&mut self, upgrade_id: &str) -> SimResult<&'static str> {
        let (tier, def) = upgrades::upgrade(self.id(), upgrade_id).ok_or_else(|| SimError::UnknownUpgrade {
            weapon: self.id().to_string(),
            upgrade: upgrade_id.to_string(),
        })?;
        if let Some(chosen) = self.upgrades.get(tier) {
            return Err(SimError::TierFilled {
                weapon: self.id().to_string(),
                tier,
                chosen: chosen.to_string(),
            });
        }
        let required = upgrades::TIER_UNLOCK_LEVELS[tier.min(2)];
        if tier != self.upgrades.len() || self.level < required {
            return Err(SimError::TierLocked {
                weapon: self.id().to_string(),
                tier,
                required,
            });
        }
        self.upgrades.push(def.id);
        Ok(def.id)
    }

    /// Frames until the next shot after firing now
    pub fn cooldown_reset(&self, stats: &Stats) -> f32 {
        self.cooldown_max * stats.cooldown * upgrades::cooldown_factor(self.id(), &self.upgrades)
    }

    /// Fire and run every chosen modifier over the fresh volley
    pub fn fire(
        &self,
        origin: Vec2,
        aim: Vec2,
        stats: &Stats,
        time: f32,
        targets: &[Vec2],
        rng: &mut dyn RandomSource,
    ) -> Vec<Projectile> {
        let ctx = FireContext {
            origin,
            aim,
            damage: self.base_damage * stats.might,
            time,
        };
        let mut volley = (self.def.fire)(&ctx, rng);
        let modifier_ctx = ModifierContext { origin, targets };
        upgrades::apply_modifiers(self.id(), &self.upgrades, &mut volley, &modifier_ctx, rng);
        volley
    }
}
