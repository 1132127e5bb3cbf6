//! Player attribute block
//!
//! Passives and items add to these fields linearly. There is no
//! normalization and no hidden cap.

use serde::{Deserialize, Serialize};

/// Mutable player stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub max_hp: f32,
    pub hp: f32,
    /// Movement per simulated frame
    pub speed: f32,
    /// Damage multiplier
    pub might: f32,
    /// Projectile size multiplier
    pub area: f32,
    /// Cooldown multiplier (lower is faster)
    pub cooldown: f32,
    pub pickup_range: f32,
    pub luck: f32,
    /// Flat damage reduction
    pub armor: f32,
    /// HP restored once per simulated second; negative drains
    pub recovery: f32,
    pub revivals: u32,
    pub crit_rate: f32,
    pub crit_damage: f32,
    pub weapon_slots: usize,
    pub passive_slots: usize,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            max_hp: 100.0,
            hp: 100.0,
            speed: 3.5,
            might: 1.0,
            area: 1.0,
            cooldown: 1.0,
            pickup_range: 100.0,
            luck: 1.0,
            armor: 0.0,
            recovery: 0.0,
            revivals: 0,
            crit_rate: 0.05,
            crit_damage: 1.5,
            weapon_slots: 6,
            passive_slots: 6,
        }
    }
}

impl Stats {
    /// Add a bonus to every field it touches
    pub fn apply(&mut self, bonus: &StatBonus) {
        self.max_hp += bonus.max_hp;
        self.speed += bonus.speed;
        self.might += bonus.might;
        self.area += bonus.area;
        self.cooldown += bonus.cooldown;
        self.pickup_range += bonus.pickup_range;
        self.luck += bonus.luck;
        self.armor += bonus.armor;
        self.recovery += bonus.recovery;
        self.revivals = self.revivals.saturating_add_signed(bonus.revivals);
        self.crit_rate += bonus.crit_rate;
        self.crit_damage += bonus.crit_damage;
        self.clamp_hp();
    }

    /// Heal by `amount`, never past max
    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Keep hp inside `[0, max_hp]`
    pub fn clamp_hp(&mut self) {
        self.max_hp = self.max_hp.max(1.0);
        self.hp = self.hp.clamp(0.0, self.max_hp);
    }

    /// Damage after armor, never less than one
    pub fn mitigate(&self, raw: f32) -> f32 {
        (raw - self.armor).max(1.0)
    }
}

/// Additive stat deltas carried by passives and items
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBonus {
    pub max_hp: f32,
    pub speed: f32,
    pub might: f32,
    pub area: f32,
    pub cooldown: f32,
    pub pickup_range: f32,
    pub luck: f32,
    pub armor: f32,
    pub recovery: f32,
    pub revivals: i32,
    pub crit_rate: f32,
    pub crit_damage: f32,
}

impl StatBonus {
    /// Bonus with every field zero, usable in const context
    pub const NONE: StatBonus = StatBonus {
        max_hp: 0.0,
        speed: 0.0,
        might: 0.0,
        area: 0.0,
        cooldown: 0.0,
        pickup_range: 0.0,
        luck: 0.0,
        armor: 0.0,
        recovery: 0.0,
        revivals: 0,
        crit_rate: 0.0,
        crit_damage: 0.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_stacks_linearly() {
        let mut stats = Stats::default();
        let bonus = StatBonus {
            cooldown: -0.1,
            area: 0.1,
            ..StatBonus::NONE
        };
        for _ in 0..12 {
            stats.apply(&bonus);
        }
        // No floor: twelve grimoires push the multiplier negative
        assert!((stats.cooldown - (1.0 - 1.2)).abs() < 1e-5);
        assert!((stats.area - 2.2).abs() < 1e-5);
    }

    #[test]
    fn test_max_hp_drop_clamps_hp() {
        let mut stats = Stats::default();
        stats.apply(&StatBonus {
            max_hp: -8.0,
            ..StatBonus::NONE
        });
        assert_eq!(stats.max_hp, 92.0);
        assert_eq!(stats.hp, 92.0);
    }

    #[test]
    fn test_revivals_add() {
        let mut stats = Stats::default();
        stats.apply(&StatBonus {
            revivals: 1,
            ..StatBonus::NONE
        });
        assert_eq!(stats.revivals, 1);
    }

    #[test]
    fn test_mitigate_floor() {
        let stats = Stats {
            armor: 3.0,
            ..Stats::default()
        };
        assert_eq!(stats.mitigate(10.0), 7.0);
        assert_eq!(stats.mitigate(2.0), 1.0);
    }
}
