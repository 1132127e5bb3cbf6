//! Playable characters and their base stats

use serde::{Deserialize, Serialize};

use crate::sim::stats::Stats;

/// Selectable character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Character {
    #[default]
    Reimu,
    Mokou,
    Marisa,
    Sakuya,
    Yuma,
    Koishi,
}

impl Character {
    pub const ALL: [Character; 6] = [
        Character::Reimu,
        Character::Mokou,
        Character::Marisa,
        Character::Sakuya,
        Character::Yuma,
        Character::Koishi,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Character::Reimu => "reimu",
            Character::Mokou => "mokou",
            Character::Marisa => "marisa",
            Character::Sakuya => "sakuya",
            Character::Yuma => "yuma",
            Character::Koishi => "koishi",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == s.to_lowercase())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Character::Reimu => "Reimu Hakurei",
            Character::Mokou => "Fujiwara no Mokou",
            Character::Marisa => "Marisa Kirisame",
            Character::Sakuya => "Sakuya Izayoi",
            Character::Yuma => "Yuma Toutetsu",
            Character::Koishi => "Koishi Komeiji",
        }
    }

    /// Weapon the character starts every run with
    pub fn starting_weapon(&self) -> &'static str {
        match self {
            Character::Reimu => "homing_amulet",
            Character::Mokou => "fire_bird",
            Character::Marisa => "star_dust",
            Character::Sakuya => "knives",
            Character::Yuma => "spoon",
            Character::Koishi => "mines",
        }
    }

    /// Base stat block at the start of a run
    pub fn base_stats(&self) -> Stats {
        let base = Stats::default();
        match self {
            Character::Reimu => Stats {
                max_hp: 100.0,
                hp: 100.0,
                speed: 3.5,
                pickup_range: 130.0,
                luck: 1.2,
                armor: 1.0,
                ..base
            },
            Character::Mokou => Stats {
                max_hp: 130.0,
                hp: 130.0,
                speed: 3.5,
                might: 1.1,
                recovery: -0.5,
                revivals: 1,
                ..base
            },
            Character::Marisa => Stats {
                max_hp: 80.0,
                hp: 80.0,
                speed: 4.5,
                might: 1.2,
                cooldown: 0.9,
                pickup_range: 150.0,
                ..base
            },
            Character::Sakuya => Stats {
                speed: 4.0,
                area: 1.1,
                pickup_range: 120.0,
                crit_rate: 0.15,
                ..base
            },
            Character::Yuma => Stats {
                max_hp: 150.0,
                hp: 150.0,
                speed: 3.0,
                armor: 3.0,
                recovery: 1.0,
                ..base
            },
            Character::Koishi => Stats {
                max_hp: 90.0,
                hp: 90.0,
                speed: 4.0,
                area: 1.2,
                luck: 1.5,
                ..base
            },
        }
    }

    /// Small player projectiles ricochet off the camera rectangle
    pub fn bounces_small_projectiles(&self) -> bool {
        matches!(self, Character::Sakuya)
    }

    /// Per-hit damage multiplier range, if the character rolls variance
    pub fn damage_variance(&self) -> Option<(f32, f32)> {
        match self {
            Character::Koishi => Some((0.5, 2.0)),
            _ => None,
        }
    }

    /// Chance per hit to restore 1 HP
    pub fn hit_heal_chance(&self) -> f32 {
        match self {
            Character::Yuma => 0.1,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_round_trip() {
        for c in Character::ALL {
            assert_eq!(Character::from_id(c.id()), Some(c));
        }
        assert_eq!(Character::from_id("MARISA"), Some(Character::Marisa));
        assert_eq!(Character::from_id("cirno"), None);
    }

    #[test]
    fn test_base_stats() {
        let mokou = Character::Mokou.base_stats();
        assert_eq!(mokou.revivals, 1);
        assert!(mokou.recovery < 0.0);
        assert_eq!(mokou.hp, mokou.max_hp);

        let yuma = Character::Yuma.base_stats();
        assert_eq!(yuma.armor, 3.0);
        assert_eq!(yuma.max_hp, 150.0);

        assert_eq!(Character::Sakuya.base_stats().crit_rate, 0.15);
    }

    #[test]
    fn test_traits() {
        assert!(Character::Sakuya.bounces_small_projectiles());
        assert!(!Character::Reimu.bounces_small_projectiles());
        assert_eq!(Character::Koishi.damage_variance(), Some((0.5, 2.0)));
        assert_eq!(Character::Yuma.hit_heal_chance(), 0.1);
    }
}
