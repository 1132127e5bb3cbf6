//! Passive items

use crate::catalog::Character;
use crate::sim::stats::StatBonus;

/// Behavior a passive adds beyond its stat bonus
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassiveSpecial {
    /// Experience from gems is multiplied by `1 + bonus`
    ExpBoost(f32),
    /// Player projectiles last longer and pierce one more enemy
    SealedShots { duration_mult: f32, extra_penetration: i32 },
    /// Player projectiles explode on hit
    ShotExplosion { radius: f32, ratio: f32 },
    /// Chance to ignore an incoming hit
    Dodge(f32),
    /// Fraction of damage dealt returned as HP
    Lifesteal(f32),
}

/// Static passive definition
#[derive(Debug, Clone, Copy)]
pub struct PassiveDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub exclusive_to: Option<Character>,
    pub bonus: StatBonus,
    pub special: Option<PassiveSpecial>,
}

const fn generic(id: &'static str, name: &'static str, description: &'static str, bonus: StatBonus) -> PassiveDef {
    PassiveDef {
        id,
        name,
        description,
        exclusive_to: None,
        bonus,
        special: None,
    }
}

pub static PASSIVES: &[PassiveDef] = &[
    generic(
        "p_glove",
        "Gathering Glove",
        "Pickup range +20",
        StatBonus { pickup_range: 20.0, ..StatBonus::NONE },
    ),
    generic(
        "grimoire",
        "Grimoire",
        "Cooldown -10%",
        StatBonus { cooldown: -0.1, ..StatBonus::NONE },
    ),
    generic(
        "mushroom",
        "Giant Mushroom",
        "Area +10%",
        StatBonus { area: 0.1, ..StatBonus::NONE },
    ),
    generic(
        "omamori",
        "Omamori",
        "Armor +1",
        StatBonus { armor: 1.0, ..StatBonus::NONE },
    ),
    generic(
        "geta",
        "Geta",
        "Move speed +0.4",
        StatBonus { speed: 0.4, ..StatBonus::NONE },
    ),
    generic(
        "money_box",
        "Offertory Box",
        "Luck +20%",
        StatBonus { luck: 0.2, ..StatBonus::NONE },
    ),
    // Reimu
    PassiveDef {
        id: "gohei_blessing",
        name: "Gohei Blessing",
        description: "Pickup range +30, recovery +0.5",
        exclusive_to: Some(Character::Reimu),
        bonus: StatBonus { pickup_range: 30.0, recovery: 0.5, ..StatBonus::NONE },
        special: None,
    },
    PassiveDef {
        id: "musou_seal",
        name: "Musou Seal",
        description: "Shots last 30% longer and pierce one more enemy",
        exclusive_to: Some(Character::Reimu),
        bonus: StatBonus::NONE,
        special: Some(PassiveSpecial::SealedShots { duration_mult: 1.3, extra_penetration: 1 }),
    },
    PassiveDef {
        id: "dream_born",
        name: "Dream Born",
        description: "One extra revive, armor +1",
        exclusive_to: Some(Character::Reimu),
        bonus: StatBonus { revivals: 1, armor: 1.0, ..StatBonus::NONE },
        special: None,
    },
    // Marisa
    PassiveDef {
        id: "magic_grimoire",
        name: "Magic Grimoire",
        description: "Cooldown -20%, max HP -8",
        exclusive_to: Some(Character::Marisa),
        bonus: StatBonus { cooldown: -0.2, max_hp: -8.0, ..StatBonus::NONE },
        special: None,
    },
    PassiveDef {
        id: "stardust_burst",
        name: "Stardust Burst",
        description: "Every shot bursts on impact",
        exclusive_to: Some(Character::Marisa),
        bonus: StatBonus::NONE,
        special: Some(PassiveSpecial::ShotExplosion { radius: 40.0, ratio: 0.3 }),
    },
    // Sakuya
    PassiveDef {
        id: "silver_blade",
        name: "Silver Blade",
        description: "Crit rate +10%, crit damage +50%",
        exclusive_to: Some(Character::Sakuya),
        bonus: StatBonus { crit_rate: 0.1, crit_damage: 0.5, ..StatBonus::NONE },
        special: None,
    },
    // Yuma
    PassiveDef {
        id: "gluttony_privilege",
        name: "Gluttony Privilege",
        description: "Armor +2, 5% lifesteal",
        exclusive_to: Some(Character::Yuma),
        bonus: StatBonus { armor: 2.0, ..StatBonus::NONE },
        special: Some(PassiveSpecial::Lifesteal(0.05)),
    },
    // Koishi
    PassiveDef {
        id: "unconscious_operation",
        name: "Unconscious Operation",
        description: "Might +50%",
        exclusive_to: Some(Character::Koishi),
        bonus: StatBonus { might: 0.5, ..StatBonus::NONE },
        special: None,
    },
    PassiveDef {
        id: "closed_heart",
        name: "Closed Heart",
        description: "5% chance to ignore a hit",
        exclusive_to: Some(Character::Koishi),
        bonus: StatBonus::NONE,
        special: Some(PassiveSpecial::Dodge(0.05)),
    },
    PassiveDef {
        id: "third_eye",
        name: "Third Eye",
        description: "Luck +50%, experience +20%",
        exclusive_to: Some(Character::Koishi),
        bonus: StatBonus { luck: 0.5, ..StatBonus::NONE },
        special: Some(PassiveSpecial::ExpBoost(0.2)),
    },
];

/// Look up a passive by id
pub fn passive(id: &str) -> Option<&'static PassiveDef> {
    PASSIVES.iter().find(|p| p.id == id)
}
