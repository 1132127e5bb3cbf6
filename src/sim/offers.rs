//! Level-up offer generator
//!
//! A weapon with an unlocked specialization tier forces its tier choices.
//! Otherwise three weighted draws pick from weapon level-ups, new items and
//! heal filler, with gold padding so the offer is never short.

use serde::Serialize;

use super::rng::RandomSource;
use super::state::Player;
use super::weapon::Weapon;
use crate::catalog::{PASSIVES, PassiveDef, UpgradeDef, WEAPONS, WeaponDef};

/// Options per offer
pub const OFFER_SIZE: usize = 3;
/// Draw attempts before the generator gives up and pads
const MAX_ATTEMPTS: u32 = 50;
/// Draws that may come up empty before gold becomes a fallback
const GOLD_FALLBACK_AFTER: u32 = 10;

// Cumulative draw thresholds
const GIFT_ROLL: f32 = 0.01;
const LEVEL_ROLL: f32 = 0.61;
const NEW_ITEM_ROLL: f32 = 0.91;

pub const FANTASY_GIFT: &str = "fantasy_gift";
pub const CHICKEN: &str = "chicken";
pub const GOLD: &str = "gold";
pub const SKIP: &str = "skip";

/// What choosing an option does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Add a new weapon or level an owned one
    Weapon,
    /// Fill the next specialization tier of an owned weapon
    WeaponUpgrade,
    Passive,
    /// Gift, chicken, gold or skip
    Item,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

/// One choice shown on the level-up screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeOption {
    pub id: &'static str,
    pub kind: OptionKind,
    pub name: &'static str,
    pub description: String,
    pub rarity: Rarity,
    /// Weapon a tier choice attaches to
    pub weapon: Option<&'static str>,
    /// Current level of the weapon, 0 for anything new
    pub level: u32,
}

impl UpgradeOption {
    pub fn new_weapon(def: &'static WeaponDef) -> Self {
        Self {
            id: def.id,
            kind: OptionKind::Weapon,
            name: def.name,
            description: def.description.to_string(),
            rarity: Rarity::Rare,
            weapon: None,
            level: 0,
        }
    }

    pub fn level_weapon(weapon: &Weapon) -> Self {
        Self {
            id: weapon.id(),
            kind: OptionKind::Weapon,
            name: weapon.def.name,
            description: format!("Upgrade to level {}", weapon.level + 1),
            rarity: Rarity::Common,
            weapon: None,
            level: weapon.level,
        }
    }

    pub fn tier_choice(weapon: &Weapon, def: &'static UpgradeDef) -> Self {
        Self {
            id: def.id,
            kind: OptionKind::WeaponUpgrade,
            name: def.name,
            description: def.description.to_string(),
            rarity: Rarity::Rare,
            weapon: Some(weapon.id()),
            level: weapon.level,
        }
    }

    pub fn passive(def: &'static PassiveDef) -> Self {
        Self {
            id: def.id,
            kind: OptionKind::Passive,
            name: def.name,
            description: def.description.to_string(),
            rarity: Rarity::Common,
            weapon: None,
            level: 0,
        }
    }

    fn item(id: &'static str, name: &'static str, description: &str, rarity: Rarity) -> Self {
        Self {
            id,
            kind: OptionKind::Item,
            name,
            description: description.to_string(),
            rarity,
            weapon: None,
            level: 0,
        }
    }

    pub fn fantasy_gift() -> Self {
        Self::item(FANTASY_GIFT, "Gift of Gensokyo", "Full heal, +50 max HP and +10% luck", Rarity::Legendary)
    }

    pub fn chicken() -> Self {
        Self::item(CHICKEN, "Roast Chicken", "Restore 50 HP", Rarity::Common)
    }

    pub fn gold() -> Self {
        Self::item(GOLD, "Gold", "Gain 100 gold", Rarity::Common)
    }

    pub fn skip() -> Self {
        Self::item(SKIP, "Skip", "Keep your build as it is", Rarity::Common)
    }

    /// Restores hp and only shows up while the player is hurt
    pub fn is_gated_heal(&self) -> bool {
        self.kind == OptionKind::Item && self.id == CHICKEN
    }
}

/// Choices for the next level-up
pub fn generate(
    player: &Player,
    elapsed_secs: f32,
    heal_gate_secs: f32,
    rng: &mut dyn RandomSource,
) -> Vec<UpgradeOption> {
    if let Some(forced) = forced_tier(player) {
        return forced;
    }

    let existing: Vec<&Weapon> = player.weapons.iter().filter(|w| !w.is_max_level()).collect();
    let new_weapons: Vec<&'static WeaponDef> = if player.weapons.len() < player.stats.weapon_slots {
        WEAPONS
            .iter()
            .filter(|d| !d.is_evolved() && d.available_to(player.character))
            .filter(|d| player.weapon(d.id).is_none())
            .collect()
    } else {
        Vec::new()
    };
    let passives: Vec<&'static PassiveDef> = if player.catalog_passive_count() < player.stats.passive_slots {
        PASSIVES
            .iter()
            .filter(|p| p.exclusive_to.is_none_or(|c| c == player.character))
            .filter(|p| !player.has_passive(p.id))
            .collect()
    } else {
        Vec::new()
    };
    let can_heal = player.stats.hp < player.stats.max_hp && elapsed_secs > heal_gate_secs;

    let mut options: Vec<UpgradeOption> = Vec::with_capacity(OFFER_SIZE);
    let mut attempts = 0;
    while options.len() < OFFER_SIZE && attempts < MAX_ATTEMPTS {
        attempts += 1;
        let roll = rng.next_f32();
        let mut candidate = if roll < GIFT_ROLL {
            Some(UpgradeOption::fantasy_gift())
        } else if roll < LEVEL_ROLL && !existing.is_empty() {
            let w = existing[rng.index(existing.len())];
            Some(UpgradeOption::level_weapon(w))
        } else if roll < NEW_ITEM_ROLL && !(new_weapons.is_empty() && passives.is_empty()) {
            let pick_weapon = rng.next_f32() > 0.5 && !new_weapons.is_empty();
            if pick_weapon {
                Some(UpgradeOption::new_weapon(new_weapons[rng.index(new_weapons.len())]))
            } else if !passives.is_empty() {
                Some(UpgradeOption::passive(passives[rng.index(passives.len())]))
            } else {
                None
            }
        } else if can_heal {
            Some(UpgradeOption::chicken())
        } else {
            None
        };

        if candidate.as_ref().is_some_and(|c| options.iter().any(|o| o.id == c.id)) {
            candidate = None;
        }
        if candidate.is_none() && attempts > GOLD_FALLBACK_AFTER {
            candidate = Some(UpgradeOption::gold());
        }
        options.extend(candidate);
    }

    while options.len() < OFFER_SIZE {
        options.push(UpgradeOption::gold());
    }
    options
}

/// Tier choices of the first weapon with an unlocked, unfilled tier
fn forced_tier(player: &Player) -> Option<Vec<UpgradeOption>> {
    player.weapons.iter().find_map(|w| {
        let (_, tier) = w.pending_tier()?;
        Some(
            tier.choices
                .iter()
                .take(OFFER_SIZE)
                .map(|def| UpgradeOption::tier_choice(w, def))
                .collect(),
        )
    })
}
