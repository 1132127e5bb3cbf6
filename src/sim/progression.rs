//! Gems, experience and applying level-up choices

use super::offers::{CHICKEN, FANTASY_GIFT, GOLD, OptionKind, SKIP, UpgradeOption};
use super::state::{GameEvent, Phase, Player, SimulationState};
use super::weapon::Weapon;
use crate::catalog::{passive, weapon};
use crate::consts::GEM_CAPTURE_RADIUS;
use crate::error::{SimError, SimResult};

/// Fraction of the remaining distance a gem covers per frame once in range
const GEM_PULL: f32 = 0.1;

const GIFT_MAX_HP: f32 = 50.0;
const GIFT_LUCK: f32 = 0.1;
const CHICKEN_HEAL: f32 = 50.0;
const GOLD_AMOUNT: u32 = 100;

/// Drift, collect and cull gems, then grant the collected experience
pub fn update_gems(state: &mut SimulationState, dt: f32) {
    let player_pos = state.player.pos;
    let pickup = state.player.stats.pickup_range;
    let cull = state.tuning.gem_cull_distance;
    let boost = 1.0 + state.player.exp_boost();

    let mut gained = 0;
    state.gems.retain_mut(|gem| {
        let dist = gem.pos.distance(player_pos);
        if dist > cull {
            return false;
        }
        if dist < pickup {
            gem.pos += (player_pos - gem.pos) * GEM_PULL * dt;
        }
        if gem.pos.distance(player_pos) < GEM_CAPTURE_RADIUS {
            gained += (gem.value as f32 * boost).floor() as u32;
            return false;
        }
        true
    });

    if gained > 0 {
        gain_exp(state, gained);
    }
}

/// Add experience and resolve every level threshold it crosses.
///
/// Leftover experience carries into the next level. Each crossed threshold
/// queues one level-up choice and pauses the tick.
pub fn gain_exp(state: &mut SimulationState, amount: u32) {
    let curve = state.tuning.exp_curve;
    let player = &mut state.player;
    player.exp += amount;
    while player.exp >= player.next_exp {
        player.exp -= player.next_exp;
        player.level += 1;
        player.next_exp = curve.threshold(player.level, player.next_exp);
        player.pending_level_ups += 1;
        log::info!("Level up to {} (next at {})", player.level, player.next_exp);
        state.events.push(GameEvent::LevelUp { level: player.level });
    }
    if state.player.pending_level_ups > 0 && state.phase == Phase::Playing {
        state.phase = Phase::AwaitingUpgrade;
    }
}

/// Spend one pending level-up on `option`.
///
/// The level-up is consumed even when the option turns out to be invalid,
/// so a stale or unknown choice acts as a skip. The tick resumes once no
/// level-ups remain.
pub fn apply_upgrade(state: &mut SimulationState, option: &UpgradeOption) -> SimResult<()> {
    if state.player.pending_level_ups == 0 {
        return Err(SimError::NoPendingLevelUp);
    }
    let result = apply_option(state, option);
    state.player.pending_level_ups -= 1;
    if state.player.pending_level_ups == 0 && state.phase == Phase::AwaitingUpgrade {
        state.phase = Phase::Playing;
    }
    result
}

fn apply_option(state: &mut SimulationState, option: &UpgradeOption) -> SimResult<()> {
    let player = &mut state.player;
    match option.kind {
        OptionKind::Weapon => {
            if let Some(owned) = player.weapon_mut(option.id) {
                let from = owned.id();
                if let Some(to) = owned.level_up()? {
                    log::info!("{from} evolved into {to}");
                    state.events.push(GameEvent::WeaponEvolved { from, to });
                }
                return Ok(());
            }
            add_weapon(player, option.id)
        }
        OptionKind::WeaponUpgrade => {
            let weapon_id = option.weapon.unwrap_or_default();
            let owned = player
                .weapon_mut(weapon_id)
                .ok_or_else(|| SimError::WeaponNotOwned(weapon_id.to_string()))?;
            let chosen = owned.choose_upgrade(option.id)?;
            if !player.has_passive(chosen) {
                player.passives.push(chosen);
            }
            log::debug!("{weapon_id} took {chosen}");
            Ok(())
        }
        OptionKind::Passive => add_passive(player, option.id),
        OptionKind::Item => apply_item(player, option.id),
    }
}

fn add_weapon(player: &mut Player, id: &str) -> SimResult<()> {
    let def = weapon(id).ok_or_else(|| SimError::UnknownWeapon(id.to_string()))?;
    if !def.available_to(player.character) {
        return Err(SimError::UnknownWeapon(id.to_string()));
    }
    if player.weapons.len() >= player.stats.weapon_slots {
        return Err(SimError::SlotsFull("weapon"));
    }
    player.weapons.push(Weapon::new(def));
    log::debug!("Picked up {}", def.id);
    Ok(())
}

fn add_passive(player: &mut Player, id: &str) -> SimResult<()> {
    let def = passive(id).ok_or_else(|| SimError::UnknownPassive(id.to_string()))?;
    if player.has_passive(def.id) {
        return Ok(());
    }
    if player.catalog_passive_count() >= player.stats.passive_slots {
        return Err(SimError::SlotsFull("passive"));
    }
    player.passives.push(def.id);
    player.stats.apply(&def.bonus);
    log::debug!("Picked up {}", def.id);
    Ok(())
}

fn apply_item(player: &mut Player, id: &str) -> SimResult<()> {
    let stats = &mut player.stats;
    match id {
        FANTASY_GIFT => {
            stats.max_hp += GIFT_MAX_HP;
            stats.hp = stats.max_hp;
            stats.luck += GIFT_LUCK;
        }
        CHICKEN => stats.heal(CHICKEN_HEAL),
        GOLD => player.gold += GOLD_AMOUNT,
        SKIP => {}
        other => return Err(SimError::UnknownItem(other.to_string())),
    }
    Ok(())
}
