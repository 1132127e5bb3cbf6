//! Hit resolution
//!
//! Player projectiles against enemies (damage rolls, status effects,
//! split, bounce, chain, explosions, knockback, penetration) and enemy
//! attacks against the player (armor, dodge, invulnerability, revive,
//! death).

use glam::Vec2;

use super::collision::{circles_overlap, nearest_enemy_where, projectile_hits_enemy};
use super::projectile::Projectile;
use super::rng::RandomSource;
use super::state::{Affliction, GameEvent, Phase, SimulationState};
use crate::consts::*;
use crate::{angle_of, normalize_or, polar};

/// Screen shake from a bullet hit
const BULLET_HIT_SHAKE: (f32, f32) = (8.0, 10.0);
/// Screen shake from an on-hit explosion
const EXPLOSION_SHAKE: (f32, f32) = (8.0, 12.0);
/// Chain hops deal this fraction of projectile damage
const CHAIN_DAMAGE: f32 = 0.8;

// --- PLAYER DAMAGE ---

/// Apply a hit to the player.
///
/// Returns `false` when invulnerability ignored the hit. Dodged hits count
/// as landed (the attacker is consumed) but deal no damage.
pub fn hurt_player(state: &mut SimulationState, raw: f32, shake: (f32, f32), rng: &mut dyn RandomSource) -> bool {
    let player = &mut state.player;
    if player.invuln > 0.0 || !player.alive {
        return false;
    }

    let dodge = player.dodge_chance();
    if dodge > 0.0 && rng.chance(dodge) {
        player.invuln = HIT_INVULN;
        state.events.push(GameEvent::Dodged);
        return true;
    }

    let damage = player.stats.mitigate(raw);
    player.stats.hp -= damage;
    player.invuln = HIT_INVULN;
    let pos = player.pos;
    state.shake.trigger(shake.0, shake.1);
    state.add_damage_number(pos, damage, true);
    state.events.push(GameEvent::PlayerHit { damage });

    if state.player.stats.hp <= 0.0 {
        resolve_death(state);
    }
    true
}

/// Consume a revive or end the run
pub fn resolve_death(state: &mut SimulationState) {
    let player = &mut state.player;
    if player.stats.revivals > 0 {
        player.stats.revivals -= 1;
        player.stats.hp = player.stats.max_hp;
        player.invuln = REVIVE_INVULN;
        let revivals_left = player.stats.revivals;
        state.enemies.clear();
        log::info!("Revived, {revivals_left} revivals left");
        state.events.push(GameEvent::Revived { revivals_left });
    } else {
        player.stats.hp = 0.0;
        player.alive = false;
        state.phase = Phase::GameOver;
        let minutes = state.elapsed_minutes();
        log::info!("Game over after {minutes} minutes, level {}", state.player.level);
        state.events.push(GameEvent::GameOver { minutes });
    }
}

/// Enemy bullet against the player. Returns true when the bullet is spent.
pub fn enemy_bullet_hits_player(state: &mut SimulationState, p: &Projectile, rng: &mut dyn RandomSource) -> bool {
    if state.player.invuln > 0.0 {
        return false;
    }
    if !circles_overlap(p.pos, p.radius * 1.5, state.player.pos, PLAYER_HURT_RADIUS) {
        return false;
    }
    hurt_player(state, p.damage, BULLET_HIT_SHAKE, rng)
}

// --- PLAYER PROJECTILES ---

/// Roll per-hit damage: character variance, then crit
fn roll_damage(state: &SimulationState, base: f32, rng: &mut dyn RandomSource) -> (f32, bool) {
    let mut damage = base;
    if let Some((lo, hi)) = state.player.character.damage_variance() {
        damage *= rng.range(lo, hi);
    }
    let stats = &state.player.stats;
    let crit = stats.crit_rate > 0.0 && rng.chance(stats.crit_rate);
    if crit {
        damage *= stats.crit_damage;
    }
    (damage, crit)
}

fn heal_player(state: &mut SimulationState, amount: f32) {
    if amount > 0.0 && state.player.alive {
        state.player.stats.heal(amount);
    }
}

/// Resolve a player projectile against every enemy it touches.
///
/// Child projectiles from splits are pushed to `spawned`. Returns true when
/// the projectile ran out of penetration and must be removed.
pub fn strike_enemies(
    state: &mut SimulationState,
    p: &mut Projectile,
    spawned: &mut Vec<Projectile>,
    rng: &mut dyn RandomSource,
) -> bool {
    let area = state.player.stats.area;
    let mut i = 0;
    while i < state.enemies.len() {
        let e = &state.enemies[i];
        if !e.is_alive() || !projectile_hits_enemy(p, e, area) {
            i += 1;
            continue;
        }

        on_hit(state, p, i, spawned, rng);

        if !p.ignores_penetration() && !p.effects.retarget_pending() {
            p.penetration -= 1;
            if p.penetration <= 0 {
                return true;
            }
        }
        i += 1;
    }
    false
}

fn on_hit(
    state: &mut SimulationState,
    p: &mut Projectile,
    target: usize,
    spawned: &mut Vec<Projectile>,
    rng: &mut dyn RandomSource,
) {
    let (damage, crit) = roll_damage(state, p.damage, rng);
    let (target_id, target_pos, target_radius) = {
        let e = &mut state.enemies[target];
        e.take_damage(damage);
        (e.id, e.pos, e.radius)
    };
    state.add_damage_number(target_pos - Vec2::new(0.0, target_radius), damage, crit);

    let lifesteal = state.player.lifesteal();
    heal_player(state, damage * lifesteal);

    apply_status(state, p, target);
    if let Some(heal) = p.effects.heal {
        heal_player(state, heal);
    }

    if let Some(split) = p.effects.split {
        let base = angle_of(p.vel);
        let speed = p.vel.length() * 0.7;
        let step = split.spread / split.count.max(1) as f32;
        for j in 0..split.count {
            let angle = base + (j as f32 - split.count as f32 / 2.0) * step;
            let mut child = p.clone();
            child.pos = target_pos;
            child.vel = polar(angle, speed);
            child.duration = p.duration * 0.7;
            child.max_duration = child.duration;
            child.damage = p.damage * 0.6;
            child.effects.split = None;
            spawned.push(child);
        }
    }

    if let Some(mut bounce) = p.effects.bounce.filter(|b| b.remaining > 0) {
        p.bounced.push(target_id);
        let visited = &p.bounced;
        let next = nearest_enemy_where(&state.enemies, target_pos, bounce.range, |ne| {
            ne.id != target_id && !visited.contains(&ne.id)
        });
        match next {
            Some(n) => {
                let speed = p.vel.length();
                let dir = normalize_or(state.enemies[n].pos - target_pos, Vec2::X);
                p.vel = dir * speed;
                p.pos = target_pos;
                bounce.remaining -= 1;
            }
            None => bounce.remaining = 0,
        }
        p.effects.bounce = Some(bounce);
    }

    if let Some(mut chain) = p.effects.chain.filter(|c| c.remaining > 0) {
        p.chained.push(target_id);
        let visited = &p.chained;
        let next = nearest_enemy_where(&state.enemies, target_pos, chain.range, |ne| {
            ne.id != target_id && !visited.contains(&ne.id)
        });
        match next {
            Some(n) => {
                let hop = p.damage * CHAIN_DAMAGE;
                let e = &mut state.enemies[n];
                e.take_damage(hop);
                let pos = e.pos;
                state.add_damage_number(pos, hop, false);
                p.pos = pos;
                chain.remaining -= 1;
            }
            None => chain.remaining = 0,
        }
        p.effects.chain = Some(chain);
    }

    if let Some(blast) = p.effects.explosion {
        let blast_damage = p.damage * blast.ratio;
        let mut struck = Vec::new();
        for e in state.enemies.iter_mut() {
            if e.is_alive() && e.pos.distance(target_pos) < blast.radius {
                e.take_damage(blast_damage);
                struck.push(e.pos);
            }
        }
        for pos in struck {
            state.add_damage_number(pos, blast_damage, true);
        }
        state.shake.trigger(EXPLOSION_SHAKE.0, EXPLOSION_SHAKE.1);
    }

    if p.knockback > 0.0 {
        let e = &mut state.enemies[target];
        let dir = normalize_or(e.pos - p.pos, Vec2::X);
        e.vel += dir * p.knockback;
    }

    let heal_chance = state.player.character.hit_heal_chance();
    if heal_chance > 0.0 && rng.chance(heal_chance) {
        heal_player(state, 1.0);
    }
}

fn apply_status(state: &mut SimulationState, p: &Projectile, target: usize) {
    let e = &mut state.enemies[target];
    if let Some(burn) = p.effects.burn {
        e.status.burn = Some(Affliction {
            remaining: burn.duration,
            damage: p.damage * burn.ratio,
        });
    }
    if let Some(poison) = p.effects.poison {
        e.status.poison = Some(Affliction {
            remaining: poison.duration,
            damage: p.damage * poison.ratio,
        });
    }
    if let Some(stun) = p.effects.stun {
        e.status.stunned = e.status.stunned.max(stun);
    }
    if let Some(freeze) = p.effects.freeze {
        e.status.frozen = e.status.frozen.max(freeze);
    }
}

/// Area damage centered on `center`, used by the dash landing
pub fn blast(state: &mut SimulationState, center: Vec2, radius: f32, damage: f32) -> u32 {
    let mut hits = 0;
    let mut positions = Vec::new();
    for e in state.enemies.iter_mut() {
        if e.is_alive() && e.pos.distance(center) < radius {
            e.take_damage(damage);
            positions.push(e.pos);
            hits += 1;
        }
    }
    for pos in positions {
        state.add_damage_number(pos, damage, false);
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Character;
    use crate::sim::projectile::{DamageOverTime, Explosion, Retarget, Split};
    use crate::sim::rng::SequenceRandom;
    use crate::sim::state::{Enemy, EnemyAi, EnemyArchetype};
    use crate::tuning::{EnemyTemplate, Tuning};

    fn make_state(character: Character) -> SimulationState {
        let mut state = SimulationState::new(character, Tuning::default());
        state.player.stats.crit_rate = 0.0;
        state
    }

    fn spawn(state: &mut SimulationState, pos: Vec2, hp: f32) -> u32 {
        let template = EnemyTemplate {
            archetype: EnemyArchetype::Fairy,
            hp,
            damage: 5.0,
            speed: 1.0,
            exp: 2,
            color: 0,
        };
        let id = state.next_entity_id();
        state.enemies.push(Enemy::from_template(id, pos, &template, EnemyAi::Chase));
        id
    }

    fn bullet(pos: Vec2, damage: f32) -> Projectile {
        Projectile::new(pos, Vec2::new(5.0, 0.0), damage, 60.0, 10.0).knockback(0.0)
    }

    #[test]
    fn test_penetration_one_resolves_single_hit() {
        let mut state = make_state(Character::Reimu);
        let at = Vec2::new(1000.0, 1000.0);
        spawn(&mut state, at, 20.0);
        spawn(&mut state, at, 20.0);
        let mut p = bullet(at, 15.0);
        let mut spawned = Vec::new();
        let mut rng = SequenceRandom::new([0.5]);
        assert!(strike_enemies(&mut state, &mut p, &mut spawned, &mut rng));
        assert_eq!(state.enemies[0].hp, 5.0);
        assert_eq!(state.enemies[1].hp, 20.0);
    }

    #[test]
    fn test_dead_enemies_are_not_hit() {
        let mut state = make_state(Character::Reimu);
        let at = Vec2::new(1000.0, 1000.0);
        spawn(&mut state, at, 20.0);
        state.enemies[0].hp = 0.0;
        let mut p = bullet(at, 15.0);
        let mut rng = SequenceRandom::new([0.5]);
        assert!(!strike_enemies(&mut state, &mut p, &mut Vec::new(), &mut rng));
        assert_eq!(p.penetration, 1);
    }

    #[test]
    fn test_bounce_keeps_penetration_until_exhausted() {
        let mut state = make_state(Character::Reimu);
        let a = Vec2::new(1000.0, 1000.0);
        spawn(&mut state, a, 100.0);
        let second = spawn(&mut state, a + Vec2::new(0.0, 200.0), 100.0);
        let mut p = bullet(a, 10.0);
        p.effects.bounce = Some(Retarget { remaining: 2, range: 300.0 });
        let mut rng = SequenceRandom::new([0.5]);
        assert!(!strike_enemies(&mut state, &mut p, &mut Vec::new(), &mut rng));
        assert_eq!(p.penetration, 1);
        assert_eq!(p.effects.bounce.map(|b| b.remaining), Some(1));
        assert!(p.vel.y > 0.0 && p.vel.x.abs() < 1e-4);
        assert_eq!(p.bounced, vec![state.enemies[0].id]);
        assert_ne!(second, state.enemies[0].id);
    }

    #[test]
    fn test_chain_damages_next_enemy() {
        let mut state = make_state(Character::Reimu);
        let a = Vec2::new(1000.0, 1000.0);
        spawn(&mut state, a, 100.0);
        spawn(&mut state, a + Vec2::new(150.0, 0.0), 100.0);
        spawn(&mut state, a + Vec2::new(500.0, 0.0), 100.0);
        let mut p = bullet(a, 10.0);
        p.effects.chain = Some(Retarget { remaining: 3, range: 200.0 });
        let mut rng = SequenceRandom::new([0.5]);
        let spent = strike_enemies(&mut state, &mut p, &mut Vec::new(), &mut rng);
        assert_eq!(state.enemies[0].hp, 90.0);
        // The hop lands on the second enemy, which is then struck directly
        assert_eq!(state.enemies[1].hp, 82.0);
        assert_eq!(state.enemies[2].hp, 100.0);
        assert_eq!(p.pos, state.enemies[1].pos);
        assert_eq!(p.effects.chain.map(|c| c.remaining), Some(0));
        assert!(spent);
    }

    #[test]
    fn test_split_spawns_weaker_children() {
        let mut state = make_state(Character::Reimu);
        let a = Vec2::new(1000.0, 1000.0);
        spawn(&mut state, a, 100.0);
        let mut p = bullet(a, 10.0);
        p.effects.split = Some(Split { count: 3, spread: 1.0 });
        let mut spawned = Vec::new();
        let mut rng = SequenceRandom::new([0.5]);
        strike_enemies(&mut state, &mut p, &mut spawned, &mut rng);
        assert_eq!(spawned.len(), 3);
        for child in &spawned {
            assert_eq!(child.damage, 6.0);
            assert!(child.effects.split.is_none());
            assert!((child.vel.length() - 3.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_explosion_hits_neighbors() {
        let mut state = make_state(Character::Reimu);
        let a = Vec2::new(1000.0, 1000.0);
        spawn(&mut state, a, 100.0);
        spawn(&mut state, a + Vec2::new(50.0, 0.0), 100.0);
        spawn(&mut state, a + Vec2::new(300.0, 0.0), 100.0);
        let mut p = bullet(a, 10.0);
        p.effects.explosion = Some(Explosion { radius: 80.0, ratio: 0.5 });
        let mut rng = SequenceRandom::new([0.5]);
        strike_enemies(&mut state, &mut p, &mut Vec::new(), &mut rng);
        assert_eq!(state.enemies[0].hp, 85.0);
        assert_eq!(state.enemies[1].hp, 95.0);
        assert_eq!(state.enemies[2].hp, 100.0);
        assert!(state.shake.duration > 0.0);
    }

    #[test]
    fn test_status_payloads() {
        let mut state = make_state(Character::Reimu);
        let a = Vec2::new(1000.0, 1000.0);
        spawn(&mut state, a, 100.0);
        let mut p = bullet(a, 20.0);
        p.effects.burn = Some(DamageOverTime { duration: 120.0, ratio: 0.1 });
        p.effects.freeze = Some(120.0);
        let mut rng = SequenceRandom::new([0.5]);
        strike_enemies(&mut state, &mut p, &mut Vec::new(), &mut rng);
        let status = state.enemies[0].status;
        assert_eq!(status.burn.map(|b| b.damage), Some(2.0));
        assert_eq!(status.frozen, 120.0);
    }

    #[test]
    fn test_armor_and_invulnerability() {
        let mut state = make_state(Character::Yuma);
        let mut rng = SequenceRandom::new([0.5]);
        let hp = state.player.stats.hp;
        assert!(hurt_player(&mut state, 10.0, (0.0, 0.0), &mut rng));
        assert_eq!(state.player.stats.hp, hp - 7.0);
        assert_eq!(state.player.invuln, HIT_INVULN);
        assert!(!hurt_player(&mut state, 10.0, (0.0, 0.0), &mut rng));
        assert_eq!(state.player.stats.hp, hp - 7.0);
    }

    #[test]
    fn test_revive_clears_enemies() {
        let mut state = make_state(Character::Mokou);
        spawn(&mut state, Vec2::new(10.0, 10.0), 10.0);
        state.player.stats.hp = 1.0;
        let mut rng = SequenceRandom::new([0.5]);
        hurt_player(&mut state, 50.0, (0.0, 0.0), &mut rng);
        assert_eq!(state.player.stats.revivals, 0);
        assert_eq!(state.player.stats.hp, state.player.stats.max_hp);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.invuln, REVIVE_INVULN);
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn test_death_without_revives() {
        let mut state = make_state(Character::Reimu);
        state.player.stats.hp = 1.0;
        state.time = FPS * 60.0 * 3.0;
        let mut rng = SequenceRandom::new([0.5]);
        hurt_player(&mut state, 50.0, (0.0, 0.0), &mut rng);
        assert!(!state.player.alive);
        assert_eq!(state.player.stats.hp, 0.0);
        assert_eq!(state.phase, Phase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { minutes: 3 }));
    }
}
