//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one step. The order of
//! the steps matters: later steps see the state earlier ones produced.

use glam::Vec2;

use super::collision::nearest_enemy;
use super::combat::{blast, enemy_bullet_hits_player, resolve_death, strike_enemies};
use super::enemy_ai::update_enemies;
use super::progression::update_gems;
use super::projectile::{Motion, Owner, Projectile, ProjectileKind};
use super::rng::RandomSource;
use super::spawner::spawn_enemies;
use super::state::{
    Affliction, DAMAGE_NUMBER_RISE, FOOTPRINT_INTERVAL, FOOTPRINT_LIFE, Footprint, Phase, SimulationState, TRAIL_LIFE,
    TrailPoint,
};
use crate::catalog::{PassiveSpecial, WeaponBehavior};
use crate::consts::*;
use crate::{angle_of, normalize_or, on_interval};

/// Intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Movement direction, any length. Zero means standing still.
    pub movement: Vec2,
    /// Start a dash toward this world point
    pub dash_target: Option<Vec2>,
}

// Dash tuning
const DASH_SPEED: f32 = 20.0;
const DASH_HIT_RADIUS: f32 = 60.0;
const DASH_KNOCKBACK: f32 = 15.0;
const DASH_BURN_FRAMES: f32 = 180.0;
const DASH_BURN_RATIO: f32 = 0.1;
const DASH_TRAIL_EVERY: f32 = 3.0;
const LANDING_RADIUS: f32 = 150.0;
const LANDING_SHAKE: (f32, f32) = (15.0, 20.0);

/// Regeneration runs when `floor(time)` hits a multiple of this
const REGEN_PERIOD: u32 = 60;
/// Frames a time-stop field keeps refreshing the freeze on enemies
const TIME_STOP_FREEZE: f32 = 10.0;

/// Advance the simulation by one fixed timestep.
///
/// Does nothing unless the phase is [`Phase::Playing`].
pub fn tick(state: &mut SimulationState, input: &TickInput, rng: &mut dyn RandomSource) {
    if state.phase != Phase::Playing {
        return;
    }
    let dt = state.tuning.time_scale;

    state.time += dt;
    decay_shake(state, dt, rng);

    state.camera.follow(state.player.pos);

    move_player(state, input, dt);
    update_dash(state, input, dt);
    regenerate(state);

    spawn_enemies(state, rng, dt);
    fire_weapons(state, dt, rng);
    update_projectiles(state, dt, rng);
    decay_cosmetics(state, dt);

    update_enemies(state, rng, dt);
    update_gems(state, dt);

    enforce_caps(state);
}

// --- PRESENTATION ---

fn decay_shake(state: &mut SimulationState, dt: f32, rng: &mut dyn RandomSource) {
    let shake = &mut state.shake;
    if shake.duration <= 0.0 {
        return;
    }
    shake.duration -= dt;
    if shake.duration <= 0.0 {
        shake.duration = 0.0;
        shake.intensity = 0.0;
        shake.offset = Vec2::ZERO;
        return;
    }
    let i = shake.intensity;
    shake.offset = Vec2::new(rng.range(-i, i), rng.range(-i, i));
}

fn decay_cosmetics(state: &mut SimulationState, dt: f32) {
    for n in state.damage_numbers.iter_mut() {
        n.life -= dt;
        n.pos.y -= DAMAGE_NUMBER_RISE * dt;
    }
    state.damage_numbers.retain(|n| n.life > 0.0);

    for f in state.footprints.iter_mut() {
        f.life -= dt;
    }
    state.footprints.retain(|f| f.life > 0.0);

    for t in state.trails.iter_mut() {
        t.life -= dt;
    }
    state.trails.retain(|t| t.life > 0.0);
}

// --- PLAYER ---

fn move_player(state: &mut SimulationState, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    player.invuln = (player.invuln - dt).max(0.0);
    if player.dash.is_dashing() {
        return;
    }

    let dir = normalize_or(input.movement, Vec2::ZERO);
    if dir == Vec2::ZERO {
        return;
    }
    player.pos += dir * player.stats.speed * dt;
    player.facing = dir;
    player.clamp_to_map();

    if on_interval(state.time, FOOTPRINT_INTERVAL) {
        state.footprints.push(Footprint {
            pos: state.player.pos,
            angle: angle_of(dir),
            life: FOOTPRINT_LIFE,
        });
    }
}

/// Trigger, move and resolve the active-skill dash
fn update_dash(state: &mut SimulationState, input: &TickInput, dt: f32) {
    let Some(kick) = state
        .player
        .weapons
        .iter()
        .find(|w| w.def.behavior == WeaponBehavior::Dash)
        .cloned()
    else {
        return;
    };

    let dash = &mut state.player.dash;
    dash.cooldown = (dash.cooldown - dt).max(0.0);
    if let Some(target) = input.dash_target {
        if dash.cooldown <= 0.0 && !dash.is_dashing() {
            let target = target.clamp(
                Vec2::splat(MAP_MARGIN),
                Vec2::new(MAP_WIDTH - MAP_MARGIN, MAP_HEIGHT - MAP_MARGIN),
            );
            dash.target = Some(target);
            dash.cooldown = kick.cooldown_max;
            dash.trail_timer = 0.0;
            log::debug!("Dash toward ({:.0}, {:.0})", target.x, target.y);
        }
    }
    let Some(target) = dash.target else {
        return;
    };

    let fast = kick.has_upgrade("kick_speed");
    let speed = if fast { DASH_SPEED * 3.0 } else { DASH_SPEED };
    // Trail and landing scale off the unboosted damage
    let base = kick.base_damage * state.player.stats.might;
    let damage = base * if fast { 2.0 } else { 1.0 };

    let to_target = target - state.player.pos;
    if to_target.length() <= speed * dt * 2.0 {
        // Landing tick: no path damage
        state.player.pos = target;
        state.player.clamp_to_map();
        state.player.dash.target = None;
        if kick.has_upgrade("kick_explosion") {
            let pos = state.player.pos;
            blast(state, pos, LANDING_RADIUS, base * 0.5);
            state.shake.trigger(LANDING_SHAKE.0, LANDING_SHAKE.1);
        }
        return;
    }
    state.player.facing = normalize_or(to_target, state.player.facing);
    state.player.pos += state.player.facing * speed * dt;
    state.player.clamp_to_map();
    let pos = state.player.pos;

    if kick.has_upgrade("kick_trail") {
        state.player.dash.trail_timer += dt;
        if state.player.dash.trail_timer >= DASH_TRAIL_EVERY {
            state.player.dash.trail_timer = 0.0;
            let hazard = Projectile::new(pos, Vec2::ZERO, base * 0.3, 60.0, 30.0)
                .pierce(999)
                .knockback(0.0)
                .color(0xff4500);
            state.add_projectile(hazard);
        }
    }

    // Everything along the path takes damage each tick
    let burn = kick.has_upgrade("kick_burn");
    let mut hits = Vec::new();
    let mut killed = false;
    for e in state.enemies.iter_mut() {
        if !e.is_alive() || e.pos.distance(pos) >= DASH_HIT_RADIUS {
            continue;
        }
        e.take_damage(damage);
        e.vel += normalize_or(e.pos - pos, state.player.facing) * DASH_KNOCKBACK;
        if burn {
            e.status.burn = Some(Affliction {
                remaining: DASH_BURN_FRAMES,
                damage: damage * DASH_BURN_RATIO,
            });
        }
        killed |= !e.is_alive();
        hits.push(e.pos);
    }
    for hit in hits {
        state.add_damage_number(hit, damage, false);
    }
    if killed && kick.has_upgrade("kick_reset") {
        state.player.dash.cooldown = 0.0;
    }
    if kick.has_upgrade("kick_invuln") {
        state.player.invuln = state.player.invuln.max(5.0);
    }
}

fn regenerate(state: &mut SimulationState) {
    if !on_interval(state.time, REGEN_PERIOD) {
        return;
    }
    let stats = &mut state.player.stats;
    if stats.hp > 0.0 && stats.hp < stats.max_hp {
        stats.hp = (stats.hp + stats.recovery).min(stats.max_hp);
        if stats.hp <= 0.0 {
            resolve_death(state);
        }
    }
}

// --- WEAPONS ---

fn fire_weapons(state: &mut SimulationState, dt: f32, rng: &mut dyn RandomSource) {
    let origin = state.player.pos;
    let radius = state.tuning.aim_radius;
    let target = nearest_enemy(&state.enemies, origin, radius).map(|i| state.enemies[i].pos);
    let targets: Vec<Vec2> = state
        .enemies
        .iter()
        .filter(|e| e.is_alive() && e.pos.distance(origin) < radius)
        .map(|e| e.pos)
        .collect();
    let aim = target.map_or(state.player.facing, |t| normalize_or(t - origin, state.player.facing));
    let specials: Vec<PassiveSpecial> = state.player.specials().collect();
    let stats = state.player.stats;
    let time = state.time;

    let mut volley = Vec::new();
    for weapon in state.player.weapons.iter_mut() {
        weapon.cooldown_timer -= dt;
        if weapon.cooldown_timer > 0.0 {
            continue;
        }
        if weapon.def.needs_target() && target.is_none() {
            weapon.cooldown_timer = 0.0;
            continue;
        }
        let mut shots = weapon.fire(origin, aim, &stats, time, &targets, rng);
        for shot in shots.iter_mut() {
            apply_specials(shot, &specials);
        }
        weapon.cooldown_timer = weapon.cooldown_reset(&stats);
        log::trace!("{} fired {} projectiles", weapon.id(), shots.len());
        volley.extend(shots);
    }
    for p in volley {
        state.add_projectile(p);
    }
}

fn apply_specials(p: &mut Projectile, specials: &[PassiveSpecial]) {
    for special in specials {
        match *special {
            PassiveSpecial::SealedShots {
                duration_mult,
                extra_penetration,
            } => {
                p.duration *= duration_mult;
                p.max_duration *= duration_mult;
                p.penetration += extra_penetration;
            }
            PassiveSpecial::ShotExplosion { radius, ratio } => {
                if p.effects.explosion.is_none() {
                    *p = p.clone().explode(radius, ratio);
                }
            }
            PassiveSpecial::ExpBoost(_) | PassiveSpecial::Dodge(_) | PassiveSpecial::Lifesteal(_) => {}
        }
    }
}

// --- PROJECTILES ---

fn update_projectiles(state: &mut SimulationState, dt: f32, rng: &mut dyn RandomSource) {
    let mut projectiles = std::mem::take(&mut state.projectiles);
    let mut spawned = Vec::new();
    let bounces_small = state.player.character.bounces_small_projectiles();

    projectiles.retain_mut(|p| {
        p.duration -= dt;
        move_projectile(state, p, dt);
        if bounces_small && p.owner == Owner::Player && p.radius < 10.0 {
            bounce_off_screen(state, p);
        }
        if p.duration <= 0.0 {
            return false;
        }
        if state.phase == Phase::GameOver {
            return true;
        }

        match p.kind {
            ProjectileKind::TimeStop { radius } => {
                let center = state.player.pos;
                for e in state.enemies.iter_mut() {
                    if e.pos.distance(center) < radius {
                        e.status.frozen = e.status.frozen.max(TIME_STOP_FREEZE);
                    }
                }
                return true;
            }
            ProjectileKind::BlackHole { pull_radius, strength } => {
                for e in state.enemies.iter_mut() {
                    if e.is_alive() && e.pos.distance(p.pos) < pull_radius {
                        e.pos += (p.pos - e.pos) * strength * dt;
                    }
                }
            }
            ProjectileKind::Bullet | ProjectileKind::Laser { .. } => {}
        }

        match p.owner {
            Owner::Enemy => !enemy_bullet_hits_player(state, p, rng),
            Owner::Player => !strike_enemies(state, p, &mut spawned, rng),
        }
    });

    state.projectiles = projectiles;
    for child in spawned {
        state.add_projectile(child);
    }
}

fn move_projectile(state: &mut SimulationState, p: &mut Projectile, dt: f32) {
    let player = state.player.pos;
    match p.motion {
        Motion::Orbit { radius, angle, speed } => {
            let angle = angle + speed * dt;
            p.motion = Motion::Orbit { radius, angle, speed };
            p.pos = player + crate::polar(angle, radius * state.player.stats.area);
        }
        Motion::Returning => {
            if p.progress() > 0.5 {
                let speed = p.vel.length();
                p.vel = normalize_or(player - p.pos, p.vel.normalize_or_zero()) * speed;
            }
            p.pos += p.vel * dt;
        }
        Motion::Homing { strength } => {
            if let Some(i) = nearest_enemy(&state.enemies, p.pos, state.tuning.aim_radius) {
                let speed = p.vel.length();
                let desired = normalize_or(state.enemies[i].pos - p.pos, p.vel.normalize_or_zero()) * speed;
                let turned = p.vel.lerp(desired, (strength * dt).min(1.0));
                p.vel = normalize_or(turned, p.vel.normalize_or_zero()) * speed;
            }
            p.pos += p.vel * dt;
            state.trails.push(TrailPoint {
                pos: p.pos,
                color: p.color,
                life: TRAIL_LIFE,
            });
        }
        Motion::Linear => p.pos += p.vel * dt,
    }
}

/// Reflect small projectiles off the edges of the visible area
fn bounce_off_screen(state: &SimulationState, p: &mut Projectile) {
    let min = state.camera.pos;
    let max = min + Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    if p.pos.x < min.x || p.pos.x > max.x {
        p.vel.x = -p.vel.x;
        p.pos.x = p.pos.x.clamp(min.x, max.x);
    }
    if p.pos.y < min.y || p.pos.y > max.y {
        p.vel.y = -p.vel.y;
        p.pos.y = p.pos.y.clamp(min.y, max.y);
    }
}

// --- POPULATION CAPS ---

/// Drop the oldest entries beyond `cap`
fn truncate_oldest<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
}

fn enforce_caps(state: &mut SimulationState) {
    let caps = state.tuning.caps;
    truncate_oldest(&mut state.enemies, caps.enemies);
    truncate_oldest(&mut state.projectiles, caps.projectiles);
    truncate_oldest(&mut state.damage_numbers, caps.damage_numbers);
    truncate_oldest(&mut state.footprints, caps.footprints);
    truncate_oldest(&mut state.trails, caps.trails);

    if state.gems.len() > caps.gems {
        let center = state.player.pos;
        state
            .gems
            .sort_by(|a, b| a.pos.distance_squared(center).total_cmp(&b.pos.distance_squared(center)));
        state.gems.truncate(caps.gems);
        state.gems.sort_by_key(|g| g.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Character;
    use crate::sim::rng::SequenceRandom;
    use crate::sim::state::{Enemy, EnemyAi, EnemyArchetype};
    use crate::sim::weapon::Weapon;
    use crate::tuning::{EnemyTemplate, Tuning};

    fn make_state(character: Character) -> SimulationState {
        let mut tuning = Tuning::default();
        // Keep the field empty unless a test adds enemies
        tuning.waves.clear();
        tuning.bosses.clear();
        let mut state = SimulationState::new(character, tuning);
        state.player.stats.crit_rate = 0.0;
        state
    }

    fn add_enemy(state: &mut SimulationState, offset: Vec2, hp: f32) -> u32 {
        let template = EnemyTemplate {
            archetype: EnemyArchetype::Fairy,
            hp,
            damage: 5.0,
            speed: 0.0,
            exp: 2,
            color: 0,
        };
        let id = state.next_entity_id();
        let pos = state.player.pos + offset;
        state.enemies.push(Enemy::from_template(id, pos, &template, EnemyAi::Chase));
        id
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_paused_phases_do_not_advance() {
        let mut state = make_state(Character::Reimu);
        let mut rng = SequenceRandom::new([0.5]);
        for phase in [Phase::AwaitingUpgrade, Phase::GameOver] {
            state.phase = phase;
            tick(&mut state, &idle(), &mut rng);
            assert_eq!(state.time, 0.0);
            assert!(state.projectiles.is_empty());
        }
    }

    #[test]
    fn test_time_advances_by_time_scale() {
        let mut state = make_state(Character::Reimu);
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        tick(&mut state, &idle(), &mut rng);
        assert_eq!(state.time, 4.0);
    }

    #[test]
    fn test_movement_is_normalized() {
        let mut state = make_state(Character::Reimu);
        let start = state.player.pos;
        let mut rng = SequenceRandom::new([0.5]);
        let input = TickInput {
            movement: Vec2::new(10.0, 0.0),
            dash_target: None,
        };
        tick(&mut state, &input, &mut rng);
        assert!((state.player.pos.x - start.x - 3.5 * 2.0).abs() < 1e-3);
        assert_eq!(state.player.facing, Vec2::X);

        let input = TickInput {
            movement: Vec2::new(0.0, -1.0),
            dash_target: None,
        };
        tick(&mut state, &input, &mut rng);
        assert_eq!(state.player.facing, Vec2::NEG_Y);

        tick(&mut state, &idle(), &mut rng);
        assert_eq!(state.player.facing, Vec2::NEG_Y);
    }

    #[test]
    fn test_player_stays_on_map() {
        let mut state = make_state(Character::Marisa);
        state.player.pos = Vec2::new(12.0, 12.0);
        let mut rng = SequenceRandom::new([0.5]);
        let input = TickInput {
            movement: Vec2::new(-1.0, -1.0),
            dash_target: None,
        };
        for _ in 0..5 {
            tick(&mut state, &input, &mut rng);
        }
        assert_eq!(state.player.pos, Vec2::splat(MAP_MARGIN));
    }

    #[test]
    fn test_weapon_fires_and_resets_cooldown() {
        let mut state = make_state(Character::Reimu);
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        assert_eq!(state.projectiles.len(), 3);
        let w = &state.player.weapons[0];
        assert!((w.cooldown_timer - w.cooldown_max).abs() < 1e-4);
        tick(&mut state, &idle(), &mut rng);
        assert_eq!(state.projectiles.len(), 3);
    }

    #[test]
    fn test_target_only_weapon_holds_fire() {
        let mut state = make_state(Character::Reimu);
        state.player.weapons = vec![Weapon::from_id("whip").unwrap()];
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        assert!(state.projectiles.is_empty());
        assert!(state.player.weapons[0].cooldown_timer >= -2.0);

        add_enemy(&mut state, Vec2::new(100.0, 0.0), 1000.0);
        tick(&mut state, &idle(), &mut rng);
        assert!(!state.projectiles.is_empty());
    }

    #[test]
    fn test_aim_follows_nearest_enemy() {
        let mut state = make_state(Character::Mokou);
        add_enemy(&mut state, Vec2::new(0.0, 300.0), 1000.0);
        add_enemy(&mut state, Vec2::new(0.0, -500.0), 1000.0);
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        let bird = &state.projectiles[0];
        assert!(bird.vel.y > 0.0);
        assert!(bird.vel.x.abs() < 1e-3);
    }

    #[test]
    fn test_orbitals_follow_player() {
        let mut state = make_state(Character::Mokou);
        state.player.weapons = vec![Weapon::from_id("dolls").unwrap()];
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        let input = TickInput {
            movement: Vec2::X,
            dash_target: None,
        };
        for _ in 0..10 {
            tick(&mut state, &input, &mut rng);
        }
        let center = state.player.pos;
        for p in &state.projectiles {
            let r = p.pos.distance(center);
            assert!(r > 1.0 && r < 200.0, "orbital drifted to {r}");
        }
    }

    #[test]
    fn test_time_stop_freezes_nearby_enemies() {
        let mut state = make_state(Character::Sakuya);
        state.player.weapons = vec![Weapon::from_id("time_stop").unwrap()];
        add_enemy(&mut state, Vec2::new(400.0, 0.0), 100.0);
        add_enemy(&mut state, Vec2::new(1500.0, 0.0), 100.0);
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        assert!(state.enemies[0].status.frozen > 0.0);
        assert_eq!(state.enemies[1].status.frozen, 0.0);
        assert_eq!(state.enemies[0].hp, 100.0);
    }

    #[test]
    fn test_enemy_killed_by_projectile_drops_gem() {
        let mut state = make_state(Character::Mokou);
        add_enemy(&mut state, Vec2::new(40.0, 0.0), 1.0);
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.kills, 1);
    }

    #[test]
    fn test_negative_recovery_drains() {
        let mut state = make_state(Character::Mokou);
        state.player.weapons.clear();
        state.player.stats.hp = 100.0;
        state.time = 58.0;
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        assert_eq!(state.player.stats.hp, 99.5);
    }

    #[test]
    fn test_dash_moves_and_damages() {
        let mut state = make_state(Character::Mokou);
        state.player.weapons = vec![Weapon::from_id("kick").unwrap()];
        state.player.weapons[0].cooldown_timer = 1000.0;
        let target = state.player.pos + Vec2::new(400.0, 0.0);
        add_enemy(&mut state, Vec2::new(200.0, 0.0), 1000.0);
        let mut rng = SequenceRandom::new([0.5]);
        let input = TickInput {
            movement: Vec2::ZERO,
            dash_target: Some(target),
        };
        tick(&mut state, &input, &mut rng);
        assert!(state.player.dash.is_dashing());
        assert_eq!(state.player.dash.cooldown, 180.0);
        for _ in 0..20 {
            tick(&mut state, &idle(), &mut rng);
        }
        assert!(!state.player.dash.is_dashing());
        assert_eq!(state.player.pos, target);
        assert!(state.enemies[0].hp < 1000.0);
    }

    fn make_kicker(upgrades: &[&'static str]) -> SimulationState {
        let mut state = make_state(Character::Mokou);
        let mut kick = Weapon::from_id("kick").unwrap();
        kick.upgrades = upgrades.to_vec();
        // Keep the kick's own volley out of the way
        kick.cooldown_timer = 1000.0;
        state.player.weapons = vec![kick];
        state
    }

    fn dash_toward(state: &SimulationState, offset: Vec2) -> TickInput {
        TickInput {
            movement: Vec2::ZERO,
            dash_target: Some(state.player.pos + offset),
        }
    }

    fn kick_base(state: &SimulationState) -> f32 {
        state.player.weapons[0].base_damage * state.player.stats.might
    }

    #[test]
    fn test_kick_trail_uses_unboosted_damage() {
        let mut state = make_kicker(&["kick_speed", "kick_trail"]);
        let input = dash_toward(&state, Vec2::new(1500.0, 0.0));
        update_dash(&mut state, &input, 2.0);
        assert!(state.projectiles.is_empty());
        update_dash(&mut state, &idle(), 2.0);
        assert_eq!(state.projectiles.len(), 1);
        let hazard = &state.projectiles[0];
        assert_eq!(hazard.damage, kick_base(&state) * 0.3);
        assert_eq!(hazard.penetration, 999);
        assert_eq!(hazard.vel, Vec2::ZERO);
    }

    #[test]
    fn test_kick_explosion_on_landing_only() {
        let mut state = make_kicker(&["kick_speed", "kick_explosion", "kick_invuln"]);
        // Inside the landing threshold: lands on the trigger tick
        let near_start = add_enemy(&mut state, Vec2::new(0.0, 30.0), 1000.0);
        let near_landing = add_enemy(&mut state, Vec2::new(300.0, 0.0), 1000.0);
        let input = dash_toward(&state, Vec2::new(200.0, 0.0));
        let start = state.player.pos;
        update_dash(&mut state, &input, 2.0);

        assert!(!state.player.dash.is_dashing());
        assert_eq!(state.player.pos, start + Vec2::new(200.0, 0.0));
        let hp = |id: u32| state.enemies.iter().find(|e| e.id == id).map(|e| e.hp);
        assert_eq!(hp(near_start), Some(1000.0));
        assert_eq!(hp(near_landing), Some(1000.0 - kick_base(&state) * 0.5));
        assert_eq!(state.shake.duration, 20.0);
        // No path resolution on the landing tick
        assert_eq!(state.player.invuln, 0.0);
    }

    #[test]
    fn test_kick_invuln_while_flying() {
        let mut state = make_kicker(&["kick_invuln"]);
        let input = dash_toward(&state, Vec2::new(1000.0, 0.0));
        update_dash(&mut state, &input, 2.0);
        assert!(state.player.dash.is_dashing());
        assert_eq!(state.player.invuln, 5.0);
    }

    #[test]
    fn test_kick_burn_sets_affliction() {
        let mut state = make_kicker(&["kick_burn"]);
        add_enemy(&mut state, Vec2::new(40.0, 0.0), 1000.0);
        let input = dash_toward(&state, Vec2::new(1000.0, 0.0));
        update_dash(&mut state, &input, 2.0);
        let base = kick_base(&state);
        let e = &state.enemies[0];
        assert_eq!(e.hp, 1000.0 - base);
        assert_eq!(
            e.status.burn,
            Some(Affliction {
                remaining: 180.0,
                damage: base * 0.1,
            })
        );
        assert_eq!(e.vel, Vec2::new(15.0, 0.0));
    }

    #[test]
    fn test_kick_reset_on_kill() {
        let mut state = make_kicker(&["kick_reset"]);
        add_enemy(&mut state, Vec2::new(40.0, 0.0), 10.0);
        let input = dash_toward(&state, Vec2::new(1000.0, 0.0));
        update_dash(&mut state, &input, 2.0);
        assert!(!state.enemies[0].is_alive());
        assert_eq!(state.player.dash.cooldown, 0.0);
        assert!(state.player.dash.is_dashing());

        let mut plain = make_kicker(&[]);
        add_enemy(&mut plain, Vec2::new(40.0, 0.0), 10.0);
        let input = dash_toward(&plain, Vec2::new(1000.0, 0.0));
        update_dash(&mut plain, &input, 2.0);
        assert!(!plain.enemies[0].is_alive());
        assert_eq!(plain.player.dash.cooldown, 180.0);
    }

    #[test]
    fn test_dash_needs_dash_weapon() {
        let mut state = make_state(Character::Reimu);
        let mut rng = SequenceRandom::new([0.5]);
        let input = TickInput {
            movement: Vec2::ZERO,
            dash_target: Some(state.player.pos + Vec2::X * 300.0),
        };
        tick(&mut state, &input, &mut rng);
        assert!(!state.player.dash.is_dashing());
    }

    #[test]
    fn test_caps_truncate() {
        let mut state = make_state(Character::Reimu);
        state.player.weapons.clear();
        state.tuning.caps.enemies = 3;
        state.tuning.caps.gems = 2;
        for i in 0..5 {
            add_enemy(&mut state, Vec2::new(300.0 + i as f32, 0.0), 10.0);
        }
        let center = state.player.pos;
        state.add_gem(center + Vec2::new(1000.0, 0.0), 1);
        state.add_gem(center + Vec2::new(500.0, 0.0), 1);
        state.add_gem(center + Vec2::new(700.0, 0.0), 1);
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        assert_eq!(state.enemies.len(), 3);
        assert!(state.enemies.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(state.gems.len(), 2);
        assert!(state.gems.iter().all(|g| g.pos.distance(center) < 900.0));
    }

    #[test]
    fn test_homing_turns_toward_enemy() {
        let mut state = make_state(Character::Reimu);
        state.player.weapons.clear();
        add_enemy(&mut state, Vec2::new(0.0, 300.0), 1000.0);
        let p = Projectile::new(state.player.pos, Vec2::new(5.0, 0.0), 1.0, 100.0, 5.0).homing(0.1);
        state.add_projectile(p);
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        let vel = state.projectiles[0].vel;
        assert!(vel.y > 0.0);
        assert!((vel.length() - 5.0).abs() < 1e-3);
        assert!(!state.trails.is_empty());
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut state = make_state(Character::Marisa);
        state.player.weapons.clear();
        let bullet = Projectile::hostile(state.player.pos, Vec2::ZERO, 10.0, 100.0, 5.0);
        state.add_projectile(bullet);
        let mut rng = SequenceRandom::new([0.5]);
        tick(&mut state, &idle(), &mut rng);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.player.stats.hp, 70.0);
        assert!(state.player.invuln > 0.0);
    }
}
