//! Enemy update: death and culling, status effects, per-archetype AI,
//! boss danmaku patterns and contact damage

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use super::combat::hurt_player;
use super::projectile::Projectile;
use super::rng::RandomSource;
use super::state::{
    Affliction, BossKind, BossState, Burst, Enemy, EnemyAi, EnemyArchetype, GameEvent, Phase, SimulationState,
    Volley,
};
use crate::consts::*;
use crate::{normalize_or, on_interval, polar};

/// Screen shake from touching an enemy
const CONTACT_SHAKE: (f32, f32) = (10.0, 15.0);
/// Burn procs when `floor(time)` is a multiple of this
const BURN_PERIOD: u32 = 20;
/// Poison procs when `floor(time)` is a multiple of this
const POISON_PERIOD: u32 = 30;

/// Frames between the five slashes of Youmu's cross
const CROSS_STAGGER: f32 = 6.0;
/// Frames between Kaguya's rainbow rings
const RING_STAGGER: f32 = 12.0;
const RAINBOW: [u32; 5] = [0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff];
const CONFETTI: [u32; 5] = [0xff69b4, 0xffd700, 0x00ced1, 0xff1493, 0x7b68ee];

/// Fresh AI state for a newly spawned regular enemy
pub fn initial_ai(archetype: EnemyArchetype, rng: &mut dyn RandomSource) -> EnemyAi {
    match archetype {
        EnemyArchetype::Slime => EnemyAi::Slime {
            bounce_timer: rng.next_f32() * 60.0,
            jumping: false,
            airtime: 0,
        },
        EnemyArchetype::Elf => EnemyAi::Elf {
            shoot_timer: rng.next_f32() * 120.0,
        },
        EnemyArchetype::Fairy | EnemyArchetype::Ghost | EnemyArchetype::Boss => EnemyAi::Chase,
    }
}

/// Advance every enemy by one tick
pub fn update_enemies(state: &mut SimulationState, rng: &mut dyn RandomSource, dt: f32) {
    let pending = std::mem::take(&mut state.enemies).into_iter();
    let mut kept = Vec::with_capacity(pending.len());
    let mut bullets = Vec::new();
    let cull = state.tuning.enemy_cull_distance;

    for mut e in pending {
        if state.phase == Phase::GameOver {
            kept.push(e);
            continue;
        }

        if !e.is_alive() {
            state.add_gem(e.pos, e.exp);
            state.player.kills += 1;
            state.events.push(GameEvent::EnemyKilled {
                id: e.id,
                archetype: e.archetype,
                pos: e.pos,
            });
            if let EnemyAi::Boss(boss) = &e.ai {
                log::info!("{} defeated", boss.kind.name());
            }
            continue;
        }
        if e.pos.distance(state.player.pos) > cull {
            continue;
        }

        if e.status.frozen > 0.0 {
            e.status.frozen -= dt;
            kept.push(e);
            continue;
        }
        if e.status.stunned > 0.0 {
            e.status.stunned -= dt;
            kept.push(e);
            continue;
        }

        tick_afflictions(state, &mut e, dt);

        let player_pos = state.player.pos;
        let time = state.time;
        match e.ai {
            EnemyAi::Chase => chase(&mut e, player_pos, dt),
            EnemyAi::Slime { .. } => slime(&mut e, player_pos, dt),
            EnemyAi::Elf { .. } => elf(&mut e, player_pos, time, dt, &mut bullets),
            EnemyAi::Boss(_) => boss(&mut e, player_pos, time, dt, rng, &mut bullets),
        }

        let revivals = state.player.stats.revivals;
        if state.player.invuln <= 0.0 && e.pos.distance(state.player.pos) < e.radius + PLAYER_RADIUS {
            hurt_player(state, e.damage, CONTACT_SHAKE, rng);
        }
        if state.player.stats.revivals < revivals {
            // A revive wipes the field, including enemies not yet updated
            kept.clear();
            break;
        }
        kept.push(e);
    }

    state.enemies = kept;
    for bullet in bullets {
        state.add_projectile(bullet);
    }
}

fn tick_afflictions(state: &mut SimulationState, e: &mut Enemy, dt: f32) {
    let time = state.time;
    for (slot, period) in [(&mut e.status.burn, BURN_PERIOD), (&mut e.status.poison, POISON_PERIOD)] {
        let Some(affliction) = slot.as_mut() else {
            continue;
        };
        affliction.remaining -= dt;
        if on_interval(time, period) {
            let Affliction { damage, .. } = *affliction;
            e.hp = (e.hp - damage).min(e.max_hp);
            state.add_damage_number(e.pos, damage, false);
        }
        if affliction.remaining <= 0.0 {
            *slot = None;
        }
    }
}

fn clamp_speed(vel: Vec2, max: f32) -> Vec2 {
    if vel.length() > max { vel.normalize_or_zero() * max } else { vel }
}

fn chase(e: &mut Enemy, player: Vec2, dt: f32) {
    let to_player = player - e.pos;
    if to_player.length() > 0.0 {
        e.vel += normalize_or(to_player, Vec2::ZERO) * 0.1 * dt;
    }
    e.vel = clamp_speed(e.vel, e.speed);
    e.pos += e.vel * dt;
}

fn slime(e: &mut Enemy, player: Vec2, dt: f32) {
    let to_player = player - e.pos;
    let EnemyAi::Slime {
        bounce_timer,
        jumping,
        airtime,
    } = &mut e.ai
    else {
        return;
    };

    *bounce_timer -= dt;
    if *bounce_timer <= 0.0 {
        *bounce_timer = 60.0;
        *jumping = true;
        *airtime = 0;
        if to_player.length() > 0.0 {
            e.vel = normalize_or(to_player, Vec2::ZERO) * e.speed * 1.5;
        }
    }

    if *jumping {
        *airtime += 1;
        if *airtime >= 30 {
            *jumping = false;
            *airtime = 0;
            e.vel *= 0.5;
        }
    } else {
        e.vel *= 0.9;
    }
    e.pos += e.vel * dt;
}

fn elf(e: &mut Enemy, player: Vec2, time: f32, dt: f32, bullets: &mut Vec<Projectile>) {
    let to_player = player - e.pos;
    let dist = to_player.length();
    let dir = normalize_or(to_player, Vec2::ZERO);

    if dist > 350.0 {
        e.vel += dir * 0.05 * dt;
    } else if dist < 250.0 {
        e.vel -= dir * 0.05 * dt;
    }
    e.vel.y += (time * 0.05).sin() * 0.02 * dt;
    e.vel = clamp_speed(e.vel, e.speed * 0.7);
    e.pos += e.vel * dt;

    let EnemyAi::Elf { shoot_timer } = &mut e.ai else {
        return;
    };
    *shoot_timer -= dt;
    if *shoot_timer <= 0.0 && dist < 500.0 {
        *shoot_timer = 120.0;
        let aim = normalize_or(to_player, Vec2::X);
        bullets.push(Projectile::hostile(e.pos, aim * 6.0, e.damage * 0.5, 180.0, 9.0).color(0xff69b4));
    }
}

fn boss(e: &mut Enemy, player: Vec2, time: f32, dt: f32, rng: &mut dyn RandomSource, bullets: &mut Vec<Projectile>) {
    let to_player = player - e.pos;
    let dist = to_player.length();
    let dir = normalize_or(to_player, Vec2::ZERO);

    if dist > 500.0 {
        e.vel += dir * 0.08 * dt;
    } else if dist < 300.0 {
        e.vel -= dir * 0.08 * dt;
    } else {
        let circle = crate::angle_of(to_player) + FRAC_PI_2;
        e.vel += polar(circle, 0.05 * dt);
    }
    e.vel = clamp_speed(e.vel, e.speed);
    e.pos += e.vel * dt;

    let (pos, damage) = (e.pos, e.damage);
    let EnemyAi::Boss(state) = &mut e.ai else {
        return;
    };
    state.timer += dt;
    let aim = crate::angle_of(to_player);
    match state.kind {
        BossKind::Cirno => cirno(state, pos, damage, time, bullets),
        BossKind::Youmu => youmu(state, pos, damage, aim, bullets),
        BossKind::Kaguya => kaguya(state, pos, damage, rng, bullets),
    }
    release_bursts(state, pos, damage, dt, bullets);
}

fn enemy_bullet(pos: Vec2, angle: f32, speed: f32, damage: f32, duration: f32, radius: f32, color: u32) -> Projectile {
    Projectile::hostile(pos, polar(angle, speed), damage, duration, radius).color(color)
}

fn cirno(state: &mut BossState, pos: Vec2, damage: f32, time: f32, bullets: &mut Vec<Projectile>) {
    if state.pattern == 0 && state.timer >= 90.0 {
        // Ice ring
        for i in 0..16 {
            let angle = i as f32 / 16.0 * TAU;
            bullets.push(enemy_bullet(pos, angle, 4.0, damage * 0.6, 200.0, 10.0, 0x00ffff).sprite("ice"));
        }
        state.pattern = 1;
        state.timer = 0.0;
    } else if state.pattern == 1 && state.timer >= 60.0 {
        // Three-way spiral
        let base = (time * 0.05) % TAU;
        for i in 0..3 {
            let angle = base + i as f32 / 3.0 * TAU;
            bullets.push(enemy_bullet(pos, angle, 5.0, damage * 0.7, 180.0, 12.0, 0x87ceeb).sprite("ice"));
        }
        state.pattern = 0;
        state.timer = 0.0;
    }
}

fn youmu(state: &mut BossState, pos: Vec2, damage: f32, aim: f32, bullets: &mut Vec<Projectile>) {
    if state.pattern == 0 && state.timer >= 100.0 {
        // Sword fan
        for i in 0..9 {
            let angle = aim + (i as f32 - 4.0) * 0.2;
            bullets.push(enemy_bullet(pos, angle, 7.0, damage * 0.8, 150.0, 8.0, 0x90ee90).sprite("slash"));
        }
        state.pattern = 1;
        state.timer = 0.0;
    } else if state.pattern == 1 && state.timer >= 80.0 {
        for j in 0..5 {
            state.bursts.push(Burst {
                delay: j as f32 * CROSS_STAGGER,
                volley: Volley::Cross,
            });
        }
        state.pattern = 0;
        state.timer = 0.0;
    }
}

fn kaguya(state: &mut BossState, pos: Vec2, damage: f32, rng: &mut dyn RandomSource, bullets: &mut Vec<Projectile>) {
    if state.pattern == 0 && state.timer >= 120.0 {
        for ring in 0..5 {
            state.bursts.push(Burst {
                delay: ring as f32 * RING_STAGGER,
                volley: Volley::Ring(ring),
            });
        }
        state.pattern = 1;
        state.timer = 0.0;
    } else if state.pattern == 1 && state.timer >= 5.0 {
        // Bullet rain
        let angle = rng.next_f32() * TAU;
        let color = CONFETTI[rng.index(CONFETTI.len())];
        bullets.push(enemy_bullet(pos, angle, 6.0, damage * 0.5, 200.0, 10.0, color));
        state.timer = 0.0;
        if rng.chance(0.02) {
            state.pattern = 0;
        }
    }
}

/// Count down queued volleys and fire the ones that are due
fn release_bursts(state: &mut BossState, pos: Vec2, damage: f32, dt: f32, bullets: &mut Vec<Projectile>) {
    for burst in state.bursts.iter_mut() {
        burst.delay -= dt;
        if burst.delay > 0.0 {
            continue;
        }
        match burst.volley {
            Volley::Cross => {
                for k in 0..4 {
                    let angle = k as f32 * FRAC_PI_2;
                    bullets.push(
                        enemy_bullet(pos, angle, 8.0, damage * 0.9, 120.0, 15.0, 0x98fb98)
                            .knockback(5.0)
                            .sprite("slash"),
                    );
                }
            }
            Volley::Ring(ring) => {
                let speed = 3.0 + ring as f32 * 0.5;
                let color = RAINBOW[ring as usize % RAINBOW.len()];
                for i in 0..20 {
                    let angle = i as f32 / 20.0 * TAU + ring as f32 * 0.3;
                    bullets.push(enemy_bullet(pos, angle, speed, damage * 0.7, 250.0, 11.0, color));
                }
            }
        }
    }
    state.bursts.retain(|b| b.delay > 0.0);
}
