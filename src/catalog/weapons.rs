//! Weapon definitions and firing behaviors
//!
//! Every weapon exposes a pure firing function. It takes where the player
//! stands, which way to shoot and how hard, and returns fresh projectiles.
//! The tick owns everything that happens to them afterwards.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::catalog::Character;
use crate::polar;
use crate::sim::projectile::{Projectile, ProjectileKind};
use crate::sim::rng::RandomSource;

/// How the tick interprets a weapon's projectiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponBehavior {
    Projectile,
    Aura,
    Orbital,
    Laser,
    /// Drives the active skill; the fired hitbox is secondary
    Dash,
    Special,
}

/// Inputs to a firing function
#[derive(Debug, Clone, Copy)]
pub struct FireContext {
    /// Player position
    pub origin: Vec2,
    /// Unit aim direction: toward the nearest enemy, else the facing
    pub aim: Vec2,
    /// Per-projectile damage, already scaled by might
    pub damage: f32,
    /// Simulated frames since the run began
    pub time: f32,
}

impl FireContext {
    /// Direction perpendicular to the aim (aim rotated +90°)
    pub fn side(&self) -> Vec2 {
        self.aim.perp()
    }

    /// Aim angle in radians
    pub fn aim_angle(&self) -> f32 {
        crate::angle_of(self.aim)
    }

    fn shot(&self, pos: Vec2, vel: Vec2, duration: f32, radius: f32) -> Projectile {
        Projectile::new(pos, vel, self.damage, duration, radius)
    }
}

pub type FireFn = fn(&FireContext, &mut dyn RandomSource) -> Vec<Projectile>;

/// Static weapon definition
#[derive(Clone, Copy)]
pub struct WeaponDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub behavior: WeaponBehavior,
    pub max_level: u32,
    /// Frames between shots before the cooldown stat applies
    pub cooldown: f32,
    pub base_damage: f32,
    pub exclusive_to: Option<Character>,
    pub evolves_into: Option<&'static str>,
    pub fire: FireFn,
}

impl std::fmt::Debug for WeaponDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeaponDef")
            .field("id", &self.id)
            .field("behavior", &self.behavior)
            .field("max_level", &self.max_level)
            .field("cooldown", &self.cooldown)
            .field("base_damage", &self.base_damage)
            .finish_non_exhaustive()
    }
}

impl WeaponDef {
    /// Whether `character` may ever own this weapon
    pub fn available_to(&self, character: Character) -> bool {
        self.exclusive_to.is_none_or(|owner| owner == character)
    }

    pub fn is_evolved(&self) -> bool {
        self.id.ends_with("_evolved")
    }

    /// Holds fire until an enemy is inside the aim radius
    pub fn needs_target(&self) -> bool {
        matches!(
            self.id,
            "whip" | "whip_evolved" | "kappa_missile" | "kappa_missile_evolved"
        )
    }
}

/// Base weapons level to 8 and then evolve
pub const BASE_MAX_LEVEL: u32 = 8;
/// Evolved weapons keep leveling for the rest of the run
pub const EVOLVED_MAX_LEVEL: u32 = 99;
/// Cooldown for weapons that fire once and persist
const ONCE: f32 = 99999.0;

#[allow(clippy::too_many_arguments)]
const fn base(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    behavior: WeaponBehavior,
    cooldown: f32,
    base_damage: f32,
    exclusive_to: Option<Character>,
    evolves_into: &'static str,
    fire: FireFn,
) -> WeaponDef {
    WeaponDef {
        id,
        name,
        description,
        behavior,
        max_level: BASE_MAX_LEVEL,
        cooldown,
        base_damage,
        exclusive_to,
        evolves_into: Some(evolves_into),
        fire,
    }
}

#[allow(clippy::too_many_arguments)]
const fn evolved(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    behavior: WeaponBehavior,
    cooldown: f32,
    base_damage: f32,
    exclusive_to: Option<Character>,
    fire: FireFn,
) -> WeaponDef {
    WeaponDef {
        id,
        name,
        description,
        behavior,
        max_level: EVOLVED_MAX_LEVEL,
        cooldown,
        base_damage,
        exclusive_to,
        evolves_into: None,
        fire,
    }
}

use Character::*;
use WeaponBehavior as B;

pub static WEAPONS: &[WeaponDef] = &[
    // Reimu
    base("homing_amulet", "Fantasy Seal: Scatter", "Fires a spread of homing amulets.", B::Projectile, 60.0, 12.0, Some(Reimu), "homing_amulet_evolved", fire_homing_amulet),
    evolved("homing_amulet_evolved", "Fantasy Seal: Blink", "Five strong piercing amulets.", B::Projectile, 50.0, 20.0, Some(Reimu), fire_homing_amulet_evolved),
    base("yin_yang_orb", "Great Yin-Yang Orb", "Hurls a huge orb that plows through enemies.", B::Projectile, 100.0, 40.0, Some(Reimu), "yin_yang_orb_evolved", fire_yin_yang_orb),
    evolved("yin_yang_orb_evolved", "Yin-Yang Sign", "Twin orbs that never stop.", B::Projectile, 80.0, 60.0, Some(Reimu), fire_yin_yang_orb_evolved),
    base("boundary", "Double Barrier", "A barrier that repels enemies.", B::Aura, 120.0, 5.0, Some(Reimu), "boundary_evolved", fire_boundary),
    evolved("boundary_evolved", "Great Hakurei Barrier", "A wider barrier that mends its caster.", B::Aura, 100.0, 10.0, Some(Reimu), fire_boundary_evolved),
    // Mokou
    base("fire_bird", "Fire Bird", "Launches a piercing phoenix.", B::Projectile, 80.0, 20.0, Some(Mokou), "fire_bird_evolved", fire_fire_bird),
    evolved("fire_bird_evolved", "Phoenix Rebirth", "An unstoppable phoenix.", B::Projectile, 60.0, 35.0, Some(Mokou), fire_fire_bird_evolved),
    base("kick", "Flying Phoenix Kick", "Dash forward as a fireball.", B::Dash, 180.0, 50.0, Some(Mokou), "kick_evolved", fire_kick),
    evolved("kick_evolved", "Fujiyama Volcano", "A blazing dash with a huge hitbox.", B::Dash, 150.0, 80.0, Some(Mokou), fire_kick_evolved),
    base("dolls", "Hourai Dolls", "Dolls circle their owner.", B::Orbital, ONCE, 15.0, Some(Mokou), "dolls_evolved", fire_dolls),
    evolved("dolls_evolved", "Hourai Elixir Dolls", "A faster, wider ring of dolls.", B::Orbital, ONCE, 25.0, Some(Mokou), fire_dolls_evolved),
    // Marisa
    base("star_dust", "Stardust Reverie", "A fan of stars.", B::Projectile, 30.0, 10.0, Some(Marisa), "star_dust_evolved", fire_star_dust),
    evolved("star_dust_evolved", "Milky Way", "A dense wall of stars.", B::Projectile, 25.0, 15.0, Some(Marisa), fire_star_dust_evolved),
    base("laser", "Master Spark", "A devastating straight beam.", B::Laser, 300.0, 100.0, Some(Marisa), "laser_evolved", fire_laser),
    evolved("laser_evolved", "Final Spark", "A wider, longer beam.", B::Laser, 250.0, 150.0, Some(Marisa), fire_laser_evolved),
    base("orreries", "Orreries Sun", "Elemental orbs in orbit.", B::Orbital, ONCE, 12.0, Some(Marisa), "orreries_evolved", fire_orreries),
    evolved("orreries_evolved", "Orreries Universe", "Six orbs on a wide orbit.", B::Orbital, ONCE, 18.0, Some(Marisa), fire_orreries_evolved),
    // Sakuya
    base("knives", "Illusion Knives", "Knives that ricochet off the screen edge.", B::Projectile, 40.0, 15.0, Some(Sakuya), "knives_evolved", fire_knives),
    evolved("knives_evolved", "Killing Doll", "Knives in all four directions.", B::Projectile, 30.0, 25.0, Some(Sakuya), fire_knives_evolved),
    base("time_stop", "The World", "Freezes every enemy on screen.", B::Special, 600.0, 0.0, Some(Sakuya), "time_stop_evolved", fire_time_stop),
    evolved("time_stop_evolved", "Sakuya's World", "A longer stopped moment.", B::Special, 500.0, 0.0, Some(Sakuya), fire_time_stop_evolved),
    base("checkmate", "Checkmate", "A ring of knives flung outward.", B::Projectile, 120.0, 20.0, Some(Sakuya), "checkmate_evolved", fire_checkmate),
    evolved("checkmate_evolved", "Inescapable Checkmate", "A double ring of knives.", B::Projectile, 100.0, 30.0, Some(Sakuya), fire_checkmate_evolved),
    // Yuma
    base("spoon", "All-Devouring Spoon", "A giant spoon that flies back.", B::Projectile, 80.0, 30.0, Some(Yuma), "spoon_evolved", fire_spoon),
    evolved("spoon_evolved", "Bottomless Spoon", "A bigger spoon that feeds its owner.", B::Projectile, 70.0, 50.0, Some(Yuma), fire_spoon_evolved),
    base("fangs", "Greedy Fangs", "A close-range bite.", B::Projectile, 50.0, 50.0, Some(Yuma), "fangs_evolved", fire_fangs),
    evolved("fangs_evolved", "Taotie's Maw", "A wider, lingering bite.", B::Projectile, 40.0, 80.0, Some(Yuma), fire_fangs_evolved),
    base("black_hole", "Gluttonous Black Hole", "Pulls nearby enemies in and grinds them.", B::Special, 300.0, 5.0, Some(Yuma), "black_hole_evolved", fire_black_hole),
    evolved("black_hole_evolved", "Event Horizon", "A larger, longer-lived black hole.", B::Special, 250.0, 10.0, Some(Yuma), fire_black_hole_evolved),
    // Koishi
    base("mines", "Id Liberation", "Scatters heart mines.", B::Projectile, 60.0, 40.0, Some(Koishi), "mines_evolved", fire_mines),
    evolved("mines_evolved", "Super-Ego", "A field of heart mines.", B::Projectile, 50.0, 60.0, Some(Koishi), fire_mines_evolved),
    base("whip", "Rose of the Subconscious", "Lashes the nearest enemy.", B::Projectile, 40.0, 25.0, Some(Koishi), "whip_evolved", fire_whip),
    evolved("whip_evolved", "Subterranean Rose", "A double lash.", B::Projectile, 25.0, 40.0, Some(Koishi), fire_whip_evolved),
    base("fire_pillars", "Embers of Love", "Fire erupts in random directions.", B::Projectile, 100.0, 60.0, Some(Koishi), "fire_pillars_evolved", fire_fire_pillars),
    evolved("fire_pillars_evolved", "Hated Flames", "Seeking pillars of fire.", B::Projectile, 80.0, 90.0, Some(Koishi), fire_fire_pillars_evolved),
    // Common
    base("kappa_missile", "Kappa Missile", "Attacks the nearest enemy.", B::Projectile, 50.0, 15.0, None, "kappa_missile_evolved", fire_kappa_missile),
    evolved("kappa_missile_evolved", "Kappa Barrage", "Paired seeking missiles.", B::Projectile, 40.0, 25.0, None, fire_kappa_missile_evolved),
    base("fan", "Tengu Fan", "A forward gust that knocks enemies back.", B::Aura, 80.0, 5.0, None, "fan_evolved", fire_fan),
    evolved("fan_evolved", "Tengu Gale", "A broader, harder gust.", B::Aura, 60.0, 15.0, None, fire_fan_evolved),
    base("punch", "Oni Punch", "A short, heavy punch.", B::Projectile, 25.0, 35.0, None, "punch_evolved", fire_punch),
    evolved("punch_evolved", "Three Steps Certain Kill", "A three-hit combo.", B::Projectile, 20.0, 50.0, None, fire_punch_evolved),
    base("mine", "Kappa Mine", "Drops an explosive ahead.", B::Projectile, 70.0, 50.0, None, "mine_evolved", fire_mine),
    evolved("mine_evolved", "Kappa Minefield", "Three explosives in an arc.", B::Projectile, 60.0, 70.0, None, fire_mine_evolved),
];

/// Look up a weapon definition by id
pub fn weapon(id: &str) -> Option<&'static WeaponDef> {
    WEAPONS.iter().find(|w| w.id == id)
}

// ── Reimu ──

fn fire_homing_amulet(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    (-1..=1)
        .map(|i| {
            let vel = ctx.aim * 5.0 + ctx.side() * (i as f32 * 2.0);
            ctx.shot(ctx.origin, vel, 120.0, 8.0)
                .homing(0.1)
                .color(0xe74c3c)
                .sprite("amulet")
        })
        .collect()
}

fn fire_homing_amulet_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    (-2..=2)
        .map(|i| {
            let vel = ctx.aim * 6.0 + ctx.side() * (i as f32 * 2.5);
            ctx.shot(ctx.origin, vel, 150.0, 10.0)
                .homing(0.15)
                .pierce(2)
                .color(0xff6b6b)
                .sprite("amulet")
        })
        .collect()
}

fn fire_yin_yang_orb(ctx: &FireContext, rng: &mut dyn RandomSource) -> Vec<Projectile> {
    let drift = (rng.next_f32() - 0.5) * 8.0;
    let vel = ctx.aim * 8.0 + ctx.side() * drift;
    vec![ctx.shot(ctx.origin, vel, 200.0, 20.0).pierce(100).knockback(10.0).color(0xffffff).sprite("yin_yang")]
}

fn fire_yin_yang_orb_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    [-6.0, 6.0]
        .into_iter()
        .map(|side| {
            let vel = ctx.aim * 8.0 + ctx.side() * side;
            ctx.shot(ctx.origin, vel, 220.0, 25.0).pierce(999).knockback(15.0).color(0xffffff).sprite("yin_yang")
        })
        .collect()
}

fn fire_boundary(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, Vec2::ZERO, 60.0, 80.0).pierce(999).knockback(15.0).color(0xe74c3c).sprite("barrier")]
}

fn fire_boundary_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    let mut p = ctx.shot(ctx.origin, Vec2::ZERO, 90.0, 120.0).pierce(999).knockback(20.0).color(0xff4757).sprite("barrier");
    p.effects.heal = Some(1.0);
    vec![p]
}

// ── Mokou ──

fn fire_fire_bird(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, ctx.aim * 8.0, 100.0, 15.0).pierce(5).color(0xff4500).sprite("fire_bird")]
}

fn fire_fire_bird_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, ctx.aim * 10.0, 150.0, 20.0).pierce(999).color(0xff6347).sprite("fire_bird")]
}

fn fire_kick(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, Vec2::ZERO, 20.0, 30.0).pierce(999).knockback(20.0).color(0xff8c00)]
}

fn fire_kick_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, Vec2::ZERO, 30.0, 60.0).pierce(999).knockback(30.0).color(0xff4500)]
}

fn ring_of_orbitals(ctx: &FireContext, count: usize, radius: f32, orbit: f32, speed: f32, colors: &[u32]) -> Vec<Projectile> {
    (0..count)
        .map(|i| {
            let angle = i as f32 * TAU / count as f32;
            ctx.shot(ctx.origin, Vec2::ZERO, ONCE, radius)
                .orbit(orbit, angle, speed)
                .color(colors[i % colors.len()])
        })
        .collect()
}

fn fire_dolls(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    ring_of_orbitals(ctx, 3, 10.0, 60.0, 0.1, &[0xffb6c1])
        .into_iter()
        .map(|p| p.sprite("doll"))
        .collect()
}

fn fire_dolls_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    ring_of_orbitals(ctx, 4, 15.0, 80.0, 0.15, &[0xff69b4])
        .into_iter()
        .map(|p| p.pierce(2).sprite("doll"))
        .collect()
}

// ── Marisa ──

fn star_fan(ctx: &FireContext, half: i32, step_deg: f32, speed: f32) -> impl Iterator<Item = Vec2> {
    let base = ctx.aim_angle();
    (-half..=half).map(move |i| polar(base + (i as f32 * step_deg).to_radians(), speed))
}

fn fire_star_dust(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    star_fan(ctx, 2, 15.0, 7.0)
        .map(|vel| ctx.shot(ctx.origin, vel, 60.0, 8.0).color(0xf1c40f).sprite("star"))
        .collect()
}

fn fire_star_dust_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    star_fan(ctx, 4, 12.0, 8.0)
        .map(|vel| ctx.shot(ctx.origin, vel, 80.0, 10.0).pierce(2).color(0xffd700).sprite("star"))
        .collect()
}

fn beam(ctx: &FireContext, duration: f32, radius: f32) -> Projectile {
    ctx.shot(ctx.origin, ctx.aim, duration, radius)
        .pierce(999)
        .kind(ProjectileKind::Laser { dir: ctx.aim })
        .color(0xffffff)
        .sprite("spark")
}

fn fire_laser(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![beam(ctx, 30.0, 50.0)]
}

fn fire_laser_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![beam(ctx, 60.0, 60.0)]
}

fn fire_orreries(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    ring_of_orbitals(ctx, 4, 12.0, 80.0, 0.08, &[0xe74c3c, 0x3498db, 0xf1c40f, 0x2ecc71])
}

fn fire_orreries_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    ring_of_orbitals(ctx, 6, 15.0, 100.0, 0.1, &[0xe74c3c, 0x3498db, 0xf1c40f, 0x2ecc71, 0x9b59b6, 0xe67e22])
}

// ── Sakuya ──

fn fire_knives(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    let forward = ctx.aim * 10.0;
    let mirrored = Vec2::new(-forward.x, forward.y);
    [forward, mirrored]
        .into_iter()
        .map(|vel| ctx.shot(ctx.origin, vel, 180.0, 5.0).color(0xc0c0c0).sprite("knife"))
        .collect()
}

fn fire_knives_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    (0..4)
        .map(|i| {
            let vel = polar(i as f32 * PI / 2.0, 12.0);
            ctx.shot(ctx.origin, vel, 200.0, 6.0).pierce(3).color(0xe0e0e0).sprite("knife")
        })
        .collect()
}

fn stopped_time(ctx: &FireContext, duration: f32) -> Projectile {
    ctx.shot(ctx.origin, Vec2::ZERO, duration, 0.0)
        .kind(ProjectileKind::TimeStop { radius: 800.0 })
        .color(0x808080)
}

fn fire_time_stop(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![stopped_time(ctx, 180.0)]
}

fn fire_time_stop_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![stopped_time(ctx, 300.0)]
}

fn knife_ring(ctx: &FireContext, count: usize, speed: f32, duration: f32, radius: f32) -> Vec<Projectile> {
    (0..count)
        .map(|i| {
            let vel = polar(i as f32 * TAU / count as f32, speed);
            ctx.shot(ctx.origin, vel, duration, radius).color(0xc0c0c0).sprite("knife")
        })
        .collect()
}

fn fire_checkmate(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    knife_ring(ctx, 8, 8.0, 100.0, 5.0)
}

fn fire_checkmate_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    knife_ring(ctx, 16, 10.0, 120.0, 6.0)
        .into_iter()
        .map(|p| p.pierce(2))
        .collect()
}

// ── Yuma ──

fn fire_spoon(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, ctx.aim * 6.0, 120.0, 20.0).pierce(999).returning().color(0xc0c0c0).sprite("spoon")]
}

fn fire_spoon_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    let mut p = ctx.shot(ctx.origin, ctx.aim * 7.0, 150.0, 30.0).pierce(999).returning().color(0xffd700).sprite("spoon");
    p.effects.heal = Some(1.0);
    vec![p]
}

fn fire_fangs(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin + ctx.aim * 40.0, Vec2::ZERO, 10.0, 40.0).pierce(999).color(0x8b0000).sprite("fangs")]
}

fn fire_fangs_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin + ctx.aim * 50.0, Vec2::ZERO, 15.0, 60.0).pierce(999).color(0xb22222).sprite("fangs")]
}

fn hole(ctx: &FireContext, rng: &mut dyn RandomSource, spread: f32, duration: f32, radius: f32) -> Projectile {
    let offset = Vec2::new(rng.range(-spread, spread), rng.range(-spread, spread));
    ctx.shot(ctx.origin + offset, Vec2::ZERO, duration, radius)
        .pierce(999)
        .kind(ProjectileKind::BlackHole {
            pull_radius: 300.0,
            strength: 0.05,
        })
        .color(0x2c003e)
        .sprite("black_hole")
}

fn fire_black_hole(ctx: &FireContext, rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![hole(ctx, rng, 200.0, 180.0, 100.0)]
}

fn fire_black_hole_evolved(ctx: &FireContext, rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![hole(ctx, rng, 150.0, 240.0, 150.0)]
}

// ── Koishi ──

fn scatter_mines(ctx: &FireContext, rng: &mut dyn RandomSource, count: usize, spread: f32, duration: f32, radius: f32) -> Vec<Projectile> {
    (0..count)
        .map(|_| {
            let offset = Vec2::new(rng.range(-spread, spread), rng.range(-spread, spread));
            ctx.shot(ctx.origin + offset, Vec2::ZERO, duration, radius)
                .explode(80.0, 0.5)
                .color(0xff69b4)
                .sprite("heart")
        })
        .collect()
}

fn fire_mines(ctx: &FireContext, rng: &mut dyn RandomSource) -> Vec<Projectile> {
    scatter_mines(ctx, rng, 3, 150.0, 300.0, 15.0)
}

fn fire_mines_evolved(ctx: &FireContext, rng: &mut dyn RandomSource) -> Vec<Projectile> {
    scatter_mines(ctx, rng, 5, 175.0, 360.0, 20.0)
}

fn fire_whip(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, ctx.aim * 15.0, 10.0, 10.0).pierce(2).color(0x2ecc71).sprite("rose")]
}

fn fire_whip_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    [18.0, 20.0]
        .into_iter()
        .map(|speed| ctx.shot(ctx.origin, ctx.aim * speed, 10.0, 10.0).pierce(3).color(0x27ae60).sprite("rose"))
        .collect()
}

fn pillars(ctx: &FireContext, rng: &mut dyn RandomSource, count: usize, speed: f32, duration: f32, radius: f32) -> Vec<Projectile> {
    (0..count)
        .map(|_| {
            let vel = polar(rng.next_f32() * TAU, speed);
            ctx.shot(ctx.origin, vel, duration, radius).pierce(999).color(0xff4500).sprite("pillar")
        })
        .collect()
}

fn fire_fire_pillars(ctx: &FireContext, rng: &mut dyn RandomSource) -> Vec<Projectile> {
    pillars(ctx, rng, 4, 5.0, 60.0, 20.0)
}

fn fire_fire_pillars_evolved(ctx: &FireContext, rng: &mut dyn RandomSource) -> Vec<Projectile> {
    pillars(ctx, rng, 6, 6.0, 80.0, 25.0)
        .into_iter()
        .map(|p| p.homing(0.05))
        .collect()
}

// ── Common ──

fn fire_kappa_missile(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, ctx.aim * 5.0, 100.0, 8.0).homing(0.05).color(0x3498db).sprite("missile")]
}

fn fire_kappa_missile_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    [1.0, -1.0]
        .into_iter()
        .map(|sign| {
            ctx.shot(ctx.origin, ctx.aim * 6.0 * sign, 120.0, 10.0)
                .homing(0.08)
                .pierce(2)
                .color(0x2980b9)
                .sprite("missile")
        })
        .collect()
}

fn fire_fan(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, ctx.aim * 4.0, 30.0, 40.0).pierce(999).knockback(15.0).color(0xecf0f1).sprite("gust")]
}

fn fire_fan_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin, ctx.aim * 5.0, 40.0, 60.0).pierce(999).knockback(25.0).color(0xffffff).sprite("gust")]
}

fn fire_punch(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin + ctx.aim * 30.0, Vec2::ZERO, 8.0, 35.0).pierce(3).color(0xe67e22).sprite("fist")]
}

fn fire_punch_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    [30.0, 40.0, 50.0]
        .into_iter()
        .map(|reach| ctx.shot(ctx.origin + ctx.aim * reach, Vec2::ZERO, 10.0, 40.0).pierce(5).color(0xd35400).sprite("fist"))
        .collect()
}

fn fire_mine(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    vec![ctx.shot(ctx.origin + ctx.aim * 80.0, Vec2::ZERO, 240.0, 18.0).explode(80.0, 0.5).color(0x7f8c8d).sprite("mine")]
}

fn fire_mine_evolved(ctx: &FireContext, _rng: &mut dyn RandomSource) -> Vec<Projectile> {
    let base = ctx.aim_angle();
    [-0.3, 0.0, 0.3]
        .into_iter()
        .map(|offset| {
            let pos = ctx.origin + polar(base + offset, 90.0);
            ctx.shot(pos, Vec2::ZERO, 300.0, 22.0).explode(80.0, 0.5).color(0x95a5a6).sprite("mine")
        })
        .collect()
}
