//! Weapon upgrade trees and the modifier registry
//!
//! Each tree has up to three tiers, unlocked at weapon levels 3, 5 and 7.
//! One choice per tier. A choice either transforms the projectiles its
//! weapon just fired, scales the weapon's cooldown, or both. Choices with
//! neither are flags read elsewhere (the dash reads the `kick_*` flags).

use std::f32::consts::{FRAC_PI_4, PI, TAU};

use glam::Vec2;

use crate::sim::projectile::{DamageOverTime, Explosion, Motion, Projectile, ProjectileKind, Retarget, Split};
use crate::sim::rng::RandomSource;
use crate::{angle_of, normalize_or_x, polar};

/// World data a modifier may read
#[derive(Debug, Clone, Copy)]
pub struct ModifierContext<'a> {
    /// Player position at fire time
    pub origin: Vec2,
    /// Positions of living enemies
    pub targets: &'a [Vec2],
}

pub type ModifierFn = fn(&mut Vec<Projectile>, &ModifierContext<'_>, &mut dyn RandomSource);

/// One selectable specialization
#[derive(Clone, Copy)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Transformation over the freshly fired projectiles
    pub apply: Option<ModifierFn>,
    /// Multiplier on the cooldown reset
    pub cooldown_factor: f32,
}

impl std::fmt::Debug for UpgradeDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpgradeDef")
            .field("id", &self.id)
            .field("cooldown_factor", &self.cooldown_factor)
            .finish_non_exhaustive()
    }
}

/// A set of mutually exclusive choices
#[derive(Debug, Clone, Copy)]
pub struct UpgradeTier {
    pub unlock_level: u32,
    pub choices: &'static [UpgradeDef],
}

/// All tiers for one weapon
#[derive(Debug, Clone, Copy)]
pub struct UpgradeTree {
    pub weapon_id: &'static str,
    pub tiers: &'static [UpgradeTier],
}

impl UpgradeTree {
    /// Find a choice and the tier index it belongs to
    pub fn find(&self, upgrade_id: &str) -> Option<(usize, &'static UpgradeDef)> {
        self.tiers.iter().enumerate().find_map(|(i, tier)| {
            tier.choices.iter().find(|u| u.id == upgrade_id).map(|u| (i, u))
        })
    }
}

/// Weapon levels at which tiers 1, 2 and 3 unlock
pub const TIER_UNLOCK_LEVELS: [u32; 3] = [3, 5, 7];

const fn modifier(id: &'static str, name: &'static str, description: &'static str, apply: ModifierFn) -> UpgradeDef {
    UpgradeDef {
        id,
        name,
        description,
        apply: Some(apply),
        cooldown_factor: 1.0,
    }
}

const fn rapid(id: &'static str, name: &'static str, description: &'static str, cooldown_factor: f32) -> UpgradeDef {
    UpgradeDef {
        id,
        name,
        description,
        apply: None,
        cooldown_factor,
    }
}

const fn flag(id: &'static str, name: &'static str, description: &'static str) -> UpgradeDef {
    UpgradeDef {
        id,
        name,
        description,
        apply: None,
        cooldown_factor: 1.0,
    }
}

const fn tier(n: usize, choices: &'static [UpgradeDef]) -> UpgradeTier {
    UpgradeTier {
        unlock_level: TIER_UNLOCK_LEVELS[n],
        choices,
    }
}

pub static UPGRADE_TREES: &[UpgradeTree] = &[
    UpgradeTree {
        weapon_id: "fire_bird",
        tiers: &[
            tier(0, &[
                modifier("bird_pierce", "Piercing Flame", "Penetration +3", add_pierce_3),
                modifier("bird_homing", "Seeking Phoenix", "Birds home in on enemies", home_015),
                modifier("bird_size", "Great Phoenix", "Size and damage x2", double_size_and_damage),
            ]),
            tier(1, &[
                modifier("bird_split", "Scattering Embers", "Splits into 3 on hit", split_3_wide),
                modifier("bird_count", "Flock", "Two extra birds per shot", two_angled_copies),
                modifier("bird_bounce", "Ricochet Flame", "Bounces between 3 enemies", bounce_3),
            ]),
            tier(2, &[
                rapid("bird_rapid", "Rapid Rebirth", "Cooldown -70%", 0.3),
                modifier("bird_nova", "Phoenix Nova", "Explodes for 80% damage", nova),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "kick",
        tiers: &[
            tier(0, &[
                flag("kick_speed", "Meteor Kick", "Dash 3x faster for double damage"),
                flag("kick_burn", "Scorching Path", "Dash sets enemies ablaze"),
            ]),
            tier(1, &[
                flag("kick_trail", "Road of Hellfire", "Dash leaves burning ground"),
                flag("kick_invuln", "Immortal Rush", "Invulnerable while dashing"),
            ]),
            tier(2, &[
                flag("kick_reset", "Endless Pursuit", "Kills during a dash reset its cooldown"),
                flag("kick_explosion", "Volcanic Landing", "Explode on landing"),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "homing_amulet",
        tiers: &[
            tier(0, &[
                modifier("amulet_count", "Amulet Storm", "Two extra volleys", jittered_copies),
                modifier("amulet_homing", "Guiding Seal", "Homing x2", double_homing),
                modifier("amulet_pierce", "Piercing Seal", "Penetration +5, damage +30%", pierce_5_damage),
            ]),
            tier(1, &[
                modifier("amulet_bounce", "Rebounding Seal", "Bounces between 3 enemies", bounce_3),
                modifier("amulet_split", "Dividing Seal", "Splits into 2 on hit", split_2),
            ]),
            tier(2, &[
                modifier("amulet_heal", "Blessed Seal", "Heal 1 HP per hit", heal_1),
                modifier("amulet_explosion", "Exploding Seal", "Explodes for 50% damage", small_blast),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "yin_yang_orb",
        tiers: &[tier(0, &[
            modifier("orb_size", "Giant Orb", "Size and damage x2", double_size_and_damage),
            modifier("orb_multi", "Twin Orbs", "Throws a second orb", mirrored_copy),
        ])],
    },
    UpgradeTree {
        weapon_id: "boundary",
        tiers: &[tier(0, &[
            modifier("boundary_size", "Wide Barrier", "Size +50%", size_150),
            modifier("boundary_damage", "Sharp Barrier", "Damage x2", double_damage),
            modifier("boundary_duration", "Lasting Barrier", "Duration x2", double_duration),
        ])],
    },
    UpgradeTree {
        weapon_id: "star_dust",
        tiers: &[
            tier(0, &[
                modifier("star_speed", "Shooting Stars", "Speed x2, damage +30%", star_speed),
                modifier("star_pierce", "Piercing Stars", "Penetration +3", add_pierce_3),
                modifier("star_homing", "Guided Stars", "Stars home in", home_010),
            ]),
            tier(1, &[
                rapid("star_rapid", "Meteor Shower", "Cooldown -50%", 0.5),
                modifier("star_explode", "Supernova", "Explodes for 50% damage", small_blast),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "laser",
        tiers: &[
            tier(0, &[
                modifier("laser_width", "Wide Spark", "Width x2", double_size),
                modifier("laser_duration", "Long Spark", "Duration x2", double_duration),
                modifier("laser_damage", "Overcharged Spark", "Damage x3", triple_damage),
            ]),
            tier(1, &[
                modifier("laser_multi", "Triple Spark", "Two parallel beams", parallel_beams),
                modifier("laser_burn", "Scorching Spark", "Burns enemies", laser_burn),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "orreries",
        tiers: &[tier(0, &[
            modifier("orrery_count", "Grand Orrery", "Four more orbs", interleave_orbitals),
            modifier("orrery_speed", "Fast Orbit", "Orbit speed x2", double_orbit_speed),
            modifier("orrery_size", "Heavy Orbs", "Size and damage x2", double_size_and_damage),
        ])],
    },
    UpgradeTree {
        weapon_id: "knives",
        tiers: &[
            tier(0, &[
                modifier("knife_count", "Knife Fan", "Two extra knives per throw", knife_fan),
                modifier("knife_bounce", "Ricochet Knives", "Penetration +3", add_pierce_3),
                modifier("knife_speed", "Swift Knives", "Speed x2.5", knife_speed),
            ]),
            tier(1, &[
                modifier("knife_explode", "Exploding Knives", "Explodes for 40% damage", knife_blast),
                modifier("knife_poison", "Poisoned Knives", "Poisons enemies", knife_poison),
                modifier("knife_freeze", "Frozen Knives", "Freezes enemies", freeze_hit),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "time_stop",
        tiers: &[tier(0, &[
            modifier("timestop_duration", "Eternal Moment", "Duration +3 seconds", timestop_longer),
            rapid("timestop_cooldown", "Frequent Stops", "Cooldown -40%", 0.6),
        ])],
    },
    UpgradeTree {
        weapon_id: "checkmate",
        tiers: &[
            tier(0, &[
                modifier("checkmate_count", "Double Ring", "Eight more knives", interleave_ring),
                modifier("checkmate_homing", "Guided Knives", "Knives home in", home_012),
            ]),
            tier(1, &[
                modifier("checkmate_penetrate", "Piercing Ring", "Penetration +5", add_pierce_5),
                rapid("checkmate_rapid", "Rapid Checkmate", "Cooldown -70%", 0.3),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "spoon",
        tiers: &[
            tier(0, &[
                modifier("spoon_size", "Ladle", "Size and damage x2", double_size_and_damage),
                modifier("spoon_speed", "Swift Spoon", "Speed x2", double_speed),
                modifier("spoon_multi", "Cutlery Set", "Two extra spoons", two_angled_copies),
            ]),
            tier(1, &[
                modifier("spoon_heal", "Feast", "Heal 3 HP per hit", heal_3),
                modifier("spoon_explosion", "Bursting Spoon", "Explodes for 60% damage", spoon_blast),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "fangs",
        tiers: &[
            tier(0, &[
                modifier("fang_size", "Wide Jaws", "Size x2", double_size),
                modifier("fang_duration", "Lingering Bite", "Duration x3", triple_duration),
                rapid("fang_rapid", "Frenzy", "Cooldown -50%", 0.5),
            ]),
            tier(1, &[
                modifier("fang_heal", "Devour", "Heal half the damage dealt", fang_heal),
                modifier("fang_stun", "Crushing Bite", "Stuns enemies", stun_hit),
                modifier("fang_chain", "Chain Bite", "Chains to 3 enemies", chain_3),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "black_hole",
        tiers: &[
            tier(0, &[
                modifier("hole_size", "Vast Hole", "Size x2", double_size),
                modifier("hole_duration", "Stable Hole", "Duration x2", double_duration),
            ]),
            tier(1, &[
                modifier("hole_damage", "Crushing Gravity", "Damage x3", triple_damage),
                modifier("hole_multi", "Twin Holes", "A second black hole", scattered_copy),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "mines",
        tiers: &[tier(0, &[
            modifier("mine_count", "Minefield", "Two extra mines per mine", mine_cluster),
            modifier("mine_damage", "Heavy Mines", "Damage x2.5", mine_damage),
            modifier("mine_range", "Wide Trigger", "Size x2", double_size),
        ])],
    },
    UpgradeTree {
        weapon_id: "whip",
        tiers: &[
            tier(0, &[
                rapid("whip_speed", "Quick Lash", "Cooldown -50%", 0.5),
                modifier("whip_multi", "Thorned Vines", "Lashes up to 3 targets", whip_multi),
            ]),
            tier(1, &[
                modifier("whip_poison", "Poison Rose", "Poisons enemies", whip_poison),
                modifier("whip_chain", "Rose Chain", "Chains to 5 enemies", chain_5),
            ]),
        ],
    },
    UpgradeTree {
        weapon_id: "fire_pillars",
        tiers: &[tier(0, &[
            modifier("pillar_count", "Eruption", "Four more pillars", four_random_pillars),
            modifier("pillar_size", "Towering Flames", "Size and damage x2", double_size_and_damage),
            modifier("pillar_duration", "Lasting Flames", "Duration x2", double_duration),
        ])],
    },
];

/// Upgrade tree for a weapon, if it has one
pub fn tree(weapon_id: &str) -> Option<&'static UpgradeTree> {
    UPGRADE_TREES.iter().find(|t| t.weapon_id == weapon_id)
}

/// Registry lookup keyed by `(weapon, upgrade)`
pub fn upgrade(weapon_id: &str, upgrade_id: &str) -> Option<(usize, &'static UpgradeDef)> {
    tree(weapon_id).and_then(|t| t.find(upgrade_id))
}

/// Apply every chosen upgrade to a fresh volley, in tier order
pub fn apply_modifiers(
    weapon_id: &str,
    chosen: &[&'static str],
    projectiles: &mut Vec<Projectile>,
    ctx: &ModifierContext<'_>,
    rng: &mut dyn RandomSource,
) {
    let Some(tree) = tree(weapon_id) else {
        return;
    };
    for id in chosen {
        if let Some((_, def)) = tree.find(id) {
            if let Some(apply) = def.apply {
                apply(projectiles, ctx, rng);
            }
        }
    }
}

/// Product of cooldown factors over the chosen upgrades
pub fn cooldown_factor(weapon_id: &str, chosen: &[&'static str]) -> f32 {
    let Some(tree) = tree(weapon_id) else {
        return 1.0;
    };
    chosen
        .iter()
        .filter_map(|id| tree.find(id))
        .map(|(_, def)| def.cooldown_factor)
        .product()
}

// ── Shared transformations ──

fn scale_duration(p: &mut Projectile, factor: f32) {
    p.duration *= factor;
    p.max_duration *= factor;
}

fn rotated(p: &Projectile, offset: f32) -> Projectile {
    let speed = p.vel.length();
    let mut copy = p.clone();
    copy.vel = polar(angle_of(p.vel) + offset, speed);
    copy
}

fn random_sign(rng: &mut dyn RandomSource) -> f32 {
    if rng.chance(0.5) { 1.0 } else { -1.0 }
}

fn add_pierce_3(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.penetration += 3);
}

fn add_pierce_5(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.penetration += 5);
}

fn home_010(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.set_homing(0.1));
}

fn home_012(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.set_homing(0.12));
}

fn home_015(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.set_homing(0.15));
}

fn double_homing(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    for p in ps.iter_mut() {
        if let Some(strength) = p.homing_strength() {
            p.set_homing(strength * 2.0);
        }
    }
}

fn double_size(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.radius *= 2.0);
}

fn size_150(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.radius *= 1.5);
}

fn double_damage(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.damage *= 2.0);
}

fn triple_damage(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.damage *= 3.0);
}

fn double_size_and_damage(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    for p in ps.iter_mut() {
        p.radius *= 2.0;
        p.damage *= 2.0;
    }
}

fn double_duration(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| scale_duration(p, 2.0));
}

fn triple_duration(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| scale_duration(p, 3.0));
}

fn double_speed(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.vel *= 2.0);
}

fn split_3_wide(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let split = Split { count: 3, spread: PI * 0.8 };
    ps.iter_mut().for_each(|p| p.effects.split = Some(split));
}

fn split_2(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let split = Split { count: 2, spread: PI * 0.6 };
    ps.iter_mut().for_each(|p| p.effects.split = Some(split));
}

fn bounce_3(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let bounce = Retarget { remaining: 3, range: 300.0 };
    ps.iter_mut().for_each(|p| p.effects.bounce = Some(bounce));
}

fn chain_3(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let chain = Retarget { remaining: 3, range: 200.0 };
    ps.iter_mut().for_each(|p| p.effects.chain = Some(chain));
}

fn chain_5(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let chain = Retarget { remaining: 5, range: 250.0 };
    ps.iter_mut().for_each(|p| p.effects.chain = Some(chain));
}

fn set_explosion(ps: &mut [Projectile], radius: f32, ratio: f32) {
    let blast = Explosion { radius, ratio };
    ps.iter_mut().for_each(|p| p.effects.explosion = Some(blast));
}

fn nova(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    set_explosion(ps, 120.0, 0.8);
}

fn small_blast(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    set_explosion(ps, 60.0, 0.5);
}

fn knife_blast(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    set_explosion(ps, 50.0, 0.4);
}

fn spoon_blast(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    set_explosion(ps, 80.0, 0.6);
}

fn heal_1(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.effects.heal = Some(1.0));
}

fn heal_3(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.effects.heal = Some(3.0));
}

fn stun_hit(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.effects.stun = Some(120.0));
}

fn freeze_hit(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.effects.freeze = Some(120.0));
}

// ── Fire Bird / Spoon ──

fn two_angled_copies(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, rng: &mut dyn RandomSource) {
    let mut extra = Vec::with_capacity(ps.len() * 2);
    for p in ps.iter() {
        for i in 0..2 {
            let offset = (i + 1) as f32 * 0.3 * random_sign(rng);
            extra.push(rotated(p, offset));
        }
    }
    ps.extend(extra);
}

// ── Homing Amulet ──

fn jittered_copies(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, rng: &mut dyn RandomSource) {
    let mut extra = Vec::with_capacity(ps.len() * 2);
    for _ in 0..2 {
        for p in ps.iter() {
            let mut copy = p.clone();
            copy.vel += Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0));
            extra.push(copy);
        }
    }
    ps.extend(extra);
}

fn pierce_5_damage(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    for p in ps.iter_mut() {
        p.penetration += 5;
        p.damage *= 1.3;
    }
}

// ── Yin-Yang Orb ──

fn mirrored_copy(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    if let Some(first) = ps.first() {
        let mut copy = first.clone();
        copy.vel.x *= -0.5;
        ps.push(copy);
    }
}

// ── Star Dust ──

fn star_speed(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    for p in ps.iter_mut() {
        p.vel *= 2.0;
        p.damage *= 1.3;
    }
}

// ── Laser ──

fn parallel_beams(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let Some(first) = ps.first().cloned() else {
        return;
    };
    let dir = match first.kind {
        ProjectileKind::Laser { dir } => dir,
        _ => normalize_or_x(first.vel),
    };
    for side in [-1.0, 1.0] {
        let mut copy = first.clone();
        copy.pos += dir.perp() * (side * 60.0);
        ps.push(copy);
    }
}

fn laser_burn(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let burn = DamageOverTime { duration: 150.0, ratio: 0.1 };
    ps.iter_mut().for_each(|p| p.effects.burn = Some(burn));
}

// ── Orreries ──

fn interleave_orbitals(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    if ps.len() != 4 {
        return;
    }
    let mut extra = Vec::with_capacity(4);
    for p in ps.iter() {
        let mut copy = p.clone();
        if let Motion::Orbit { angle, .. } = &mut copy.motion {
            *angle += FRAC_PI_4;
        }
        extra.push(copy);
    }
    ps.extend(extra);
}

fn double_orbit_speed(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    for p in ps.iter_mut() {
        if let Motion::Orbit { speed, .. } = &mut p.motion {
            *speed *= 2.0;
        }
    }
}

// ── Knives ──

fn knife_fan(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let mut extra = Vec::with_capacity(ps.len() * 2);
    for i in 0..2 {
        for p in ps.iter() {
            let mut copy = p.clone();
            copy.vel = Vec2::new(p.vel.x * 0.8, p.vel.y + (i as f32 - 0.5) * 3.0);
            extra.push(copy);
        }
    }
    ps.extend(extra);
}

fn knife_speed(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.vel *= 2.5);
}

fn knife_poison(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let poison = DamageOverTime { duration: 180.0, ratio: 0.1 };
    ps.iter_mut().for_each(|p| p.effects.poison = Some(poison));
}

// ── Time Stop ──

fn timestop_longer(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    for p in ps.iter_mut() {
        p.duration += 180.0;
        p.max_duration += 180.0;
    }
}

// ── Checkmate ──

fn interleave_ring(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let n = ps.len();
    if n == 0 {
        return;
    }
    let step = TAU / n as f32;
    let extra: Vec<Projectile> = ps.iter().map(|p| rotated(p, step / 2.0)).collect();
    ps.extend(extra);
}

// ── Fangs ──

fn fang_heal(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    for p in ps.iter_mut() {
        p.effects.heal = Some((p.damage * 0.5).floor());
    }
}

// ── Black Hole ──

fn scattered_copy(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, rng: &mut dyn RandomSource) {
    if let Some(first) = ps.first() {
        let mut copy = first.clone();
        copy.pos += Vec2::new(rng.range(-200.0, 200.0), rng.range(-200.0, 200.0));
        ps.push(copy);
    }
}

// ── Mines ──

fn mine_cluster(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, rng: &mut dyn RandomSource) {
    let mut extra = Vec::with_capacity(ps.len() * 2);
    for _ in 0..2 {
        for p in ps.iter() {
            let mut copy = p.clone();
            copy.pos += Vec2::new(rng.range(-50.0, 50.0), rng.range(-50.0, 50.0));
            extra.push(copy);
        }
    }
    ps.extend(extra);
}

fn mine_damage(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    ps.iter_mut().for_each(|p| p.damage *= 2.5);
}

// ── Whip ──

fn whip_multi(ps: &mut Vec<Projectile>, ctx: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let Some(first) = ps.first().cloned() else {
        return;
    };
    let mut nearby: Vec<(f32, Vec2)> = ctx
        .targets
        .iter()
        .map(|t| (t.distance(ctx.origin), *t))
        .filter(|(d, _)| *d < 500.0)
        .collect();
    nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (dist, target) in nearby.into_iter().skip(1).take(2) {
        if dist <= 0.0 {
            continue;
        }
        let mut copy = first.clone();
        copy.vel = (target - ctx.origin) / dist * 15.0;
        ps.push(copy);
    }
}

fn whip_poison(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, _: &mut dyn RandomSource) {
    let poison = DamageOverTime { duration: 200.0, ratio: 0.15 };
    ps.iter_mut().for_each(|p| p.effects.poison = Some(poison));
}

// ── Fire Pillars ──

fn four_random_pillars(ps: &mut Vec<Projectile>, _: &ModifierContext<'_>, rng: &mut dyn RandomSource) {
    let Some(first) = ps.first().cloned() else {
        return;
    };
    for _ in 0..4 {
        let mut copy = first.clone();
        copy.vel = polar(rng.next_f32() * TAU, 5.0);
        ps.push(copy);
    }
}
