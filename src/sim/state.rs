//! Simulation state and entity types
//!
//! Everything the tick reads or mutates lives in [`SimulationState`]. The
//! host owns one instance per run and passes it to the tick explicitly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use super::stats::Stats;
use super::weapon::Weapon;
use crate::catalog::{Character, passive};
use crate::catalog::passives::PassiveSpecial;
use crate::consts::*;
use crate::tuning::{BossSpawn, EnemyTemplate, Tuning};

/// Whether the tick advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Active gameplay
    Playing,
    /// Frozen until the host applies a level-up choice
    AwaitingUpgrade,
    /// Run ended
    GameOver,
}

/// Enemy type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyArchetype {
    /// Walks straight at the player
    Fairy,
    /// Hops toward the player
    Slime,
    /// Hovers at range and shoots
    Elf,
    /// Drifts straight at the player
    Ghost,
    Boss,
}

/// Named bosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    Cirno,
    Youmu,
    Kaguya,
}

impl BossKind {
    pub fn name(&self) -> &'static str {
        match self {
            BossKind::Cirno => "Cirno",
            BossKind::Youmu => "Youmu Konpaku",
            BossKind::Kaguya => "Kaguya Houraisan",
        }
    }
}

/// A delayed part of a boss volley
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Volley {
    /// Four slashes along the axes
    Cross,
    /// One ring of Kaguya's rainbow, index 0..5
    Ring(u32),
}

/// Queued volley released when `delay` runs out
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Burst {
    pub delay: f32,
    pub volley: Volley,
}

/// Scripted boss attack state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossState {
    pub kind: BossKind,
    /// Active pattern, 0 or 1
    pub pattern: u8,
    /// Frames since the last volley
    pub timer: f32,
    /// Staggered volleys still to be released
    pub bursts: Vec<Burst>,
}

/// Archetype-specific AI state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EnemyAi {
    Chase,
    Slime {
        bounce_timer: f32,
        jumping: bool,
        /// Frames spent in the current jump
        airtime: u32,
    },
    Elf {
        shoot_timer: f32,
    },
    Boss(BossState),
}

/// A damage-over-time effect in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Affliction {
    /// Frames left
    pub remaining: f32,
    /// Damage per proc
    pub damage: f32,
}

/// Status timers in frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusTimers {
    pub frozen: f32,
    pub stunned: f32,
    pub burn: Option<Affliction>,
    pub poison: Option<Affliction>,
}

impl StatusTimers {
    /// Frozen or stunned enemies skip movement and attacks
    pub fn immobile(&self) -> bool {
        self.frozen > 0.0 || self.stunned > 0.0
    }
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enemy {
    pub id: u32,
    pub archetype: EnemyArchetype,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Contact damage
    pub damage: f32,
    pub speed: f32,
    /// Experience dropped on death
    pub exp: u32,
    pub color: u32,
    pub ai: EnemyAi,
    pub status: StatusTimers,
}

impl Enemy {
    /// Regular enemy stamped from a wave template
    pub fn from_template(id: u32, pos: Vec2, template: &EnemyTemplate, ai: EnemyAi) -> Self {
        Self {
            id,
            archetype: template.archetype,
            pos,
            vel: Vec2::ZERO,
            radius: ENEMY_RADIUS,
            hp: template.hp,
            max_hp: template.hp,
            damage: template.damage,
            speed: template.speed,
            exp: template.exp,
            color: template.color,
            ai,
            status: StatusTimers::default(),
        }
    }

    /// Named boss from the schedule
    pub fn boss(id: u32, pos: Vec2, spawn: &BossSpawn) -> Self {
        Self {
            id,
            archetype: EnemyArchetype::Boss,
            pos,
            vel: Vec2::ZERO,
            radius: BOSS_RADIUS,
            hp: spawn.hp,
            max_hp: spawn.hp,
            damage: spawn.damage,
            speed: spawn.speed,
            exp: spawn.exp,
            color: spawn.color,
            ai: EnemyAi::Boss(BossState {
                kind: spawn.boss,
                pattern: 0,
                timer: 0.0,
                bursts: Vec::new(),
            }),
            status: StatusTimers::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.ai, EnemyAi::Boss(_))
    }

    /// Subtract hp, never going above max
    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount.max(0.0)).min(self.max_hp);
    }
}

/// Experience pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gem {
    pub id: u32,
    pub pos: Vec2,
    pub value: u32,
    pub radius: f32,
}

/// Floating damage text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub value: u32,
    pub life: f32,
    pub crit: bool,
}

/// Lifetime of a damage number in frames
pub const DAMAGE_NUMBER_LIFE: f32 = 30.0;
/// Upward drift of a damage number per frame
pub const DAMAGE_NUMBER_RISE: f32 = 0.5;

/// Footprint left while walking
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Footprint {
    pub pos: Vec2,
    pub angle: f32,
    pub life: f32,
}

/// Frames between footprints
pub const FOOTPRINT_INTERVAL: u32 = 5;
/// Lifetime of a footprint in frames
pub const FOOTPRINT_LIFE: f32 = 300.0;

/// Trail point for projectile rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub color: u32,
    pub life: f32,
}

/// Lifetime of a trail point in frames
pub const TRAIL_LIFE: f32 = 15.0;

/// Smooth-follow viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Camera {
    /// Top-left corner in world space
    pub pos: Vec2,
}

impl Camera {
    /// Camera centered on `target`, clamped to the map
    pub fn centered_on(target: Vec2) -> Self {
        let mut camera = Self {
            pos: target - Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT) / 2.0,
        };
        camera.clamp();
        camera
    }

    /// Exponential approach toward centering `target`
    pub fn follow(&mut self, target: Vec2) {
        let goal = target - Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT) / 2.0;
        self.pos += (goal - self.pos) * CAMERA_LERP;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.pos = self.pos.clamp(
            Vec2::ZERO,
            Vec2::new(MAP_WIDTH - CANVAS_WIDTH, MAP_HEIGHT - CANVAS_HEIGHT),
        );
    }
}

/// Screen shake request state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScreenShake {
    pub intensity: f32,
    /// Frames left
    pub duration: f32,
    /// Current render offset
    pub offset: Vec2,
}

impl ScreenShake {
    /// Start a shake, keeping the stronger of the current and requested one
    pub fn trigger(&mut self, intensity: f32, duration: f32) {
        self.intensity = self.intensity.max(intensity);
        self.duration = self.duration.max(duration);
    }
}

/// Active-skill (dash) state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashState {
    /// Frames until the dash can trigger again
    pub cooldown: f32,
    /// Destination while a dash is in progress
    pub target: Option<Vec2>,
    /// Frames since the last trail hazard
    pub trail_timer: f32,
}

impl DashState {
    pub fn is_dashing(&self) -> bool {
        self.target.is_some()
    }
}

/// The player
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub character: Character,
    pub pos: Vec2,
    /// Unit facing, updated only while moving
    pub facing: Vec2,
    pub stats: Stats,
    pub level: u32,
    pub exp: u32,
    pub next_exp: u32,
    pub weapons: Vec<Weapon>,
    /// Passive ids and chosen weapon-upgrade ids
    pub passives: Vec<&'static str>,
    /// Frames of invulnerability left
    pub invuln: f32,
    pub alive: bool,
    pub dash: DashState,
    pub gold: u32,
    pub kills: u32,
    /// Level-ups earned but not yet spent
    pub pending_level_ups: u32,
}

impl Player {
    /// Fresh player for `character` at the map center
    pub fn new(character: Character, next_exp: u32) -> Self {
        let mut weapons = Vec::new();
        match Weapon::from_id(character.starting_weapon()) {
            Ok(w) => weapons.push(w),
            Err(e) => log::warn!("{}: {e}", character.id()),
        }
        Self {
            character,
            pos: Vec2::new(MAP_WIDTH, MAP_HEIGHT) / 2.0,
            facing: Vec2::X,
            stats: character.base_stats(),
            level: 1,
            exp: 0,
            next_exp,
            weapons,
            passives: Vec::new(),
            invuln: 0.0,
            alive: true,
            dash: DashState::default(),
            gold: 0,
            kills: 0,
            pending_level_ups: 0,
        }
    }

    pub fn weapon(&self, id: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id() == id)
    }

    pub fn weapon_mut(&mut self, id: &str) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.id() == id)
    }

    pub fn has_passive(&self, id: &str) -> bool {
        self.passives.contains(&id)
    }

    /// Passive ids that are catalog passives, excluding weapon upgrades
    pub fn catalog_passive_count(&self) -> usize {
        self.passives.iter().filter(|id| passive(id).is_some()).count()
    }

    /// Special effects granted by owned passives
    pub fn specials(&self) -> impl Iterator<Item = PassiveSpecial> + '_ {
        self.passives
            .iter()
            .filter_map(|id| passive(id))
            .filter_map(|p| p.special)
    }

    /// Summed experience bonus from passives
    pub fn exp_boost(&self) -> f32 {
        self.specials()
            .map(|s| match s {
                PassiveSpecial::ExpBoost(b) => b,
                _ => 0.0,
            })
            .sum()
    }

    /// Chance to ignore an incoming hit
    pub fn dodge_chance(&self) -> f32 {
        self.specials()
            .map(|s| match s {
                PassiveSpecial::Dodge(p) => p,
                _ => 0.0,
            })
            .sum()
    }

    /// Fraction of dealt damage returned as hp
    pub fn lifesteal(&self) -> f32 {
        self.specials()
            .map(|s| match s {
                PassiveSpecial::Lifesteal(f) => f,
                _ => 0.0,
            })
            .sum()
    }

    /// Clamp position inside the map margin
    pub fn clamp_to_map(&mut self) {
        self.pos = self.pos.clamp(
            Vec2::splat(MAP_MARGIN),
            Vec2::new(MAP_WIDTH - MAP_MARGIN, MAP_HEIGHT - MAP_MARGIN),
        );
    }
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    LevelUp { level: u32 },
    EnemyKilled { id: u32, archetype: EnemyArchetype, pos: Vec2 },
    BossSpawned(BossKind),
    PlayerHit { damage: f32 },
    Dodged,
    Revived { revivals_left: u32 },
    GameOver { minutes: u32 },
    WeaponEvolved { from: &'static str, to: &'static str },
}

/// Complete simulation state for one run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationState {
    pub tuning: Tuning,
    pub phase: Phase,
    /// Simulated frames since the run began
    pub time: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub gems: Vec<Gem>,
    pub damage_numbers: Vec<DamageNumber>,
    pub footprints: Vec<Footprint>,
    pub trails: Vec<TrailPoint>,
    pub camera: Camera,
    pub shake: ScreenShake,
    /// Bosses already spawned this run
    pub bosses_spawned: Vec<BossKind>,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SimulationState {
    /// Start a run with `character`
    pub fn new(character: Character, tuning: Tuning) -> Self {
        let first_threshold = tuning.exp_curve.initial();
        let player = Player::new(character, first_threshold);
        let camera = Camera::centered_on(player.pos);
        log::info!("New run as {}", character.name());
        Self {
            tuning,
            phase: Phase::Playing,
            time: 0.0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            gems: Vec::new(),
            damage_numbers: Vec::new(),
            footprints: Vec::new(),
            trails: Vec::new(),
            camera,
            shake: ScreenShake::default(),
            bosses_spawned: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Assign an id and add a projectile
    pub fn add_projectile(&mut self, mut projectile: Projectile) {
        projectile.id = self.next_entity_id();
        self.projectiles.push(projectile);
    }

    /// Add a gem with a fresh id
    pub fn add_gem(&mut self, pos: Vec2, value: u32) {
        let id = self.next_entity_id();
        self.gems.push(Gem {
            id,
            pos,
            value,
            radius: GEM_RADIUS,
        });
    }

    /// Spawn a floating damage number above `pos`
    pub fn add_damage_number(&mut self, pos: Vec2, amount: f32, crit: bool) {
        self.damage_numbers.push(DamageNumber {
            pos,
            value: amount.max(0.0).floor() as u32,
            life: DAMAGE_NUMBER_LIFE,
            crit,
        });
    }

    /// Simulated seconds since the run began
    pub fn elapsed_secs(&self) -> f32 {
        self.time / FPS
    }

    /// Whole simulated minutes since the run began
    pub fn elapsed_minutes(&self) -> u32 {
        (self.time / FPS / 60.0).floor() as u32
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
