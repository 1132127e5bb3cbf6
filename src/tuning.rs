//! Data-driven game balance
//!
//! Population caps, the experience curve, the wave table and the boss
//! schedule. Everything here can be overridden from JSON; missing fields
//! keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::sim::state::{BossKind, EnemyArchetype};

/// Experience needed for the first level-up under any curve
pub const FIRST_LEVEL_EXP: u32 = 10;

/// Experience-to-next-level schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ExpCurve {
    /// Piecewise linear growth: +3 per level to 20, +5 to 40, +8 after
    #[default]
    Segmented,
    /// Each threshold is the previous one times `factor`, floored
    Multiplicative { factor: f32 },
}

impl ExpCurve {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpCurve::Segmented => "Segmented",
            ExpCurve::Multiplicative { .. } => "Multiplicative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "segmented" | "seg" => Some(ExpCurve::Segmented),
            "multiplicative" | "mul" | "simple" => {
                Some(ExpCurve::Multiplicative { factor: 1.5 })
            }
            _ => None,
        }
    }

    /// Experience needed to leave level 1
    pub fn initial(&self) -> u32 {
        match *self {
            ExpCurve::Segmented => self.threshold(1, 0),
            ExpCurve::Multiplicative { .. } => FIRST_LEVEL_EXP,
        }
    }

    /// Experience needed to advance from `level` to `level + 1`.
    ///
    /// `previous` is the threshold that was just consumed; only the
    /// multiplicative curve reads it.
    pub fn threshold(&self, level: u32, previous: u32) -> u32 {
        match *self {
            ExpCurve::Segmented => {
                let level = level.max(1);
                if level <= 20 {
                    10 + (level - 1) * 3
                } else if level <= 40 {
                    70 + (level - 21) * 5
                } else {
                    170 + (level - 41) * 8
                }
            }
            ExpCurve::Multiplicative { factor } => {
                ((previous.max(1) as f32) * factor).floor().max(previous as f32) as u32
            }
        }
    }
}

/// Stats stamped onto every enemy a wave spawns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub archetype: EnemyArchetype,
    pub hp: f32,
    pub damage: f32,
    pub speed: f32,
    pub exp: u32,
    /// Visual tag, 0xRRGGBB
    pub color: u32,
}

/// One time-activated spawn descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveRow {
    /// Activation time in simulated seconds
    pub time_secs: f32,
    /// Spawn interval in simulated frames
    pub interval: f32,
    pub template: EnemyTemplate,
}

impl WaveRow {
    fn new(time_secs: f32, interval: f32, archetype: EnemyArchetype, stats: [f32; 3], exp: u32, color: u32) -> Self {
        Self {
            time_secs,
            interval,
            template: EnemyTemplate {
                archetype,
                hp: stats[0],
                damage: stats[1],
                speed: stats[2],
                exp,
                color,
            },
        }
    }
}

/// A named boss that appears exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossSpawn {
    pub boss: BossKind,
    pub time_secs: f32,
    pub hp: f32,
    pub damage: f32,
    pub speed: f32,
    pub exp: u32,
    /// Screen shake (intensity, duration) on arrival
    pub shake: (f32, f32),
    pub color: u32,
}

/// Population caps enforced at the end of every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Caps {
    pub enemies: usize,
    pub projectiles: usize,
    pub gems: usize,
    pub damage_numbers: usize,
    pub footprints: usize,
    pub trails: usize,
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            enemies: 200,
            projectiles: 500,
            gems: 300,
            damage_numbers: 50,
            footprints: 30,
            trails: 100,
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub caps: Caps,
    pub exp_curve: ExpCurve,
    /// Simulated frames per tick
    pub time_scale: f32,
    /// Regular enemies appear on this ring around the player
    pub spawn_radius: f32,
    /// Named bosses appear on this ring around the player
    pub boss_spawn_radius: f32,
    /// Auto-aim and homing search radius
    pub aim_radius: f32,
    /// Enemies farther than this from the player are culled
    pub enemy_cull_distance: f32,
    /// Gems farther than this from the player are culled
    pub gem_cull_distance: f32,
    /// HUD snapshot cadence in simulated frames
    pub hud_interval: u32,
    /// Heal offers stay locked until this many simulated seconds
    pub heal_gate_secs: f32,
    pub waves: Vec<WaveRow>,
    pub bosses: Vec<BossSpawn>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            caps: Caps::default(),
            exp_curve: ExpCurve::Segmented,
            time_scale: TIME_SCALE,
            spawn_radius: 800.0,
            boss_spawn_radius: 600.0,
            aim_radius: 800.0,
            enemy_cull_distance: CANVAS_WIDTH * 2.0,
            gem_cull_distance: CANVAS_WIDTH * 1.5,
            hud_interval: 10,
            heal_gate_secs: 180.0,
            waves: default_waves(),
            bosses: default_bosses(),
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> SimResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: &std::path::Path) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SimError::InvalidTuning(format!("{}: {e}", path.display())))?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the tick cannot run with
    pub fn validate(&self) -> SimResult<()> {
        if !(self.time_scale > 0.0) {
            return Err(SimError::InvalidTuning(format!(
                "time_scale must be positive, got {}",
                self.time_scale
            )));
        }
        let caps = &self.caps;
        if caps.enemies == 0 || caps.projectiles == 0 || caps.gems == 0 {
            return Err(SimError::InvalidTuning("entity caps must be non-zero".into()));
        }
        if let ExpCurve::Multiplicative { factor } = self.exp_curve {
            if factor < 1.0 {
                return Err(SimError::InvalidTuning(format!(
                    "exp curve factor must be >= 1, got {factor}"
                )));
            }
        }
        if let Some(row) = self.waves.iter().find(|w| w.interval <= 0.0) {
            return Err(SimError::InvalidTuning(format!(
                "wave at {}s has non-positive interval",
                row.time_secs
            )));
        }
        Ok(())
    }
}

fn default_waves() -> Vec<WaveRow> {
    use EnemyArchetype::*;
    vec![
        // Early game
        WaveRow::new(0.0, 60.0, Slime, [10.0, 5.0, 1.5], 1, 0xa8e6cf),
        WaveRow::new(0.0, 150.0, Elf, [20.0, 6.0, 2.0], 3, 0x87ceeb),
        WaveRow::new(60.0, 40.0, Slime, [25.0, 7.0, 1.8], 2, 0x7fb069),
        // Mid game
        WaveRow::new(180.0, 30.0, Slime, [50.0, 10.0, 2.2], 4, 0x3b7a57),
        WaveRow::new(180.0, 80.0, Elf, [60.0, 12.0, 2.5], 5, 0x4682b4),
        WaveRow::new(240.0, 20.0, Ghost, [80.0, 12.0, 2.5], 6, 0x5a6c7d),
        // Late game
        WaveRow::new(360.0, 20.0, Slime, [120.0, 18.0, 2.8], 8, 0x2d5016),
        WaveRow::new(360.0, 50.0, Elf, [140.0, 20.0, 3.0], 10, 0x1e5a8e),
        WaveRow::new(420.0, 15.0, Ghost, [180.0, 22.0, 3.2], 12, 0x2c3e50),
        // Endgame
        WaveRow::new(540.0, 12.0, Slime, [250.0, 25.0, 3.5], 15, 0x641e16),
        WaveRow::new(540.0, 35.0, Elf, [300.0, 28.0, 3.8], 18, 0x154360),
        WaveRow::new(540.0, 10.0, Ghost, [350.0, 30.0, 4.0], 20, 0x17202a),
    ]
}

fn default_bosses() -> Vec<BossSpawn> {
    vec![
        BossSpawn {
            boss: BossKind::Cirno,
            time_secs: 180.0,
            hp: 1500.0,
            damage: 20.0,
            speed: 2.0,
            exp: 250,
            shake: (20.0, 30.0),
            color: 0x3498db,
        },
        BossSpawn {
            boss: BossKind::Youmu,
            time_secs: 360.0,
            hp: 2500.0,
            damage: 25.0,
            speed: 2.5,
            exp: 400,
            shake: (25.0, 40.0),
            color: 0x9bd1a8,
        },
        BossSpawn {
            boss: BossKind::Kaguya,
            time_secs: 540.0,
            hp: 3000.0,
            damage: 30.0,
            speed: 2.2,
            exp: 500,
            shake: (30.0, 50.0),
            color: 0xd35fb7,
        },
    ]
}
