//! Danmaku Survivors headless runner
//!
//! Plays a run with a simple autopilot and prints a summary. Useful for
//! soak-testing the simulation and for tuning wave tables.
//!
//! # Usage
//!
//! ```bash
//! danmaku-survivors --seed 7 --character mokou
//! danmaku-survivors --minutes 15 --tuning waves.json
//! danmaku-survivors --exp-curve multiplicative
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use danmaku_survivors::catalog::Character;
use danmaku_survivors::sim::GameEvent;
use danmaku_survivors::sim::offers::OptionKind;
use danmaku_survivors::{ExpCurve, HudSnapshot, LevelUpContext, Session, SessionObserver, Tuning};
use danmaku_survivors::consts::FPS;

#[derive(Parser)]
#[command(name = "danmaku-survivors")]
#[command(author, version, about = "Danmaku Survivors - headless simulation runner")]
struct Args {
    /// Seed for the run's random source
    #[arg(long, short = 's', default_value = "1")]
    seed: u64,

    /// Character id (reimu, mokou, marisa, sakuya, yuma, koishi)
    #[arg(long, short = 'c', default_value = "reimu", value_parser = parse_character)]
    character: Character,

    /// Simulated minutes to play before stopping
    #[arg(long, short = 'm', default_value = "10")]
    minutes: f32,

    /// JSON tuning overrides
    #[arg(long, short = 't')]
    tuning: Option<PathBuf>,

    /// Experience curve (segmented or multiplicative), overrides the tuning file
    #[arg(long, value_parser = parse_exp_curve)]
    exp_curve: Option<ExpCurve>,
}

fn parse_character(s: &str) -> Result<Character, String> {
    Character::from_id(s).ok_or_else(|| format!("unknown character '{s}'"))
}

fn parse_exp_curve(s: &str) -> Result<ExpCurve, String> {
    ExpCurve::from_str(s).ok_or_else(|| format!("unknown experience curve '{s}'"))
}

/// Counts what happened and remembers the last HUD sample
#[derive(Default)]
struct Log {
    level_ups: u32,
    bosses: u32,
    revives: u32,
    game_over: Option<u32>,
    last_hud: Option<HudSnapshot>,
}

impl SessionObserver for Log {
    fn on_level_up(&mut self, context: &LevelUpContext, _options: &[danmaku_survivors::sim::UpgradeOption]) {
        self.level_ups += 1;
        log::debug!("Level {} at {:.0}s", context.level, context.elapsed_secs);
    }

    fn on_game_over(&mut self, minutes: u32) {
        self.game_over = Some(minutes);
    }

    fn on_hud(&mut self, hud: &HudSnapshot) {
        self.last_hud = Some(*hud);
    }

    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::BossSpawned(_) => self.bosses += 1,
            GameEvent::Revived { .. } => self.revives += 1,
            _ => {}
        }
    }
}

/// Prefer tier choices, then weapons, then anything
fn pick(options: &[danmaku_survivors::sim::UpgradeOption]) -> usize {
    options
        .iter()
        .position(|o| o.kind == OptionKind::WeaponUpgrade)
        .or_else(|| options.iter().position(|o| o.kind == OptionKind::Weapon))
        .unwrap_or(0)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let mut tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(t) => t,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    if let Some(curve) = args.exp_curve {
        tuning.exp_curve = curve;
    }

    log::info!(
        "Headless run: {} for {} minutes, {} curve",
        args.character.name(),
        args.minutes,
        tuning.exp_curve.as_str()
    );
    let mut session = Session::new(args.character, tuning, args.seed);
    let mut observer = Log::default();
    let total_ticks = (args.minutes * 60.0 * FPS / session.state().tuning.time_scale) as u64;

    while session.ticks() < total_ticks && observer.game_over.is_none() {
        if !session.offers().is_empty() {
            let choice = pick(session.offers());
            // Errors are already logged by the session
            let _ = session.choose_index(choice, &mut observer);
            continue;
        }

        // Walk in a slow circle and dash every few seconds
        let t = session.ticks() as f32 * 0.01;
        session.set_movement(glam::Vec2::new(t.cos(), t.sin()));
        if session.ticks() % 300 == 0 {
            let ahead = session.state().player.pos + session.state().player.facing * 300.0;
            session.dash(ahead);
        }
        session.step(&mut observer);
    }

    let state = session.state();
    let hud = observer.last_hud.unwrap_or_else(|| HudSnapshot::of(state));
    println!("character   {}", args.character.name());
    println!("survived    {:.0}s", hud.elapsed_secs);
    println!("level       {}", hud.level);
    println!("kills       {}", hud.kills);
    println!("gold        {}", hud.gold);
    println!("level-ups   {}", observer.level_ups);
    println!("bosses      {}", observer.bosses);
    println!("revives     {}", observer.revives);
    println!(
        "weapons     {}",
        state.player.weapons.iter().map(|w| format!("{}:{}", w.id(), w.level)).collect::<Vec<_>>().join(" ")
    );
    match observer.game_over {
        Some(minutes) => println!("result      died after {minutes} minutes"),
        None => println!("result      alive"),
    }
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {}
