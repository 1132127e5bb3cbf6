//! Host-facing session loop
//!
//! Wraps a [`SimulationState`] with the pieces a frontend needs: a frame
//! accumulator that runs fixed ticks against real elapsed time, panic
//! containment around each tick, throttled HUD snapshots, level-up offers
//! and the game-over callback.

use std::panic::{self, AssertUnwindSafe};

use rand_pcg::Pcg32;
use serde::Serialize;

use crate::catalog::Character;
use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::sim::offers::{self, UpgradeOption};
use crate::sim::progression;
use crate::sim::rng::{RandomSource, seeded};
use crate::sim::state::{GameEvent, Phase, SimulationState};
use crate::sim::tick::{TickInput, tick};
use crate::tuning::Tuning;

/// Seconds of real time one tick stands for
pub const SIM_DT: f32 = 1.0 / FPS;
/// Longest frame the accumulator accepts, so a stalled host doesn't
/// replay seconds of gameplay at once
const MAX_FRAME: f32 = 0.1;

/// Low-frequency state sample for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub hp: f32,
    pub max_hp: f32,
    pub exp: u32,
    pub next_exp: u32,
    pub level: u32,
    pub elapsed_secs: f32,
    pub kills: u32,
    pub gold: u32,
}

impl HudSnapshot {
    pub fn of(state: &SimulationState) -> Self {
        let player = &state.player;
        Self {
            hp: player.stats.hp,
            max_hp: player.stats.max_hp,
            exp: player.exp,
            next_exp: player.next_exp,
            level: player.level,
            elapsed_secs: state.elapsed_secs(),
            kills: player.kills,
            gold: player.gold,
        }
    }
}

/// Build summary handed to the level-up screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelUpContext {
    pub level: u32,
    /// Owned weapons as (id, level)
    pub weapons: Vec<(&'static str, u32)>,
    pub passives: Vec<&'static str>,
    pub hp: f32,
    pub max_hp: f32,
    pub elapsed_secs: f32,
}

impl LevelUpContext {
    pub fn of(state: &SimulationState) -> Self {
        let player = &state.player;
        Self {
            level: player.level,
            weapons: player.weapons.iter().map(|w| (w.id(), w.level)).collect(),
            passives: player.passives.clone(),
            hp: player.stats.hp,
            max_hp: player.stats.max_hp,
            elapsed_secs: state.elapsed_secs(),
        }
    }
}

/// Callbacks into the UI layer. Every method has a no-op default.
pub trait SessionObserver {
    /// A level-up is waiting for a choice. Fired once per offer.
    fn on_level_up(&mut self, _context: &LevelUpContext, _options: &[UpgradeOption]) {}

    /// The run ended. Fired exactly once.
    fn on_game_over(&mut self, _minutes: u32) {}

    /// Throttled HUD sample
    fn on_hud(&mut self, _hud: &HudSnapshot) {}

    /// Every event the tick produced, in order
    fn on_event(&mut self, _event: &GameEvent) {}
}

impl SessionObserver for () {}

/// One run of the game
pub struct Session<R: RandomSource = Pcg32> {
    state: SimulationState,
    rng: R,
    input: TickInput,
    accumulator: f32,
    ticks: u64,
    offers: Vec<UpgradeOption>,
    game_over_reported: bool,
}

impl Session<Pcg32> {
    /// Start a run with a seeded generator
    pub fn new(character: Character, tuning: Tuning, seed: u64) -> Self {
        log::info!("Started run with seed {seed}");
        Self::with_rng(character, tuning, seeded(seed))
    }
}

impl<R: RandomSource> Session<R> {
    pub fn with_rng(character: Character, tuning: Tuning, rng: R) -> Self {
        Self {
            state: SimulationState::new(character, tuning),
            rng,
            input: TickInput::default(),
            accumulator: 0.0,
            ticks: 0,
            offers: Vec::new(),
            game_over_reported: false,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Direct access for hosts and tests that stage a situation
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Options of the pending level-up, empty when none is pending
    pub fn offers(&self) -> &[UpgradeOption] {
        &self.offers
    }

    /// Movement intent used by every following tick
    pub fn set_movement(&mut self, movement: glam::Vec2) {
        self.input.movement = movement;
    }

    /// Request a dash on the next tick
    pub fn dash(&mut self, target: glam::Vec2) {
        self.input.dash_target = Some(target);
    }

    /// Throw away the run and start over with `character`
    pub fn restart(&mut self, character: Character) {
        let tuning = self.state.tuning.clone();
        self.state = SimulationState::new(character, tuning);
        self.input = TickInput::default();
        self.accumulator = 0.0;
        self.ticks = 0;
        self.offers.clear();
        self.game_over_reported = false;
    }

    /// Feed real elapsed seconds and run as many ticks as are due.
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, frame_secs: f32, observer: &mut dyn SessionObserver) -> u32 {
        self.accumulator += frame_secs.clamp(0.0, MAX_FRAME);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if !self.step(observer) {
                // Paused or over: real time passing doesn't bank ticks
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one tick. Returns false when the phase froze the tick.
    ///
    /// A panicking tick is logged and the run goes on from whatever state
    /// it left behind. Collections taken out for that tick's pass (enemies
    /// or projectiles in flight) are lost for that frame.
    pub fn step(&mut self, observer: &mut dyn SessionObserver) -> bool {
        if self.state.phase != Phase::Playing {
            return false;
        }

        let input = self.input;
        let state = &mut self.state;
        let rng = &mut self.rng;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| tick(state, &input, rng)));
        if let Err(cause) = outcome {
            log::error!("Tick {} panicked: {}", self.ticks, panic_message(cause.as_ref()));
        }
        self.input.dash_target = None;
        self.ticks += 1;

        self.dispatch(observer);
        let every = self.state.tuning.hud_interval.max(1) as u64;
        if self.ticks % every == 0 {
            observer.on_hud(&HudSnapshot::of(&self.state));
        }
        true
    }

    /// Apply one of the offered options.
    ///
    /// Errors are logged and still spend the level-up.
    pub fn choose(&mut self, option: &UpgradeOption, observer: &mut dyn SessionObserver) -> SimResult<()> {
        self.offers.clear();
        let result = progression::apply_upgrade(&mut self.state, option);
        match &result {
            Ok(()) => log::info!("Chose {}", option.id),
            Err(e) => log::warn!("Choice {} ignored: {e}", option.id),
        }
        self.dispatch(observer);
        result
    }

    /// Apply the option at `index` of the current offer
    pub fn choose_index(&mut self, index: usize, observer: &mut dyn SessionObserver) -> SimResult<()> {
        let option = self.offers.get(index).cloned().ok_or(SimError::NoSuchOption(index))?;
        self.choose(&option, observer)
    }

    fn dispatch(&mut self, observer: &mut dyn SessionObserver) {
        for event in self.state.drain_events() {
            observer.on_event(&event);
            if let GameEvent::GameOver { minutes } = event {
                if !self.game_over_reported {
                    self.game_over_reported = true;
                    observer.on_game_over(minutes);
                }
            }
        }

        if self.state.phase == Phase::AwaitingUpgrade && self.offers.is_empty() {
            self.offers = offers::generate(
                &self.state.player,
                self.state.elapsed_secs(),
                self.state.tuning.heal_gate_secs,
                &mut self.rng,
            );
            observer.on_level_up(&LevelUpContext::of(&self.state), &self.offers);
        }
    }
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = cause.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::Projectile;

    #[derive(Default)]
    struct Recorder {
        level_ups: Vec<(LevelUpContext, usize)>,
        game_overs: Vec<u32>,
        huds: Vec<HudSnapshot>,
        events: Vec<GameEvent>,
    }

    impl SessionObserver for Recorder {
        fn on_level_up(&mut self, context: &LevelUpContext, options: &[UpgradeOption]) {
            self.level_ups.push((context.clone(), options.len()));
        }

        fn on_game_over(&mut self, minutes: u32) {
            self.game_overs.push(minutes);
        }

        fn on_hud(&mut self, hud: &HudSnapshot) {
            self.huds.push(*hud);
        }

        fn on_event(&mut self, event: &GameEvent) {
            self.events.push(event.clone());
        }
    }

    fn make_session() -> Session {
        let mut tuning = Tuning::default();
        tuning.waves.clear();
        tuning.bosses.clear();
        Session::new(Character::Reimu, tuning, 42)
    }

    struct PanickingRandom;

    impl RandomSource for PanickingRandom {
        fn next_f32(&mut self) -> f32 {
            panic!("random source exhausted");
        }
    }

    #[test]
    fn test_accumulator_runs_due_ticks() {
        let mut session = make_session();
        assert_eq!(session.update(0.06, &mut ()), 3);
        assert_eq!(session.ticks(), 3);
        // Long frames are clamped
        assert_eq!(session.update(5.0, &mut ()), 6);
    }

    #[test]
    fn test_hud_is_throttled() {
        let mut session = make_session();
        let mut recorder = Recorder::default();
        for _ in 0..20 {
            session.step(&mut recorder);
        }
        assert_eq!(recorder.huds.len(), 2);
    }

    #[test]
    fn test_level_up_offers_once_and_pauses() {
        let mut session = make_session();
        let mut recorder = Recorder::default();
        let pos = session.state().player.pos;
        session.state_mut().add_gem(pos, 10);
        assert!(session.step(&mut recorder));
        assert_eq!(session.state().phase, Phase::AwaitingUpgrade);
        assert_eq!(recorder.level_ups.len(), 1);
        assert_eq!(recorder.level_ups[0].1, 3);
        assert_eq!(recorder.level_ups[0].0.level, 2);
        assert!(recorder.events.contains(&GameEvent::LevelUp { level: 2 }));

        let ticks = session.ticks();
        assert!(!session.step(&mut recorder));
        assert_eq!(session.update(0.05, &mut recorder), 0);
        assert_eq!(session.ticks(), ticks);

        session.choose_index(0, &mut recorder).unwrap();
        assert!(session.offers().is_empty());
        assert_eq!(session.state().phase, Phase::Playing);
        assert_eq!(recorder.level_ups.len(), 1);
    }

    #[test]
    fn test_second_pending_level_reoffers() {
        let mut session = make_session();
        let mut recorder = Recorder::default();
        session.state_mut().player.pending_level_ups = 2;
        session.state_mut().phase = Phase::AwaitingUpgrade;
        session.choose(&UpgradeOption::gold(), &mut recorder).unwrap();
        assert_eq!(recorder.level_ups.len(), 1);
        assert_eq!(session.offers().len(), 3);
        session.choose_index(2, &mut recorder).unwrap();
        assert_eq!(session.state().phase, Phase::Playing);
    }

    #[test]
    fn test_choose_index_out_of_range() {
        let mut session = make_session();
        let err = session.choose_index(5, &mut ()).unwrap_err();
        assert!(matches!(err, SimError::NoSuchOption(5)));
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut session = make_session();
        let mut recorder = Recorder::default();
        let state = session.state_mut();
        state.player.stats.hp = 1.0;
        state.player.stats.armor = 0.0;
        let pos = state.player.pos;
        state.add_projectile(Projectile::hostile(pos, glam::Vec2::ZERO, 50.0, 100.0, 5.0));
        session.step(&mut recorder);
        session.step(&mut recorder);
        session.update(0.1, &mut recorder);
        assert_eq!(recorder.game_overs, vec![0]);
        assert_eq!(session.state().phase, Phase::GameOver);
        assert!(!session.state().player.alive);
    }

    #[test]
    fn test_panicking_tick_is_contained() {
        let mut tuning = Tuning::default();
        tuning.waves.clear();
        tuning.bosses.clear();
        let mut session = Session::with_rng(Character::Reimu, tuning, PanickingRandom);
        session.state_mut().shake.trigger(5.0, 10.0);
        assert!(session.step(&mut ()));
        assert_eq!(session.ticks(), 1);
        // The next frame still runs from the state the failed tick left
        assert!(session.step(&mut ()));
        assert_eq!(session.ticks(), 2);
        assert_eq!(session.state().phase, Phase::Playing);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut session = make_session();
        session.update(0.06, &mut ());
        session.restart(Character::Marisa);
        assert_eq!(session.ticks(), 0);
        assert_eq!(session.state().time, 0.0);
        assert_eq!(session.state().player.character, Character::Marisa);
    }
}
