//! Wave director and boss schedule

use std::f32::consts::TAU;

use super::enemy_ai::initial_ai;
use super::rng::RandomSource;
use super::state::{Enemy, GameEvent, SimulationState};
use crate::on_interval;
use crate::polar;
use crate::tuning::{Tuning, WaveRow};

/// The latest row per archetype whose activation time has passed.
///
/// Archetypes keep the order in which they first appear in the table.
pub fn active_waves(tuning: &Tuning, elapsed_secs: f32) -> Vec<&WaveRow> {
    let mut active: Vec<&WaveRow> = Vec::new();
    for row in tuning.waves.iter().filter(|r| r.time_secs <= elapsed_secs) {
        match active
            .iter_mut()
            .find(|a| a.template.archetype == row.template.archetype)
        {
            Some(slot) if slot.time_secs <= row.time_secs => *slot = row,
            Some(_) => {}
            None => active.push(row),
        }
    }
    active
}

/// Spawn regular enemies and any bosses that are due
pub fn spawn_enemies(state: &mut SimulationState, rng: &mut dyn RandomSource, dt: f32) {
    let elapsed = state.elapsed_secs();
    let due: Vec<_> = active_waves(&state.tuning, elapsed)
        .into_iter()
        .filter(|row| {
            let every = (row.interval / dt).floor().max(1.0) as u32;
            on_interval(state.time, every)
        })
        .map(|row| row.template.clone())
        .collect();

    for template in due {
        if state.enemies.len() >= state.tuning.caps.enemies {
            break;
        }
        let angle = rng.next_f32() * TAU;
        let pos = state.player.pos + polar(angle, state.tuning.spawn_radius);
        let ai = initial_ai(template.archetype, rng);
        let id = state.next_entity_id();
        state.enemies.push(Enemy::from_template(id, pos, &template, ai));
    }

    spawn_bosses(state, rng, elapsed);
}

fn spawn_bosses(state: &mut SimulationState, rng: &mut dyn RandomSource, elapsed: f32) {
    let due: Vec<_> = state
        .tuning
        .bosses
        .iter()
        .filter(|b| b.time_secs <= elapsed && !state.bosses_spawned.contains(&b.boss))
        .cloned()
        .collect();

    for spawn in due {
        let angle = rng.next_f32() * TAU;
        let pos = state.player.pos + polar(angle, state.tuning.boss_spawn_radius);
        let id = state.next_entity_id();
        state.enemies.push(Enemy::boss(id, pos, &spawn));
        state.bosses_spawned.push(spawn.boss);
        state.shake.trigger(spawn.shake.0, spawn.shake.1);
        state.events.push(GameEvent::BossSpawned(spawn.boss));
        log::info!("{} appeared at {:.0}s", spawn.boss.name(), elapsed);
    }
}
