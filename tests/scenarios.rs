//! End-to-end gameplay scenarios driven through the public API

use danmaku_survivors::catalog::Character;
use danmaku_survivors::catalog::upgrades;
use danmaku_survivors::consts::REVIVE_INVULN;
use danmaku_survivors::sim::offers::{self, OptionKind};
use danmaku_survivors::sim::state::EnemyAi;
use danmaku_survivors::sim::{
    Enemy, EnemyArchetype, GameEvent, Phase, Projectile, SimulationState, TickInput, UpgradeOption, seeded, tick,
};
use danmaku_survivors::tuning::EnemyTemplate;
use danmaku_survivors::{Session, SimError, Tuning};
use glam::Vec2;

/// Tuning with no scheduled spawns so each scenario stages its own field
fn quiet_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.waves.clear();
    tuning.bosses.clear();
    tuning
}

fn make_state(character: Character) -> SimulationState {
    let mut state = SimulationState::new(character, quiet_tuning());
    state.player.stats.crit_rate = 0.0;
    state.player.weapons.clear();
    state
}

fn make_session() -> Session {
    Session::new(Character::Reimu, quiet_tuning(), 42)
}

fn add_enemy(state: &mut SimulationState, pos: Vec2, hp: f32, damage: f32) -> u32 {
    let template = EnemyTemplate {
        archetype: EnemyArchetype::Fairy,
        hp,
        damage,
        speed: 0.0,
        exp: 2,
        color: 0,
    };
    let id = state.next_entity_id();
    state.enemies.push(Enemy::from_template(id, pos, &template, EnemyAi::Chase));
    id
}

fn still_bullet(pos: Vec2, damage: f32) -> Projectile {
    Projectile::new(pos, Vec2::ZERO, damage, 60.0, 10.0).knockback(0.0)
}

// ── experience ──

#[test]
fn test_ten_exp_levels_up_exactly_once() {
    let mut state = make_state(Character::Reimu);
    let at = state.player.pos;
    state.add_gem(at, 10);
    let mut rng = seeded(1);

    tick(&mut state, &TickInput::default(), &mut rng);
    assert_eq!(state.player.level, 2);
    assert_eq!(state.player.exp, 0);
    assert_eq!(state.player.pending_level_ups, 1);
    assert_eq!(state.phase, Phase::AwaitingUpgrade);

    // Paused until the choice is made
    tick(&mut state, &TickInput::default(), &mut rng);
    assert_eq!(state.player.level, 2);
    let level_ups = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
        .count();
    assert_eq!(level_ups, 1);
}

#[test]
fn test_session_offers_once_per_level() {
    let mut session = make_session();
    let at = session.state().player.pos;
    session.state_mut().add_gem(at, 10);

    session.step(&mut ());
    assert_eq!(session.offers().len(), 3);
    assert!(!session.step(&mut ()));

    session.choose_index(0, &mut ()).unwrap();
    assert!(session.offers().is_empty());
    assert_eq!(session.state().phase, Phase::Playing);
}

// ── combat ──

#[test]
fn test_killing_blow_drops_one_gem() {
    let mut state = make_state(Character::Reimu);
    let at = state.player.pos + Vec2::new(200.0, 0.0);
    add_enemy(&mut state, at, 10.0, 5.0);
    state.add_projectile(still_bullet(at, 15.0));
    let mut rng = seeded(2);

    tick(&mut state, &TickInput::default(), &mut rng);
    assert!(state.enemies.is_empty());
    assert_eq!(state.gems.len(), 1);
    assert_eq!(state.gems[0].value, 2);
    assert_eq!(state.player.kills, 1);
    // Penetration 1 spent on the kill
    assert!(state.projectiles.is_empty());
}

#[test]
fn test_single_penetration_hits_one_of_two() {
    let mut state = make_state(Character::Reimu);
    let at = state.player.pos + Vec2::new(200.0, 0.0);
    let first = add_enemy(&mut state, at, 20.0, 5.0);
    let second = add_enemy(&mut state, at, 20.0, 5.0);
    state.add_projectile(still_bullet(at, 15.0));
    let mut rng = seeded(3);

    tick(&mut state, &TickInput::default(), &mut rng);
    let hp = |id: u32| state.enemies.iter().find(|e| e.id == id).map(|e| e.hp);
    assert_eq!(hp(first), Some(5.0));
    assert_eq!(hp(second), Some(20.0));
    assert!(state.projectiles.is_empty());
}

#[test]
fn test_piercing_projectile_hits_both() {
    let mut state = make_state(Character::Reimu);
    let at = state.player.pos + Vec2::new(200.0, 0.0);
    add_enemy(&mut state, at, 20.0, 5.0);
    add_enemy(&mut state, at, 20.0, 5.0);
    state.add_projectile(still_bullet(at, 15.0).pierce(3));
    let mut rng = seeded(3);

    tick(&mut state, &TickInput::default(), &mut rng);
    assert!(state.enemies.iter().all(|e| e.hp == 5.0));
    assert_eq!(state.projectiles[0].penetration, 1);
}

// ── death ──

#[test]
fn test_lethal_contact_consumes_revive() {
    let mut state = make_state(Character::Reimu);
    state.player.stats.revivals = 1;
    state.player.stats.hp = 1.0;
    let at = state.player.pos;
    add_enemy(&mut state, at, 1000.0, 50.0);
    add_enemy(&mut state, at + Vec2::new(300.0, 0.0), 1000.0, 5.0);
    let mut rng = seeded(4);

    tick(&mut state, &TickInput::default(), &mut rng);
    assert_eq!(state.phase, Phase::Playing);
    assert!(state.player.alive);
    assert_eq!(state.player.stats.revivals, 0);
    assert_eq!(state.player.stats.hp, state.player.stats.max_hp);
    assert_eq!(state.player.invuln, REVIVE_INVULN);
    assert!(state.enemies.is_empty());
    assert!(state.drain_events().contains(&GameEvent::Revived { revivals_left: 0 }));
}

#[test]
fn test_lethal_contact_without_revive_ends_run() {
    let mut state = make_state(Character::Reimu);
    state.player.stats.revivals = 0;
    state.player.stats.hp = 1.0;
    let at = state.player.pos;
    add_enemy(&mut state, at, 1000.0, 50.0);
    let mut rng = seeded(5);

    tick(&mut state, &TickInput::default(), &mut rng);
    assert_eq!(state.phase, Phase::GameOver);
    assert!(!state.player.alive);
    assert_eq!(state.player.stats.hp, 0.0);

    let time = state.time;
    tick(&mut state, &TickInput::default(), &mut rng);
    assert_eq!(state.time, time);
}

// ── level-up offers ──

#[test]
fn test_full_hp_never_offered_chicken() {
    let state = make_state(Character::Reimu);
    let mut rng = seeded(6);
    for _ in 0..500 {
        let offer = offers::generate(&state.player, 600.0, 180.0, &mut rng);
        assert!(offer.iter().all(|o| !o.is_gated_heal()));
    }
}

#[test]
fn test_hurt_player_is_offered_chicken_after_gate() {
    let mut state = make_state(Character::Reimu);
    state.player.stats.hp = 10.0;
    let mut rng = seeded(7);

    let early = (0..200).any(|_| {
        offers::generate(&state.player, 60.0, 180.0, &mut rng)
            .iter()
            .any(UpgradeOption::is_gated_heal)
    });
    assert!(!early);

    let late = (0..200).any(|_| {
        offers::generate(&state.player, 600.0, 180.0, &mut rng)
            .iter()
            .any(UpgradeOption::is_gated_heal)
    });
    assert!(late);
}

#[test]
fn test_unlocked_tier_takes_precedence() {
    let mut session = make_session();
    session.state_mut().player.weapons[0].level = 3;
    let at = session.state().player.pos;
    session.state_mut().add_gem(at, 10);

    session.step(&mut ());
    let offer = session.offers();
    assert_eq!(offer.len(), 3);
    assert!(offer.iter().all(|o| o.kind == OptionKind::WeaponUpgrade));
    assert!(offer.iter().all(|o| o.weapon == Some("homing_amulet")));
}

#[test]
fn test_repeated_tier_choice_is_rejected() {
    let mut session = make_session();
    session.state_mut().player.weapons[0].level = 3;
    let at = session.state().player.pos;
    // 10 for level 2, 13 for level 3
    session.state_mut().add_gem(at, 23);

    session.step(&mut ());
    assert_eq!(session.state().player.pending_level_ups, 2);
    let first = session.offers()[0].clone();
    session.choose(&first, &mut ()).unwrap();
    assert_eq!(session.state().player.weapons[0].upgrades, vec![first.id]);
    // Second level-up falls back to the weighted pool
    assert!(session.offers().iter().all(|o| o.kind != OptionKind::WeaponUpgrade));

    let (_, other) = upgrades::upgrade("homing_amulet", "amulet_pierce").unwrap();
    let stale = UpgradeOption::tier_choice(&session.state().player.weapons[0], other);
    let err = session.choose(&stale, &mut ()).unwrap_err();
    assert!(matches!(err, SimError::TierFilled { .. }));
    assert_eq!(session.state().player.weapons[0].upgrades, vec![first.id]);

    // The failed choice still spent the level-up
    assert_eq!(session.state().player.pending_level_ups, 0);
    assert_eq!(session.state().phase, Phase::Playing);
}
