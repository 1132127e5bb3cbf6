//! Property tests over seeded runs

use danmaku_survivors::catalog::Character;
use danmaku_survivors::sim::offers;
use danmaku_survivors::sim::{Player, seeded};
use danmaku_survivors::{Session, Tuning};
use glam::Vec2;
use proptest::prelude::*;

fn character() -> impl Strategy<Value = Character> {
    prop::sample::select(Character::ALL.to_vec())
}

fn movement() -> impl Strategy<Value = Vec2> {
    (-1.0f32..=1.0, -1.0f32..=1.0).prop_map(|(x, y)| Vec2::new(x, y))
}

/// Play `ticks` ticks, holding each movement for 20 ticks and always
/// taking the first offered option
fn play(session: &mut Session, moves: &[Vec2], ticks: usize, mut check: impl FnMut(&Session)) {
    for i in 0..ticks {
        if !session.offers().is_empty() {
            let _ = session.choose_index(0, &mut ());
        }
        session.set_movement(moves[(i / 20) % moves.len()]);
        if !session.step(&mut ()) && session.offers().is_empty() {
            break;
        }
        check(session);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_state_stays_in_bounds(
        seed in any::<u64>(),
        character in character(),
        moves in prop::collection::vec(movement(), 1..8),
    ) {
        let mut session = Session::new(character, Tuning::default(), seed);
        play(&mut session, &moves, 300, |s| {
            let state = s.state();
            let stats = &state.player.stats;
            assert!(stats.hp >= 0.0 && stats.hp <= stats.max_hp, "hp {} of {}", stats.hp, stats.max_hp);
            for e in &state.enemies {
                assert!(e.hp <= e.max_hp);
            }
            for w in &state.player.weapons {
                assert!(w.level >= 1 && w.level <= w.def.max_level);
            }
            let caps = &state.tuning.caps;
            assert!(state.enemies.len() <= caps.enemies);
            assert!(state.projectiles.len() <= caps.projectiles);
            assert!(state.gems.len() <= caps.gems);
            assert!(state.damage_numbers.len() <= caps.damage_numbers);
            assert!(state.footprints.len() <= caps.footprints);
            assert!(state.trails.len() <= caps.trails);
        });
    }

    #[test]
    fn prop_seeded_runs_are_deterministic(
        seed in any::<u64>(),
        character in character(),
        moves in prop::collection::vec(movement(), 1..4),
    ) {
        let mut a = Session::new(character, Tuning::default(), seed);
        let mut b = Session::new(character, Tuning::default(), seed);
        play(&mut a, &moves, 200, |_| {});
        play(&mut b, &moves, 200, |_| {});
        let a_json = serde_json::to_string(a.state()).unwrap();
        let b_json = serde_json::to_string(b.state()).unwrap();
        prop_assert_eq!(a_json, b_json);
    }

    #[test]
    fn prop_weighted_offer_has_three(
        seed in any::<u64>(),
        character in character(),
        level in 1u32..=2,
        hp_fraction in 0.05f32..=1.0,
        elapsed in 0.0f32..1200.0,
    ) {
        let mut player = Player::new(character, 10);
        for w in &mut player.weapons {
            w.level = level;
        }
        player.stats.hp = player.stats.max_hp * hp_fraction;
        let mut rng = seeded(seed);
        let offer = offers::generate(&player, elapsed, 180.0, &mut rng);
        prop_assert_eq!(offer.len(), 3);
    }
}
