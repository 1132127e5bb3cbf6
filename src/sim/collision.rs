//! Hit tests and target selection
//!
//! Everything is circle-circle overlap except lasers, which test an
//! infinite forward strip. Target selection is a linear scan in collection
//! order with a strict `<` on distance, so the first-found enemy wins ties.

use glam::Vec2;

use super::projectile::{Projectile, ProjectileKind};
use super::state::Enemy;

/// `distance < ra + rb`
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Strip test for a beam starting at `origin` along unit `dir`.
///
/// A point is hit when it lies ahead of the origin and closer than
/// `half_width` to the beam's center line.
pub fn laser_hits(origin: Vec2, dir: Vec2, half_width: f32, point: Vec2) -> bool {
    let offset = point - origin;
    let forward = offset.dot(dir);
    if forward <= 0.0 {
        return false;
    }
    let perpendicular = offset.perp_dot(dir).abs();
    perpendicular < half_width
}

/// Whether a player projectile touches an enemy.
///
/// `area` scales the projectile radius; lasers ignore it.
pub fn projectile_hits_enemy(p: &Projectile, e: &Enemy, area: f32) -> bool {
    match p.kind {
        ProjectileKind::Laser { dir } => laser_hits(p.pos, dir, p.radius, e.pos),
        ProjectileKind::TimeStop { .. } => false,
        ProjectileKind::Bullet | ProjectileKind::BlackHole { .. } => {
            circles_overlap(p.pos, p.radius * area, e.pos, e.radius)
        }
    }
}

/// Index of the nearest living enemy to `from` within `radius`
pub fn nearest_enemy(enemies: &[Enemy], from: Vec2, radius: f32) -> Option<usize> {
    nearest_enemy_where(enemies, from, radius, |_| true)
}

/// Index of the nearest living enemy accepted by `filter`
pub fn nearest_enemy_where(
    enemies: &[Enemy],
    from: Vec2,
    radius: f32,
    filter: impl Fn(&Enemy) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, e) in enemies.iter().enumerate() {
        if !e.is_alive() || !filter(e) {
            continue;
        }
        let d = e.pos.distance(from);
        if d >= radius {
            continue;
        }
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EnemyAi, EnemyArchetype};
    use crate::tuning::EnemyTemplate;

    fn enemy(id: u32, pos: Vec2, hp: f32) -> Enemy {
        let template = EnemyTemplate {
            archetype: EnemyArchetype::Fairy,
            hp: 10.0,
            damage: 1.0,
            speed: 1.0,
            exp: 1,
            color: 0,
        };
        let mut e = Enemy::from_template(id, pos, &template, EnemyAi::Chase);
        e.hp = hp;
        e
    }

    #[test]
    fn test_circles_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_laser_only_hits_ahead() {
        assert!(laser_hits(Vec2::ZERO, Vec2::X, 50.0, Vec2::new(3000.0, 40.0)));
        assert!(!laser_hits(Vec2::ZERO, Vec2::X, 50.0, Vec2::new(3000.0, 60.0)));
        assert!(!laser_hits(Vec2::ZERO, Vec2::X, 50.0, Vec2::new(-100.0, 0.0)));
    }

    #[test]
    fn test_nearest_first_found_wins_ties() {
        let enemies = vec![
            enemy(1, Vec2::new(100.0, 0.0), 10.0),
            enemy(2, Vec2::new(-100.0, 0.0), 10.0),
            enemy(3, Vec2::new(50.0, 0.0), 0.0),
        ];
        // The closest one is dead and skipped
        assert_eq!(nearest_enemy(&enemies, Vec2::ZERO, 800.0), Some(0));
        assert_eq!(nearest_enemy(&enemies, Vec2::ZERO, 99.0), None);
    }

    #[test]
    fn test_nearest_with_filter() {
        let enemies = vec![
            enemy(1, Vec2::new(10.0, 0.0), 10.0),
            enemy(2, Vec2::new(20.0, 0.0), 10.0),
        ];
        let found = nearest_enemy_where(&enemies, Vec2::ZERO, 800.0, |e| e.id != 1);
        assert_eq!(found, Some(1));
    }

    #[test]
    fn test_area_scales_bullets() {
        let p = Projectile::new(Vec2::ZERO, Vec2::X, 1.0, 10.0, 10.0);
        let e = enemy(1, Vec2::new(40.0, 0.0), 10.0);
        assert!(!projectile_hits_enemy(&p, &e, 1.0));
        assert!(projectile_hits_enemy(&p, &e, 2.0));
    }
}
