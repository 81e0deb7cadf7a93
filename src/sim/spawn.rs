//! Spawning things from the top of the scene
//!
//! Each playing tick rolls once for a spawn. A hit then picks one kind from
//! a partition of [0, 100) built from `SpawnWeights`, in the order
//! power-up, coin, health, enemy ship, asteroid. With the default weights
//! that is `[0,20)` power-up, `[20,25)` coin, `[25,30)` health,
//! `[30,45)` enemy ship and `[45,100)` asteroid.

use glam::Vec2;
use rand::Rng;

use super::path::Mover;
use super::state::{Body, GameState, Obstacle, ObstacleKind, Pickup, PickupKind};
use crate::consts::*;
use crate::tuning::{SpawnWeights, Tuning};

/// Something that can drop into the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    PowerUp,
    Coin,
    Health,
    EnemyShip,
    Asteroid,
}

/// Whether a [0, 1000) draw triggers a spawn
pub fn roll_triggers_spawn(roll: u32, threshold: u32) -> bool {
    roll <= threshold
}

/// Map a [0, 100) draw to a spawn kind
pub fn kind_for_roll(roll: u32, weights: &SpawnWeights) -> SpawnKind {
    let table = [
        (weights.power_up, SpawnKind::PowerUp),
        (weights.coin, SpawnKind::Coin),
        (weights.health, SpawnKind::Health),
        (weights.enemy_ship, SpawnKind::EnemyShip),
    ];
    let mut upper: u64 = 0;
    for (weight, kind) in table {
        upper += u64::from(weight);
        if u64::from(roll) < upper {
            return kind;
        }
    }
    SpawnKind::Asteroid
}

/// Roll for a spawn this tick and spawn if it hits
pub fn maybe_spawn(state: &mut GameState) -> Option<SpawnKind> {
    let roll = state.rng.random_range(0..Tuning::SPAWN_ROLL_RANGE);
    if !roll_triggers_spawn(roll, state.tuning.spawn_threshold) {
        return None;
    }
    let kind_roll = state.rng.random_range(0..SpawnWeights::ROLL_RANGE);
    let kind = kind_for_roll(kind_roll, &state.tuning.spawn_weights);
    spawn(state, kind);
    Some(kind)
}

/// Drop one entity of `kind` into the scene
pub fn spawn(state: &mut GameState, kind: SpawnKind) {
    match kind {
        SpawnKind::Asteroid => spawn_asteroid(state),
        SpawnKind::EnemyShip => spawn_enemy_ship(state),
        SpawnKind::PowerUp => spawn_pickup(state, PickupKind::PowerUp),
        SpawnKind::Coin => spawn_pickup(state, PickupKind::Coin),
        SpawnKind::Health => spawn_pickup(state, PickupKind::Health),
    }
}

/// Uniform integer in [0, n) as f32
fn draw(state: &mut GameState, n: u32) -> f32 {
    state.rng.random_range(0..n.max(1)) as f32
}

/// Asteroids cross the scene on a straight diagonal, spinning as they go
fn spawn_asteroid(state: &mut GameState) {
    let scene = state.scene_size();
    let side = ASTEROID_MIN_SIDE as f32 + draw(state, ASTEROID_SIDE_RANGE);

    // Start anywhere from a quarter-width left of the scene to a quarter-width right of it
    let quarter = scene.x / 4.0;
    let start_x = draw(state, (scene.x + quarter * 2.0) as u32) - quarter;
    let start = Vec2::new(start_x, scene.y + side);
    let end = Vec2::new(draw(state, scene.x as u32), -side);

    let duration = 3.0 + draw(state, 5);
    let spin_period = 1.0 + draw(state, 3);

    let id = state.next_entity_id();
    let body = Body::new(
        id,
        Vec2::splat(side),
        Mover::linear(start, end, duration),
        &state.flight_path,
    )
    .with_spin(ASTEROID_SPIN_ANGLE / spin_period);
    log::debug!("Spawned asteroid {:?} side={} at {:?}", id, side, start);
    state.obstacles.push(Obstacle {
        kind: ObstacleKind::Asteroid,
        body,
    });
}

/// Enemy ships weave down the flight path
fn spawn_enemy_ship(state: &mut GameState) {
    let scene = state.scene_size();
    let start_x = draw(state, (scene.x - 40.0) as u32) + 20.0;
    let origin = Vec2::new(start_x, scene.y + FLYER_SIDE);

    let id = state.next_entity_id();
    let body = Body::new(
        id,
        Vec2::splat(FLYER_SIDE),
        Mover::path(origin, ENEMY_PATH_DURATION),
        &state.flight_path,
    );
    log::debug!("Spawned enemy ship {:?} at {:?}", id, origin);
    state.obstacles.push(Obstacle {
        kind: ObstacleKind::EnemyShip,
        body,
    });
}

/// Pickups follow the same path as enemies, a little faster
fn spawn_pickup(state: &mut GameState, kind: PickupKind) {
    let scene = state.scene_size();
    let start_x = draw(state, (scene.x - 60.0) as u32) + 30.0;
    let origin = Vec2::new(start_x, scene.y + FLYER_SIDE);

    let id = state.next_entity_id();
    let body = Body::new(
        id,
        Vec2::splat(FLYER_SIDE),
        Mover::path(origin, PICKUP_PATH_DURATION),
        &state.flight_path,
    );
    log::debug!("Spawned {:?} {:?} at {:?}", kind, id, origin);
    state.pickups.push(Pickup { kind, body });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_threshold_is_inclusive() {
        assert!(roll_triggers_spawn(0, 15));
        assert!(roll_triggers_spawn(15, 15));
        assert!(!roll_triggers_spawn(16, 15));
    }

    #[test]
    fn test_roll_of_ten_is_power_up() {
        let weights = SpawnWeights::default();
        assert_eq!(kind_for_roll(10, &weights), SpawnKind::PowerUp);
    }

    #[test]
    fn test_default_partition() {
        let weights = SpawnWeights::default();
        let kinds: Vec<SpawnKind> = (0..100).map(|r| kind_for_roll(r, &weights)).collect();
        assert!(kinds[..20].iter().all(|&k| k == SpawnKind::PowerUp));
        assert!(kinds[20..25].iter().all(|&k| k == SpawnKind::Coin));
        assert!(kinds[25..30].iter().all(|&k| k == SpawnKind::Health));
        assert!(kinds[30..45].iter().all(|&k| k == SpawnKind::EnemyShip));
        assert!(kinds[45..].iter().all(|&k| k == SpawnKind::Asteroid));
    }

    #[test]
    fn test_huge_weight_does_not_overflow() {
        let weights = SpawnWeights {
            power_up: 0,
            coin: u32::MAX,
            health: u32::MAX,
            enemy_ship: 0,
            asteroid: 0,
        };
        assert_eq!(kind_for_roll(99, &weights), SpawnKind::Coin);
        assert_eq!(weights.total(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_every_kind_reachable() {
        let weights = SpawnWeights::default();
        for kind in [
            SpawnKind::PowerUp,
            SpawnKind::Coin,
            SpawnKind::Health,
            SpawnKind::EnemyShip,
            SpawnKind::Asteroid,
        ] {
            assert!((0..100).any(|r| kind_for_roll(r, &weights) == kind), "{kind:?}");
        }
    }

    #[test]
    fn test_zero_weight_kind_unreachable() {
        let weights = SpawnWeights {
            power_up: 0,
            coin: 50,
            health: 0,
            enemy_ship: 0,
            asteroid: 50,
        };
        assert_eq!(kind_for_roll(0, &weights), SpawnKind::Coin);
        assert_eq!(kind_for_roll(50, &weights), SpawnKind::Asteroid);
    }

    #[test]
    fn test_asteroid_geometry() {
        let mut state = GameState::new(3);
        for _ in 0..50 {
            spawn(&mut state, SpawnKind::Asteroid);
        }
        let scene = state.scene_size();
        for obstacle in &state.obstacles {
            let side = obstacle.body.size.x;
            assert!((15.0..45.0).contains(&side));
            assert!((obstacle.body.pos.y - (scene.y + side)).abs() < 1e-3);
            assert!(obstacle.body.pos.x >= -scene.x / 4.0);
            assert!(obstacle.body.pos.x < scene.x * 1.25);
            assert!(obstacle.body.spin > 0.0);
        }
    }

    #[test]
    fn test_pickups_start_above_scene() {
        let mut state = GameState::new(4);
        for kind in [SpawnKind::PowerUp, SpawnKind::Coin, SpawnKind::Health] {
            spawn(&mut state, kind);
        }
        assert_eq!(state.pickups.len(), 3);
        for pickup in &state.pickups {
            // Path starts half a point off the origin
            assert!(pickup.body.pos.y > state.scene_size().y + 29.0);
            assert!(pickup.body.pos.x >= 30.0);
        }
    }

    #[test]
    fn test_spawn_rate_near_expected() {
        let mut state = GameState::new(42);
        let ticks = 20_000;
        let spawned = (0..ticks).filter(|_| maybe_spawn(&mut state).is_some()).count();
        // 16 in 1000
        let rate = spawned as f32 / ticks as f32;
        assert!((0.011..0.021).contains(&rate), "rate {rate}");
    }
}
