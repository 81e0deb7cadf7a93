//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::path::Mover;
use super::spawn::maybe_spawn;
use super::state::{
    Body, Effect, EffectKind, GameEvent, GamePhase, GameState, Obstacle, PickupKind, Projectile,
};
use super::timer::TimedAction;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer location while a pointer is held (mouse/touch)
    pub pointer: Option<Vec2>,
    /// A new press began this tick; the ship jumps straight to it
    pub pressed: bool,
    /// Demo mode - the sim flies the ship itself
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;
    state.time += f64::from(dt);

    // Flights and explosions keep animating after the run ends
    advance_entities(state, dt);

    if state.phase == GamePhase::GameOver {
        return;
    }

    run_timers(state);

    let input = if input.autopilot {
        autopilot_input(state)
    } else {
        input.clone()
    };
    apply_input(state, &input);

    // Update ship position
    if let (Some(ship), Some(target)) = (state.ship.as_mut(), state.target) {
        ship.move_toward(
            target,
            dt,
            state.tuning.ship_speed,
            state.tuning.arrive_epsilon,
        );
    }

    if state.pointer_held {
        try_fire(state);
    }

    if state.tuning.spawning {
        maybe_spawn(state);
    }

    check_collisions(state);
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    state.pointer_held = input.pointer.is_some();
    state.target = input.pointer;
    if input.pressed {
        if let (Some(ship), Some(point)) = (state.ship.as_mut(), input.pointer) {
            ship.pos = point;
        }
    }
}

/// Fire a projectile if the fire-rate interval has passed since the last shot
fn try_fire(state: &mut GameState) -> bool {
    let Some(ship_pos) = state.ship.as_ref().map(|s| s.pos) else {
        return false;
    };
    let ready = match state.last_shot {
        None => true,
        Some(last) => state.time - last > f64::from(state.fire_rate),
    };
    if !ready {
        return false;
    }

    // Fly straight up far enough to clear the top edge from anywhere
    let rise = state.scene_size().y + PROJECTILE_HEIGHT;
    let mover = Mover::linear(
        ship_pos,
        ship_pos + Vec2::new(0.0, rise),
        state.tuning.projectile_flight_time,
    );
    let id = state.next_entity_id();
    let body = Body::new(
        id,
        Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
        mover,
        &state.flight_path,
    );
    state.projectiles.push(Projectile { body });
    state.last_shot = Some(state.time);
    state.events.push(GameEvent::Shot { pos: ship_pos });
    true
}

fn run_timers(state: &mut GameState) {
    for action in state.timers.pop_due(state.time) {
        match action {
            TimedAction::PowerDown => {
                state.fire_rate = state.tuning.default_fire_rate;
                state.events.push(GameEvent::PowerDown);
                log::info!("Power-up expired at {:.2}s", state.time);
            }
        }
    }
}

/// Move every flying entity; drop the ones whose flight has ended
fn advance_entities(state: &mut GameState, dt: f32) {
    let path = &state.flight_path;
    state.projectiles.retain_mut(|p| p.body.advance(dt, path));
    state.obstacles.retain_mut(|o| o.body.advance(dt, path));
    state.pickups.retain_mut(|p| p.body.advance(dt, path));

    for effect in state.effects.iter_mut() {
        effect.ttl -= dt;
    }
    state.effects.retain(|e| e.ttl > 0.0);
}

fn check_collisions(state: &mut GameState) {
    let Some(ship_bounds) = state.ship.as_ref().map(|s| s.bounds()) else {
        return;
    };

    // Pickups only interact with the ship
    let mut collected = Vec::new();
    state.pickups.retain(|p| {
        if p.body.bounds().intersects(&ship_bounds) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        collect_pickup(state, kind);
    }

    // Obstacles hit the ship first, otherwise the first projectile touching them
    let obstacles = std::mem::take(&mut state.obstacles);
    let mut survivors = Vec::with_capacity(obstacles.len());
    for obstacle in obstacles {
        if state.phase == GamePhase::GameOver {
            survivors.push(obstacle);
            continue;
        }
        let bounds = obstacle.body.bounds();

        if state.ship.is_some() && bounds.intersects(&ship_bounds) {
            ship_hit(state);
            continue;
        }

        if let Some(index) = state
            .projectiles
            .iter()
            .position(|p| p.body.bounds().intersects(&bounds))
        {
            state.projectiles.remove(index);
            obstacle_destroyed(state, &obstacle);
            continue;
        }

        survivors.push(obstacle);
    }
    state.obstacles = survivors;
}

fn collect_pickup(state: &mut GameState, kind: PickupKind) {
    match kind {
        PickupKind::Coin => {
            state.events.push(GameEvent::CoinCollected);
            state.add_points(state.tuning.scoring.coin);
        }
        PickupKind::PowerUp => {
            // Latest pickup wins: the window restarts at full length
            let duration = state.tuning.powerup_duration;
            state.fire_rate = state.tuning.boosted_fire_rate;
            state
                .timers
                .schedule(state.time + f64::from(duration), TimedAction::PowerDown);
            state.events.push(GameEvent::PowerUpCollected { duration });
            log::info!("Power-up collected at {:.2}s", state.time);
        }
        PickupKind::Health => {
            state.lives.restore();
            state.events.push(GameEvent::HealthCollected {
                lives: state.lives.remaining(),
            });
        }
    }
}

/// An obstacle struck the ship; it is consumed either way
fn ship_hit(state: &mut GameState) {
    let remaining = state.lives.lose();
    if remaining > 0 {
        log::debug!("Ship hit, {} lives left", remaining);
        state.events.push(GameEvent::LifeLost { remaining });
        return;
    }

    let Some(ship) = state.ship.take() else {
        return;
    };
    state.effects.push(Effect {
        kind: EffectKind::ShipExplosion,
        pos: ship.pos,
        ttl: SHIP_EXPLOSION_TTL,
    });
    state.target = None;
    state.pointer_held = false;
    state.timers.cancel(TimedAction::PowerDown);
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::ShipDestroyed { pos: ship.pos });
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!(
        "Game over after {:.1}s with {} points",
        state.time,
        state.score
    );
}

fn obstacle_destroyed(state: &mut GameState, obstacle: &Obstacle) {
    let pos = obstacle.body.pos;
    state.effects.push(Effect {
        kind: EffectKind::ObstacleExplosion,
        pos,
        ttl: OBSTACLE_EXPLOSION_TTL,
    });
    state.events.push(GameEvent::ObstacleDestroyed {
        kind: obstacle.kind,
        pos,
    });
    state.add_points(state.tuning.scoring.obstacle);
}

/// Pointer the autopilot would hold this tick
///
/// Sidestep the nearest obstacle bearing down on the ship; otherwise chase
/// the nearest pickup, or line up under the nearest obstacle to shoot it.
fn autopilot_input(state: &GameState) -> TickInput {
    let Some(ship) = state.ship.as_ref() else {
        return TickInput::default();
    };
    let scene = state.scene_size();
    let home_y = scene.y / SHIP_START_HEIGHT_DIVISOR;
    let half_width = ship.size.x / 2.0;
    let clamp_x = |x: f32| x.clamp(half_width, scene.x - half_width);

    let threat = state
        .obstacles
        .iter()
        .filter(|o| {
            let dy = o.body.pos.y - ship.pos.y;
            let reach = (o.body.size.x + ship.size.x) / 2.0 + 10.0;
            dy > -ship.size.y && dy < 220.0 && (o.body.pos.x - ship.pos.x).abs() < reach
        })
        .min_by(|a, b| {
            a.body
                .pos
                .distance_squared(ship.pos)
                .total_cmp(&b.body.pos.distance_squared(ship.pos))
        });

    let target = if let Some(threat) = threat {
        let away = if threat.body.pos.x > ship.pos.x { -1.0 } else { 1.0 };
        let mut x = ship.pos.x + away * 90.0;
        // Pinned against a wall: dodge the other way
        if clamp_x(x) != x {
            x = ship.pos.x - away * 90.0;
        }
        Vec2::new(clamp_x(x), home_y)
    } else if let Some(pickup) = state.pickups.iter().min_by(|a, b| {
        a.body
            .pos
            .distance_squared(ship.pos)
            .total_cmp(&b.body.pos.distance_squared(ship.pos))
    }) {
        Vec2::new(clamp_x(pickup.body.pos.x), pickup.body.pos.y.min(scene.y * 0.5))
    } else if let Some(obstacle) = state
        .obstacles
        .iter()
        .filter(|o| o.body.pos.y > ship.pos.y)
        .min_by(|a, b| a.body.pos.y.total_cmp(&b.body.pos.y))
    {
        Vec2::new(clamp_x(obstacle.body.pos.x), home_y)
    } else {
        Vec2::new(ship.pos.x, home_y)
    };

    TickInput {
        pointer: Some(target),
        pressed: false,
        autopilot: true,
    }
}
