//! Game state and core simulation types
//!
//! Entities are stored per category and addressed by `EntityId`, never by name.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::path::{FlightPath, Mover};
use super::timer::TimerQueue;
use crate::consts::*;
use crate::normalize_angle;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Ship destroyed; terminal
    GameOver,
}

/// Stable entity handle, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Asteroid,
    EnemyShip,
}

/// Pickup variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    /// Boosts fire rate for a power-up window
    PowerUp,
    /// Restores lives
    Health,
    /// Score bonus
    Coin,
}

/// Entity category, drives collision rules and sprite selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ship,
    Projectile,
    Obstacle(ObstacleKind),
    Pickup(PickupKind),
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Ship {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_sprite(self.pos, self.size, 0.0)
    }

    /// Move toward `target` at `speed`, never overshooting. Within `epsilon`
    /// the ship holds still so it doesn't jitter around the target.
    pub fn move_toward(&mut self, target: Vec2, dt: f32, speed: f32, epsilon: f32) {
        let (distance, angle) = crate::cartesian_to_polar(target - self.pos);
        if distance <= epsilon {
            return;
        }
        let step = (speed * dt).min(distance);
        self.pos += crate::polar_to_cartesian(step, angle);
    }
}

/// A moving sprite that removes itself when its flight ends
#[derive(Debug, Clone)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    /// Continuous spin (radians per second), added on top of any path heading
    pub spin: f32,
    pub mover: Mover,
}

impl Body {
    pub fn new(id: EntityId, size: Vec2, mover: Mover, path: &FlightPath) -> Self {
        let mut body = Self {
            id,
            pos: Vec2::ZERO,
            size,
            rotation: 0.0,
            spin: 0.0,
            mover,
        };
        body.sync(path);
        body
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_sprite(self.pos, self.size, self.rotation)
    }

    /// Advance motion and spin; returns false once the flight is over
    pub fn advance(&mut self, dt: f32, path: &FlightPath) -> bool {
        self.mover.advance(dt);
        if self.spin != 0.0 {
            self.rotation = normalize_angle(self.rotation + self.spin * dt);
        }
        self.sync(path);
        !self.mover.is_finished()
    }

    fn sync(&mut self, path: &FlightPath) {
        let (pos, heading) = self.mover.sample(path);
        self.pos = pos;
        if let Some(heading) = heading {
            self.rotation = heading;
        }
    }
}

/// A ship-fired projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
}

/// An asteroid or enemy ship
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub body: Body,
}

/// A collectible
#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    pub body: Body,
}

/// Remaining lives, bounded to [0, max]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lives {
    remaining: u8,
    max: u8,
}

impl Lives {
    pub fn new(max: u8) -> Self {
        Self {
            remaining: max,
            max,
        }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Lose one life; returns what is left
    pub fn lose(&mut self) -> u8 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    /// Refill to the cap; returns whether anything changed
    pub fn restore(&mut self) -> bool {
        let changed = self.remaining < self.max;
        self.remaining = self.max;
        changed
    }
}

/// Particle burst variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    ShipExplosion,
    ObstacleExplosion,
}

/// A fire-and-forget visual effect
#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    /// Seconds left before the effect dies out
    pub ttl: f32,
}

/// Things that happened during a tick, for HUD and audio
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Projectile fired from the ship
    Shot { pos: Vec2 },
    /// Score increased
    PointsAwarded(u32),
    CoinCollected,
    /// Fire rate boosted for `duration` seconds
    PowerUpCollected { duration: f32 },
    /// Power-up window ended
    PowerDown,
    HealthCollected { lives: u8 },
    /// Ship hit an obstacle but survived
    LifeLost { remaining: u8 },
    /// Projectile destroyed an obstacle
    ObstacleDestroyed { kind: ObstacleKind, pos: Vec2 },
    ShipDestroyed { pos: Vec2 },
    /// Run ended (emitted exactly once)
    GameOver { score: u64 },
}

/// What a host needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub rotation: f32,
}

/// Complete game state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds since the run began
    pub time: f64,
    pub phase: GamePhase,
    /// Player ship (None once destroyed)
    pub ship: Option<Ship>,
    /// Latest pointer location the ship steers toward
    pub target: Option<Vec2>,
    /// Whether a pointer is held (ship only fires while held)
    pub pointer_held: bool,
    pub projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<Pickup>,
    /// Visual effects (not gameplay-affecting)
    pub effects: Vec<Effect>,
    pub lives: Lives,
    pub score: u64,
    /// Current minimum seconds between shots
    pub fire_rate: f32,
    /// Time of the last shot
    pub last_shot: Option<f64>,
    pub timers: TimerQueue,
    /// Events produced by the latest tick
    pub events: Vec<GameEvent>,
    /// Shared path for enemy ships and pickups
    pub flight_path: FlightPath,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let scene = tuning.scene_size();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            time: 0.0,
            phase: GamePhase::Playing,
            ship: None,
            target: None,
            pointer_held: false,
            projectiles: Vec::new(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            effects: Vec::new(),
            lives: Lives::new(tuning.lives),
            score: 0,
            fire_rate: tuning.default_fire_rate,
            last_shot: None,
            timers: TimerQueue::new(),
            events: Vec::new(),
            flight_path: FlightPath::weave(scene.y),
            tuning,
            next_id: 1,
        };

        let id = state.next_entity_id();
        state.ship = Some(Ship {
            id,
            pos: Vec2::new(scene.x / 2.0, scene.y / SHIP_START_HEIGHT_DIVISOR),
            size: Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
        });

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    pub fn scene_size(&self) -> Vec2 {
        self.tuning.scene_size()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Award points and report them
    pub fn add_points(&mut self, points: u32) {
        self.score += u64::from(points);
        self.events.push(GameEvent::PointsAwarded(points));
    }

    /// Render list, back to front: pickups, obstacles, projectiles, ship
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites = Vec::with_capacity(
            self.pickups.len() + self.obstacles.len() + self.projectiles.len() + 1,
        );
        let sprite = |kind: EntityKind, body: &Body| Sprite {
            id: body.id,
            kind,
            pos: body.pos,
            size: body.size,
            rotation: body.rotation,
        };
        sprites.extend(
            self.pickups
                .iter()
                .map(|p| sprite(EntityKind::Pickup(p.kind), &p.body)),
        );
        sprites.extend(
            self.obstacles
                .iter()
                .map(|o| sprite(EntityKind::Obstacle(o.kind), &o.body)),
        );
        sprites.extend(
            self.projectiles
                .iter()
                .map(|p| sprite(EntityKind::Projectile, &p.body)),
        );
        if let Some(ship) = &self.ship {
            sprites.push(Sprite {
                id: ship.id,
                kind: EntityKind::Ship,
                pos: ship.pos,
                size: ship.size,
                rotation: 0.0,
            });
        }
        sprites
    }
}
