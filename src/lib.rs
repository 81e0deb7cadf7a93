//! Space Run - A vertical arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, timers)
//! - `hud`: Score, elapsed time and power-up countdown display model
//! - `audio`: Sound effect triggers routed to a host backend
//! - `game`: Frame driver gluing input, simulation, HUD and audio together
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use game::Game;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will try to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ship sprite size
    pub const SHIP_WIDTH: f32 = 40.0;
    pub const SHIP_HEIGHT: f32 = 50.0;
    /// Ship starts at this fraction of the scene height
    pub const SHIP_START_HEIGHT_DIVISOR: f32 = 4.5;

    /// Projectile sprite size
    pub const PROJECTILE_WIDTH: f32 = 8.0;
    pub const PROJECTILE_HEIGHT: f32 = 24.0;

    /// Side of enemy ships and pickups
    pub const FLYER_SIDE: f32 = 30.0;
    /// Asteroid side is ASTEROID_MIN_SIDE + rand[0, ASTEROID_SIDE_RANGE)
    pub const ASTEROID_MIN_SIDE: u32 = 15;
    pub const ASTEROID_SIDE_RANGE: u32 = 30;
    /// Radians an asteroid turns per spin cycle
    pub const ASTEROID_SPIN_ANGLE: f32 = 3.0;

    /// Path follow durations (seconds)
    pub const ENEMY_PATH_DURATION: f32 = 7.0;
    pub const PICKUP_PATH_DURATION: f32 = 5.0;

    /// Explosion lifetimes (seconds)
    pub const SHIP_EXPLOSION_TTL: f32 = 0.3;
    pub const OBSTACLE_EXPLOSION_TTL: f32 = 0.1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) - (-0.5 * PI)).abs() < 1e-5);
        assert_eq!(normalize_angle(0.25), 0.25);
    }

    #[test]
    fn test_polar_roundtrip_direction() {
        let v = polar_to_cartesian(10.0, PI / 2.0);
        let (r, theta) = cartesian_to_polar(v);
        assert!((r - 10.0).abs() < 1e-4);
        assert!((theta - PI / 2.0).abs() < 1e-4);
    }
}
