//! Data-driven game balance
//!
//! Every gameplay constant that shapes difficulty lives here so a run can be
//! retuned from a JSON file without rebuilding.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Relative odds (out of 100) of each spawn kind, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub power_up: u32,
    pub coin: u32,
    pub health: u32,
    pub enemy_ship: u32,
    pub asteroid: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            power_up: 20,
            coin: 5,
            health: 5,
            enemy_ship: 15,
            asteroid: 55,
        }
    }
}

impl SpawnWeights {
    /// Width of the kind roll; weights must sum to this
    pub const ROLL_RANGE: u32 = 100;

    /// Sum of all weights, widened so hostile values cannot overflow
    pub fn total(&self) -> u64 {
        [
            self.power_up,
            self.coin,
            self.health,
            self.enemy_ship,
            self.asteroid,
        ]
        .iter()
        .map(|&w| u64::from(w))
        .sum()
    }
}

/// Points awarded per event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    pub coin: u32,
    pub obstacle: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            coin: 20,
            obstacle: 10,
        }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scene size in points (origin bottom-left, y up)
    pub scene_width: f32,
    pub scene_height: f32,
    /// Ship travel speed toward the pointer (points per second)
    pub ship_speed: f32,
    /// Ship stops moving once this close to its target
    pub arrive_epsilon: f32,
    /// Seconds between shots normally
    pub default_fire_rate: f32,
    /// Seconds between shots during a power-up window
    pub boosted_fire_rate: f32,
    /// Length of a power-up window (seconds)
    pub powerup_duration: f32,
    /// Seconds for a projectile to cross the scene
    pub projectile_flight_time: f32,
    /// Lives at start (also the cap a health pickup restores to)
    pub lives: u8,
    /// Random spawning on/off (off for scripted scenes)
    pub spawning: bool,
    /// Spawn when a [0, 1000) draw is at or below this
    pub spawn_threshold: u32,
    pub spawn_weights: SpawnWeights,
    pub scoring: Scoring,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scene_width: 375.0,
            scene_height: 667.0,
            ship_speed: 230.0,
            arrive_epsilon: 4.0,
            default_fire_rate: 0.5,
            boosted_fire_rate: 0.1,
            powerup_duration: 5.0,
            projectile_flight_time: 0.5,
            lives: 4,
            spawning: true,
            spawn_threshold: 15,
            spawn_weights: SpawnWeights::default(),
            scoring: Scoring::default(),
        }
    }
}

impl Tuning {
    /// Range of the per-tick spawn draw
    pub const SPAWN_ROLL_RANGE: u32 = 1000;

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Parse and validate tuning from JSON text (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn scene_size(&self) -> Vec2 {
        Vec2::new(self.scene_width, self.scene_height)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tunings that cannot produce a playable game
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Pickups spawn in [30, width - 30), enemies in [20, width - 20)
        if not_above(self.scene_width, 60.0) || not_above(self.scene_height, 0.0) {
            return Err(invalid(format!(
                "scene must be wider than 60 and taller than 0, got {}x{}",
                self.scene_width, self.scene_height
            )));
        }
        if not_above(self.ship_speed, 0.0) {
            return Err(invalid("ship_speed must be positive"));
        }
        if self.arrive_epsilon.is_nan() || self.arrive_epsilon < 0.0 {
            return Err(invalid("arrive_epsilon must not be negative"));
        }
        if not_above(self.boosted_fire_rate, 0.0) || not_above(self.default_fire_rate, 0.0) {
            return Err(invalid("fire rates must be positive"));
        }
        if self.boosted_fire_rate >= self.default_fire_rate {
            return Err(invalid(format!(
                "boosted_fire_rate ({}) must be shorter than default_fire_rate ({})",
                self.boosted_fire_rate, self.default_fire_rate
            )));
        }
        if not_above(self.powerup_duration, 0.0) || not_above(self.projectile_flight_time, 0.0) {
            return Err(invalid("durations must be positive"));
        }
        if self.lives == 0 {
            return Err(invalid("lives must be at least 1"));
        }
        if self.spawn_threshold >= Self::SPAWN_ROLL_RANGE {
            return Err(invalid(format!(
                "spawn_threshold must be below {}",
                Self::SPAWN_ROLL_RANGE
            )));
        }
        let total = self.spawn_weights.total();
        if total != u64::from(SpawnWeights::ROLL_RANGE) {
            return Err(invalid(format!(
                "spawn weights must sum to {}, got {}",
                SpawnWeights::ROLL_RANGE,
                total
            )));
        }
        Ok(())
    }
}

/// NaN counts as not above
fn not_above(value: f32, floor: f32) -> bool {
    value.is_nan() || value <= floor
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    let msg = msg.into();
    log::warn!("Rejected tuning: {}", msg);
    ConfigError::Invalid(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert_eq!(SpawnWeights::default().total(), 100);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "ship_speed": 300.0, "lives": 2 }"#).unwrap();
        assert_eq!(tuning.ship_speed, 300.0);
        assert_eq!(tuning.lives, 2);
        assert_eq!(tuning.default_fire_rate, 0.5);
        assert_eq!(tuning.spawn_weights, SpawnWeights::default());
    }

    #[test]
    fn test_rejects_bad_weights() {
        let err = Tuning::from_json(r#"{ "spawn_weights": { "asteroid": 60 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_overflowing_weights() {
        let json = r#"{ "spawn_weights": {
            "power_up": 4294967295, "coin": 101, "health": 0, "enemy_ship": 0, "asteroid": 0
        } }"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_nan_and_negative_values() {
        let tuning = Tuning {
            ship_speed: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));

        let tuning = Tuning {
            arrive_epsilon: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));

        let tuning = Tuning {
            powerup_duration: -1.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_slow_boost() {
        let tuning = Tuning {
            boosted_fire_rate: 0.5,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Tuning::load("/nonexistent/space-run/tuning.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning {
            spawn_threshold: 30,
            ..Default::default()
        };
        let back = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(back, tuning);
    }
}
