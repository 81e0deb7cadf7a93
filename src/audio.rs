//! Sound effect triggers
//!
//! The game only decides *when* a sound plays. Playback belongs to the host,
//! which plugs in a `SoundSink`; every trigger is fire-and-forget.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Background loop started with the run
    Music,
    /// Projectile fired
    Shoot,
    /// Obstacle destroyed by a projectile
    ObstacleExplode,
    /// Ship destroyed on its last life
    ShipExplode,
    /// Ship hit but survived
    LoseLife,
    /// Coin collected
    CollectCoin,
    /// Power-up or health collected
    CollectPowerUp,
}

impl SoundEffect {
    /// Sound a sim event triggers, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot { .. } => Some(SoundEffect::Shoot),
            GameEvent::CoinCollected => Some(SoundEffect::CollectCoin),
            GameEvent::PowerUpCollected { .. } | GameEvent::HealthCollected { .. } => {
                Some(SoundEffect::CollectPowerUp)
            }
            GameEvent::LifeLost { .. } => Some(SoundEffect::LoseLife),
            GameEvent::ObstacleDestroyed { .. } => Some(SoundEffect::ObstacleExplode),
            GameEvent::ShipDestroyed { .. } => Some(SoundEffect::ShipExplode),
            GameEvent::PointsAwarded(_) | GameEvent::PowerDown | GameEvent::GameOver { .. } => {
                None
            }
        }
    }

    /// Asset a host should load for this effect
    pub fn asset(&self) -> &'static str {
        match self {
            SoundEffect::Music => "spaceSound.mp3",
            SoundEffect::Shoot => "laserShot.wav",
            SoundEffect::ObstacleExplode => "darkExplosion.wav",
            SoundEffect::ShipExplode => "explosion.wav",
            SoundEffect::LoseLife => "lostHealth.mp3",
            SoundEffect::CollectCoin => "coins.wav",
            SoundEffect::CollectPowerUp => "powerUp.wav",
        }
    }

    /// Mix level relative to other effects
    fn base_gain(&self) -> f32 {
        match self {
            SoundEffect::Music => 0.5,
            SoundEffect::Shoot => 0.4,
            SoundEffect::ShipExplode => 1.0,
            _ => 0.8,
        }
    }
}

/// Host-side playback
pub trait SoundSink {
    /// Start playing `effect` at `volume` (0.0 - 1.0); must not block
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs triggers (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("♪ {:?} ({}) vol={:.2}", effect, effect.asset(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn SoundSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn SoundSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume() * effect.base_gain();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl SoundSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push((effect, volume));
        }
    }

    #[test]
    fn test_play_applies_volume() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.set_master_volume(0.5);
        audio.play(SoundEffect::ShipExplode);
        let played = recorder.0.borrow();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].0, SoundEffect::ShipExplode);
        assert!((played[0].1 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_health_shares_powerup_sound() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::HealthCollected { lives: 4 }),
            Some(SoundEffect::CollectPowerUp)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::PointsAwarded(10)), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::PowerDown), None);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.set_muted(true);
        audio.play(SoundEffect::Shoot);
        audio.set_muted(false);
        audio.set_sfx_volume(-1.0);
        audio.play(SoundEffect::Shoot);
        assert!(recorder.0.borrow().is_empty());
    }
}
