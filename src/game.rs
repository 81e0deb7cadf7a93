//! Frame driver
//!
//! Turns host frames and pointer input into fixed simulation ticks, then
//! forwards what happened in each tick to the HUD and audio.

use glam::Vec2;

use crate::audio::{AudioManager, SoundEffect, SoundSink};
use crate::consts::*;
use crate::error::ConfigError;
use crate::hud::Hud;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Sprite, TickInput, tick};
use crate::tuning::Tuning;

/// Game instance holding all state
#[derive(Debug)]
pub struct Game {
    state: GameState,
    hud: Hud,
    audio: AudioManager,
    accumulator: f32,
    input: TickInput,
    started: bool,
}

impl Game {
    /// New run with sounds going to the log
    pub fn new(seed: u64, tuning: Tuning, settings: &Settings) -> Result<Self, ConfigError> {
        Self::with_sink(seed, tuning, settings, Box::new(crate::audio::LogSink))
    }

    /// New run playing sounds through `sink`
    pub fn with_sink(
        seed: u64,
        tuning: Tuning,
        settings: &Settings,
        sink: Box<dyn SoundSink>,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;

        let mut hud = Hud::new(tuning.scene_size(), tuning.lives);
        hud.set_reduced_motion(settings.reduced_motion);

        let mut audio = AudioManager::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        Ok(Self {
            state: GameState::with_tuning(seed, tuning),
            hud,
            audio,
            accumulator: 0.0,
            input: TickInput::default(),
            started: false,
        })
    }

    /// Press began: the ship jumps to `pos` and starts firing
    pub fn pointer_down(&mut self, pos: Vec2) {
        self.input.pointer = Some(pos);
        self.input.pressed = true;
    }

    /// Drag while held; ignored when no pointer is down
    pub fn pointer_moved(&mut self, pos: Vec2) {
        if self.input.pointer.is_some() {
            self.input.pointer = Some(pos);
        }
    }

    /// Release: the ship stops steering and firing
    pub fn pointer_up(&mut self) {
        self.input.pointer = None;
    }

    /// Let the sim fly the ship
    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    /// Run simulation ticks for a frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if !self.started {
            self.start();
        }

        // A bad frame clock must not poison the accumulator
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite frame delta {}", dt);
            return;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pressed = false;

            self.dispatch_events();
            self.hud.update(SIM_DT);
        }
    }

    fn start(&mut self) {
        self.started = true;
        self.hud.start_game();
        self.audio.play(SoundEffect::Music);
        log::info!(
            "Run started (seed {}, {} lives)",
            self.state.seed,
            self.state.lives.max()
        );
    }

    /// Forward this tick's events to HUD and audio
    fn dispatch_events(&mut self) {
        for event in &self.state.events {
            match *event {
                GameEvent::PointsAwarded(points) => self.hud.add_points(points),
                GameEvent::PowerUpCollected { duration } => self.hud.show_powerup_timer(duration),
                GameEvent::HealthCollected { lives } | GameEvent::LifeLost { remaining: lives } => {
                    self.hud.set_lives(lives)
                }
                GameEvent::ShipDestroyed { .. } => self.hud.set_lives(0),
                GameEvent::GameOver { .. } => self.hud.end_game(),
                GameEvent::Shot { .. }
                | GameEvent::CoinCollected
                | GameEvent::PowerDown
                | GameEvent::ObstacleDestroyed { .. } => {}
            }
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn tuning(&self) -> &Tuning {
        &self.state.tuning
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Render list for this frame
    pub fn sprites(&self) -> Vec<Sprite> {
        self.state.sprites()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Body, EntityKind, Mover, Obstacle, ObstacleKind, Pickup, PickupKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<SoundEffect>>>);

    impl SoundSink for Recorder {
        fn play(&mut self, effect: SoundEffect, _volume: f32) {
            self.0.borrow_mut().push(effect);
        }
    }

    impl Recorder {
        fn count(&self, effect: SoundEffect) -> usize {
            self.0.borrow().iter().filter(|&&e| e == effect).count()
        }
    }

    fn quiet_game() -> (Game, Recorder) {
        let tuning = Tuning {
            spawning: false,
            ..Default::default()
        };
        let recorder = Recorder::default();
        let game = Game::with_sink(
            7,
            tuning,
            &Settings::default(),
            Box::new(recorder.clone()),
        )
        .unwrap();
        (game, recorder)
    }

    fn ship_pos(game: &Game) -> Vec2 {
        game.state.ship.as_ref().unwrap().pos
    }

    fn parked_body(game: &mut Game, pos: Vec2) -> Body {
        let id = game.state.next_entity_id();
        Body::new(
            id,
            Vec2::splat(30.0),
            Mover::linear(pos, pos, 100.0),
            &game.state.flight_path,
        )
    }

    fn drop_obstacle_on_ship(game: &mut Game) {
        let pos = ship_pos(game);
        let body = parked_body(game, pos);
        game.state.obstacles.push(Obstacle {
            kind: ObstacleKind::EnemyShip,
            body,
        });
    }

    #[test]
    fn test_first_update_starts_run() {
        let (mut game, recorder) = quiet_game();
        assert!(!game.hud().is_running());
        game.update(SIM_DT);
        assert!(game.hud().is_running());
        assert_eq!(recorder.count(SoundEffect::Music), 1);
        game.update(SIM_DT);
        assert_eq!(recorder.count(SoundEffect::Music), 1);
    }

    #[test]
    fn test_frame_dt_is_clamped() {
        let (mut game, _) = quiet_game();
        game.update(5.0);
        // 0.1s worth of 1/60 ticks
        assert!((5..=6).contains(&game.state().time_ticks));
    }

    #[test]
    fn test_non_finite_frame_is_skipped() {
        let (mut game, _) = quiet_game();
        game.update(SIM_DT);
        game.update(f32::NAN);
        game.update(f32::INFINITY);
        game.update(-SIM_DT);
        assert_eq!(game.state().time_ticks, 1);
        for _ in 0..60 {
            game.update(SIM_DT);
        }
        assert_eq!(game.state().time_ticks, 61);
    }

    #[test]
    fn test_holding_pointer_fires() {
        let (mut game, recorder) = quiet_game();
        let target = Vec2::new(100.0, 200.0);
        game.pointer_down(target);
        game.update(SIM_DT);
        assert_eq!(ship_pos(&game), target, "press teleports the ship");
        assert_eq!(recorder.count(SoundEffect::Shoot), 1);

        for _ in 0..60 {
            game.update(SIM_DT);
        }
        // Default rate: one shot every half second
        assert!((2..=3).contains(&recorder.count(SoundEffect::Shoot)));

        game.pointer_up();
        let shots = recorder.count(SoundEffect::Shoot);
        for _ in 0..60 {
            game.update(SIM_DT);
        }
        assert_eq!(recorder.count(SoundEffect::Shoot), shots);
    }

    #[test]
    fn test_moving_without_press_is_ignored() {
        let (mut game, _) = quiet_game();
        let start = ship_pos(&game);
        game.pointer_moved(Vec2::new(10.0, 10.0));
        game.update(SIM_DT);
        assert_eq!(ship_pos(&game), start);
    }

    #[test]
    fn test_hud_follows_lives_and_game_over() {
        let (mut game, recorder) = quiet_game();
        game.update(SIM_DT);
        for lives in [3u8, 2, 1] {
            drop_obstacle_on_ship(&mut game);
            game.update(SIM_DT);
            assert_eq!(game.hud().life_icons().len(), usize::from(lives));
        }
        assert_eq!(recorder.count(SoundEffect::LoseLife), 3);

        drop_obstacle_on_ship(&mut game);
        game.update(SIM_DT);
        assert!(game.is_game_over());
        assert!(game.hud().life_icons().is_empty());
        assert!(!game.hud().is_running());
        assert_eq!(game.hud().game_over_text(), Some(("HIGH SCORE", "0".to_string())));
        assert_eq!(recorder.count(SoundEffect::ShipExplode), 1);

        for _ in 0..30 {
            game.update(SIM_DT);
        }
        assert_eq!(recorder.count(SoundEffect::ShipExplode), 1);
        assert!(game.sprites().iter().all(|s| s.kind != EntityKind::Ship));
    }

    #[test]
    fn test_pickups_reach_hud() {
        let (mut game, recorder) = quiet_game();
        game.update(SIM_DT);

        let pos = ship_pos(&game);
        let body = parked_body(&mut game, pos);
        game.state.pickups.push(Pickup {
            kind: PickupKind::Coin,
            body,
        });
        game.update(SIM_DT);
        assert_eq!(game.hud().score(), 20);
        assert_eq!(game.hud().score(), game.state().score);
        assert_eq!(recorder.count(SoundEffect::CollectCoin), 1);

        let body = parked_body(&mut game, pos);
        game.state.pickups.push(Pickup {
            kind: PickupKind::PowerUp,
            body,
        });
        game.update(SIM_DT);
        assert_eq!(game.hud().powerup_text().as_deref(), Some("5.0s left"));
        assert_eq!(recorder.count(SoundEffect::CollectPowerUp), 1);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            lives: 0,
            ..Default::default()
        };
        assert!(matches!(
            Game::new(1, tuning, &Settings::default()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_autopilot_run_keeps_hud_in_sync() {
        let mut game = Game::new(99, Tuning::default(), &Settings::default()).unwrap();
        game.set_autopilot(true);
        for _ in 0..(60 * 30) {
            game.update(SIM_DT);
        }
        assert_eq!(game.hud().score(), game.state().score);
        assert_eq!(
            game.hud().life_icons().len(),
            usize::from(game.state().lives.remaining())
        );
    }
}
