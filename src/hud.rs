//! Heads-up display model
//!
//! Holds what the HUD shows and animates it over time. It only consumes
//! calls from the game driver and never feeds anything back into the sim.
//! A host draws it from the text/alpha/scale accessors.

use glam::Vec2;

/// Score pulse: grow to 1.1x over this long...
const PULSE_UP: f32 = 0.02;
/// ...then settle back to 1.0x over this long
const PULSE_DOWN: f32 = 0.07;
const PULSE_SCALE: f32 = 1.1;

/// Power-up group fade timings (seconds)
const POWERUP_FADE_IN: f32 = 0.1;
const POWERUP_FADE_OUT: f32 = 1.0;

/// Life icon size and inset from the top edge
const LIFE_ICON_SIZE: Vec2 = Vec2::new(20.0, 30.0);
const LIFE_ICON_TOP_INSET: f32 = 20.0;

/// Countdown shown while a power-up window is active
#[derive(Debug, Clone, Copy, PartialEq)]
struct PowerupCountdown {
    duration: f32,
    elapsed: f32,
}

impl PowerupCountdown {
    fn time_left(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    fn alpha(&self) -> f32 {
        let t = self.elapsed;
        if t < POWERUP_FADE_IN {
            t / POWERUP_FADE_IN
        } else if t < POWERUP_FADE_IN + self.duration {
            1.0
        } else {
            let fade = t - POWERUP_FADE_IN - self.duration;
            (1.0 - fade / POWERUP_FADE_OUT).max(0.0)
        }
    }

    fn is_done(&self) -> bool {
        self.elapsed >= POWERUP_FADE_IN + self.duration + POWERUP_FADE_OUT
    }
}

/// HUD state
#[derive(Debug, Clone)]
pub struct Hud {
    scene_size: Vec2,
    score: u64,
    elapsed: f32,
    timer_running: bool,
    /// Seconds into the current score pulse, if any
    pulse: Option<f32>,
    powerup: Option<PowerupCountdown>,
    lives: u8,
    max_lives: u8,
    /// Set once the run has ended
    final_score: Option<u64>,
    reduced_motion: bool,
}

impl Hud {
    pub fn new(scene_size: Vec2, max_lives: u8) -> Self {
        Self {
            scene_size,
            score: 0,
            elapsed: 0.0,
            timer_running: false,
            pulse: None,
            powerup: None,
            lives: max_lives,
            max_lives,
            final_score: None,
            reduced_motion: false,
        }
    }

    /// Skip the score pulse animation
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        if reduced {
            self.pulse = None;
        }
    }

    /// Start the elapsed-time counter from zero
    pub fn start_game(&mut self) {
        self.elapsed = 0.0;
        self.timer_running = true;
        self.final_score = None;
    }

    pub fn add_points(&mut self, points: u32) {
        self.score += u64::from(points);
        if !self.reduced_motion {
            self.pulse = Some(0.0);
        }
    }

    /// Show the countdown for a fresh power-up window, replacing any running one
    pub fn show_powerup_timer(&mut self, duration: f32) {
        self.powerup = Some(PowerupCountdown {
            duration,
            elapsed: 0.0,
        });
    }

    /// Stop the clocks and show the final score
    pub fn end_game(&mut self) {
        self.timer_running = false;
        self.powerup = None;
        self.final_score = Some(self.score);
    }

    pub fn set_lives(&mut self, lives: u8) {
        self.lives = lives.min(self.max_lives);
    }

    /// Advance timers and animations
    pub fn update(&mut self, dt: f32) {
        if self.timer_running {
            self.elapsed += dt;
        }
        if let Some(t) = self.pulse.as_mut() {
            *t += dt;
            if *t >= PULSE_UP + PULSE_DOWN {
                self.pulse = None;
            }
        }
        if let Some(countdown) = self.powerup.as_mut() {
            countdown.elapsed += dt;
            if countdown.is_done() {
                self.powerup = None;
            }
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.timer_running
    }

    pub fn score_text(&self) -> String {
        format_score(self.score)
    }

    pub fn elapsed_text(&self) -> String {
        format!("{:.1}s", self.elapsed)
    }

    /// Scale of the score label (1.0 at rest)
    pub fn score_scale(&self) -> f32 {
        match self.pulse {
            None => 1.0,
            Some(t) if t < PULSE_UP => 1.0 + (PULSE_SCALE - 1.0) * (t / PULSE_UP),
            Some(t) => {
                let k = ((t - PULSE_UP) / PULSE_DOWN).min(1.0);
                PULSE_SCALE - (PULSE_SCALE - 1.0) * k
            }
        }
    }

    /// Countdown text while a power-up window is showing
    pub fn powerup_text(&self) -> Option<String> {
        self.powerup.map(|c| format!("{:.1}s left", c.time_left()))
    }

    /// Opacity of the power-up group (0 when hidden)
    pub fn powerup_alpha(&self) -> f32 {
        self.powerup.map(|c| c.alpha()).unwrap_or(0.0)
    }

    /// Caption and value of the end-of-run panel
    pub fn game_over_text(&self) -> Option<(&'static str, String)> {
        self.final_score.map(|score| ("HIGH SCORE", score.to_string()))
    }

    pub fn life_icon_size(&self) -> Vec2 {
        LIFE_ICON_SIZE
    }

    /// Centres of the life icons, right-aligned along the top edge.
    /// Lost lives leave gaps on the left.
    pub fn life_icons(&self) -> Vec<Vec2> {
        let y = self.scene_size.y - LIFE_ICON_TOP_INSET;
        (self.max_lives - self.lives..self.max_lives)
            .map(|i| {
                let slots_from_right = f32::from(self.max_lives - i);
                Vec2::new(self.scene_size.x - slots_from_right * LIFE_ICON_SIZE.x, y)
            })
            .collect()
    }
}

/// Format a score with thousands separators (12345 -> "12,345")
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
