//! Space Run headless runner
//!
//! Flies the ship on autopilot at a fixed frame rate and reports the result.
//! Rendering and sound output belong to a host; here sounds go to the log.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use space_run::consts::SIM_DT;
use space_run::{ConfigError, Game, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(name = "space-run")]
#[command(about = "Fly a Space Run session on autopilot and report the score")]
struct Args {
    /// Run seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Stop after this many simulated seconds if the ship survives
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Tuning JSON file
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<(Tuning, Settings), ConfigError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    Ok((tuning, settings))
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let game = load_config(&args)
        .and_then(|(tuning, settings)| Game::new(args.seed, tuning, &settings));
    let mut game = match game {
        Ok(game) => game,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Space Run (headless) starting, seed {}", args.seed);
    game.set_autopilot(true);

    let frames = (args.seconds / SIM_DT).ceil() as u64;
    for frame in 0..frames {
        game.update(SIM_DT);
        if game.is_game_over() {
            break;
        }
        if frame > 0 && frame % 600 == 0 {
            let hud = game.hud();
            log::info!(
                "{} score={} lives={}",
                hud.elapsed_text(),
                hud.score_text(),
                hud.life_icons().len()
            );
        }
    }

    let hud = game.hud();
    let outcome = if game.is_game_over() {
        "game over"
    } else {
        "time up"
    };
    println!(
        "{}: score {} after {}",
        outcome,
        hud.score_text(),
        hud.elapsed_text()
    );
    ExitCode::SUCCESS
}
