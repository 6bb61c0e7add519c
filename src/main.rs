//! Bombfall entry point
//!
//! Parses the command line, loads settings and runs either the terminal game
//! or a headless autopilot.

mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use bombfall::Settings;
use bombfall::sim::{Facing, GameState, HeldDirections, TickInput, tick};

const USAGE: &str = "usage: bombfall [--config <path>] [--seed <n>] [--headless <ticks>]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    headless: Option<u64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{arg} needs a value"));
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value()?)),
            "--seed" => {
                let raw = value()?;
                parsed.seed = Some(raw.parse().map_err(|_| format!("bad seed: {raw}"))?);
            }
            "--headless" => {
                let raw = value()?;
                parsed.headless = Some(raw.parse().map_err(|_| format!("bad tick count: {raw}"))?);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(parsed)
}

/// Scripted input: line up under the nearest enemy, face up, shoot
fn autopilot(state: &GameState) -> TickInput {
    let tuning = &state.tuning;
    let score = state.score.value();
    let player = &state.player;
    let mut input = TickInput {
        shield: state.shields.is_empty() && score >= tuning.shield_cost,
        gravity: score >= tuning.gravity_cost + tuning.shield_cost,
        ..Default::default()
    };

    let target = state.enemies.iter().min_by(|a, b| {
        let da = (a.pos.x - player.pos.x).abs();
        let db = (b.pos.x - player.pos.x).abs();
        da.total_cmp(&db)
    });
    let Some(target) = target else {
        return input;
    };

    let dx = target.pos.x - player.pos.x;
    if dx.abs() > tuning.walk_speed {
        input.held = HeldDirections {
            left: dx < 0.0,
            right: dx > 0.0,
            ..Default::default()
        };
    } else if player.facing != Facing::UP {
        input.held.up = true;
    } else {
        input.fire = state.frame % 10 == 0;
    }
    input
}

fn run_headless(settings: &Settings, seed: u64, ticks: u64) -> Result<(), String> {
    let mut state = GameState::with_tuning(seed, settings.tuning.clone())?;
    for _ in 0..ticks {
        if !state.is_running() {
            break;
        }
        let input = autopilot(&state);
        tick(&mut state, &input);
        for event in &state.events {
            log::debug!("frame {}: {:?}", state.frame, event);
        }
    }
    println!("{} after {} frames ({:?})", state.score, state.frame, state.phase);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let mut settings = Settings::load(args.config.as_deref());
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    let seed = settings.resolve_seed();
    log::info!("Bombfall starting with seed {}", seed);

    if let Some(ticks) = args.headless {
        return match run_headless(&settings, seed, ticks) {
            Ok(()) => ExitCode::SUCCESS,
            Err(reason) => {
                eprintln!("invalid tuning: {reason}");
                ExitCode::FAILURE
            }
        };
    }

    match terminal::run(&settings, seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("terminal error: {err}");
            ExitCode::FAILURE
        }
    }
}
