//! MathRisk - headless round driver
//!
//! Plays one round on autopilot with the saved preferences, then updates
//! the leaderboard. Usage: `mathrisk [seed]`

use mathrisk::consts::*;
use mathrisk::highscores::HighScores;
use mathrisk::persistence::DataDir;
use mathrisk::settings::UserPrefs;
use mathrisk::sim::{GameEvent, GameState, RoundEnd, TickInput, tick};

/// Upper bound on ticks in case the clock never runs out
const MAX_TICKS: u64 = (TIME_LIMIT_SECS as u64 + 1) * FPS as u64;

fn seed_from_args() -> u64 {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse::<u64>() {
            Ok(seed) => return seed,
            Err(e) => log::warn!("Ignoring seed '{}': {}", arg, e),
        }
    }
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Spawned { id, display, lane } => {
            log::debug!("#{} '{}' spawned in lane {}", id, display, lane)
        }
        GameEvent::Caught {
            id,
            display,
            before,
            after,
        } => log::debug!("#{} '{}' caught: {} -> {}", id, display, before, after),
        GameEvent::Missed { id } => log::debug!("#{} missed", id),
        GameEvent::Paused => log::info!("Paused"),
        GameEvent::Resumed => log::info!("Resumed"),
        GameEvent::RoundOver { reason, score } => {
            log::info!("{} with {} coins", reason.message(), score)
        }
    }
}

fn main() {
    env_logger::init();

    let data = DataDir::from_env();
    let mut prefs = UserPrefs::load(&data);
    let mut scores = HighScores::load(&data);

    let seed = seed_from_args();
    let difficulty = prefs.difficulty();
    log::info!(
        "MathRisk starting: seed {}, difficulty {}, avatar {}, data dir {}",
        seed,
        difficulty.as_str(),
        prefs.avatar(),
        data.root().display()
    );

    let mut state = GameState::new(seed, difficulty);
    let input = TickInput {
        idle_mode: true,
        ..TickInput::default()
    };

    let mut ticks = 0;
    while !state.is_over() {
        if ticks >= MAX_TICKS {
            state.end_round(RoundEnd::TimeUp);
        } else {
            tick(&mut state, &input, SIM_DT);
            ticks += 1;
        }
        for event in state.drain_events() {
            log_event(&event);
        }
    }

    let final_score = state.score;
    if state.end_reason == Some(RoundEnd::ReturnToMenu) {
        log::info!("Round abandoned, score not recorded");
        return;
    }

    let (verdict, rank) = scores.record_round(&prefs.nickname, final_score);
    println!("{}: {} coins. {}", difficulty.as_str(), final_score, verdict.message());

    if let Some(rank) = rank {
        println!("Leaderboard rank #{}", rank);
        if let Err(e) = scores.save(&data) {
            log::warn!("Could not save high scores: {}", e);
        }
    }

    if let Err(e) = prefs.save(&data) {
        log::warn!("Could not save preferences: {}", e);
    }
}
