//! Fixed timestep simulation tick
//!
//! Advances one round by one frame: end-of-round checks, pause handling,
//! spawning, motion and the catch → evaluate step.

use std::cmp::Ordering;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::collision::collisions;
use super::state::{FallingExpression, GameEvent, GamePhase, GameState, RoundEnd, ShapeKind};
use crate::consts::*;
use crate::expr::{generate_expression, try_apply_operator};
use crate::lane_x;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Pause toggle
    pub pause: bool,
    /// Abort the round back to the menu
    pub quit: bool,
    /// Autopilot steers the player
    pub idle_mode: bool,
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.is_over() {
        return;
    }

    // End-of-round checks (clock first, then coins)
    if state.phase == GamePhase::Playing {
        if state.time_left() <= 0.0 {
            state.end_round(RoundEnd::TimeUp);
            return;
        }
        if state.score < GAME_OVER_SCORE_THRESHOLD {
            state.end_round(RoundEnd::InsufficientCoins);
            return;
        }
    }

    if input.quit {
        state.end_round(RoundEnd::ReturnToMenu);
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    let (left, right) = if input.idle_mode {
        autopilot(state)
    } else {
        (input.left, input.right)
    };

    state.time_ticks += 1;
    state.elapsed += dt;

    // Spawn
    state.spawn_timer += 1;
    if state.spawn_timer >= state.difficulty.spawn_delay_ticks() {
        state.spawn_timer = 0;
        spawn_wave(state);
    }

    // Move
    state.player.step(left, right, dt);
    for item in &mut state.falling {
        item.pos.y += item.speed * dt;
    }
    let events = &mut state.events;
    state.falling.retain(|item| {
        if item.is_off_screen() {
            events.push(GameEvent::Missed { id: item.id });
            false
        } else {
            true
        }
    });

    // Catch: each hit is removed and applied exactly once, in spawn order
    for id in collisions(&state.player.bounds(), &state.falling) {
        let Some(idx) = state.falling.iter().position(|f| f.id == id) else {
            continue;
        };
        let caught = state.falling.remove(idx);
        let before = state.score;
        state.score = caught.expression.apply_to(before);
        log::debug!(
            "Caught '{}' (#{}): {} -> {}",
            caught.expression.display,
            id,
            before,
            state.score
        );
        state.events.push(GameEvent::Caught {
            id,
            display: caught.expression.display,
            before,
            after: state.score,
        });
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Spawn 1-2 expressions in distinct lanes
pub fn spawn_wave(state: &mut GameState) {
    let count = state
        .rng
        .random_range(1..=MAX_SPAWN_PER_WAVE.min(SPAWN_LANES));
    let lanes = rand::seq::index::sample(&mut state.rng, SPAWN_LANES, count);

    for lane in lanes {
        let expression = generate_expression(&state.level, &mut state.rng).into_expression();
        let shape = ShapeKind::ALL
            .choose(&mut state.rng)
            .copied()
            .unwrap_or_default();
        let extent = shape.extent_for(&expression.display);
        // Enters with its bottom edge at the top of the screen
        let pos = Vec2::new(lane_x(lane), -extent / 2.0);
        let display = expression.display.clone();
        let id = state.push_falling(expression, shape, pos);
        log::debug!("Spawned '{}' (#{}) in lane {}", display, id, lane);
        state.events.push(GameEvent::Spawned { id, display, lane });
    }
}

/// Steer toward the most profitable catchable expression, or dodge harmful ones
fn autopilot(state: &GameState) -> (bool, bool) {
    let player = state.player.bounds();
    let px = state.player.pos.x;
    let dead_zone = PLAYER_SPEED * SIM_DT;

    let outcome = |score: i64, item: &FallingExpression| {
        try_apply_operator(score, item.expression.operator, item.expression.operand)
            .unwrap_or(score)
    };

    // Only shapes that have not yet dropped past the player's top edge
    let catchable = state
        .falling
        .iter()
        .filter(|f| f.bounds().min().y < player.min().y);

    let best = catchable
        .clone()
        .map(|f| (f, outcome(state.score, f)))
        .filter(|(_, after)| *after > state.score)
        .max_by(|(a, a_after), (b, b_after)| {
            a_after
                .cmp(b_after)
                .then(a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal))
        });

    if let Some((target, _)) = best {
        let dx = target.pos.x - px;
        return (dx < -dead_zone, dx > dead_zone);
    }

    // Nothing worth catching: step away from the nearest threat above us
    let threat = catchable
        .filter(|f| outcome(state.score, *f) < state.score)
        .filter(|f| {
            let b = f.bounds();
            b.max().x > player.min().x
                && b.min().x < player.max().x
                && player.min().y - b.max().y < 150.0
        })
        .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal));

    match threat {
        Some(f) if f.pos.x >= px => (true, false),
        Some(_) => (false, true),
        None => (false, false),
    }
}
