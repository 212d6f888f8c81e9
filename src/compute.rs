//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (plus the session `Settings` and, where needed, an RNG
//! handle) and returns a brand-new `GameState`.  Side effects are limited to
//! the injected RNG.  Once the session is over every transition returns the
//! state unchanged.

use rand::Rng;

use crate::entities::{
    GameState, Obstacle, Player, Projectile, Rect, SessionState, TiltSample,
};
use crate::settings::Settings;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: player centred, nothing in flight.
pub fn init_state(settings: &Settings) -> GameState {
    GameState {
        player: Player {
            x: settings.max_player_x() / 2.0,
            y: settings.player_hitbox_y,
            width: settings.player_width,
            height: settings.player_height,
        },
        projectiles: Vec::new(),
        obstacles: Vec::new(),
        status: SessionState::Running,
        next_id: 1,
        width: settings.screen_width,
        height: settings.screen_height,
    }
}

// ── Bounding boxes ───────────────────────────────────────────────────────────

pub fn projectile_box(p: &Projectile, settings: &Settings) -> Rect {
    Rect::new(p.x, p.y, settings.bullet_width, settings.bullet_height)
}

pub fn obstacle_box(o: &Obstacle, settings: &Settings) -> Rect {
    Rect::new(o.x, o.y, settings.block_width, settings.block_height)
}

/// The player's `y` is the fixed `player_hitbox_y` reference set at start.
pub fn player_box(player: &Player) -> Rect {
    Rect::new(player.x, player.y, player.width, player.height)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Move the player by `sample.x * tilt_sensitivity`, clamped to the screen.
pub fn apply_tilt(state: &GameState, sample: TiltSample, settings: &Settings) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let delta = sample.x * settings.tilt_sensitivity;
    // A NaN sample would poison the position; treat it as no reading.
    let delta = if delta.is_finite() { delta } else { 0.0 };
    let max_x = (state.width - state.player.width).max(0.0);
    let new_x = (state.player.x + delta).clamp(0.0, max_x);
    GameState {
        player: Player {
            x: new_x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire a projectile from the player's centre, just above the player.
pub fn fire(state: &GameState, settings: &Settings) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let projectile = Projectile {
        id: state.next_id,
        x: state.player.x + (state.player.width - settings.bullet_width) / 2.0,
        y: state.player.height,
    };
    log::debug!("fired projectile {} at x={:.1}", projectile.id, projectile.x);
    let mut projectiles = state.projectiles.clone();
    projectiles.push(projectile);
    GameState {
        projectiles,
        next_id: state.next_id + 1,
        ..state.clone()
    }
}

// ── Timed transitions ────────────────────────────────────────────────────────

/// Move every projectile up one step, discarding those past the top edge.
pub fn advance_projectiles(state: &GameState, settings: &Settings) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let projectiles: Vec<Projectile> = state
        .projectiles
        .iter()
        .map(|p| Projectile {
            y: p.y + settings.bullet_step,
            ..p.clone()
        })
        .filter(|p| p.y < state.height)
        .collect();
    GameState {
        projectiles,
        ..state.clone()
    }
}

/// Move every obstacle one step toward the player, discarding those that
/// reach the bottom edge.  Passing the player carries no penalty.
pub fn advance_obstacles(state: &GameState, settings: &Settings) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let obstacles: Vec<Obstacle> = state
        .obstacles
        .iter()
        .map(|o| Obstacle {
            y: o.y - settings.block_step,
            ..o.clone()
        })
        .filter(|o| o.y > 0.0)
        .collect();
    GameState {
        obstacles,
        ..state.clone()
    }
}

/// Spawn one obstacle at a uniformly random column along the top edge.
/// All randomness comes through `rng` so callers control determinism.
pub fn spawn_obstacle(state: &GameState, settings: &Settings, rng: &mut impl Rng) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let max_x = settings.max_block_x();
    let x = if max_x > 0.0 { rng.gen_range(0.0..max_x) } else { 0.0 };
    let obstacle = Obstacle {
        id: state.next_id,
        x,
        y: state.height,
    };
    log::debug!("spawned obstacle {} at x={:.1}", obstacle.id, obstacle.x);
    let mut obstacles = state.obstacles.clone();
    obstacles.push(obstacle);
    GameState {
        obstacles,
        next_id: state.next_id + 1,
        ..state.clone()
    }
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Remove every obstacle touched by a projectile (projectiles pierce and
/// survive), then end the session if any remaining obstacle overlaps the
/// player.  Both checks read the same-tick collections.
pub fn resolve_collisions(state: &GameState, settings: &Settings) -> GameState {
    if state.is_over() {
        return state.clone();
    }

    let bullet_boxes: Vec<Rect> = state
        .projectiles
        .iter()
        .map(|p| projectile_box(p, settings))
        .collect();

    let obstacles: Vec<Obstacle> = state
        .obstacles
        .iter()
        .filter(|o| {
            let ob = obstacle_box(o, settings);
            let hit = bullet_boxes.iter().any(|b| b.overlaps(&ob));
            if hit {
                log::debug!("obstacle {} destroyed", o.id);
            }
            !hit
        })
        .cloned()
        .collect();

    let pb = player_box(&state.player);
    let player_hit = obstacles
        .iter()
        .any(|o| pb.overlaps(&obstacle_box(o, settings)));

    let status = if player_hit {
        log::info!("player hit at x={:.1}, game over", state.player.x);
        SessionState::GameOver
    } else {
        SessionState::Running
    };

    GameState {
        obstacles,
        status,
        ..state.clone()
    }
}

/// One obstacle tick: advance obstacles, then resolve collisions.
pub fn obstacle_tick(state: &GameState, settings: &Settings) -> GameState {
    let moved = advance_obstacles(state, settings);
    resolve_collisions(&moved, settings)
}
