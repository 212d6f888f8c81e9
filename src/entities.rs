//! All game entity types — pure data, no logic.
//!
//! Positions are in world units with `y` measured upward from the bottom
//! edge of the screen.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Running,
    GameOver,
}

/// One reading from the tilt sensor.  `x` is the lateral acceleration,
/// roughly in `-1.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltSample {
    pub x: f32,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Strict separating-axis test: touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Left edge, kept within `[0, screen_width - width]`.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

// ── Projectiles & obstacles ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    /// Live projectiles in firing order.
    pub projectiles: Vec<Projectile>,
    /// Live obstacles in spawn order.
    pub obstacles: Vec<Obstacle>,
    pub status: SessionState,
    /// Next id handed out to a projectile or obstacle.
    pub next_id: u64,
    pub width: f32,
    pub height: f32,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        self.status == SessionState::GameOver
    }
}
