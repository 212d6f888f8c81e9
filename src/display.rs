//! Rendering layer — all terminal I/O lives here.
//!
//! `project` maps world coordinates onto terminal cells without touching
//! the terminal; `render` draws the projected frame.  No game logic is
//! performed in either.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use tilt_shooter::entities::GameState;
use tilt_shooter::Settings;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_PLAYER: Color = Color::White;
const C_BLOCK: Color = Color::Grey;
const C_BULLET: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_GAME_OVER: Color = Color::Red;

const HINT: &str = "← → / A D : Tilt   SPACE : Shoot   Q : Quit";

// ── Projection ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Player,
    Block,
    Bullet,
}

/// A sprite placed at a terminal cell, `len` columns wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub col: u16,
    pub row: u16,
    pub len: u16,
    pub sprite: Sprite,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Playing(Vec<Cell>),
    GameOver,
}

/// Play area in terminal cells: between the two border rows, above the hint.
struct Viewport {
    cols: u16,
    top: u16,
    rows: u16,
    world_w: f32,
    world_h: f32,
}

impl Viewport {
    fn new(state: &GameState, cols: u16, rows: u16) -> Self {
        Viewport {
            cols: cols.max(1),
            top: 1,
            rows: rows.saturating_sub(3).max(1),
            world_w: state.width,
            world_h: state.height,
        }
    }

    fn col(&self, x: f32) -> u16 {
        let c = (x / self.world_w * self.cols as f32).floor();
        (c.max(0.0) as u16).min(self.cols - 1)
    }

    fn width(&self, w: f32) -> u16 {
        ((w / self.world_w * self.cols as f32).round() as u16).max(1)
    }

    /// World `y` grows upward from the bottom; rows grow downward.
    fn row(&self, y: f32) -> u16 {
        let from_bottom = (y / self.world_h * self.rows as f32).floor().max(0.0) as u16;
        let from_bottom = from_bottom.min(self.rows - 1);
        self.top + self.rows - 1 - from_bottom
    }

    fn cell(&self, x: f32, y: f32, w: f32, sprite: Sprite) -> Cell {
        let col = self.col(x);
        let len = self.width(w).min(self.cols - col);
        Cell {
            col,
            row: self.row(y),
            len,
            sprite,
        }
    }
}

/// Project the state onto a `cols` x `rows` terminal.
pub fn project(state: &GameState, settings: &Settings, cols: u16, rows: u16) -> Frame {
    if state.is_over() {
        return Frame::GameOver;
    }
    let vp = Viewport::new(state, cols, rows);
    let p = &state.player;

    let mut cells = Vec::with_capacity(state.obstacles.len() + state.projectiles.len() + 1);
    cells.extend(
        state
            .obstacles
            .iter()
            .map(|o| vp.cell(o.x, o.y, settings.block_width, Sprite::Block)),
    );
    cells.extend(
        state
            .projectiles
            .iter()
            .map(|b| vp.cell(b.x, b.y, settings.bullet_width, Sprite::Bullet)),
    );
    cells.push(vp.cell(p.x, p.y, p.width, Sprite::Player));
    Frame::Playing(cells)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    settings: &Settings,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match project(state, settings, cols, rows) {
        Frame::Playing(cells) => {
            draw_border(out, cols, rows)?;
            for cell in &cells {
                draw_cell(out, cell)?;
            }
            draw_controls_hint(out, rows)?;
        }
        Frame::GameOver => draw_game_over(out, cols, rows)?,
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_BORDER))?;
    let bar = "─".repeat(cols as usize);
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(Print(&bar))?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(&bar))?;
    Ok(())
}

fn draw_cell<W: Write>(out: &mut W, cell: &Cell) -> std::io::Result<()> {
    let (glyph, color) = match cell.sprite {
        Sprite::Player => ("▀", C_PLAYER),
        Sprite::Block => ("█", C_BLOCK),
        Sprite::Bullet => ("│", C_BULLET),
    };
    out.queue(cursor::MoveTo(cell.col, cell.row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph.repeat(cell.len as usize)))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(HINT))?;
    Ok(())
}

// ── Game-over view ────────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("GAME OVER", C_GAME_OVER),
        ("R - Play Again  Q - Quit", Color::White),
    ];
    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(1);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16 * 2))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilt_shooter::compute::init_state;
    use tilt_shooter::entities::{Obstacle, Projectile, SessionState};

    #[test]
    fn game_over_is_static_view() {
        let mut state = init_state(&Settings::default());
        state.status = SessionState::GameOver;
        assert_eq!(project(&state, &Settings::default(), 80, 24), Frame::GameOver);
    }

    #[test]
    fn player_sits_on_bottom_play_row() {
        let state = init_state(&Settings::default());
        let Frame::Playing(cells) = project(&state, &Settings::default(), 36, 66) else {
            panic!("expected a playing frame");
        };
        let player = cells.iter().find(|c| c.sprite == Sprite::Player).unwrap();
        // 640 world units over 63 rows: y=20 is the second row from the bottom.
        assert_eq!(player.row, 62);
        assert_eq!(player.col, 15);
        assert_eq!(player.len, 5);
    }

    #[test]
    fn entities_stay_on_screen() {
        let mut state = init_state(&Settings::default());
        state.obstacles.push(Obstacle { id: 1, x: 320.0, y: 640.0 });
        state.projectiles.push(Projectile { id: 2, x: 359.0, y: 0.0 });
        let Frame::Playing(cells) = project(&state, &Settings::default(), 20, 10) else {
            panic!("expected a playing frame");
        };
        for cell in cells {
            assert!(cell.col + cell.len <= 20);
            assert!((1..8).contains(&cell.row));
        }
    }
}
