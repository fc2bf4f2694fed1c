use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use rand::Rng;
use unicode_width::UnicodeWidthStr;

use crate::components::{Dir, Pos};
use crate::game::Game;
use crate::ghost::{GhostKind, GhostLook};
use crate::level::Tile;
use crate::pellets::PelletKind;

const CELL_W: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Player { facing: Dir, mouth_open: bool },
    Ghost,
    Frightened,
    Wall,
    Empty,
    Dot,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: Glyph,
    pub color: Color,
}

pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_status: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_status: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Forces the next frame to redraw everything, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }
}

pub fn ghost_color(look: GhostLook) -> Color {
    match look {
        GhostLook::Frightened => Color::Blue,
        GhostLook::Normal(GhostKind::Blinky) => Color::Red,
        GhostLook::Normal(GhostKind::Pinky) => Color::Magenta,
        GhostLook::Normal(GhostKind::Inky) => Color::Cyan,
        GhostLook::Normal(GhostKind::Clyde) => Color::DarkYellow,
    }
}

pub fn hud_line<R: Rng>(game: &Game<R>) -> String {
    let mut hud = format!("Score: {}  High Score: {}", game.score(), game.high_score());
    if game.is_power_active() {
        hud.push_str(&format!(
            "  Power Mode Active! ({}s)",
            game.power_remaining().as_secs_f32().ceil() as u64
        ));
    }
    hud
}

pub fn status_line<R: Rng>(game: &Game<R>) -> String {
    if game.is_game_over() {
        format!(
            "GAME OVER - Final Score: {}  (r to play again, q to quit)",
            game.score()
        )
    } else {
        "Arrow keys or hjkl to steer, q to quit".to_string()
    }
}

/// Draws one frame for a terminal of `term_size` (columns, rows), redrawing
/// only cells that changed since the previous frame.
pub fn render<R: Rng>(
    out: &mut impl Write,
    game: &Game<R>,
    renderer: &mut Renderer,
    term_size: (u16, u16),
) -> io::Result<()> {
    let maze = game.maze();
    let needed_h = (maze.height() + 2) as u16;
    let needed_w = (maze.width() * CELL_W) as u16;
    let (term_w, term_h) = term_size;

    out.queue(MoveTo(0, 0))?;
    if term_w < needed_w || term_h < needed_h {
        out.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        out.queue(Print(msg))?;
        out.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        out.queue(Clear(ClearType::All))?;
    }

    let hud = hud_line(game);
    if renderer.needs_full || hud != renderer.last_hud {
        draw_line(out, renderer.origin_x, renderer.origin_y - 1, Color::White, &hud)?;
        renderer.last_hud = hud;
    }

    for y in 0..maze.height() {
        for x in 0..maze.width() {
            let cell = cell_for(game, Pos::new(x as i32, y as i32));
            let idx = y * maze.width() + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(out, renderer, x, y, cell)?;
            }
        }
    }

    let status = status_line(game);
    if renderer.needs_full || status != renderer.last_status {
        let color = if game.is_game_over() {
            Color::Red
        } else {
            Color::White
        };
        let row = renderer.origin_y + maze.height() as u16;
        draw_line(out, renderer.origin_x, row, color, &status)?;
        renderer.last_status = status;
    }
    renderer.needs_full = false;

    out.flush()
}

/// What occupies `pos`: the player, then ghosts in slot order, then pellets.
pub fn cell_for<R: Rng>(game: &Game<R>, pos: Pos) -> Cell {
    let player = game.player();
    if pos == player.pos {
        return Cell {
            glyph: Glyph::Player {
                facing: player.dir,
                mouth_open: game.mouth_open(),
            },
            color: Color::Yellow,
        };
    }
    if let Some(idx) = game.ghosts().iter().position(|g| *g == pos) {
        let look = game.ghost_look(idx);
        let glyph = match look {
            GhostLook::Frightened => Glyph::Frightened,
            GhostLook::Normal(_) => Glyph::Ghost,
        };
        return Cell {
            glyph,
            color: ghost_color(look),
        };
    }
    match game.pellet_at(pos) {
        Some(PelletKind::Dot) => {
            return Cell {
                glyph: Glyph::Dot,
                color: Color::White,
            }
        }
        Some(PelletKind::Power) => {
            return Cell {
                glyph: Glyph::Power,
                color: Color::Yellow,
            }
        }
        None => {}
    }
    match game.maze().tile(pos) {
        Some(Tile::Wall) => Cell {
            glyph: Glyph::Wall,
            color: Color::DarkBlue,
        },
        _ => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
    }
}

fn glyph_text(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Player {
            mouth_open: false, ..
        } => "O",
        Glyph::Player { facing, .. } => match facing {
            Dir::Right => "<",
            Dir::Left => ">",
            Dir::Up => "V",
            Dir::Down => "^",
        },
        Glyph::Ghost => "👻",
        Glyph::Frightened => "😱",
        Glyph::Wall => "██",
        Glyph::Empty => "  ",
        Glyph::Dot => "·",
        Glyph::Power => "●",
    }
}

fn draw_cell(
    out: &mut impl Write,
    renderer: &Renderer,
    x: usize,
    y: usize,
    cell: Cell,
) -> io::Result<()> {
    let text = glyph_text(cell.glyph);
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    out.queue(MoveTo(x_pos, y_pos))?;
    out.queue(SetForegroundColor(cell.color))?;
    out.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            out.queue(Print(' '))?;
        }
    }
    out.queue(ResetColor)?;
    Ok(())
}

fn draw_line(out: &mut impl Write, x: u16, y: u16, color: Color, text: &str) -> io::Result<()> {
    out.queue(MoveTo(x, y))?;
    out.queue(Clear(ClearType::UntilNewLine))?;
    out.queue(SetForegroundColor(color))?;
    out.queue(Print(text))?;
    out.queue(ResetColor)?;
    Ok(())
}
