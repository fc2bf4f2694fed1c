use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::Pos;
use crate::level::{Maze, GHOST_COUNT};

pub const GHOST_SCORE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub const ALL: [GhostKind; GHOST_COUNT] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];

    /// Kind for a ghost slot; the slot index never changes during a game.
    pub fn for_index(index: usize) -> GhostKind {
        Self::ALL[index % GHOST_COUNT]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostLook {
    Normal(GhostKind),
    Frightened,
}

/// Walkable axis neighbours.
pub fn wander_moves(maze: &Maze, ghost: Pos) -> Vec<Pos> {
    ghost
        .neighbors()
        .into_iter()
        .filter(|p| maze.is_walkable(*p))
        .collect()
}

/// Walkable neighbours that increase the distance to `player` on an axis
/// where the two are not already aligned.
pub fn flee_moves(maze: &Maze, ghost: Pos, player: Pos) -> Vec<Pos> {
    let dx = ghost.x - player.x;
    let dy = ghost.y - player.y;
    let mut options = Vec::with_capacity(2);
    if dx > 0 {
        options.push(Pos::new(ghost.x + 1, ghost.y));
    }
    if dx < 0 {
        options.push(Pos::new(ghost.x - 1, ghost.y));
    }
    if dy > 0 {
        options.push(Pos::new(ghost.x, ghost.y + 1));
    }
    if dy < 0 {
        options.push(Pos::new(ghost.x, ghost.y - 1));
    }
    options.retain(|p| maze.is_walkable(*p));
    options
}

pub fn next_position(
    maze: &Maze,
    ghost: Pos,
    player: Pos,
    frightened: bool,
    rng: &mut impl Rng,
) -> Pos {
    if frightened {
        if let Some(pos) = flee_moves(maze, ghost, player).choose(rng) {
            return *pos;
        }
    }
    wander_moves(maze, ghost).choose(rng).copied().unwrap_or(ghost)
}

/// Moves every ghost from the same pre-tick snapshot.
pub fn move_ghosts(
    maze: &Maze,
    ghosts: &[Pos],
    player: Pos,
    frightened: bool,
    rng: &mut impl Rng,
) -> Vec<Pos> {
    ghosts
        .iter()
        .map(|g| next_position(maze, *g, player, frightened, rng))
        .collect()
}
