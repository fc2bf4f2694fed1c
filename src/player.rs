use crate::components::{Dir, Pos};
use crate::level::Maze;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    /// Committed direction, also the way the avatar faces.
    pub dir: Dir,
    /// Latest input. Tried first every tick and committed once it leads
    /// somewhere walkable, so a turn can be pressed before the junction.
    pub queued: Dir,
}

impl Player {
    pub fn spawn(maze: &Maze) -> Self {
        Self {
            pos: maze.player_start(),
            dir: maze.start_dir(),
            queued: maze.start_dir(),
        }
    }

    pub fn queue(&mut self, dir: Dir) {
        self.queued = dir;
    }

    /// One player tick. Returns the new cell if the player moved.
    pub fn advance(&mut self, maze: &Maze) -> Option<Pos> {
        let (pos, dir) = resolve_move(maze, self.pos, self.dir, self.queued)?;
        self.pos = pos;
        self.dir = dir;
        Some(pos)
    }
}

/// Queued direction first, then the current one; `None` when both are
/// blocked.
pub fn resolve_move(maze: &Maze, pos: Pos, current: Dir, queued: Dir) -> Option<(Pos, Dir)> {
    [queued, current]
        .into_iter()
        .map(|dir| (pos.step(dir), dir))
        .find(|(next, _)| maze.is_walkable(*next))
}
