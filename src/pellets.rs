use std::collections::HashSet;

use crate::components::Pos;
use crate::level::Maze;

pub const DOT_SCORE: u32 = 10;
pub const POWER_SCORE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PelletKind {
    Dot,
    Power,
}

impl PelletKind {
    pub fn score(self) -> u32 {
        match self {
            PelletKind::Dot => DOT_SCORE,
            PelletKind::Power => POWER_SCORE,
        }
    }
}

/// Remaining dots and power pellets. A cell is in at most one of the two sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pellets {
    dots: HashSet<Pos>,
    power: HashSet<Pos>,
}

impl Pellets {
    /// Every open cell except the player start holds a dot, unless it is a
    /// power spot, in which case it holds a power pellet instead.
    pub fn seed(maze: &Maze) -> Self {
        let power: HashSet<Pos> = maze.power_spots().iter().copied().collect();
        let dots = maze
            .open_cells()
            .filter(|p| *p != maze.player_start() && !power.contains(p))
            .collect();
        Self { dots, power }
    }

    /// Removes whatever sits at `pos` and reports what it was.
    pub fn consume(&mut self, pos: Pos) -> Option<PelletKind> {
        if self.dots.remove(&pos) {
            Some(PelletKind::Dot)
        } else if self.power.remove(&pos) {
            Some(PelletKind::Power)
        } else {
            None
        }
    }

    pub fn kind_at(&self, pos: Pos) -> Option<PelletKind> {
        if self.dots.contains(&pos) {
            Some(PelletKind::Dot)
        } else if self.power.contains(&pos) {
            Some(PelletKind::Power)
        } else {
            None
        }
    }

    pub fn dots(&self) -> &HashSet<Pos> {
        &self.dots
    }

    pub fn power_pellets(&self) -> &HashSet<Pos> {
        &self.power
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty() && self.power.is_empty()
    }
}
