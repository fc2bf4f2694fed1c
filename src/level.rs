use log::debug;

use crate::components::{Dir, Pos};
use crate::error::MazeError;

pub const GHOST_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
}

/// Text description of a maze plus its designated cells. `#` is a wall,
/// every other character is open floor.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    pub rows: &'a [&'a str],
    pub player_start: Pos,
    pub start_dir: Dir,
    pub ghost_spawns: [Pos; GHOST_COUNT],
    pub ghost_home: Pos,
    pub power_spots: &'a [Pos],
}

const REFERENCE_ROWS: [&str; 15] = [
    "###############",
    "#.....#.......#",
    "#.###.#.#####.#",
    "#...#.........#",
    "###.#####.###.#",
    "#.........#...#",
    "#.####.####.#.#",
    "#....#.#....#.#",
    "#.##.#.#.##.#.#",
    "#.#.......#.#.#",
    "#.#.#####.#.#.#",
    "#.............#",
    "#.####.######.#",
    "#.............#",
    "###############",
];

const REFERENCE_POWER_SPOTS: [Pos; 4] = [
    Pos::new(1, 1),
    Pos::new(13, 1),
    Pos::new(1, 13),
    Pos::new(13, 13),
];

pub const REFERENCE_LAYOUT: Layout<'static> = Layout {
    rows: &REFERENCE_ROWS,
    player_start: Pos::new(1, 1),
    start_dir: Dir::Right,
    ghost_spawns: [
        Pos::new(13, 1),
        Pos::new(1, 13),
        Pos::new(13, 13),
        Pos::new(7, 7),
    ],
    ghost_home: Pos::new(7, 7),
    power_spots: &REFERENCE_POWER_SPOTS,
};

/// Immutable walkability grid with the cells a game episode is seeded from.
#[derive(Debug, Clone)]
pub struct Maze {
    width: usize,
    height: usize,
    grid: Vec<Vec<Tile>>,
    player_start: Pos,
    start_dir: Dir,
    ghost_spawns: [Pos; GHOST_COUNT],
    ghost_home: Pos,
    power_spots: Vec<Pos>,
}

impl Maze {
    pub fn reference() -> Result<Maze, MazeError> {
        Maze::from_layout(&REFERENCE_LAYOUT)
    }

    /// Builds a maze from `layout`. Ghost spawns and the ghost home that sit
    /// on a wall are moved to the nearest open cell; the player start and the
    /// power spots must already be open.
    pub fn from_layout(layout: &Layout<'_>) -> Result<Maze, MazeError> {
        let height = layout.rows.len();
        let width = layout.rows.first().map_or(0, |r| r.chars().count());
        if height == 0 || width == 0 {
            return Err(MazeError::Empty);
        }

        let mut grid = Vec::with_capacity(height);
        for (row, line) in layout.rows.iter().enumerate() {
            let tiles: Vec<Tile> = line
                .chars()
                .map(|c| if c == '#' { Tile::Wall } else { Tile::Open })
                .collect();
            if tiles.len() != width {
                return Err(MazeError::Ragged {
                    row,
                    expected: width,
                    found: tiles.len(),
                });
            }
            grid.push(tiles);
        }

        let mut maze = Maze {
            width,
            height,
            grid,
            player_start: layout.player_start,
            start_dir: layout.start_dir,
            ghost_spawns: layout.ghost_spawns,
            ghost_home: layout.ghost_home,
            power_spots: Vec::with_capacity(layout.power_spots.len()),
        };

        maze.require_open("player start", layout.player_start)?;
        for &spot in layout.power_spots {
            maze.require_open("power pellet", spot)?;
            if !maze.power_spots.contains(&spot) {
                maze.power_spots.push(spot);
            }
        }

        maze.ghost_home = maze.snap("ghost home", layout.ghost_home)?;
        let mut spawns = layout.ghost_spawns;
        for spawn in &mut spawns {
            *spawn = maze.snap("ghost spawn", *spawn)?;
        }
        maze.ghost_spawns = spawns;

        Ok(maze)
    }

    fn require_open(&self, what: &'static str, pos: Pos) -> Result<(), MazeError> {
        match self.tile(pos) {
            None => Err(MazeError::OutOfBounds { what, pos }),
            Some(Tile::Wall) => Err(MazeError::Blocked { what, pos }),
            Some(Tile::Open) => Ok(()),
        }
    }

    fn snap(&self, what: &'static str, pos: Pos) -> Result<Pos, MazeError> {
        if self.tile(pos).is_none() {
            return Err(MazeError::OutOfBounds { what, pos });
        }
        if self.is_walkable(pos) {
            return Ok(pos);
        }
        let snapped = self.nearest_open(pos).ok_or(MazeError::NoOpenCell)?;
        debug!("{what} {pos} is a wall, using {snapped}");
        Ok(snapped)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `None` for coordinates outside the grid.
    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        self.grid.get(y)?.get(x).copied()
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile(pos) == Some(Tile::Open)
    }

    pub fn is_walkable_xy(&self, x: i32, y: i32) -> bool {
        self.is_walkable(Pos::new(x, y))
    }

    /// Open cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.grid.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, t)| **t == Tile::Open)
                .map(move |(x, _)| Pos::new(x as i32, y as i32))
        })
    }

    /// Closest open cell by Manhattan distance, ties broken by row then column.
    pub fn nearest_open(&self, target: Pos) -> Option<Pos> {
        self.open_cells()
            .min_by_key(|p| (p.manhattan(target), p.y, p.x))
    }

    /// Like [`Maze::nearest_open`] but never returns `avoid`.
    pub fn nearest_open_except(&self, target: Pos, avoid: Pos) -> Option<Pos> {
        self.open_cells()
            .filter(|p| *p != avoid)
            .min_by_key(|p| (p.manhattan(target), p.y, p.x))
    }

    pub fn player_start(&self) -> Pos {
        self.player_start
    }

    pub fn start_dir(&self) -> Dir {
        self.start_dir
    }

    pub fn ghost_spawns(&self) -> &[Pos; GHOST_COUNT] {
        &self.ghost_spawns
    }

    pub fn ghost_home(&self) -> Pos {
        self.ghost_home
    }

    pub fn power_spots(&self) -> &[Pos] {
        &self.power_spots
    }
}
