//! Tick-driven Pac-Man simulation on a fixed 15×15 maze, plus the pieces the
//! terminal front-end needs to draw it and feed it key presses.
//!
//! ```
//! use pacman_tick::{Dir, Game, Maze, Pos, Settings};
//!
//! let settings = Settings { seed: Some(1), ..Settings::default() };
//! let mut game = Game::new(Maze::reference()?, settings);
//! game.queue_direction(Dir::Right);
//! game.advance_ms(200);
//! assert_eq!(game.player().pos, Pos::new(2, 1));
//! assert_eq!(game.score(), 10);
//! # Ok::<(), pacman_tick::MazeError>(())
//! ```

pub mod clock;
pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod ghost;
pub mod input;
pub mod level;
pub mod pellets;
pub mod player;
pub mod power;
pub mod render;

pub use components::{Dir, Pos};
pub use config::Settings;
pub use error::{Error, MazeError};
pub use game::Game;
pub use ghost::{GhostKind, GhostLook};
pub use level::Maze;
pub use pellets::PelletKind;
