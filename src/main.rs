use std::fs::File;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::{error, info};
use simplelog::{Config, WriteLogger};

use pacman_tick::error::Result;
use pacman_tick::input::{self, Command};
use pacman_tick::render::{self, Renderer};
use pacman_tick::{Game, Maze, Settings};

fn main() -> Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings)?;
    let maze = Maze::reference()?;

    let mut stdout = io::stdout();
    let _terminal = TerminalGuard::enter(&mut stdout)?;
    run(&mut stdout, maze, settings)
}

/// Holds raw mode and the alternate screen. Dropping it restores the
/// terminal even when setup fails halfway or the game loop errors out.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(stdout: &mut Stdout) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = TerminalGuard;
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(Show);
        let _ = stdout.execute(LeaveAlternateScreen);
        if let Err(e) = terminal::disable_raw_mode() {
            error!("could not leave raw mode: {e}");
        }
    }
}

/// Logs go to a file because the game owns the terminal.
fn init_logging(settings: &Settings) -> Result<()> {
    if let Some(path) = &settings.log_file {
        let file = File::create(path)?;
        WriteLogger::init(settings.log_level, Config::default(), file)?;
        info!("logging to {}", path.display());
    }
    Ok(())
}

fn run(stdout: &mut Stdout, maze: Maze, settings: Settings) -> Result<()> {
    let frame_time = settings.frame_time();
    let mut renderer = Renderer::new(maze.width(), maze.height());
    let mut game = Game::new(maze, settings);
    let start = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => match input::command_for(&key) {
                    Some(Command::Quit) => {
                        info!("quit with high score {}", game.high_score());
                        return Ok(());
                    }
                    Some(Command::Steer(dir)) => game.queue_direction(dir),
                    Some(Command::PlayAgain) if game.is_game_over() => game.reset(),
                    _ => {}
                },
                Event::Resize(_, _) => renderer.invalidate(),
                _ => {}
            }
        }

        let elapsed = start.elapsed().as_millis() as u64;
        game.advance_ms(elapsed.saturating_sub(game.now_ms()));
        render::render(stdout, &game, &mut renderer, terminal::size()?)?;

        let spent = frame_start.elapsed();
        if spent < frame_time {
            thread::sleep(frame_time - spent);
        }
    }
}
