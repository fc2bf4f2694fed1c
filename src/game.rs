use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{Clock, Event};
use crate::components::{Dir, Pos};
use crate::config::Settings;
use crate::ghost::{self, GhostKind, GhostLook, GHOST_SCORE};
use crate::level::Maze;
use crate::pellets::{PelletKind, Pellets};
use crate::player::Player;
use crate::power::PowerMode;

/// Everything that is rebuilt when a new episode starts.
#[derive(Debug, Clone)]
struct Episode {
    player: Player,
    ghosts: Vec<Pos>,
    pellets: Pellets,
    power: PowerMode,
    score: u32,
    game_over: bool,
}

impl Episode {
    fn new(maze: &Maze) -> Self {
        Self {
            player: Player::spawn(maze),
            ghosts: maze.ghost_spawns().to_vec(),
            pellets: Pellets::seed(maze),
            power: PowerMode::default(),
            score: 0,
            game_over: false,
        }
    }
}

pub struct Game<R = StdRng> {
    maze: Maze,
    settings: Settings,
    clock: Clock,
    rng: R,
    episode: Episode,
    episode_number: u32,
    high_score: u32,
    mouth_open: bool,
}

impl Game<StdRng> {
    /// Seeds the ghost RNG from `settings.seed`, or from entropy when unset.
    pub fn new(maze: Maze, settings: Settings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(maze, settings, rng)
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(maze: Maze, settings: Settings, rng: R) -> Self {
        let clock = Clock::new(&settings);
        let episode = Episode::new(&maze);
        info!(
            "episode 1 started: {} dots, {} power pellets",
            episode.pellets.dots().len(),
            episode.pellets.power_pellets().len()
        );
        Self {
            maze,
            settings,
            clock,
            rng,
            episode,
            episode_number: 1,
            high_score: 0,
            mouth_open: true,
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// 1 for the first episode, incremented on every reset.
    pub fn episode_number(&self) -> u32 {
        self.episode_number
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now()
    }

    pub fn player(&self) -> &Player {
        &self.episode.player
    }

    pub fn ghosts(&self) -> &[Pos] {
        &self.episode.ghosts
    }

    pub fn dots(&self) -> &HashSet<Pos> {
        self.episode.pellets.dots()
    }

    pub fn power_pellets(&self) -> &HashSet<Pos> {
        self.episode.pellets.power_pellets()
    }

    pub fn pellet_at(&self, pos: Pos) -> Option<PelletKind> {
        self.episode.pellets.kind_at(pos)
    }

    pub fn score(&self) -> u32 {
        self.episode.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_game_over(&self) -> bool {
        self.episode.game_over
    }

    pub fn is_power_active(&self) -> bool {
        self.episode.power.is_active()
    }

    pub fn power_remaining(&self) -> Duration {
        Duration::from_millis(self.episode.power.remaining_ms(self.clock.now()))
    }

    pub fn mouth_open(&self) -> bool {
        self.mouth_open
    }

    pub fn ghost_look(&self, index: usize) -> GhostLook {
        if self.is_power_active() {
            GhostLook::Frightened
        } else {
            GhostLook::Normal(GhostKind::for_index(index))
        }
    }

    /// Sets the queued direction. Ignored once the game is over.
    pub fn queue_direction(&mut self, dir: Dir) {
        if self.episode.game_over {
            return;
        }
        self.episode.player.queue(dir);
    }

    /// Starts a fresh episode. The high score is kept.
    pub fn reset(&mut self) {
        self.episode = Episode::new(&self.maze);
        self.episode_number += 1;
        self.clock.restart_movement();
        info!(
            "episode {} started (high score {})",
            self.episode_number, self.high_score
        );
    }

    /// Advances logical time, dispatching every tick that falls due.
    pub fn advance(&mut self, dt: Duration) {
        self.advance_ms(dt.as_millis() as u64);
    }

    pub fn advance_ms(&mut self, dt_ms: u64) {
        let until = self.clock.now().saturating_add(dt_ms);
        while let Some((at, event)) = self.clock.next_due(self.episode.power.deadline(), until) {
            self.clock.fire(at, event);
            self.dispatch(event);
        }
        self.clock.settle(until);
    }

    fn dispatch(&mut self, event: Event) {
        trace!("t={} {:?}", self.clock.now(), event);
        match event {
            Event::PowerExpiry => self.expire_power(),
            Event::Player => self.player_tick(),
            Event::Ghost => self.ghost_tick(),
            Event::Mouth => self.mouth_open = !self.mouth_open,
        }
    }

    fn expire_power(&mut self) {
        if self.episode.power.expire(self.clock.now()) {
            debug!("power mode expired at t={}", self.clock.now());
        }
    }

    /// Moves the player one cell, collects what is there and resolves
    /// collisions. No-op once the game is over.
    pub fn player_tick(&mut self) {
        if self.episode.game_over {
            return;
        }
        let Some(pos) = self.episode.player.advance(&self.maze) else {
            return;
        };
        if self.collect(pos) {
            return;
        }
        self.resolve_collisions();
    }

    /// Moves all ghosts from one snapshot and resolves collisions. No-op once
    /// the game is over.
    pub fn ghost_tick(&mut self) {
        if self.episode.game_over {
            return;
        }
        let moved = ghost::move_ghosts(
            &self.maze,
            &self.episode.ghosts,
            self.episode.player.pos,
            self.episode.power.is_active(),
            &mut self.rng,
        );
        if moved != self.episode.ghosts {
            self.episode.ghosts = moved;
            self.resolve_collisions();
        }
    }

    /// Returns true when the last collectible was taken and a new episode
    /// has started.
    fn collect(&mut self, pos: Pos) -> bool {
        let Some(kind) = self.episode.pellets.consume(pos) else {
            return false;
        };
        self.episode.score += kind.score();
        if kind == PelletKind::Power {
            let duration = self.settings.power_duration.as_millis() as u64;
            self.episode.power.activate(self.clock.now(), duration);
            debug!("power pellet at {pos}, power until t={}", self.clock.now() + duration);
        }

        if self.episode.pellets.is_empty() {
            info!("episode {} won with {}", self.episode_number, self.episode.score);
            self.record_high_score();
            self.reset();
            return true;
        }
        false
    }

    fn resolve_collisions(&mut self) {
        let player = self.episode.player.pos;
        let hits: Vec<usize> = self
            .episode
            .ghosts
            .iter()
            .enumerate()
            .filter(|(_, g)| **g == player)
            .map(|(idx, _)| idx)
            .collect();
        if hits.is_empty() {
            return;
        }

        if self.episode.power.is_active() {
            // an eaten ghost must not respawn on top of the player
            let home = match self.maze.ghost_home() {
                home if home == player => {
                    self.maze.nearest_open_except(home, player).unwrap_or(home)
                }
                home => home,
            };
            for idx in hits {
                self.episode.score += GHOST_SCORE;
                self.episode.ghosts[idx] = home;
                debug!("ghost {idx} eaten at {player}");
            }
        } else {
            self.record_high_score();
            self.episode.game_over = true;
            info!(
                "game over at {player}, score {} (high score {})",
                self.episode.score, self.high_score
            );
        }
    }

    fn record_high_score(&mut self) {
        if self.episode.score > self.high_score {
            self.high_score = self.episode.score;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        let settings = Settings {
            seed: Some(5),
            ..Settings::default()
        };
        Game::new(Maze::reference().unwrap(), settings)
    }

    /// Parks the ghosts where the tests do not reach them.
    fn park_ghosts(g: &mut Game) {
        g.episode.ghosts = vec![Pos::new(13, 13); 4];
    }

    #[test]
    fn fresh_game_state() {
        let g = game();
        assert_eq!(g.player().pos, Pos::new(1, 1));
        assert_eq!(g.score(), 0);
        assert_eq!(g.high_score(), 0);
        assert!(!g.is_game_over());
        assert!(!g.is_power_active());
        assert_eq!(g.ghosts().len(), 4);
        assert!(g.dots().is_disjoint(g.power_pellets()));
    }

    #[test]
    fn one_tick_right_eats_a_dot() {
        let mut g = game();
        g.player_tick();
        assert_eq!(g.player().pos, Pos::new(2, 1));
        assert_eq!(g.score(), 10);
        assert!(!g.dots().contains(&Pos::new(2, 1)));
    }

    #[test]
    fn power_pellet_scores_and_activates() {
        let mut g = game();
        park_ghosts(&mut g);
        g.episode.player.pos = Pos::new(12, 1);
        g.player_tick();
        assert_eq!(g.player().pos, Pos::new(13, 1));
        assert_eq!(g.score(), 50);
        assert!(!g.power_pellets().contains(&Pos::new(13, 1)));
        assert!(g.is_power_active());
        assert_eq!(g.episode.power.deadline(), Some(g.now_ms() + 10_000));
    }

    #[test]
    fn second_pellet_restarts_deadline() {
        let mut g = game();
        park_ghosts(&mut g);
        g.episode.player.pos = Pos::new(12, 1);
        g.player_tick();
        g.clock.settle(4_000);
        g.episode.player.pos = Pos::new(2, 13);
        g.episode.player.dir = Dir::Left;
        g.episode.player.queued = Dir::Left;
        g.player_tick();
        assert_eq!(g.player().pos, Pos::new(1, 13));
        assert_eq!(g.episode.power.deadline(), Some(14_000));
    }

    #[test]
    fn ghost_collision_without_power_ends_the_game() {
        let mut g = game();
        g.episode.score = 120;
        g.episode.ghosts[0] = Pos::new(2, 1);
        g.player_tick();
        assert!(g.is_game_over());
        assert_eq!(g.high_score(), 130);

        let before = (g.player().pos, g.ghosts().to_vec(), g.score());
        g.queue_direction(Dir::Down);
        g.player_tick();
        g.ghost_tick();
        g.advance_ms(5_000);
        assert_eq!(before, (g.player().pos, g.ghosts().to_vec(), g.score()));
        assert_eq!(g.player().queued, Dir::Right);
    }

    #[test]
    fn ghost_collision_with_power_eats_only_that_ghost() {
        let mut g = game();
        g.episode.power.activate(0, 10_000);
        g.episode.ghosts = vec![
            Pos::new(2, 1),
            Pos::new(1, 13),
            Pos::new(13, 13),
            Pos::new(11, 11),
        ];
        g.player_tick();
        assert!(!g.is_game_over());
        assert_eq!(g.score(), 10 + 200);
        assert_eq!(g.ghosts()[0], g.maze().ghost_home());
        assert_eq!(&g.ghosts()[1..], &[Pos::new(1, 13), Pos::new(13, 13), Pos::new(11, 11)]);
    }

    /// Player boxed in at (4,1) facing a wall, ghost 0 next to it at (5,1)
    /// whose only other exit is (5,2). Fleeing has nowhere to go there, so
    /// the ghost picks between the two cells in both modes.
    fn ghost_beside_boxed_player(seed: u64, powered: bool) -> Game {
        let settings = Settings {
            seed: Some(seed),
            ..Settings::default()
        };
        let mut g = Game::new(Maze::reference().unwrap(), settings);
        park_ghosts(&mut g);
        g.episode.ghosts[0] = Pos::new(5, 1);
        g.episode.player.pos = Pos::new(4, 1);
        g.episode.player.dir = Dir::Up;
        g.episode.player.queued = Dir::Up;
        g.episode.score = 70;
        if powered {
            g.episode.power.activate(0, 10_000);
        }
        g
    }

    #[test]
    fn ghost_stepping_onto_player_ends_the_game() {
        let mut arrivals = 0;
        for seed in 0..32 {
            let mut g = ghost_beside_boxed_player(seed, false);
            g.player_tick();
            assert_eq!(g.player().pos, Pos::new(4, 1));
            assert!(!g.is_game_over());

            g.ghost_tick();
            if g.ghosts()[0] == Pos::new(4, 1) {
                arrivals += 1;
                assert!(g.is_game_over());
                assert_eq!(g.high_score(), 70);
            } else {
                assert_eq!(g.ghosts()[0], Pos::new(5, 2));
                assert!(!g.is_game_over());
                assert_eq!(g.high_score(), 0);
            }
        }
        assert!(arrivals > 0);
    }

    #[test]
    fn ghost_stepping_onto_powered_player_is_eaten() {
        let mut arrivals = 0;
        for seed in 0..32 {
            let mut g = ghost_beside_boxed_player(seed, true);
            g.ghost_tick();
            assert!(!g.is_game_over());
            if g.score() == 270 {
                arrivals += 1;
                assert_eq!(g.ghosts()[0], g.maze().ghost_home());
            } else {
                assert_eq!(g.score(), 70);
                assert_eq!(g.ghosts()[0], Pos::new(5, 2));
            }
        }
        assert!(arrivals > 0);
    }

    #[test]
    fn eaten_ghost_never_respawns_on_the_player() {
        let mut g = game();
        park_ghosts(&mut g);
        let home = g.maze().ghost_home();
        g.episode.power.activate(0, 10_000);
        g.episode.ghosts[0] = home;
        g.episode.player.pos = Pos::new(home.x, home.y - 1);
        g.episode.player.dir = Dir::Down;
        g.episode.player.queued = Dir::Down;
        g.player_tick();

        assert_eq!(g.player().pos, home);
        assert_eq!(g.score(), 10 + 200);
        assert_ne!(g.ghosts()[0], home);
        assert!(g.maze().is_walkable(g.ghosts()[0]));

        // power running out must not leave a live ghost on the player
        g.episode.power.expire(u64::MAX);
        assert!(g.ghosts().iter().all(|p| *p != g.player().pos));
        assert!(!g.is_game_over());
    }

    #[test]
    fn simultaneous_collisions_are_each_eaten() {
        let mut g = game();
        g.episode.power.activate(0, 10_000);
        g.episode.ghosts = vec![Pos::new(2, 1), Pos::new(2, 1), Pos::new(13, 13), Pos::new(11, 11)];
        g.player_tick();
        assert_eq!(g.score(), 10 + 400);
        assert_eq!(g.ghosts()[0], g.maze().ghost_home());
        assert_eq!(g.ghosts()[1], g.maze().ghost_home());
    }

    #[test]
    fn last_pellet_wins_and_resets() {
        let mut g = game();
        park_ghosts(&mut g);
        let mut last = Pellets::seed(g.maze());
        for p in g.maze().open_cells().collect::<Vec<_>>() {
            if p != Pos::new(2, 1) {
                last.consume(p);
            }
        }
        g.episode.pellets = last;
        g.episode.score = 990;
        g.player_tick();

        assert_eq!(g.high_score(), 1000);
        assert_eq!(g.episode_number(), 2);
        assert_eq!(g.score(), 0);
        assert_eq!(g.player().pos, Pos::new(1, 1));
        assert_eq!(g.ghosts(), g.maze().ghost_spawns());
        assert_eq!(g.episode.pellets, Pellets::seed(g.maze()));
    }

    #[test]
    fn lower_score_keeps_high_score_on_win() {
        let mut g = game();
        park_ghosts(&mut g);
        g.high_score = 5_000;
        let mut last = Pellets::seed(g.maze());
        for p in g.maze().open_cells().collect::<Vec<_>>() {
            if p != Pos::new(2, 1) {
                last.consume(p);
            }
        }
        g.episode.pellets = last;
        g.player_tick();
        assert_eq!(g.high_score(), 5_000);
        assert_eq!(g.episode_number(), 2);
    }

    #[test]
    fn reset_keeps_high_score_and_clears_the_rest() {
        let mut g = game();
        g.high_score = 700;
        g.episode.score = 300;
        g.episode.game_over = true;
        g.episode.power.activate(0, 10_000);
        g.episode.player.pos = Pos::new(5, 5);
        g.episode.player.dir = Dir::Up;
        g.reset();
        assert_eq!(g.high_score(), 700);
        assert_eq!(g.score(), 0);
        assert!(!g.is_game_over());
        assert!(!g.is_power_active());
        assert_eq!(g.player().pos, Pos::new(1, 1));
        assert_eq!(g.player().dir, Dir::Right);
        assert_eq!(g.player().queued, Dir::Right);
    }

    #[test]
    fn looks_follow_power_mode() {
        let mut g = game();
        assert_eq!(g.ghost_look(1), GhostLook::Normal(GhostKind::Pinky));
        g.episode.power.activate(0, 10);
        assert_eq!(g.ghost_look(1), GhostLook::Frightened);
    }

    #[test]
    fn mouth_toggles_on_its_own_cadence() {
        let mut g = game();
        park_ghosts(&mut g);
        assert!(g.mouth_open());
        g.advance_ms(200);
        assert!(!g.mouth_open());
        g.advance_ms(200);
        assert!(g.mouth_open());
    }
}
