//! Logical-time scheduler. Replaces wall-clock interval timers with a single
//! dispatch loop so the simulation can be advanced deterministically.

use std::time::Duration;

use crate::config::Settings;

/// Scheduled work. Events due at the same instant are dispatched in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Event {
    PowerExpiry,
    Player,
    Ghost,
    Mouth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    interval: u64,
    next_due: u64,
}

impl Timer {
    fn new(interval: Duration, now: u64) -> Self {
        let interval = (interval.as_millis() as u64).max(1);
        Self {
            interval,
            next_due: now + interval,
        }
    }

    fn fire(&mut self) {
        self.next_due += self.interval;
    }

    fn restart(&mut self, now: u64) {
        self.next_due = now + self.interval;
    }
}

#[derive(Debug, Clone)]
pub struct Clock {
    now: u64,
    player: Timer,
    ghost: Timer,
    mouth: Timer,
}

impl Clock {
    pub fn new(settings: &Settings) -> Self {
        Self {
            now: 0,
            player: Timer::new(settings.player_interval, 0),
            ghost: Timer::new(settings.ghost_interval, 0),
            mouth: Timer::new(settings.mouth_interval, 0),
        }
    }

    /// Logical milliseconds since the clock was created.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// The earliest event due no later than `until`, if any.
    pub fn next_due(&self, power_deadline: Option<u64>, until: u64) -> Option<(u64, Event)> {
        [
            (power_deadline, Event::PowerExpiry),
            (Some(self.player.next_due), Event::Player),
            (Some(self.ghost.next_due), Event::Ghost),
            (Some(self.mouth.next_due), Event::Mouth),
        ]
        .into_iter()
        .filter_map(|(at, event)| at.map(|at| (at, event)))
        .filter(|(at, _)| *at <= until)
        .min()
    }

    /// Moves time to `at` and reschedules the periodic timer behind `event`.
    pub fn fire(&mut self, at: u64, event: Event) {
        self.now = self.now.max(at);
        match event {
            Event::Player => self.player.fire(),
            Event::Ghost => self.ghost.fire(),
            Event::Mouth => self.mouth.fire(),
            Event::PowerExpiry => {}
        }
    }

    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    /// Drops pending movement ticks and schedules the next ones one full
    /// interval from now.
    pub fn restart_movement(&mut self) {
        self.player.restart(self.now);
        self.ghost.restart(self.now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> Clock {
        Clock::new(&Settings::default())
    }

    fn drain(clock: &mut Clock, power: Option<u64>, until: u64) -> Vec<(u64, Event)> {
        let mut fired = Vec::new();
        while let Some((at, event)) = clock.next_due(power, until) {
            clock.fire(at, event);
            fired.push((at, event));
        }
        clock.settle(until);
        fired
    }

    #[test]
    fn nothing_due_before_first_interval() {
        let c = clock();
        assert_eq!(c.next_due(None, 199), None);
    }

    #[test]
    fn cadences_are_independent() {
        let mut c = clock();
        let fired = drain(&mut c, None, 600);
        assert_eq!(
            fired,
            vec![
                (200, Event::Player),
                (200, Event::Mouth),
                (300, Event::Ghost),
                (400, Event::Player),
                (400, Event::Mouth),
                (600, Event::Player),
                (600, Event::Ghost),
                (600, Event::Mouth),
            ]
        );
        assert_eq!(c.now(), 600);
    }

    #[test]
    fn power_expiry_goes_first_on_ties() {
        let c = clock();
        assert_eq!(c.next_due(Some(200), 200), Some((200, Event::PowerExpiry)));
    }

    #[test]
    fn restart_rephases_movement_only() {
        let mut c = clock();
        drain(&mut c, None, 250);
        c.restart_movement();
        assert_eq!(c.next_due(None, 449), Some((400, Event::Mouth)));
        let fired = drain(&mut c, None, 550);
        assert!(fired.contains(&(450, Event::Player)));
        assert!(fired.contains(&(550, Event::Ghost)));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let settings = Settings {
            player_interval: Duration::ZERO,
            ..Settings::default()
        };
        let c = Clock::new(&settings);
        assert_eq!(c.next_due(None, 1), Some((1, Event::Player)));
    }
}
