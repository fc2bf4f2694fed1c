use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;

const DEFAULT_PLAYER_MS: u64 = 200;
const DEFAULT_GHOST_MS: u64 = 300;
const DEFAULT_MOUTH_MS: u64 = 200;
const DEFAULT_POWER_MS: u64 = 10_000;
const DEFAULT_RENDER_FPS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub player_interval: Duration,
    pub ghost_interval: Duration,
    pub mouth_interval: Duration,
    pub power_duration: Duration,
    pub render_fps: u64,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_interval: Duration::from_millis(DEFAULT_PLAYER_MS),
            ghost_interval: Duration::from_millis(DEFAULT_GHOST_MS),
            mouth_interval: Duration::from_millis(DEFAULT_MOUTH_MS),
            power_duration: Duration::from_millis(DEFAULT_POWER_MS),
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
            log_file: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl Settings {
    /// Reads `PACMAN_*` variables from the process environment. Missing,
    /// unparsable or zero values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let positive = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        Self {
            player_interval: Duration::from_millis(positive("PACMAN_PLAYER_MS", DEFAULT_PLAYER_MS)),
            ghost_interval: Duration::from_millis(positive("PACMAN_GHOST_MS", DEFAULT_GHOST_MS)),
            mouth_interval: Duration::from_millis(positive("PACMAN_MOUTH_MS", DEFAULT_MOUTH_MS)),
            power_duration: Duration::from_millis(positive("PACMAN_POWER_MS", DEFAULT_POWER_MS)),
            render_fps: positive("PACMAN_FPS", DEFAULT_RENDER_FPS),
            seed: lookup("PACMAN_SEED").and_then(|v| v.trim().parse().ok()),
            log_file: lookup("PACMAN_LOG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_level: lookup("PACMAN_LOG_LEVEL")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(LevelFilter::Info),
        }
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.render_fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_match_reference_timing() {
        let s = from_pairs(&[]);
        assert_eq!(s, Settings::default());
        assert_eq!(s.player_interval, Duration::from_millis(200));
        assert_eq!(s.ghost_interval, Duration::from_millis(300));
        assert_eq!(s.power_duration, Duration::from_secs(10));
    }

    #[test]
    fn overrides_are_parsed() {
        let s = from_pairs(&[
            ("PACMAN_PLAYER_MS", "120"),
            ("PACMAN_GHOST_MS", " 250 "),
            ("PACMAN_POWER_MS", "3000"),
            ("PACMAN_SEED", "42"),
            ("PACMAN_LOG", "/tmp/pacman.log"),
            ("PACMAN_LOG_LEVEL", "debug"),
        ]);
        assert_eq!(s.player_interval, Duration::from_millis(120));
        assert_eq!(s.ghost_interval, Duration::from_millis(250));
        assert_eq!(s.power_duration, Duration::from_millis(3000));
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.log_file, Some(PathBuf::from("/tmp/pacman.log")));
        assert_eq!(s.log_level, LevelFilter::Debug);
    }

    #[test]
    fn zero_and_garbage_fall_back() {
        let s = from_pairs(&[
            ("PACMAN_PLAYER_MS", "0"),
            ("PACMAN_FPS", "fast"),
            ("PACMAN_SEED", "-3"),
            ("PACMAN_LOG", "  "),
        ]);
        assert_eq!(s.player_interval, Duration::from_millis(200));
        assert_eq!(s.render_fps, 60);
        assert_eq!(s.seed, None);
        assert_eq!(s.log_file, None);
    }

    #[test]
    fn frame_time_from_fps() {
        let s = Settings {
            render_fps: 50,
            ..Settings::default()
        };
        assert_eq!(s.frame_time(), Duration::from_millis(20));
    }
}
