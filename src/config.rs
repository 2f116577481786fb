use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::game::MAX_SEATS;

/// Table rules shared by every game a server hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    /// Seats available per game, capped at what the deck can deal
    pub max_players: usize,
    /// Seats that must be filled before ready votes can start a round
    pub min_players: usize,
    /// Completed turn-order loops required before stop may be called
    pub stop_min_loops: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_players: 8,
            min_players: 2,
            stop_min_loops: 3,
        }
    }
}

/// Configuration for the idle game reaper
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to run the cleanup task
    pub cleanup_interval: Duration,
    /// How long a game must be idle before it is removed
    pub idle_threshold: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(30 * 60), // 30 minutes
            idle_threshold: Duration::from_secs(24 * 60 * 60), // 24 hours
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub rules: GameRules,
    pub cleanup: CleanupConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            rules: GameRules::default(),
            cleanup: CleanupConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `TAMALO_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).map(|raw| (key.to_string(), raw));

        let bind_addr = lookup("TAMALO_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let mut max_players = parse_or(parse("TAMALO_MAX_PLAYERS"), defaults.rules.max_players);
        if max_players == 0 || max_players > MAX_SEATS {
            warn!(
                max_players,
                limit = MAX_SEATS,
                "TAMALO_MAX_PLAYERS out of range, clamping"
            );
            max_players = max_players.clamp(1, MAX_SEATS);
        }

        let mut min_players = parse_or(parse("TAMALO_MIN_PLAYERS"), defaults.rules.min_players);
        if min_players == 0 || min_players > max_players {
            warn!(
                min_players,
                max_players, "TAMALO_MIN_PLAYERS out of range, clamping"
            );
            min_players = min_players.clamp(1, max_players);
        }

        let rules = GameRules {
            max_players,
            min_players,
            stop_min_loops: parse_or(
                parse("TAMALO_STOP_MIN_LOOPS"),
                defaults.rules.stop_min_loops,
            ),
        };

        let mut cleanup_interval_secs = parse_or(
            parse("TAMALO_CLEANUP_INTERVAL_SECS"),
            defaults.cleanup.cleanup_interval.as_secs(),
        );
        if cleanup_interval_secs == 0 {
            warn!("TAMALO_CLEANUP_INTERVAL_SECS must be positive, using default");
            cleanup_interval_secs = defaults.cleanup.cleanup_interval.as_secs();
        }

        let cleanup = CleanupConfig {
            cleanup_interval: Duration::from_secs(cleanup_interval_secs),
            idle_threshold: Duration::from_secs(parse_or(
                parse("TAMALO_IDLE_THRESHOLD_SECS"),
                defaults.cleanup.idle_threshold.as_secs(),
            )),
        };

        Self {
            bind_addr,
            rules,
            cleanup,
        }
    }
}

fn parse_or<T: FromStr>(entry: Option<(String, String)>, default: T) -> T {
    match entry {
        Some((key, raw)) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key = %key, value = %raw, "Invalid configuration value, using default");
            default
        }),
        None => default,
    }
}
