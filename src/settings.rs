use std::env;

use crate::insights::DetailLevel;

pub const DEFAULT_MIN_PASSES: u32 = 2;
pub const DEFAULT_FOOT_MIN_ACTIONS: u32 = 3;
pub const DEFAULT_FOOT_TOP_N: usize = 10;
pub const DEFAULT_TOP_PLAYERS: usize = 5;

/// Presentation knobs passed into report building. Nothing in the aggregation
/// itself depends on them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub detail: DetailLevel,
    /// Pass-network edges below this count are dropped.
    pub min_passes: u32,
    pub foot_min_actions: u32,
    pub foot_top_n: usize,
    pub top_players: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detail: DetailLevel::default(),
            min_passes: DEFAULT_MIN_PASSES,
            foot_min_actions: DEFAULT_FOOT_MIN_ACTIONS,
            foot_top_n: DEFAULT_FOOT_TOP_N,
            top_players: DEFAULT_TOP_PLAYERS,
        }
    }
}

impl Settings {
    /// Load `.env.local` / `.env` (if present) and read `MATCH_LENS_*` overrides.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let detail = lookup("MATCH_LENS_DETAIL")
            .map(|raw| DetailLevel::parse(&raw))
            .unwrap_or(defaults.detail);
        let min_passes = lookup("MATCH_LENS_MIN_PASSES")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(defaults.min_passes)
            .max(1);
        let foot_min_actions = lookup("MATCH_LENS_FOOT_MIN_ACTIONS")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(defaults.foot_min_actions)
            .max(1);
        let foot_top_n = lookup("MATCH_LENS_FOOT_TOP_N")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.foot_top_n)
            .clamp(1, 50);
        let top_players = lookup("MATCH_LENS_TOP_PLAYERS")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.top_players)
            .clamp(1, 50);
        Self {
            detail,
            min_passes,
            foot_min_actions,
            foot_top_n,
            top_players,
        }
    }
}
