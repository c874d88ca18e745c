use std::collections::BTreeMap;

use serde::Serialize;

use crate::events::Half;
use crate::zones::PitchZone;

pub type Counts = BTreeMap<String, u32>;
pub type NestedCounts = BTreeMap<String, Counts>;

/// `num / den * 100` rounded to one decimal, 0 when `den` is 0.
pub fn percentage(num: u32, den: u32) -> f64 {
    if den == 0 {
        return 0.0;
    }
    round1(num as f64 / den as f64 * 100.0)
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub(crate) fn tally(map: &mut Counts, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

pub(crate) fn tally_nested(map: &mut NestedCounts, outer: &str, inner: &str) {
    tally(map.entry(outer.to_string()).or_default(), inner);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HalfStatistics {
    pub shots: u32,
    pub goals: u32,
    pub passes: u32,
    pub successful_passes: u32,
}

impl HalfStatistics {
    pub fn pass_accuracy(&self) -> f64 {
        percentage(self.successful_passes, self.passes)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerStatistics {
    pub name: String,
    pub shots: u32,
    pub goals: u32,
    pub passes: u32,
    pub successful_passes: u32,
    pub tackles: u32,
    pub interceptions: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerMetrics {
    pub pass_accuracy: f64,
    pub goal_conversion: f64,
}

impl PlayerStatistics {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn pass_accuracy(&self) -> f64 {
        percentage(self.successful_passes, self.passes)
    }

    /// Goals per shot, in percent.
    pub fn goal_conversion(&self) -> f64 {
        percentage(self.goals, self.shots)
    }

    pub fn defensive_actions(&self) -> u32 {
        self.tackles + self.interceptions
    }

    pub fn metrics(&self) -> PlayerMetrics {
        PlayerMetrics {
            pass_accuracy: self.pass_accuracy(),
            goal_conversion: self.goal_conversion(),
        }
    }
}

/// Passes split by whether the passer was being pressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PressureStats {
    pub under_pressure: u32,
    pub no_pressure: u32,
}

impl PressureStats {
    pub fn total(&self) -> u32 {
        self.under_pressure + self.no_pressure
    }

    pub fn pressure_percentage(&self) -> f64 {
        percentage(self.under_pressure, self.total())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TeamMetrics {
    pub shot_accuracy: f64,
    pub pass_accuracy: f64,
    pub cross_accuracy: f64,
    pub tackle_success: f64,
    pub pressure_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamStatistics {
    pub name: String,

    pub shots: u32,
    pub goals: u32,
    pub shots_on_target: u32,
    pub shots_off_target: u32,
    pub shots_blocked: u32,
    pub passes: u32,
    pub successful_passes: u32,
    pub crosses: u32,
    pub successful_crosses: u32,
    pub tackles: u32,
    pub successful_tackles: u32,
    pub interceptions: u32,
    pub fouls: u32,
    pub corners: u32,
    pub offsides: u32,

    pub first_half: HalfStatistics,
    pub second_half: HalfStatistics,

    // First-appearance order; insight tie-breaks depend on it.
    pub players: Vec<PlayerStatistics>,

    pub pass_zones: BTreeMap<PitchZone, u32>,
    pub shot_locations: Counts,
    pub shot_types: Counts,
    pub event_categories: Counts,
    pub event_types: NestedCounts,
    pub foot_used: Counts,
    pub foot_by_event: NestedCounts,
    pub player_foot_usage: NestedCounts,
    /// passer -> receiver -> successful passes
    pub pass_combinations: NestedCounts,
    pub pressure: PressureStats,
    /// pressure value -> result/outcome -> count
    pub pressure_results: NestedCounts,
    pub gk_actions: Counts,
    pub save_types: Counts,
}

impl TeamStatistics {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn half(&self, half: Half) -> &HalfStatistics {
        match half {
            Half::First => &self.first_half,
            Half::Second => &self.second_half,
        }
    }

    pub fn half_mut(&mut self, half: Half) -> &mut HalfStatistics {
        match half {
            Half::First => &mut self.first_half,
            Half::Second => &mut self.second_half,
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerStatistics> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Player record for `name`, created with zeroed counters on first use.
    pub fn player_entry(&mut self, name: &str) -> &mut PlayerStatistics {
        let idx = match self.players.iter().position(|p| p.name == name) {
            Some(idx) => idx,
            None => {
                self.players.push(PlayerStatistics::new(name));
                self.players.len() - 1
            }
        };
        &mut self.players[idx]
    }

    pub fn pass_combination(&self, from: &str, to: &str) -> u32 {
        self.pass_combinations
            .get(from)
            .and_then(|targets| targets.get(to))
            .copied()
            .unwrap_or(0)
    }

    pub fn shot_accuracy(&self) -> f64 {
        percentage(self.shots_on_target, self.shots)
    }

    pub fn pass_accuracy(&self) -> f64 {
        percentage(self.successful_passes, self.passes)
    }

    pub fn cross_accuracy(&self) -> f64 {
        percentage(self.successful_crosses, self.crosses)
    }

    pub fn tackle_success(&self) -> f64 {
        percentage(self.successful_tackles, self.tackles)
    }

    pub fn pressure_percentage(&self) -> f64 {
        self.pressure.pressure_percentage()
    }

    pub fn metrics(&self) -> TeamMetrics {
        TeamMetrics {
            shot_accuracy: self.shot_accuracy(),
            pass_accuracy: self.pass_accuracy(),
            cross_accuracy: self.cross_accuracy(),
            tackle_success: self.tackle_success(),
            pressure_percentage: self.pressure_percentage(),
        }
    }
}
