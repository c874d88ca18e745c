use std::fmt::Write as _;
use std::str::FromStr;

use serde::Serialize;

use crate::aggregate::MatchAnalysis;
use crate::events::Half;
use crate::insights::{DetailLevel, InsightCategory, TeamInsights, generate_insights};
use crate::settings::Settings;
use crate::stats::{PlayerStatistics, TeamStatistics, percentage, round1};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassEdge {
    pub from: String,
    pub to: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassNode {
    pub player: String,
    /// Passes given plus passes received over the kept edges.
    pub involvement: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassNetwork {
    pub edges: Vec<PassEdge>,
    pub nodes: Vec<PassNode>,
}

impl PassNetwork {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

pub fn pass_network(team: &TeamStatistics, min_passes: u32) -> PassNetwork {
    let mut edges: Vec<PassEdge> = team
        .pass_combinations
        .iter()
        .flat_map(|(from, targets)| {
            targets.iter().map(move |(to, count)| PassEdge {
                from: from.clone(),
                to: to.clone(),
                count: *count,
            })
        })
        .filter(|edge| edge.count >= min_passes)
        .collect();
    edges.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });

    let mut nodes: Vec<PassNode> = Vec::new();
    for edge in &edges {
        for player in [&edge.from, &edge.to] {
            match nodes.iter_mut().find(|n| &n.player == player) {
                Some(node) => node.involvement += edge.count,
                None => nodes.push(PassNode {
                    player: player.clone(),
                    involvement: edge.count,
                }),
            }
        }
    }
    nodes.sort_by(|a, b| {
        b.involvement
            .cmp(&a.involvement)
            .then_with(|| a.player.cmp(&b.player))
    });

    PassNetwork { edges, nodes }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootProfile {
    pub player: String,
    pub total_actions: u32,
    pub right_pct: f64,
    pub left_pct: f64,
    /// Weaker-foot share over stronger-foot share, in percent.
    pub two_footedness: f64,
}

pub fn player_foot_profiles(
    team: &TeamStatistics,
    min_actions: u32,
    top_n: usize,
) -> Vec<FootProfile> {
    let mut rows: Vec<FootProfile> = team
        .player_foot_usage
        .iter()
        .filter_map(|(player, feet)| {
            let total: u32 = feet.values().sum();
            if total < min_actions || total == 0 {
                return None;
            }
            let right = feet.get("Right").copied().unwrap_or(0) as f64 / total as f64 * 100.0;
            let left = feet.get("Left").copied().unwrap_or(0) as f64 / total as f64 * 100.0;
            let two_footedness = if right > 0.0 && left > 0.0 {
                right.min(left) / right.max(left) * 100.0
            } else {
                0.0
            };
            Some(FootProfile {
                player: player.clone(),
                total_actions: total,
                right_pct: round1(right),
                left_pct: round1(left),
                two_footedness: round1(two_footedness),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.total_actions.cmp(&a.total_actions));
    rows.truncate(top_n);
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayerStat {
    Goals,
    Shots,
    Passes,
    PassAccuracy,
    Tackles,
    Interceptions,
    GoalConversion,
}

impl PlayerStat {
    pub const ALL: [PlayerStat; 7] = [
        PlayerStat::Goals,
        PlayerStat::Shots,
        PlayerStat::Passes,
        PlayerStat::PassAccuracy,
        PlayerStat::Tackles,
        PlayerStat::Interceptions,
        PlayerStat::GoalConversion,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PlayerStat::Goals => "goals",
            PlayerStat::Shots => "shots",
            PlayerStat::Passes => "passes",
            PlayerStat::PassAccuracy => "pass_accuracy",
            PlayerStat::Tackles => "tackles",
            PlayerStat::Interceptions => "interceptions",
            PlayerStat::GoalConversion => "goal_conversion",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerStat::Goals => "Goals",
            PlayerStat::Shots => "Shots",
            PlayerStat::Passes => "Passes",
            PlayerStat::PassAccuracy => "Pass accuracy (%)",
            PlayerStat::Tackles => "Tackles",
            PlayerStat::Interceptions => "Interceptions",
            PlayerStat::GoalConversion => "Goal conversion (%)",
        }
    }

    pub fn value(self, player: &PlayerStatistics) -> f64 {
        match self {
            PlayerStat::Goals => player.goals as f64,
            PlayerStat::Shots => player.shots as f64,
            PlayerStat::Passes => player.passes as f64,
            PlayerStat::PassAccuracy => player.pass_accuracy(),
            PlayerStat::Tackles => player.tackles as f64,
            PlayerStat::Interceptions => player.interceptions as f64,
            PlayerStat::GoalConversion => player.goal_conversion(),
        }
    }
}

impl FromStr for PlayerStat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        PlayerStat::ALL
            .into_iter()
            .find(|stat| stat.key() == wanted)
            .ok_or_else(|| format!("unknown player stat: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRanking {
    pub player: String,
    pub value: f64,
}

/// Best `n` players of a team for one stat. Players at zero are left out; ties
/// keep first-appearance order.
pub fn top_players(team: &TeamStatistics, stat: PlayerStat, n: usize) -> Vec<PlayerRanking> {
    let mut rows: Vec<PlayerRanking> = team
        .players
        .iter()
        .map(|p| PlayerRanking {
            player: p.name.clone(),
            value: stat.value(p),
        })
        .filter(|row| row.value > 0.0)
        .collect();
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    rows.truncate(n);
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalfRow {
    pub team: String,
    pub half: u8,
    pub shots: u32,
    pub goals: u32,
    pub passes: u32,
    pub pass_accuracy: f64,
}

pub fn half_comparison(analysis: &MatchAnalysis) -> Vec<HalfRow> {
    let mut rows = Vec::new();
    for team in analysis.teams() {
        for half in [Half::First, Half::Second] {
            let stats = team.half(half);
            rows.push(HalfRow {
                team: team.name.clone(),
                half: half.number(),
                shots: stats.shots,
                goals: stats.goals,
                passes: stats.passes,
                pass_accuracy: stats.pass_accuracy(),
            });
        }
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotLocationShare {
    pub location: String,
    pub count: u32,
    pub percent: f64,
}

pub fn shot_location_shares(team: &TeamStatistics) -> Vec<ShotLocationShare> {
    let total: u32 = team.shot_locations.values().sum();
    let mut rows: Vec<ShotLocationShare> = team
        .shot_locations
        .iter()
        .map(|(location, count)| ShotLocationShare {
            location: location.clone(),
            count: *count,
            percent: percentage(*count, total),
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Insights for every team, each compared with its opponent when there is one.
pub fn insights_by_team(analysis: &MatchAnalysis, detail: DetailLevel) -> Vec<(String, TeamInsights)> {
    analysis
        .teams()
        .iter()
        .map(|team| {
            let opponent = analysis.opponent_of(&team.name);
            (team.name.clone(), generate_insights(team, opponent, detail))
        })
        .collect()
}

pub fn render_text(analysis: &MatchAnalysis, settings: &Settings) -> String {
    let mut out = String::new();

    if let Some((home, away)) = analysis.scoreline() {
        let _ = writeln!(
            out,
            "{} {} - {} {}",
            home.name, home.goals, away.goals, away.name
        );
        let _ = writeln!(out);
    }

    let insights = insights_by_team(analysis, settings.detail);
    for (team, (_, team_insights)) in analysis.teams().iter().zip(insights.iter()) {
        let _ = writeln!(out, "== {} ==", team.name);
        let _ = writeln!(out, "Goals: {}", team.goals);
        let _ = writeln!(
            out,
            "Shots (on target): {} ({})",
            team.shots, team.shots_on_target
        );
        let _ = writeln!(out, "Pass accuracy: {:.1}%", team.pass_accuracy());
        let _ = writeln!(out, "Corners: {}", team.corners);
        let _ = writeln!(
            out,
            "Halves (shots/goals): {}/{} | {}/{}",
            team.first_half.shots,
            team.first_half.goals,
            team.second_half.shots,
            team.second_half.goals
        );

        let scorers = top_players(team, PlayerStat::Goals, settings.top_players);
        if !scorers.is_empty() {
            let names: Vec<String> = scorers
                .iter()
                .map(|row| format!("{} ({})", row.player, row.value))
                .collect();
            let _ = writeln!(out, "Scorers: {}", names.join(", "));
        }

        let network = pass_network(team, settings.min_passes);
        if let Some(edge) = network.edges.first() {
            let _ = writeln!(
                out,
                "Most frequent combination: {} -> {} ({} passes)",
                edge.from, edge.to, edge.count
            );
        }

        let _ = writeln!(out);
        render_insights(&mut out, team_insights, settings.detail);
        let _ = writeln!(out);
    }

    out
}

fn render_insights(out: &mut String, insights: &TeamInsights, detail: DetailLevel) {
    if insights.is_empty() {
        let _ = writeln!(out, "No notable findings.");
        return;
    }
    if detail == DetailLevel::Minimal {
        let _ = writeln!(out, "Key findings");
        for message in insights.headline(3) {
            let _ = writeln!(out, "  • {message}");
        }
        return;
    }
    for category in InsightCategory::ALL {
        let items = insights.get(category);
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", category.title());
        for message in items {
            let _ = writeln!(out, "  • {message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_with_combinations() -> TeamStatistics {
        let mut t = TeamStatistics::new("A");
        let combos = [("Ann", "Bob", 3), ("Bob", "Ann", 2), ("Ann", "Cid", 1)];
        for (from, to, count) in combos {
            t.pass_combinations
                .entry(from.to_string())
                .or_default()
                .insert(to.to_string(), count);
        }
        t
    }

    #[test]
    fn network_drops_thin_edges() {
        let net = pass_network(&team_with_combinations(), 2);
        assert_eq!(net.edges.len(), 2);
        assert_eq!(net.edges[0].count, 3);
        let ann = net.nodes.iter().find(|n| n.player == "Ann").unwrap();
        assert_eq!(ann.involvement, 5);
        assert!(net.nodes.iter().all(|n| n.player != "Cid"));
    }

    #[test]
    fn foot_profiles_skip_small_samples() {
        let mut t = TeamStatistics::new("A");
        let usage = [("Ann", "Right", 3), ("Ann", "Left", 1), ("Bob", "Right", 2)];
        for (player, foot, n) in usage {
            t.player_foot_usage
                .entry(player.to_string())
                .or_default()
                .insert(foot.to_string(), n);
        }
        let rows = player_foot_profiles(&t, 3, 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].right_pct, 75.0);
        assert_eq!(rows[0].left_pct, 25.0);
        assert_eq!(rows[0].two_footedness, 33.3);
    }

    #[test]
    fn top_players_excludes_zero_and_parses_keys() {
        let mut t = TeamStatistics::new("A");
        t.player_entry("Ann").goals = 1;
        t.player_entry("Bob").goals = 3;
        t.player_entry("Cid");
        let rows = top_players(&t, "goals".parse().unwrap(), 5);
        let names: Vec<&str> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann"]);
        assert_eq!("pass accuracy".parse::<PlayerStat>(), Ok(PlayerStat::PassAccuracy));
        assert!("xg".parse::<PlayerStat>().is_err());
    }

    #[test]
    fn shot_shares_sum_to_hundred() {
        let mut t = TeamStatistics::new("A");
        t.shot_locations.insert("Inside Box".to_string(), 3);
        t.shot_locations.insert("Outside Box".to_string(), 1);
        let rows = shot_location_shares(&t);
        assert_eq!(rows[0].location, "Inside Box");
        assert_eq!(rows[0].percent, 75.0);
        assert_eq!(rows[1].percent, 25.0);
    }
}
