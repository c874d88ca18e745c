use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::stats::{Counts, TeamStatistics};

const SUCCESS_RESULTS: [&str; 3] = ["Successful", "On Target", "Goal"];
const DOMINANCE_RATIO: f64 = 1.5;
const MINIMAL_TOTAL: usize = 3;

/// How many insight strings survive per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetailLevel {
    Minimal,
    Medium,
    #[default]
    Detailed,
}

impl DetailLevel {
    /// Accepts the English names and the dashboard's Russian labels.
    /// Anything unrecognized means `Detailed`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "minimal" | "min" | "минимальная" => DetailLevel::Minimal,
            "medium" | "средняя" => DetailLevel::Medium,
            _ => DetailLevel::Detailed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailLevel::Minimal => "Minimal",
            DetailLevel::Medium => "Medium",
            DetailLevel::Detailed => "Detailed",
        }
    }

    fn per_category_limit(self) -> Option<usize> {
        match self {
            DetailLevel::Minimal => Some(1),
            DetailLevel::Medium => Some(2),
            DetailLevel::Detailed => None,
        }
    }
}

impl FromStr for DetailLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DetailLevel::parse(s))
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InsightCategory {
    Strength,
    Weakness,
    Tactic,
    KeyPlayer,
    ImprovementArea,
}

impl InsightCategory {
    pub const ALL: [InsightCategory; 5] = [
        InsightCategory::Strength,
        InsightCategory::Weakness,
        InsightCategory::Tactic,
        InsightCategory::KeyPlayer,
        InsightCategory::ImprovementArea,
    ];

    pub fn key(self) -> &'static str {
        match self {
            InsightCategory::Strength => "strengths",
            InsightCategory::Weakness => "weaknesses",
            InsightCategory::Tactic => "tactics",
            InsightCategory::KeyPlayer => "key_players",
            InsightCategory::ImprovementArea => "improvement_areas",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            InsightCategory::Strength => "Strengths",
            InsightCategory::Weakness => "Weaknesses",
            InsightCategory::Tactic => "Tactical observations",
            InsightCategory::KeyPlayer => "Key players",
            InsightCategory::ImprovementArea => "Areas to improve",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamInsights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub tactics: Vec<String>,
    pub key_players: Vec<String>,
    pub improvement_areas: Vec<String>,
}

impl TeamInsights {
    pub fn get(&self, category: InsightCategory) -> &[String] {
        match category {
            InsightCategory::Strength => &self.strengths,
            InsightCategory::Weakness => &self.weaknesses,
            InsightCategory::Tactic => &self.tactics,
            InsightCategory::KeyPlayer => &self.key_players,
            InsightCategory::ImprovementArea => &self.improvement_areas,
        }
    }

    fn get_mut(&mut self, category: InsightCategory) -> &mut Vec<String> {
        match category {
            InsightCategory::Strength => &mut self.strengths,
            InsightCategory::Weakness => &mut self.weaknesses,
            InsightCategory::Tactic => &mut self.tactics,
            InsightCategory::KeyPlayer => &mut self.key_players,
            InsightCategory::ImprovementArea => &mut self.improvement_areas,
        }
    }

    pub fn push(&mut self, category: InsightCategory, message: impl Into<String>) {
        self.get_mut(category).push(message.into());
    }

    pub fn total(&self) -> usize {
        InsightCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Every message in category order.
    pub fn iter(&self) -> impl Iterator<Item = (InsightCategory, &str)> + '_ {
        InsightCategory::ALL
            .into_iter()
            .flat_map(move |c| self.get(c).iter().map(move |m| (c, m.as_str())))
    }

    /// The first `limit` messages across categories, in category order.
    pub fn headline(&self, limit: usize) -> Vec<&str> {
        self.iter().map(|(_, m)| m).take(limit).collect()
    }

    fn apply_detail(&mut self, detail: DetailLevel) {
        if let Some(limit) = detail.per_category_limit() {
            for category in InsightCategory::ALL {
                self.get_mut(category).truncate(limit);
            }
        }
        if detail == DetailLevel::Minimal {
            let mut budget = MINIMAL_TOTAL;
            for category in InsightCategory::ALL {
                let list = self.get_mut(category);
                list.truncate(budget);
                budget -= list.len();
            }
        }
    }
}

type Rule = fn(&TeamStatistics, Option<&TeamStatistics>, &mut TeamInsights);

const RULES: &[Rule] = &[
    shooting,
    passing,
    foot_balance,
    opponent_comparison,
    key_players,
    pressure_results,
    goalkeeper_style,
];

/// Derive categorized observations for `team`. Never fails; absent data
/// simply produces no messages.
pub fn generate_insights(
    team: &TeamStatistics,
    opponent: Option<&TeamStatistics>,
    detail: DetailLevel,
) -> TeamInsights {
    let mut out = TeamInsights::default();
    for rule in RULES {
        rule(team, opponent, &mut out);
    }
    out.apply_detail(detail);
    out
}

fn shooting(team: &TeamStatistics, _: Option<&TeamStatistics>, out: &mut TeamInsights) {
    if team.shots == 0 {
        return;
    }
    let accuracy = team.shot_accuracy();
    if accuracy > 60.0 {
        out.push(
            InsightCategory::Strength,
            format!("High shot accuracy ({accuracy:.1}%). The team creates quality chances."),
        );
    } else if accuracy < 30.0 {
        out.push(
            InsightCategory::Weakness,
            format!("Low shot accuracy ({accuracy:.1}%). Finishing quality needs work."),
        );
        out.push(
            InsightCategory::ImprovementArea,
            "Shot accuracy and shot selection in the final third",
        );
    }

    if team.shots_on_target == 0 {
        return;
    }
    let conversion = team.goals as f64 / team.shots_on_target as f64 * 100.0;
    if conversion > 30.0 {
        out.push(
            InsightCategory::Strength,
            format!(
                "Clinical finishing ({conversion:.1}% of shots on target became goals). \
                 The team converts its chances."
            ),
        );
    } else if conversion < 10.0 {
        out.push(
            InsightCategory::Weakness,
            format!(
                "Poor chance conversion ({conversion:.1}% of shots on target became goals). \
                 Finishing needs to improve."
            ),
        );
        out.push(InsightCategory::ImprovementArea, "Converting goal-scoring chances");
    }
}

fn passing(team: &TeamStatistics, _: Option<&TeamStatistics>, out: &mut TeamInsights) {
    if team.passes == 0 {
        return;
    }
    let accuracy = team.pass_accuracy();
    if accuracy > 80.0 {
        out.push(
            InsightCategory::Strength,
            format!("High pass accuracy ({accuracy:.1}%). The team keeps the ball well."),
        );
    } else if accuracy < 60.0 {
        out.push(
            InsightCategory::Weakness,
            format!("Low pass accuracy ({accuracy:.1}%). Ball retention needs work."),
        );
        out.push(InsightCategory::ImprovementArea, "Pass accuracy and ball control");
    }

    let pressed = team.pressure_percentage();
    if pressed > 50.0 && accuracy > 70.0 {
        out.push(
            InsightCategory::Strength,
            format!(
                "The team handles the opponent's press well \
                 ({pressed:.1}% of passes under pressure, accuracy {accuracy:.1}%)."
            ),
        );
    } else if pressed > 50.0 && accuracy < 60.0 {
        out.push(
            InsightCategory::Weakness,
            format!(
                "The team struggles against the opponent's press \
                 ({pressed:.1}% of passes under pressure, accuracy {accuracy:.1}%)."
            ),
        );
        out.push(InsightCategory::ImprovementArea, "Playing under pressure");
    }
}

fn foot_balance(team: &TeamStatistics, _: Option<&TeamStatistics>, out: &mut TeamInsights) {
    if team.passes == 0 {
        return;
    }
    let total: u32 = team.foot_used.values().sum();
    if total == 0 {
        return;
    }
    let share = |foot: &str| {
        team.foot_used.get(foot).copied().unwrap_or(0) as f64 / total as f64 * 100.0
    };
    let right = share("Right");
    let left = share("Left");

    if right > 80.0 {
        out.push(
            InsightCategory::Tactic,
            format!(
                "The team relies heavily on the right foot ({right:.1}%). \
                 More left-footed play would make it less predictable."
            ),
        );
        out.push(InsightCategory::ImprovementArea, "Developing left-footed play");
    } else if left > 80.0 {
        out.push(
            InsightCategory::Tactic,
            format!(
                "The team relies heavily on the left foot ({left:.1}%). \
                 More right-footed play would make it less predictable."
            ),
        );
        out.push(InsightCategory::ImprovementArea, "Developing right-footed play");
    } else if right.min(left) > 30.0 {
        out.push(
            InsightCategory::Strength,
            format!(
                "The team uses both feet well (right: {right:.1}%, left: {left:.1}%), \
                 which makes its attacks more varied."
            ),
        );
    }
}

fn opponent_comparison(
    team: &TeamStatistics,
    opponent: Option<&TeamStatistics>,
    out: &mut TeamInsights,
) {
    let Some(opponent) = opponent else {
        return;
    };
    let ours = team.shots as f64;
    let theirs = opponent.shots as f64;
    if ours > theirs * DOMINANCE_RATIO {
        out.push(
            InsightCategory::Strength,
            format!(
                "Clear advantage in shots ({} vs {}). The team dominated in attack.",
                team.shots, opponent.shots
            ),
        );
        out.push(
            InsightCategory::Tactic,
            "Keep the attacking style that keeps creating chances.",
        );
    } else if ours * DOMINANCE_RATIO < theirs {
        out.push(
            InsightCategory::Weakness,
            format!(
                "Clearly out-shot ({} vs {}). The team was second best in attack.",
                team.shots, opponent.shots
            ),
        );
        out.push(
            InsightCategory::Tactic,
            "Chance creation needs to improve.",
        );
    }

    let first = team.first_half.shots;
    let second = team.second_half.shots;
    if first as f64 * DOMINANCE_RATIO < second as f64 {
        out.push(
            InsightCategory::Tactic,
            format!(
                "The team stepped up its attack after the break \
                 ({first} shots in the first half, {second} in the second)."
            ),
        );
    } else if first as f64 > second as f64 * DOMINANCE_RATIO {
        out.push(
            InsightCategory::Tactic,
            format!(
                "The team's attack faded in the second half \
                 ({first} shots in the first half, {second} in the second)."
            ),
        );
        out.push(
            InsightCategory::ImprovementArea,
            "Sustaining attacking intensity for the whole match",
        );
    }
}

// Highest key, earliest item on ties.
fn first_max_by_key<T, K: PartialOrd + Copy>(
    items: impl Iterator<Item = T>,
    key: impl Fn(&T) -> K,
) -> Option<(T, K)> {
    let mut best: Option<(T, K)> = None;
    for item in items {
        let k = key(&item);
        let better = match &best {
            Some((_, best_k)) => k > *best_k,
            None => true,
        };
        if better {
            best = Some((item, k));
        }
    }
    best
}

fn key_players(team: &TeamStatistics, _: Option<&TeamStatistics>, out: &mut TeamInsights) {
    if let Some((scorer, goals)) =
        first_max_by_key(team.players.iter().filter(|p| p.goals > 0), |p| p.goals)
    {
        out.push(
            InsightCategory::KeyPlayer,
            format!("{} - the team's top scorer with {goals} goals.", scorer.name),
        );
    }

    if let Some((passer, passes)) =
        first_max_by_key(team.players.iter().filter(|p| p.passes > 10), |p| p.passes)
    {
        out.push(
            InsightCategory::KeyPlayer,
            format!(
                "{} - key passer with {passes} passes (accuracy {:.1}%).",
                passer.name,
                passer.pass_accuracy()
            ),
        );
    }

    if let Some((defender, actions)) = first_max_by_key(
        team.players.iter().filter(|p| p.defensive_actions() > 0),
        |p| p.defensive_actions(),
    ) {
        out.push(
            InsightCategory::KeyPlayer,
            format!(
                "{} - best at winning the ball back with {actions} tackles and interceptions.",
                defender.name
            ),
        );
    }
}

fn success_rate(results: Option<&Counts>) -> Option<f64> {
    let results = results?;
    let total: u32 = results.values().sum();
    if total == 0 {
        return None;
    }
    let successful: u32 = results
        .iter()
        .filter(|(result, _)| SUCCESS_RESULTS.contains(&result.as_str()))
        .map(|(_, count)| *count)
        .sum();
    Some(successful as f64 / total as f64 * 100.0)
}

fn pressure_results(team: &TeamStatistics, _: Option<&TeamStatistics>, out: &mut TeamInsights) {
    let (Some(pressed), Some(calm)) = (
        success_rate(team.pressure_results.get("Yes")),
        success_rate(team.pressure_results.get("No")),
    ) else {
        return;
    };
    let drop = calm - pressed;
    if drop > 30.0 {
        out.push(
            InsightCategory::Weakness,
            format!(
                "Success rate drops sharply under pressure \
                 ({pressed:.1}% vs {calm:.1}% without pressure)."
            ),
        );
        out.push(InsightCategory::ImprovementArea, "Playing under pressure");
    } else if drop < 10.0 {
        out.push(
            InsightCategory::Strength,
            format!(
                "The team performs well under pressure \
                 ({pressed:.1}% vs {calm:.1}% without pressure)."
            ),
        );
    }
}

fn goalkeeper_style(team: &TeamStatistics, _: Option<&TeamStatistics>, out: &mut TeamInsights) {
    let total: u32 = team.gk_actions.values().sum();
    if total == 0 {
        return;
    }
    let count = |action: &str| team.gk_actions.get(action).copied().unwrap_or(0);
    let long = count("Long Pass");
    let short = count("Short Pass");

    if long > short * 2 {
        out.push(
            InsightCategory::Tactic,
            format!(
                "The goalkeeper prefers long distribution ({long} long vs {short} short). \
                 The team looks to go forward quickly, bypassing midfield."
            ),
        );
    } else if short > long * 2 {
        out.push(
            InsightCategory::Tactic,
            format!(
                "The goalkeeper prefers short distribution ({short} short vs {long} long). \
                 The team builds attacks from the back."
            ),
        );
    }

    let saves = count("Save");
    if saves > 5 {
        out.push(
            InsightCategory::KeyPlayer,
            format!("The goalkeeper made {saves} saves, a key part of the defence."),
        );
    }
}
