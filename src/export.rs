use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::aggregate::MatchAnalysis;
use crate::insights::{DetailLevel, TeamInsights, generate_insights};
use crate::report::{self, FootProfile, HalfRow, PassNetwork, ShotLocationShare};
use crate::settings::Settings;
use crate::stats::{PlayerMetrics, TeamMetrics, TeamStatistics};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub source: Option<String>,
    pub detail: DetailLevel,
    pub teams: Vec<TeamReport>,
    pub halves: Vec<HalfRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub opponent: Option<String>,
    pub statistics: TeamStatistics,
    pub metrics: TeamMetrics,
    pub players: Vec<PlayerReport>,
    pub pass_network: PassNetwork,
    pub foot_profiles: Vec<FootProfile>,
    pub shot_locations: Vec<ShotLocationShare>,
    pub insights: TeamInsights,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub name: String,
    #[serde(flatten)]
    pub metrics: PlayerMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Xlsx,
}

impl ExportFormat {
    /// Chosen from the output extension; anything but `.json` / `.xlsx` is rejected.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(ExportFormat::Json),
            Some("xlsx") => Ok(ExportFormat::Xlsx),
            _ => bail!(
                "unsupported export target {} (expected .json or .xlsx)",
                path.display()
            ),
        }
    }
}

pub struct ExportSummary {
    pub teams: usize,
    pub players: usize,
    pub edges: usize,
    pub insights: usize,
}

pub fn build_report(
    analysis: &MatchAnalysis,
    settings: &Settings,
    source: Option<&Path>,
) -> AnalysisReport {
    let teams = analysis
        .teams()
        .iter()
        .map(|team| {
            let opponent = analysis.opponent_of(&team.name);
            TeamReport {
                opponent: opponent.map(|o| o.name.clone()),
                statistics: team.clone(),
                metrics: team.metrics(),
                players: team
                    .players
                    .iter()
                    .map(|p| PlayerReport {
                        name: p.name.clone(),
                        metrics: p.metrics(),
                    })
                    .collect(),
                pass_network: report::pass_network(team, settings.min_passes),
                foot_profiles: report::player_foot_profiles(
                    team,
                    settings.foot_min_actions,
                    settings.foot_top_n,
                ),
                shot_locations: report::shot_location_shares(team),
                insights: generate_insights(team, opponent, settings.detail),
            }
        })
        .collect();

    AnalysisReport {
        generated_at: Utc::now().to_rfc3339(),
        source: source.map(|p| p.display().to_string()),
        detail: settings.detail,
        teams,
        halves: report::half_comparison(analysis),
    }
}

pub fn write_json(report: &AnalysisReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize analysis report")?;
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

pub fn write_xlsx(report: &AnalysisReport, path: &Path) -> Result<ExportSummary> {
    let mut teams_rows = vec![vec![
        "Team".to_string(),
        "Opponent".to_string(),
        "Goals".to_string(),
        "Shots".to_string(),
        "Shots On Target".to_string(),
        "Shot Accuracy (%)".to_string(),
        "Passes".to_string(),
        "Successful Passes".to_string(),
        "Pass Accuracy (%)".to_string(),
        "Crosses".to_string(),
        "Cross Accuracy (%)".to_string(),
        "Tackles".to_string(),
        "Tackle Success (%)".to_string(),
        "Interceptions".to_string(),
        "Fouls".to_string(),
        "Corners".to_string(),
        "Offsides".to_string(),
        "Passes Under Pressure (%)".to_string(),
    ]];

    let mut players_rows = vec![vec![
        "Team".to_string(),
        "Player".to_string(),
        "Goals".to_string(),
        "Shots".to_string(),
        "Passes".to_string(),
        "Successful Passes".to_string(),
        "Pass Accuracy (%)".to_string(),
        "Tackles".to_string(),
        "Interceptions".to_string(),
        "Goal Conversion (%)".to_string(),
    ]];

    let mut network_rows = vec![vec![
        "Team".to_string(),
        "From".to_string(),
        "To".to_string(),
        "Passes".to_string(),
    ]];

    let mut insight_rows = vec![vec![
        "Team".to_string(),
        "Category".to_string(),
        "Insight".to_string(),
    ]];

    for team in &report.teams {
        teams_rows.push(team_row(team));
        let stats = &team.statistics;
        players_rows.extend(stats.players.iter().map(|p| {
            vec![
                stats.name.clone(),
                p.name.clone(),
                p.goals.to_string(),
                p.shots.to_string(),
                p.passes.to_string(),
                p.successful_passes.to_string(),
                format!("{:.1}", p.pass_accuracy()),
                p.tackles.to_string(),
                p.interceptions.to_string(),
                format!("{:.1}", p.goal_conversion()),
            ]
        }));
        network_rows.extend(team.pass_network.edges.iter().map(|edge| {
            vec![
                stats.name.clone(),
                edge.from.clone(),
                edge.to.clone(),
                edge.count.to_string(),
            ]
        }));
        insight_rows.extend(team.insights.iter().map(|(category, message)| {
            vec![
                stats.name.clone(),
                category.title().to_string(),
                message.to_string(),
            ]
        }));
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &teams_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &players_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Pass Network")?;
        write_rows(sheet, &network_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Insights")?;
        write_rows(sheet, &insight_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportSummary {
        teams: report.teams.len(),
        players: players_rows.len().saturating_sub(1),
        edges: network_rows.len().saturating_sub(1),
        insights: insight_rows.len().saturating_sub(1),
    })
}

fn team_row(team: &TeamReport) -> Vec<String> {
    let s = &team.statistics;
    let m = &team.metrics;
    vec![
        s.name.clone(),
        team.opponent.clone().unwrap_or_default(),
        s.goals.to_string(),
        s.shots.to_string(),
        s.shots_on_target.to_string(),
        format!("{:.1}", m.shot_accuracy),
        s.passes.to_string(),
        s.successful_passes.to_string(),
        format!("{:.1}", m.pass_accuracy),
        s.crosses.to_string(),
        format!("{:.1}", m.cross_accuracy),
        s.tackles.to_string(),
        format!("{:.1}", m.tackle_success),
        s.interceptions.to_string(),
        s.fouls.to_string(),
        s.corners.to_string(),
        s.offsides.to_string(),
        format!("{:.1}", m.pressure_percentage),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
