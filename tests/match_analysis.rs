use std::path::PathBuf;

use match_lens::aggregate::{analyze, analyze_path};
use match_lens::events::{IngestError, read_events_from_path, read_events_from_reader};
use match_lens::insights::{DetailLevel, InsightCategory, generate_insights};
use match_lens::report::{self, PlayerStat};
use match_lens::settings::Settings;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn fixture_counters_match_the_event_log() {
    let analysis = analyze_path(&fixture_path("match_events.csv")).expect("fixture should parse");
    assert_eq!(analysis.team_names(), vec!["Alpha", "Beta"]);

    let alpha = analysis.team("Alpha").expect("alpha present");
    assert_eq!(alpha.shots, 10);
    assert_eq!(alpha.goals, 2);
    assert_eq!(alpha.shots_on_target, 5);
    assert_eq!(alpha.shots_off_target, 3);
    assert_eq!(alpha.shots_blocked, 2);
    assert_eq!(alpha.passes, 6);
    assert_eq!(alpha.successful_passes, 5);
    assert_eq!(alpha.pass_accuracy(), 83.3);
    assert_eq!(alpha.crosses, 1);
    assert_eq!(alpha.cross_accuracy(), 100.0);
    assert_eq!(alpha.corners, 1);
    assert_eq!(alpha.fouls, 1);
    assert_eq!(alpha.first_half.shots, 3);
    assert_eq!(alpha.second_half.shots, 7);
    assert_eq!(alpha.pass_combination("Ivan", "Oleg"), 3);
    assert_eq!(alpha.pass_combination("Oleg", "Ivan"), 2);

    let beta = analysis.team("Beta").expect("beta present");
    assert_eq!(beta.shots, 3);
    assert_eq!(beta.goals, 1);
    assert_eq!(beta.tackles, 1);
    assert_eq!(beta.tackle_success(), 100.0);
    assert_eq!(beta.interceptions, 1);
    assert_eq!(beta.offsides, 1);
    assert_eq!(beta.gk_actions.get("Save"), Some(&1));
    assert_eq!(beta.gk_actions.get("Long Pass"), Some(&1));
    assert_eq!(beta.save_types.get("Diving"), Some(&1));
}

#[test]
fn rows_without_team_are_dropped() {
    let events = read_events_from_path(&fixture_path("match_events.csv")).expect("fixture");
    assert_eq!(events.len(), 28);
    assert!(events.iter().all(|ev| ev.player != "Ghost"));
}

#[test]
fn missing_required_columns_are_named() {
    let err = analyze_path(&fixture_path("missing_columns.csv")).unwrap_err();
    match err {
        IngestError::MissingColumns(cols) => {
            assert_eq!(cols, vec!["Player_Name_1", "Event_Catalog"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreadable_path_is_an_io_error() {
    let err = analyze_path(&fixture_path("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}

#[test]
fn header_only_log_has_no_teams() {
    let raw = "Team_1,Player_Name_1,Event_Catalog\n";
    let events = read_events_from_reader(raw.as_bytes()).expect("headers are valid");
    assert!(events.is_empty());
    assert!(analyze(&events).is_empty());
}

#[test]
fn goals_never_exceed_shots_on_target() {
    let analysis = analyze_path(&fixture_path("match_events.csv")).expect("fixture");
    let events = read_events_from_path(&fixture_path("match_events.csv")).expect("fixture");
    for team in analysis.teams() {
        let goal_rows = events
            .iter()
            .filter(|ev| ev.team == team.name)
            .filter(|ev| ev.category.label() == "Shot" && ev.result.as_deref() == Some("Goal"))
            .count() as u32;
        assert_eq!(team.goals, goal_rows);
        assert!(team.goals <= team.shots_on_target);
        assert!((0.0..=100.0).contains(&team.pass_accuracy()));
    }
}

#[test]
fn two_shot_example() {
    let raw = "Team_1,Player_Name_1,Event_Catalog,Results\n\
               A,P1,Shot,Goal\n\
               A,P2,Shot,On Target\n";
    let events = read_events_from_reader(raw.as_bytes()).expect("valid csv");
    let analysis = analyze(&events);
    let a = analysis.team("A").expect("team A");
    assert_eq!(a.shots, 2);
    assert_eq!(a.goals, 1);
    assert_eq!(a.shots_on_target, 2);
    assert_eq!(a.shot_accuracy(), 100.0);
    assert_eq!(a.passes, 0);
    assert_eq!(a.pass_accuracy(), 0.0);
}

#[test]
fn analysis_is_repeatable() {
    let events = read_events_from_path(&fixture_path("match_events.csv")).expect("fixture");
    assert_eq!(analyze(&events), analyze(&events));
}

#[test]
fn shot_dominance_produces_strength_and_tactic() {
    let analysis = analyze_path(&fixture_path("match_events.csv")).expect("fixture");
    let alpha = analysis.team("Alpha").expect("alpha");
    let beta = analysis.opponent_of("Alpha");
    let insights = generate_insights(alpha, beta, DetailLevel::Detailed);

    assert!(
        insights
            .strengths
            .iter()
            .any(|s| s.contains("Clear advantage in shots (10 vs 3)"))
    );
    assert!(insights.tactics.iter().any(|s| s.contains("attacking style")));
    assert!(insights.tactics.iter().any(|s| s.contains("after the break")));

    let beta_insights = generate_insights(
        analysis.team("Beta").expect("beta"),
        analysis.opponent_of("Beta"),
        DetailLevel::Detailed,
    );
    assert!(beta_insights.weaknesses.iter().any(|s| s.contains("3 vs 10")));
}

#[test]
fn minimal_detail_caps_insights() {
    let analysis = analyze_path(&fixture_path("match_events.csv")).expect("fixture");
    for team in analysis.teams() {
        let opponent = analysis.opponent_of(&team.name);
        let insights = generate_insights(team, opponent, DetailLevel::parse("Минимальная"));
        assert!(insights.total() <= 3);
        let medium = generate_insights(team, opponent, DetailLevel::Medium);
        for category in InsightCategory::ALL {
            assert!(medium.get(category).len() <= 2);
        }
    }
}

#[test]
fn text_report_leads_with_scoreline() {
    let analysis = analyze_path(&fixture_path("match_events.csv")).expect("fixture");
    let text = report::render_text(&analysis, &Settings::default());
    assert!(text.starts_with("Alpha 2 - 1 Beta"));
    assert!(text.contains("Most frequent combination: Ivan -> Oleg (3 passes)"));
    assert!(text.contains("Scorers: Ivan (2)"));

    let ranked = report::top_players(analysis.team("Alpha").expect("alpha"), PlayerStat::Shots, 5);
    assert_eq!(ranked[0].player, "Ivan");
    assert_eq!(ranked[0].value, 6.0);
}
