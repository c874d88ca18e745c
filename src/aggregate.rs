use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::events::{self, EventCategory, IngestError, MatchEvent, UNKNOWN};
use crate::stats::{TeamStatistics, tally, tally_nested};
use crate::zones;

const GOAL: &str = "Goal";
const ON_TARGET: &str = "On Target";
const OFF_TARGET: &str = "Off Target";
const BLOCKED: &str = "Blocked";
const SUCCESSFUL: &str = "Successful";
const CROSS: &str = "Cross";

/// Per-team statistics for one event log, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchAnalysis {
    teams: Vec<TeamStatistics>,
}

impl MatchAnalysis {
    pub fn teams(&self) -> &[TeamStatistics] {
        &self.teams
    }

    pub fn team(&self, name: &str) -> Option<&TeamStatistics> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn team_names(&self) -> Vec<&str> {
        self.teams.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// The other side of the match. Only the first two teams are paired; a log
    /// with one team (or a third team) has no opponent.
    pub fn opponent_of(&self, name: &str) -> Option<&TeamStatistics> {
        let idx = self.teams.iter().position(|t| t.name == name)?;
        match idx {
            0 => self.teams.get(1),
            1 => self.teams.first(),
            _ => None,
        }
    }

    /// Goals for the first two teams, when there are two.
    pub fn scoreline(&self) -> Option<(&TeamStatistics, &TeamStatistics)> {
        match self.teams.as_slice() {
            [home, away, ..] => Some((home, away)),
            _ => None,
        }
    }
}

/// Fold an ordered event stream into per-team statistics.
pub fn analyze(events: &[MatchEvent]) -> MatchAnalysis {
    let mut teams: Vec<TeamStatistics> = Vec::new();
    for event in events {
        let idx = match teams.iter().position(|t| t.name == event.team) {
            Some(idx) => idx,
            None => {
                teams.push(TeamStatistics::new(event.team.as_str()));
                teams.len() - 1
            }
        };
        record_event(&mut teams[idx], event);
    }
    debug!("aggregated {} events into {} teams", events.len(), teams.len());
    MatchAnalysis { teams }
}

/// Read, validate and aggregate a CSV event log.
pub fn analyze_path(path: &Path) -> Result<MatchAnalysis, IngestError> {
    let events = events::read_events_from_path(path)?;
    let analysis = analyze(&events);
    if analysis.is_empty() {
        return Err(IngestError::NoTeams);
    }
    Ok(analysis)
}

fn record_event(team: &mut TeamStatistics, event: &MatchEvent) {
    team.player_entry(&event.player);

    let category = event.category.label();
    tally(&mut team.event_categories, category);
    tally_nested(
        &mut team.event_types,
        category,
        event.subtype.as_deref().unwrap_or(UNKNOWN),
    );

    match &event.category {
        EventCategory::Shot => record_shot(team, event),
        EventCategory::Pass => record_pass(team, event),
        EventCategory::Tackle => {
            team.tackles += 1;
            team.player_entry(&event.player).tackles += 1;
            if event.result.as_deref() == Some(SUCCESSFUL) {
                team.successful_tackles += 1;
            }
        }
        EventCategory::Interception => {
            team.interceptions += 1;
            team.player_entry(&event.player).interceptions += 1;
        }
        EventCategory::Foul => team.fouls += 1,
        EventCategory::Corner => team.corners += 1,
        EventCategory::Offside => team.offsides += 1,
        EventCategory::GoalkeeperAction => {
            let action = event
                .gk_action
                .as_deref()
                .or(event.subtype.as_deref())
                .unwrap_or(UNKNOWN);
            tally(&mut team.gk_actions, action);
            if let Some(save) = event.save_type.as_deref() {
                tally(&mut team.save_types, save);
            }
        }
        EventCategory::Other(raw) => {
            debug!("unrecognized event category {raw:?} for {}", team.name);
            return;
        }
    }

    if let Some(foot) = event.foot_used.as_deref() {
        tally(&mut team.foot_used, foot);
        tally_nested(&mut team.foot_by_event, category, foot);
        tally_nested(&mut team.player_foot_usage, &event.player, foot);
    }
}

fn record_shot(team: &mut TeamStatistics, event: &MatchEvent) {
    team.shots += 1;
    team.player_entry(&event.player).shots += 1;
    if let Some(half) = event.half {
        team.half_mut(half).shots += 1;
    }

    tally(
        &mut team.shot_types,
        event.shot_type.as_deref().unwrap_or(UNKNOWN),
    );
    tally(
        &mut team.shot_locations,
        event.shot_location.as_deref().unwrap_or(UNKNOWN),
    );

    match event.result.as_deref() {
        Some(GOAL) => {
            team.goals += 1;
            team.shots_on_target += 1;
            team.player_entry(&event.player).goals += 1;
            if let Some(half) = event.half {
                team.half_mut(half).goals += 1;
            }
        }
        Some(ON_TARGET) => team.shots_on_target += 1,
        Some(OFF_TARGET) => team.shots_off_target += 1,
        Some(BLOCKED) => team.shots_blocked += 1,
        _ => {}
    }

    if let Some(pressure) = event.pressure.as_deref() {
        tally_nested(
            &mut team.pressure_results,
            pressure,
            event.result.as_deref().unwrap_or(UNKNOWN),
        );
    }
}

fn record_pass(team: &mut TeamStatistics, event: &MatchEvent) {
    team.passes += 1;
    team.player_entry(&event.player).passes += 1;
    if let Some(half) = event.half {
        team.half_mut(half).passes += 1;
    }

    if let Some((x, y)) = event.destination {
        *team.pass_zones.entry(zones::classify(x, y)).or_insert(0) += 1;
    }

    let successful = event.pass_outcome.as_deref() == Some(SUCCESSFUL);
    if successful {
        team.successful_passes += 1;
        team.player_entry(&event.player).successful_passes += 1;
        if let Some(half) = event.half {
            team.half_mut(half).successful_passes += 1;
        }
        if let Some(receiver) = event.receiver.as_deref() {
            tally_nested(&mut team.pass_combinations, &event.player, receiver);
        }
    }

    if event.subtype.as_deref() == Some(CROSS) {
        team.crosses += 1;
        if successful {
            team.successful_crosses += 1;
        }
    }

    if event.is_under_pressure() {
        team.pressure.under_pressure += 1;
    } else {
        team.pressure.no_pressure += 1;
    }

    if let Some(pressure) = event.pressure.as_deref() {
        tally_nested(
            &mut team.pressure_results,
            pressure,
            event.pass_outcome.as_deref().unwrap_or(UNKNOWN),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Half;

    fn shot(team: &str, player: &str, result: &str) -> MatchEvent {
        let mut ev = MatchEvent::new(team, player, EventCategory::Shot);
        ev.result = Some(result.to_string());
        ev
    }

    fn pass(team: &str, from: &str, to: Option<&str>, outcome: &str) -> MatchEvent {
        let mut ev = MatchEvent::new(team, from, EventCategory::Pass);
        ev.pass_outcome = Some(outcome.to_string());
        ev.receiver = to.map(str::to_string);
        ev
    }

    #[test]
    fn shot_results_feed_the_right_counters() {
        let events = vec![
            shot("A", "Ann", "Goal"),
            shot("A", "Ann", "On Target"),
            shot("A", "Bob", "Off Target"),
            shot("A", "Bob", "Blocked"),
            shot("A", "Bob", "Post"),
        ];
        let analysis = analyze(&events);
        let a = analysis.team("A").unwrap();
        assert_eq!(a.shots, 5);
        assert_eq!(a.goals, 1);
        assert_eq!(a.shots_on_target, 2);
        assert_eq!(a.shots_off_target, 1);
        assert_eq!(a.shots_blocked, 1);
        assert_eq!(a.first_half.goals, 1);
        assert_eq!(a.shot_locations.get(UNKNOWN), Some(&5));
        assert_eq!(a.player("Ann").map(|p| p.goals), Some(1));
    }

    #[test]
    fn invalid_half_skips_half_buckets_only() {
        let mut ev = shot("A", "Ann", "Goal");
        ev.half = None;
        let mut second = shot("A", "Ann", "Goal");
        second.half = Some(Half::Second);
        let analysis = analyze(&[ev, second]);
        let a = analysis.team("A").unwrap();
        assert_eq!(a.goals, 2);
        assert_eq!(a.first_half.goals, 0);
        assert_eq!(a.second_half.goals, 1);
        assert_eq!(a.second_half.shots, 1);
    }

    #[test]
    fn only_successful_passes_build_combinations() {
        let events = vec![
            pass("A", "Ann", Some("Bob"), "Successful"),
            pass("A", "Ann", Some("Bob"), "Successful"),
            pass("A", "Ann", Some("Bob"), "Unsuccessful"),
            pass("A", "Bob", None, "Successful"),
        ];
        let analysis = analyze(&events);
        let a = analysis.team("A").unwrap();
        assert_eq!(a.pass_combination("Ann", "Bob"), 2);
        assert_eq!(a.pass_combination("Bob", "Ann"), 0);
        assert_eq!(a.successful_passes, 3);
        assert_eq!(a.pass_accuracy(), 75.0);
        assert_eq!(a.pressure.no_pressure, 4);
        assert!(a.pressure_results.is_empty());
    }

    #[test]
    fn crosses_and_pressure_are_tallied() {
        let mut cross = pass("A", "Ann", Some("Bob"), "Successful");
        cross.subtype = Some("Cross".to_string());
        cross.pressure = Some("Yes".to_string());
        cross.destination = Some((80.0, 50.0));
        let mut calm = pass("A", "Ann", None, "Unsuccessful");
        calm.pressure = Some("No".to_string());

        let analysis = analyze(&[cross, calm]);
        let a = analysis.team("A").unwrap();
        assert_eq!(a.crosses, 1);
        assert_eq!(a.successful_crosses, 1);
        assert_eq!(a.pressure.under_pressure, 1);
        assert_eq!(a.pressure.no_pressure, 1);
        assert_eq!(a.pressure_results["Yes"]["Successful"], 1);
        assert_eq!(a.pressure_results["No"]["Unsuccessful"], 1);
        assert_eq!(a.pass_zones.len(), 1);
        assert_eq!(a.pass_zones.keys().next().map(|z| z.label()), Some("Attacking Center"));
    }

    #[test]
    fn unknown_categories_are_only_counted() {
        let mut ev = MatchEvent::new("A", "Ann", EventCategory::parse("Throw-in"));
        ev.foot_used = Some("Right".to_string());
        let analysis = analyze(&[ev]);
        let a = analysis.team("A").unwrap();
        assert_eq!(a.event_categories.get("Throw-in"), Some(&1));
        assert!(a.foot_used.is_empty());
        assert_eq!(a.players.len(), 1);
    }

    #[test]
    fn goalkeeper_and_set_pieces() {
        let mut save = MatchEvent::new("A", "Keeper", EventCategory::GoalkeeperAction);
        save.gk_action = Some("Save".to_string());
        save.save_type = Some("Diving".to_string());
        save.foot_used = Some("Right".to_string());
        let mut tackle = MatchEvent::new("A", "Dan", EventCategory::Tackle);
        tackle.result = Some("Successful".to_string());
        let events = vec![
            save,
            tackle,
            MatchEvent::new("A", "Dan", EventCategory::Interception),
            MatchEvent::new("A", "Dan", EventCategory::Foul),
            MatchEvent::new("A", "Eve", EventCategory::Corner),
            MatchEvent::new("A", "Eve", EventCategory::Offside),
        ];
        let analysis = analyze(&events);
        let a = analysis.team("A").unwrap();
        assert_eq!(a.gk_actions.get("Save"), Some(&1));
        assert_eq!(a.save_types.get("Diving"), Some(&1));
        assert_eq!(a.foot_by_event["Goalkeeper Action"]["Right"], 1);
        assert_eq!(a.player_foot_usage["Keeper"]["Right"], 1);
        assert_eq!((a.tackles, a.successful_tackles, a.interceptions), (1, 1, 1));
        assert_eq!((a.fouls, a.corners, a.offsides), (1, 1, 1));
        assert_eq!(a.player("Dan").map(|p| p.defensive_actions()), Some(2));
    }

    #[test]
    fn opponents_pair_the_first_two_teams() {
        let events = vec![
            shot("A", "Ann", "Goal"),
            shot("B", "Bea", "Goal"),
            shot("C", "Cid", "Goal"),
        ];
        let analysis = analyze(&events);
        assert_eq!(analysis.team_names(), vec!["A", "B", "C"]);
        assert_eq!(analysis.opponent_of("A").map(|t| t.name.as_str()), Some("B"));
        assert_eq!(analysis.opponent_of("B").map(|t| t.name.as_str()), Some("A"));
        assert!(analysis.opponent_of("C").is_none());
    }
}
