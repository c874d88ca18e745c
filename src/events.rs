use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const REQUIRED_COLUMNS: [&str; 3] = ["Team_1", "Player_Name_1", "Event_Catalog"];

/// Bucket used when a categorical value is missing.
pub const UNKNOWN: &str = "Unknown";

// Cell values pandas-style exports use for "no value".
const MISSING_MARKERS: [&str; 6] = ["nan", "na", "n/a", "null", "none", "<na>"];

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("event log is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no team information found in the event log")]
    NoTeams,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventCategory {
    Shot,
    Pass,
    Tackle,
    Interception,
    Foul,
    Corner,
    Offside,
    GoalkeeperAction,
    Other(String),
}

impl EventCategory {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Shot" => Self::Shot,
            "Pass" => Self::Pass,
            "Tackle" => Self::Tackle,
            "Interception" => Self::Interception,
            "Foul" => Self::Foul,
            "Corner" => Self::Corner,
            "Offside" => Self::Offside,
            "Goalkeeper Action" => Self::GoalkeeperAction,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Shot => "Shot",
            Self::Pass => "Pass",
            Self::Tackle => "Tackle",
            Self::Interception => "Interception",
            Self::Foul => "Foul",
            Self::Corner => "Corner",
            Self::Offside => "Offside",
            Self::GoalkeeperAction => "Goalkeeper Action",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Half {
    First,
    Second,
}

impl Half {
    pub fn number(self) -> u8 {
        match self {
            Half::First => 1,
            Half::Second => 2,
        }
    }
}

/// Parse a `Half` cell. A missing cell means the first half; any value other
/// than 1 or 2 yields `None` and the event is left out of half buckets.
pub fn parse_half(raw: Option<&str>) -> Option<Half> {
    let Some(raw) = raw else {
        return Some(Half::First);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v == 1.0 => Some(Half::First),
        Ok(v) if v == 2.0 => Some(Half::Second),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchEvent {
    pub time: Option<String>,
    pub match_time: Option<String>,
    pub half: Option<Half>,
    pub team: String,
    pub player: String,
    pub category: EventCategory,
    pub subtype: Option<String>,
    pub origin: Option<(f64, f64)>,
    pub destination: Option<(f64, f64)>,
    pub shot_type: Option<String>,
    pub shot_location: Option<String>,
    pub result: Option<String>,
    pub pass_outcome: Option<String>,
    pub pressure: Option<String>,
    pub foot_used: Option<String>,
    pub receiver: Option<String>,
    pub gk_action: Option<String>,
    pub save_type: Option<String>,
}

impl MatchEvent {
    /// Minimal event with every optional attribute unset.
    pub fn new(team: impl Into<String>, player: impl Into<String>, category: EventCategory) -> Self {
        Self {
            time: None,
            match_time: None,
            half: Some(Half::First),
            team: team.into(),
            player: player.into(),
            category,
            subtype: None,
            origin: None,
            destination: None,
            shot_type: None,
            shot_location: None,
            result: None,
            pass_outcome: None,
            pressure: None,
            foot_used: None,
            receiver: None,
            gk_action: None,
            save_type: None,
        }
    }

    pub fn is_under_pressure(&self) -> bool {
        self.pressure.as_deref() == Some("Yes")
    }
}

/// One CSV row in the input column layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRow {
    #[serde(rename = "Time", default)]
    pub time: Option<String>,
    #[serde(rename = "Match_Time", alias = "Match Time", default)]
    pub match_time: Option<String>,
    #[serde(rename = "Half", default)]
    pub half: Option<String>,
    #[serde(rename = "Team_1", default)]
    pub team: Option<String>,
    #[serde(rename = "Player_Name_1", default)]
    pub player: Option<String>,
    #[serde(rename = "X1", default)]
    pub x1: Option<String>,
    #[serde(rename = "Y1", default)]
    pub y1: Option<String>,
    #[serde(rename = "X2", default)]
    pub x2: Option<String>,
    #[serde(rename = "Y2", default)]
    pub y2: Option<String>,
    #[serde(rename = "Event_Catalog", default)]
    pub category: Option<String>,
    #[serde(rename = "Type", default)]
    pub subtype: Option<String>,
    #[serde(rename = "Type_Shots", default)]
    pub shot_type: Option<String>,
    #[serde(rename = "Shot_Location", default)]
    pub shot_location: Option<String>,
    #[serde(rename = "Results", default)]
    pub result: Option<String>,
    #[serde(rename = "Pass_Outcome", default)]
    pub pass_outcome: Option<String>,
    #[serde(rename = "Pressure", default)]
    pub pressure: Option<String>,
    #[serde(rename = "Foot_Used", default)]
    pub foot_used: Option<String>,
    #[serde(rename = "Player_Name_2", default)]
    pub receiver: Option<String>,
    #[serde(rename = "GK_Action", default)]
    pub gk_action: Option<String>,
    #[serde(rename = "Save_Type", default)]
    pub save_type: Option<String>,
}

impl EventRow {
    /// Convert to a typed event. Rows without a team are rejected.
    pub fn into_event(self) -> Option<MatchEvent> {
        let team = clean(self.team)?;
        let player = clean(self.player).unwrap_or_else(|| UNKNOWN.to_string());
        let category = clean(self.category)
            .map(|raw| EventCategory::parse(&raw))
            .unwrap_or_else(|| EventCategory::Other(UNKNOWN.to_string()));
        Some(MatchEvent {
            time: clean(self.time),
            match_time: clean(self.match_time),
            half: parse_half(clean(self.half).as_deref()),
            team,
            player,
            category,
            subtype: clean(self.subtype),
            origin: parse_point(self.x1, self.y1),
            destination: parse_point(self.x2, self.y2),
            shot_type: clean(self.shot_type),
            shot_location: clean(self.shot_location),
            result: clean(self.result),
            pass_outcome: clean(self.pass_outcome),
            pressure: clean(self.pressure),
            foot_used: clean(self.foot_used),
            receiver: clean(self.receiver),
            gk_action: clean(self.gk_action),
            save_type: clean(self.save_type),
        })
    }

    pub fn from_event(event: &MatchEvent) -> Self {
        Self {
            time: event.time.clone(),
            match_time: event.match_time.clone(),
            half: event.half.map(|h| h.number().to_string()),
            team: Some(event.team.clone()),
            player: Some(event.player.clone()),
            x1: event.origin.map(|(x, _)| format_coord(x)),
            y1: event.origin.map(|(_, y)| format_coord(y)),
            x2: event.destination.map(|(x, _)| format_coord(x)),
            y2: event.destination.map(|(_, y)| format_coord(y)),
            category: Some(event.category.label().to_string()),
            subtype: event.subtype.clone(),
            shot_type: event.shot_type.clone(),
            shot_location: event.shot_location.clone(),
            result: event.result.clone(),
            pass_outcome: event.pass_outcome.clone(),
            pressure: event.pressure.clone(),
            foot_used: event.foot_used.clone(),
            receiver: event.receiver.clone(),
            gk_action: event.gk_action.clone(),
            save_type: event.save_type.clone(),
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if MISSING_MARKERS.contains(&lower.as_str()) {
        return None;
    }
    if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_point(x: Option<String>, y: Option<String>) -> Option<(f64, f64)> {
    let x = clean(x)?.parse::<f64>().ok()?;
    let y = clean(y)?.parse::<f64>().ok()?;
    Some((x, y))
}

fn format_coord(v: f64) -> String {
    format!("{v:.1}")
}

/// Required columns absent from a header row, in declaration order.
pub fn missing_required_columns(headers: &csv::StringRecord) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h.trim() == **col))
        .map(|col| col.to_string())
        .collect()
}

pub fn read_events_from_path(path: &Path) -> Result<Vec<MatchEvent>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_events_from_reader(file)
}

pub fn read_events_from_reader<R: Read>(rdr: R) -> Result<Vec<MatchEvent>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(rdr);

    let missing = missing_required_columns(reader.headers()?);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let mut events = Vec::new();
    let mut skipped = 0usize;
    for (idx, row) in reader.deserialize::<EventRow>().enumerate() {
        let row = row?;
        match row.into_event() {
            Some(event) => events.push(event),
            None => {
                // Data rows start on line 2.
                warn!("skipping row {}: no team value", idx + 2);
                skipped += 1;
            }
        }
    }
    debug!("read {} events ({} skipped)", events.len(), skipped);
    Ok(events)
}

pub fn write_events_csv<W: Write>(events: &[MatchEvent], wtr: W) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_writer(wtr);
    for event in events {
        writer.serialize(EventRow::from_event(event))?;
    }
    writer.flush().map_err(|source| IngestError::Io {
        path: "<csv writer>".to_string(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_columns_are_reported() {
        let raw = "Team_1,Event_Catalog\nA,Shot\n";
        let err = read_events_from_reader(raw.as_bytes()).unwrap_err();
        match err {
            IngestError::MissingColumns(cols) => assert_eq!(cols, vec!["Player_Name_1".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let raw = "Team_1,Player_Name_1,Event_Catalog\nA,Ann,Pass\n";
        let events = read_events_from_reader(raw.as_bytes()).unwrap();
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.category, EventCategory::Pass);
        assert_eq!(ev.half, Some(Half::First));
        assert!(ev.destination.is_none());
        assert!(ev.pass_outcome.is_none());
    }

    #[test]
    fn missing_markers_and_blank_cells_are_none() {
        let raw = "Team_1,Player_Name_1,Event_Catalog,Pressure,Foot_Used,X2,Y2\n\
                   A,Ann,Pass,nan, ,10,\n";
        let events = read_events_from_reader(raw.as_bytes()).unwrap();
        let ev = &events[0];
        assert!(ev.pressure.is_none());
        assert!(ev.foot_used.is_none());
        assert!(ev.destination.is_none());
    }

    #[test]
    fn rows_without_team_are_skipped() {
        let raw = "Team_1,Player_Name_1,Event_Catalog\n,Ann,Pass\nB,,Shot\n";
        let events = read_events_from_reader(raw.as_bytes()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].team, "B");
        assert_eq!(events[0].player, UNKNOWN);
    }

    #[test]
    fn half_parsing_guards_unexpected_values() {
        assert_eq!(parse_half(None), Some(Half::First));
        assert_eq!(parse_half(Some("2")), Some(Half::Second));
        assert_eq!(parse_half(Some("1.0")), Some(Half::First));
        assert_eq!(parse_half(Some("3")), None);
        assert_eq!(parse_half(Some("extra")), None);
    }

    #[test]
    fn category_labels_round_trip() {
        for label in ["Shot", "Pass", "Goalkeeper Action", "Offside", "Throw-in"] {
            assert_eq!(EventCategory::parse(label).label(), label);
        }
        assert!(!EventCategory::parse("Throw-in").is_known());
    }

    #[test]
    fn written_rows_read_back() {
        let mut ev = MatchEvent::new("A", "Ann", EventCategory::Pass);
        ev.destination = Some((70.0, 20.0));
        ev.pass_outcome = Some("Successful".to_string());
        ev.receiver = Some("Bob".to_string());
        ev.half = Some(Half::Second);

        let mut buf = Vec::new();
        write_events_csv(std::slice::from_ref(&ev), &mut buf).unwrap();
        let back = read_events_from_reader(buf.as_slice()).unwrap();
        assert_eq!(back, vec![ev]);
    }
}
