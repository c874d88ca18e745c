use std::io::Write;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::events::{self, EventCategory, Half, IngestError, MatchEvent};

const HOME_SQUAD: [&str; 11] = [
    "Alisson Costa",
    "Marek Nowak",
    "Jonas Berg",
    "Tariq Haddad",
    "Leo Fournier",
    "Ivan Petrov",
    "Samir Nasri",
    "Diego Alvarez",
    "Kenji Mori",
    "Oscar Lind",
    "Rafael Duarte",
];

const AWAY_SQUAD: [&str; 11] = [
    "Tomas Kral",
    "Elias Weber",
    "Nikolai Orlov",
    "Pablo Ruiz",
    "Mateo Silva",
    "Arjun Mehta",
    "Felix Braun",
    "Luca Bianchi",
    "Yusuf Demir",
    "Hugo Moreau",
    "Sven Olsen",
];

const SHOT_LOCATIONS: [&str; 4] = ["Inside Box", "Outside Box", "Six Yard Box", "Penalty Spot"];
const SHOT_TYPES: [&str; 3] = ["Open Play", "Header", "Free Kick"];
const PASS_TYPES: [&str; 4] = ["Short", "Long", "Cross", "Through Ball"];
const SAVE_TYPES: [&str; 3] = ["Diving", "Catch", "Punch"];

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub home: String,
    pub away: String,
    /// Approximate number of events per team and half.
    pub events_per_half: usize,
    /// Share of possession-phase events won by the home side, 0..=1.
    pub home_bias: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            home: "Northbridge FC".to_string(),
            away: "Southport United".to_string(),
            events_per_half: 120,
            home_bias: 0.55,
        }
    }
}

/// Same seed and config always give the same event log.
pub fn generate_match(seed: u64, cfg: &SyntheticConfig) -> Vec<MatchEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let home_bias = cfg.home_bias.clamp(0.0, 1.0);
    let total = cfg.events_per_half.max(1) * 2;
    let mut out = Vec::with_capacity(total * 2);

    for half in [Half::First, Half::Second] {
        let offset = if half == Half::First { 0 } else { 45 * 60 };
        for i in 0..total {
            let home = rng.gen_bool(home_bias);
            let (team, squad, keeper) = if home {
                (&cfg.home, &HOME_SQUAD, AWAY_SQUAD[0])
            } else {
                (&cfg.away, &AWAY_SQUAD, HOME_SQUAD[0])
            };
            let secs = offset + (i * 45 * 60 / total) as u32 + rng.gen_range(0..10);
            let mut ev = random_event(&mut rng, team, squad);
            ev.half = Some(half);
            ev.match_time = Some(format!("{:02}:{:02}", secs / 60, secs % 60));
            let saved = ev.result.as_deref() == Some("On Target");
            out.push(ev);

            // An on-target shot that is not a goal draws a save from the other keeper.
            if saved {
                let other = if home { &cfg.away } else { &cfg.home };
                let mut save = MatchEvent::new(other, keeper, EventCategory::GoalkeeperAction);
                save.half = Some(half);
                save.match_time = Some(format!("{:02}:{:02}", secs / 60, secs % 60));
                save.gk_action = Some("Save".to_string());
                save.save_type = SAVE_TYPES.choose(&mut rng).map(|s| s.to_string());
                out.push(save);
            }
        }
    }
    out
}

fn random_event(rng: &mut StdRng, team: &str, squad: &[&str; 11]) -> MatchEvent {
    // Outfield players only; index 0 is the keeper.
    let player = squad[rng.gen_range(1..squad.len())];
    let roll = rng.gen_range(0..100);
    let category = match roll {
        0..=59 => EventCategory::Pass,
        60..=67 => EventCategory::Shot,
        68..=77 => EventCategory::Tackle,
        78..=84 => EventCategory::Interception,
        85..=89 => EventCategory::Foul,
        90..=93 => EventCategory::Corner,
        94..=96 => EventCategory::Offside,
        _ => EventCategory::GoalkeeperAction,
    };

    let mut ev = MatchEvent::new(team, player, category.clone());
    let origin = (coord(rng, 0.0, 100.0), coord(rng, 0.0, 100.0));
    ev.origin = Some(origin);
    ev.foot_used = Some(if rng.gen_bool(0.7) { "Right" } else { "Left" }.to_string());

    match category {
        EventCategory::Pass => {
            let kind = PASS_TYPES.choose(rng).copied().unwrap_or("Short");
            let forward = coord(rng, -10.0, 35.0);
            let x2 = ((origin.0 + forward) * 10.0).round() / 10.0;
            ev.destination = Some((x2.clamp(0.0, 100.0), coord(rng, 0.0, 100.0)));
            ev.subtype = Some(kind.to_string());
            let pressured = rng.gen_bool(0.3);
            ev.pressure = Some(if pressured { "Yes" } else { "No" }.to_string());
            let success_rate = match (kind, pressured) {
                ("Cross", _) => 0.35,
                ("Through Ball", _) => 0.5,
                (_, true) => 0.7,
                (_, false) => 0.88,
            };
            let ok = rng.gen_bool(success_rate);
            ev.pass_outcome = Some(if ok { "Successful" } else { "Unsuccessful" }.to_string());
            if ok {
                let receiver = loop {
                    let pick = squad[rng.gen_range(0..squad.len())];
                    if pick != player {
                        break pick;
                    }
                };
                ev.receiver = Some(receiver.to_string());
            }
        }
        EventCategory::Shot => {
            ev.origin = Some((coord(rng, 70.0, 100.0), coord(rng, 20.0, 80.0)));
            ev.shot_location = SHOT_LOCATIONS.choose(rng).map(|s| s.to_string());
            ev.shot_type = SHOT_TYPES.choose(rng).map(|s| s.to_string());
            ev.pressure = Some(if rng.gen_bool(0.4) { "Yes" } else { "No" }.to_string());
            let result = match rng.gen_range(0..100) {
                0..=11 => "Goal",
                12..=41 => "On Target",
                42..=79 => "Off Target",
                _ => "Blocked",
            };
            ev.result = Some(result.to_string());
        }
        EventCategory::Tackle => {
            let ok = rng.gen_bool(0.6);
            ev.result = Some(if ok { "Successful" } else { "Unsuccessful" }.to_string());
        }
        EventCategory::GoalkeeperAction => {
            ev.player = squad[0].to_string();
            let action = if rng.gen_bool(0.6) { "Long Pass" } else { "Short Pass" };
            ev.gk_action = Some(action.to_string());
            ev.foot_used = Some("Right".to_string());
        }
        EventCategory::Corner => {
            ev.origin = Some((100.0, if rng.gen_bool(0.5) { 0.0 } else { 100.0 }));
        }
        _ => {}
    }
    ev
}

// One decimal place, matching what the CSV writer emits.
fn coord(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    (rng.gen_range(lo..hi) * 10.0).round() / 10.0
}

pub fn write_csv<W: Write>(events: &[MatchEvent], wtr: W) -> Result<(), IngestError> {
    events::write_events_csv(events, wtr)
}
