use std::fmt;

use serde::{Serialize, Serializer};

// Coordinates are normalized to 0..100 on both axes.
const FIRST_THIRD: f64 = 33.0;
const SECOND_THIRD: f64 = 66.0;

/// Length-wise third of the pitch (x axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    Defensive,
    Middle,
    Attacking,
}

/// Width-wise third of the pitch (y axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchZone {
    pub band: Band,
    pub channel: Channel,
}

impl PitchZone {
    pub const ALL: [PitchZone; 9] = [
        PitchZone::new(Band::Defensive, Channel::Left),
        PitchZone::new(Band::Defensive, Channel::Center),
        PitchZone::new(Band::Defensive, Channel::Right),
        PitchZone::new(Band::Middle, Channel::Left),
        PitchZone::new(Band::Middle, Channel::Center),
        PitchZone::new(Band::Middle, Channel::Right),
        PitchZone::new(Band::Attacking, Channel::Left),
        PitchZone::new(Band::Attacking, Channel::Center),
        PitchZone::new(Band::Attacking, Channel::Right),
    ];

    pub const fn new(band: Band, channel: Channel) -> Self {
        Self { band, channel }
    }

    pub fn label(&self) -> &'static str {
        match (self.band, self.channel) {
            (Band::Defensive, Channel::Left) => "Defensive Left",
            (Band::Defensive, Channel::Center) => "Defensive Center",
            (Band::Defensive, Channel::Right) => "Defensive Right",
            (Band::Middle, Channel::Left) => "Middle Left",
            (Band::Middle, Channel::Center) => "Middle Center",
            (Band::Middle, Channel::Right) => "Middle Right",
            (Band::Attacking, Channel::Left) => "Attacking Left",
            (Band::Attacking, Channel::Center) => "Attacking Center",
            (Band::Attacking, Channel::Right) => "Attacking Right",
        }
    }
}

impl fmt::Display for PitchZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Serialized as its label so zone-keyed maps stay valid JSON objects.
impl Serialize for PitchZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Map a coordinate to one of the nine fixed zones.
/// Anything that is not below a threshold (including NaN) lands in the last third.
pub fn classify(x: f64, y: f64) -> PitchZone {
    let band = if x < FIRST_THIRD {
        Band::Defensive
    } else if x < SECOND_THIRD {
        Band::Middle
    } else {
        Band::Attacking
    };
    let channel = if y < FIRST_THIRD {
        Channel::Left
    } else if y < SECOND_THIRD {
        Channel::Center
    } else {
        Channel::Right
    };
    PitchZone { band, channel }
}
