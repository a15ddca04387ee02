use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Sports the campus app organises games for. Ratings are kept per sport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Pickleball,
    Spikeball,
    Volleyball,
    Basketball,
    Soccer,
    Football,
    Frisbee,
    Tennis,
    Badminton,
    Climbing,
    Running,
}

impl Sport {
    pub const ALL: [Sport; 11] = [
        Sport::Pickleball,
        Sport::Spikeball,
        Sport::Volleyball,
        Sport::Basketball,
        Sport::Soccer,
        Sport::Football,
        Sport::Frisbee,
        Sport::Tennis,
        Sport::Badminton,
        Sport::Climbing,
        Sport::Running,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Pickleball => "pickleball",
            Sport::Spikeball => "spikeball",
            Sport::Volleyball => "volleyball",
            Sport::Basketball => "basketball",
            Sport::Soccer => "soccer",
            Sport::Football => "football",
            Sport::Frisbee => "frisbee",
            Sport::Tennis => "tennis",
            Sport::Badminton => "badminton",
            Sport::Climbing => "climbing",
            Sport::Running => "running",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sport::Pickleball => "Pickleball",
            Sport::Spikeball => "Spikeball",
            Sport::Volleyball => "Volleyball",
            Sport::Basketball => "Basketball",
            Sport::Soccer => "Soccer",
            Sport::Football => "Flag Football",
            Sport::Frisbee => "Ultimate Frisbee",
            Sport::Tennis => "Tennis",
            Sport::Badminton => "Badminton",
            Sport::Climbing => "Climbing",
            Sport::Running => "Running",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str() == wanted)
            .ok_or_else(|| LedgerError::validation(format!("unknown sport '{s}'")))
    }
}
