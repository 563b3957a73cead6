/// Starting theta from coarse prior information.
///
/// Age, when known, takes priority over education. With neither, the test
/// starts at the population mean (0.0).
use std::fmt;
use std::str::FromStr;

use crate::constants::{THETA_MAX, THETA_MIN};
use crate::error::Error;

/// Highest completed (or current) education stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EducationLevel {
    Elementary,
    MiddleSchool,
    HighSchool,
    College,
    Graduate,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 5] = [
        EducationLevel::Elementary,
        EducationLevel::MiddleSchool,
        EducationLevel::HighSchool,
        EducationLevel::College,
        EducationLevel::Graduate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Elementary => "elementary",
            EducationLevel::MiddleSchool => "middle_school",
            EducationLevel::HighSchool => "high_school",
            EducationLevel::College => "college",
            EducationLevel::Graduate => "graduate",
        }
    }

    fn starting_theta(&self) -> f64 {
        match self {
            EducationLevel::Elementary => -1.0,
            EducationLevel::MiddleSchool => -0.5,
            EducationLevel::HighSchool => 0.0,
            EducationLevel::College => 0.5,
            EducationLevel::Graduate => 1.0,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EducationLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        EducationLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| Error::EducationLevel(s.to_string()))
    }
}

/// What is known about the test taker before the first item.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartingPoint {
    pub age: Option<u32>,
    pub education: Option<EducationLevel>,
}

impl StartingPoint {
    pub fn theta(&self) -> f64 {
        starting_theta(self.age, self.education)
    }
}

fn age_starting_theta(age: u32) -> f64 {
    match age {
        0..=5 => -1.5,
        6..=8 => -1.0,
        9..=11 => -0.5,
        12..=14 => 0.0,
        15..=17 => 0.25,
        _ => 0.5,
    }
}

/// Starting theta for a test taker. Always inside [THETA_MIN, THETA_MAX].
pub fn starting_theta(age: Option<u32>, education: Option<EducationLevel>) -> f64 {
    let theta = match (age, education) {
        (Some(age), _) => age_starting_theta(age),
        (None, Some(level)) => level.starting_theta(),
        (None, None) => 0.0,
    };
    theta.clamp(THETA_MIN, THETA_MAX)
}
