use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Self-assessed proficiency attached to a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown experience level: {s}"))
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the owner teaches the skill or wants to learn it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Offering,
    Wanted,
}

impl SkillType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offering => "offering",
            Self::Wanted => "wanted",
        }
    }
}

impl FromStr for SkillType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "offering" => Ok(Self::Offering),
            "wanted" => Ok(Self::Wanted),
            _ => Err(format!("unknown skill type: {s}")),
        }
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown day: {s}"))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [Self::Morning, Self::Afternoon, Self::Evening];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown time slot: {s}"))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sorts and de-duplicates a set of enum values into canonical order.
#[must_use]
pub fn canonical_set<T: Ord>(mut values: Vec<T>) -> Vec<T> {
    values.sort();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_parse_is_case_insensitive() {
        assert_eq!("expert".parse::<ExperienceLevel>(), Ok(ExperienceLevel::Expert));
        assert_eq!(
            "Intermediate".parse::<ExperienceLevel>(),
            Ok(ExperienceLevel::Intermediate)
        );
        assert!("guru".parse::<ExperienceLevel>().is_err());
    }

    #[test]
    fn test_skill_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&SkillType::Offering).unwrap(),
            "\"offering\""
        );
        assert_eq!(
            serde_json::from_str::<SkillType>("\"wanted\"").unwrap(),
            SkillType::Wanted
        );
    }

    #[test]
    fn test_canonical_set_orders_days_by_week() {
        let days = canonical_set(vec![
            Weekday::Sunday,
            Weekday::Monday,
            Weekday::Sunday,
            Weekday::Wednesday,
        ]);
        assert_eq!(days, vec![Weekday::Monday, Weekday::Wednesday, Weekday::Sunday]);
    }

    #[test]
    fn test_time_slot_parse() {
        assert_eq!("evening".parse::<TimeSlot>(), Ok(TimeSlot::Evening));
        assert!("night".parse::<TimeSlot>().is_err());
    }
}
