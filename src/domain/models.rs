use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    LoseWeight,
    GainWeight,
    MaintainWeight,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::LoseWeight, Goal::GainWeight, Goal::MaintainWeight];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "Lose Weight",
            Goal::GainWeight => "Gain Weight",
            Goal::MaintainWeight => "Maintain Weight",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// A single row of a diet or exercise plan, e.g. ("Breakfast", "Oatmeal & Fruits").
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PlanEntry {
    pub label: &'static str,
    pub description: &'static str,
}

impl PlanEntry {
    pub const fn new(label: &'static str, description: &'static str) -> Self {
        Self { label, description }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ScheduleRow {
    pub day: &'static str,
    pub diet: &'static str,
    pub exercise: &'static str,
}

pub type WeeklySchedule = [ScheduleRow; 7];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProgressSample {
    pub day: u32,
    pub weight: f64,
}

pub const EXERCISE_MINUTES_RANGE: std::ops::RangeInclusive<u32> = 10..=180;
pub const WEIGHT_RANGE: std::ops::RangeInclusive<f64> = 20.0..=200.0;
pub const HEIGHT_FEET_RANGE: std::ops::RangeInclusive<u32> = 3..=8;
pub const HEIGHT_INCHES_RANGE: std::ops::RangeInclusive<u32> = 0..=11;
pub const AGE_RANGE: std::ops::RangeInclusive<u32> = 10..=100;

/// Form values for the current render. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub goal: Goal,
    pub exercise_minutes: u32,
    pub weight: f64,
    pub height_feet: u32,
    pub height_inches: u32,
    pub age: u32,
    pub gender: Gender,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            goal: Goal::LoseWeight,
            exercise_minutes: 60,
            weight: 70.0,
            height_feet: 5,
            height_inches: 6,
            age: 25,
            gender: Gender::Male,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be between {min} and {max}")]
pub struct RangeError {
    pub field: &'static str,
    pub min: String,
    pub max: String,
}

impl RangeError {
    fn new<T: ToString>(field: &'static str, range: &std::ops::RangeInclusive<T>) -> Self {
        Self {
            field,
            min: range.start().to_string(),
            max: range.end().to_string(),
        }
    }
}

impl UserProfile {
    /// Checks every numeric field against the ranges the form controls enforce.
    pub fn check_ranges(&self) -> Result<(), RangeError> {
        if !EXERCISE_MINUTES_RANGE.contains(&self.exercise_minutes) {
            return Err(RangeError::new("exercise_minutes", &EXERCISE_MINUTES_RANGE));
        }
        check_weight(self.weight)?;
        if !HEIGHT_FEET_RANGE.contains(&self.height_feet) {
            return Err(RangeError::new("height_feet", &HEIGHT_FEET_RANGE));
        }
        if !HEIGHT_INCHES_RANGE.contains(&self.height_inches) {
            return Err(RangeError::new("height_inches", &HEIGHT_INCHES_RANGE));
        }
        if !AGE_RANGE.contains(&self.age) {
            return Err(RangeError::new("age", &AGE_RANGE));
        }
        Ok(())
    }
}

pub fn check_weight(weight: f64) -> Result<(), RangeError> {
    if WEIGHT_RANGE.contains(&weight) {
        Ok(())
    } else {
        Err(RangeError::new("weight", &WEIGHT_RANGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_serializes_snake_case() {
        let json = serde_json::to_string(&Goal::MaintainWeight).unwrap();
        assert_eq!(json, "\"maintain_weight\"");
        let parsed: Goal = serde_json::from_str("\"gain_weight\"").unwrap();
        assert_eq!(parsed, Goal::GainWeight);
    }

    #[test]
    fn default_profile_is_within_ranges() {
        assert!(UserProfile::default().check_ranges().is_ok());
    }

    #[test]
    fn out_of_range_fields_are_named() {
        let profile = UserProfile {
            height_inches: 12,
            ..UserProfile::default()
        };
        let err = profile.check_ranges().unwrap_err();
        assert_eq!(err.field, "height_inches");
        assert_eq!(err.to_string(), "height_inches must be between 0 and 11");

        let profile = UserProfile {
            weight: 19.5,
            ..UserProfile::default()
        };
        assert_eq!(profile.check_ranges().unwrap_err().field, "weight");
    }

    #[test]
    fn weight_bounds_are_inclusive() {
        assert!(check_weight(20.0).is_ok());
        assert!(check_weight(200.0).is_ok());
        assert!(check_weight(200.1).is_err());
    }
}
