use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Place,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    LowEnergy,
    MediumEnergy,
    HighEnergy,
}

/// Suggested time of day for a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BestTime {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl BestTime {
    /// Buckets an hour of the day (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => BestTime::Morning,
            12..=16 => BestTime::Afternoon,
            17..=20 => BestTime::Evening,
            _ => BestTime::Night,
        }
    }
}

/// One stop of a quest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestStep {
    /// 1-based position within the parent quest
    pub order: u32,
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// place_id or event_id of the referenced item
    pub item_id: String,
    pub name: String,
    pub description: String,
    /// Minutes
    pub estimated_time: u32,
    /// `None` when the source record had no coordinates
    pub location: Option<Location>,
}

/// A generated multi-stop itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub quest_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    /// Total minutes
    pub estimated_time: u32,
    pub estimated_cost: f64,
    pub steps: Vec<QuestStep>,
    pub tags: Vec<String>,
    pub best_time: Option<BestTime>,
    /// Kilometers from the user to the first step, set by the distance pass
    pub distance: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Quest {
    /// Location of the first step, if known
    pub fn start_location(&self) -> Option<&Location> {
        self.steps.first().and_then(|step| step.location.as_ref())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_time_from_hour() {
        assert_eq!(BestTime::from_hour(9), BestTime::Morning);
        assert_eq!(BestTime::from_hour(12), BestTime::Afternoon);
        assert_eq!(BestTime::from_hour(19), BestTime::Evening);
        assert_eq!(BestTime::from_hour(22), BestTime::Night);
    }

    #[test]
    fn test_step_serializes_type_and_null_location() {
        let step = QuestStep {
            order: 1,
            step_type: StepType::Event,
            item_id: "ev1".to_string(),
            name: "Concert".to_string(),
            description: "Main event".to_string(),
            estimated_time: 120,
            location: None,
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["type"], "event");
        assert!(json["location"].is_null());
    }

    #[test]
    fn test_difficulty_serializes_snake_case() {
        let json = serde_json::to_string(&Difficulty::MediumEnergy).unwrap();
        assert_eq!(json, r#""medium_energy""#);
    }
}
