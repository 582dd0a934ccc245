use serde::{Deserialize, Serialize};

/// Spending tier the user is comfortable with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Broke,
    #[default]
    Moderate,
    Bougie,
}

impl BudgetTier {
    /// Whether a quest cost falls inside this tier's band
    pub fn matches_cost(&self, cost: f64) -> bool {
        match self {
            BudgetTier::Broke => cost < 25.0,
            BudgetTier::Moderate => (25.0..60.0).contains(&cost),
            BudgetTier::Bougie => cost >= 60.0,
        }
    }
}

/// User preferences for quest generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub budget: BudgetTier,
    /// Free-text mood, matched verbatim against quest tags
    #[serde(default)]
    pub mood: Option<String>,
    /// Search radius in km, used for the radius band post-filter
    #[serde(default)]
    pub radius_km: Option<f64>,
}

impl UserPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(mut self, budget: BudgetTier) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }
}
