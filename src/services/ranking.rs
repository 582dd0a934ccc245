use std::cmp::Ordering;

use crate::models::{Quest, UserPreferences};

const BUDGET_MATCH_SCORE: f64 = 2.0;
const MOOD_MATCH_SCORE: f64 = 1.5;

/// Preference-fit score of a single quest
pub fn score(quest: &Quest, prefs: &UserPreferences) -> f64 {
    let mut total = 0.0;

    if prefs.budget.matches_cost(quest.estimated_cost) {
        total += BUDGET_MATCH_SCORE;
    }

    if let Some(mood) = prefs.mood.as_deref() {
        if quest.has_tag(mood) {
            total += MOOD_MATCH_SCORE;
        }
    }

    total
}

/// Orders quests by descending score. Equal scores keep their input order.
pub fn rank(quests: Vec<Quest>, prefs: &UserPreferences) -> Vec<Quest> {
    let mut scored: Vec<(f64, Quest)> = quests
        .into_iter()
        .map(|quest| (score(&quest, prefs), quest))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    scored.into_iter().map(|(_, quest)| quest).collect()
}
