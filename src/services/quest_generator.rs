use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{
    BestTime, Difficulty, Event, Location, Place, Quest, QuestStep, StepType, UserPreferences,
};
use crate::services::distance::quest_distance;
use crate::services::place_filter::filter_interesting;
use crate::services::quest_builder::{QuestBuilder, QuestLimits};
use crate::services::ranking::rank;

/// Width of the radius band kept by the distance policy, in km
const RADIUS_BAND_KM: f64 = 10.0;

/// How the candidate pool is turned into the final list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Closest first, then keep the `[radius - 10, radius]` band when a radius is set
    #[default]
    Distance,
    /// Highest preference score first, capped at `QuestLimits::max_results`
    PreferenceScore,
}

/// Turns places and events into a ranked list of quests
///
/// Generation is pure and synchronous; one generator can be shared across
/// request handlers.
#[derive(Debug, Clone, Default)]
pub struct QuestGenerator {
    limits: QuestLimits,
    policy: RankingPolicy,
}

impl QuestGenerator {
    pub fn new(limits: QuestLimits, policy: RankingPolicy) -> Self {
        Self { limits, policy }
    }

    pub fn policy(&self) -> RankingPolicy {
        self.policy
    }

    /// Generates quests for a user.
    ///
    /// With no places and no events at all, returns the fixed demo quests.
    /// An empty result means nothing could be built; it is not an error.
    pub fn generate(
        &self,
        places: &[Place],
        events: &[Event],
        user_location: Option<&Location>,
        prefs: &UserPreferences,
    ) -> Vec<Quest> {
        if places.is_empty() && events.is_empty() {
            tracing::info!("No places or events supplied, returning fallback quests");
            let mut quests = fallback_quests();
            for quest in &mut quests {
                let distance = quest_distance(quest, user_location);
                quest.distance = distance.is_finite().then_some(distance);
            }
            return quests;
        }

        let interesting = filter_interesting(places);
        let builder = QuestBuilder::new(&self.limits);

        let mut pool = builder.build_place_quests(&interesting);
        pool.extend(builder.build_event_quests(events, &interesting));

        if pool.is_empty() {
            tracing::info!(
                places = places.len(),
                interesting = interesting.len(),
                events = events.len(),
                "No quests could be generated"
            );
            return Vec::new();
        }

        let pool_size = pool.len();
        let measured: Vec<(f64, Quest)> = pool
            .into_iter()
            .map(|mut quest| {
                let distance = quest_distance(&quest, user_location);
                quest.distance = distance.is_finite().then_some(distance);
                (distance, quest)
            })
            .collect();

        let quests = match self.policy {
            RankingPolicy::Distance => order_by_distance(measured, prefs.radius_km),
            RankingPolicy::PreferenceScore => {
                let mut ranked = rank(measured.into_iter().map(|(_, q)| q).collect(), prefs);
                ranked.truncate(self.limits.max_results);
                ranked
            }
        };

        tracing::info!(
            pool = pool_size,
            returned = quests.len(),
            policy = ?self.policy,
            radius_km = ?prefs.radius_km,
            "Quest generation completed"
        );

        quests
    }
}

/// Closest first; with a radius, keeps only distances in `[max(0, r - 10), r]`.
fn order_by_distance(mut measured: Vec<(f64, Quest)>, radius_km: Option<f64>) -> Vec<Quest> {
    measured.sort_by(|a, b| a.0.total_cmp(&b.0));

    if let Some(radius) = radius_km {
        let lower = (radius - RADIUS_BAND_KM).max(0.0);
        measured.retain(|(distance, _)| *distance >= lower && *distance <= radius);
    }

    measured.into_iter().map(|(_, quest)| quest).collect()
}

fn fixture_step(
    order: u32,
    item_id: &str,
    name: &str,
    description: &str,
    minutes: u32,
    lat: f64,
    lng: f64,
) -> QuestStep {
    QuestStep {
        order,
        step_type: StepType::Place,
        item_id: item_id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        estimated_time: minutes,
        location: Some(Location::new(lat, lng)),
    }
}

#[allow(clippy::too_many_arguments)]
fn fixture(
    title: &str,
    description: &str,
    category: &str,
    difficulty: Difficulty,
    cost: f64,
    tags: &[&str],
    best_time: BestTime,
    steps: Vec<QuestStep>,
) -> Quest {
    Quest {
        quest_id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        difficulty,
        estimated_time: steps.iter().map(|s| s.estimated_time).sum(),
        estimated_cost: cost,
        steps,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        best_time: Some(best_time),
        distance: None,
        created_at: Utc::now(),
    }
}

/// Demo quests around Hamilton, ON, served when no place or event data exists
pub fn fallback_quests() -> Vec<Quest> {
    vec![
        fixture(
            "McMaster Campus Coffee & Trails",
            "Coffee at the Student Centre, then a loop through Cootes Paradise",
            "chill",
            Difficulty::LowEnergy,
            5.0,
            &["coffee", "outdoor", "student", "walkable"],
            BestTime::Morning,
            vec![
                fixture_step(
                    1,
                    "fallback-mcmaster-student-centre",
                    "McMaster University Student Centre",
                    "Grab a coffee on campus",
                    15,
                    43.2632,
                    -79.9177,
                ),
                fixture_step(
                    2,
                    "fallback-cootes-paradise",
                    "Cootes Paradise Trails",
                    "Walk the marsh boardwalk",
                    60,
                    43.2747,
                    -79.9066,
                ),
            ],
        ),
        fixture(
            "Bayfront Sunset Walk",
            "Stroll the waterfront from Bayfront Park to Pier 4",
            "chill",
            Difficulty::LowEnergy,
            0.0,
            &["outdoor", "relaxing", "free", "walkable"],
            BestTime::Evening,
            vec![
                fixture_step(
                    1,
                    "fallback-bayfront-park",
                    "Bayfront Park",
                    "Catch the sunset over the harbour",
                    45,
                    43.2713,
                    -79.8713,
                ),
                fixture_step(
                    2,
                    "fallback-pier-4-park",
                    "Pier 4 Park",
                    "Wander out along the pier",
                    30,
                    43.2735,
                    -79.8627,
                ),
            ],
        ),
        fixture(
            "Locke Street & Dundurn Castle",
            "Brunch on Locke Street, then tour Dundurn Castle",
            "adventure",
            Difficulty::MediumEnergy,
            30.0,
            &["food", "history", "explore"],
            BestTime::Afternoon,
            vec![
                fixture_step(
                    1,
                    "fallback-locke-street",
                    "Locke Street South",
                    "Brunch and browse the shops",
                    60,
                    43.2554,
                    -79.8880,
                ),
                fixture_step(
                    2,
                    "fallback-dundurn-castle",
                    "Dundurn National Historic Site",
                    "Tour the castle grounds",
                    60,
                    43.2696,
                    -79.8845,
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetTier;
    use crate::services::ranking::score;

    const HAMILTON: Location = Location {
        lat: 43.2557,
        lng: -79.8711,
    };

    /// A point roughly `km` north of Hamilton
    fn north_of_hamilton(km: f64) -> Location {
        Location::new(HAMILTON.lat + km / 111.195, HAMILTON.lng)
    }

    fn restaurant(id: &str, location: Location) -> Place {
        Place::new(id, format!("Restaurant {id}"), "restaurant, food").with_location(location)
    }

    #[test]
    fn test_empty_inputs_return_fallback() {
        let generator = QuestGenerator::default();
        let quests = generator.generate(&[], &[], Some(&HAMILTON), &UserPreferences::new());

        assert_eq!(quests.len(), 3);
        for quest in &quests {
            assert!(!quest.steps.is_empty());
            assert!(quest.steps.iter().all(|s| s.location.is_some()));
            assert!(quest.distance.is_some());
        }
        assert_eq!(quests[1].steps[0].location, Some(Location::new(43.2713, -79.8713)));
    }

    #[test]
    fn test_fallback_ignores_radius_band() {
        let generator = QuestGenerator::default();
        let prefs = UserPreferences::new().with_radius_km(100.0);
        let quests = generator.generate(&[], &[], Some(&HAMILTON), &prefs);
        assert_eq!(quests.len(), 3);
    }

    #[test]
    fn test_only_filtered_out_places_yield_nothing() {
        let generator = QuestGenerator::default();
        let places = vec![
            Place::new("g", "Esso", "gas_station"),
            Place::new("b", "TD", "bank"),
        ];
        let quests = generator.generate(&places, &[], Some(&HAMILTON), &UserPreferences::new());
        assert!(quests.is_empty());
    }

    #[test]
    fn test_distance_policy_sorts_closest_first() {
        let generator = QuestGenerator::default();
        let events = vec![
            Event::new("far", "Far Show", "Music").with_location(north_of_hamilton(8.0)),
            Event::new("near", "Near Show", "Music").with_location(north_of_hamilton(1.0)),
            Event::new("unknown", "Secret Show", "Music"),
        ];

        let quests = generator.generate(&[], &events, Some(&HAMILTON), &UserPreferences::new());

        let first_ids: Vec<&str> = quests.iter().map(|q| q.steps[0].item_id.as_str()).collect();
        assert_eq!(first_ids, vec!["near", "far", "unknown"]);
        assert!(quests[2].distance.is_none());
        let near = quests[0].distance.unwrap();
        assert!((near - 1.0).abs() < 0.05, "got {near}");
    }

    #[test]
    fn test_radius_band_keeps_far_edge_only() {
        let generator = QuestGenerator::default();
        let events = vec![
            Event::new("e3", "Three", "Music").with_location(north_of_hamilton(3.0)),
            Event::new("e14", "Fourteen", "Music").with_location(north_of_hamilton(14.0)),
            Event::new("e19", "Nineteen", "Music").with_location(north_of_hamilton(19.0)),
            Event::new("e25", "TwentyFive", "Music").with_location(north_of_hamilton(25.0)),
            Event::new("unknown", "Nowhere", "Music"),
        ];
        let prefs = UserPreferences::new().with_radius_km(20.0);

        let quests = generator.generate(&[], &events, Some(&HAMILTON), &prefs);

        let ids: Vec<&str> = quests.iter().map(|q| q.steps[0].item_id.as_str()).collect();
        assert_eq!(ids, vec!["e14", "e19"]);
    }

    #[test]
    fn test_small_radius_band_starts_at_zero() {
        let generator = QuestGenerator::default();
        let events = vec![
            Event::new("e1", "One", "Music").with_location(north_of_hamilton(1.0)),
            Event::new("e7", "Seven", "Music").with_location(north_of_hamilton(7.0)),
        ];
        let prefs = UserPreferences::new().with_radius_km(5.0);

        let quests = generator.generate(&[], &events, Some(&HAMILTON), &prefs);
        assert_eq!(quests.len(), 1);
        assert_eq!(quests[0].steps[0].item_id, "e1");
    }

    #[test]
    fn test_missing_user_location_keeps_everything_without_radius() {
        let generator = QuestGenerator::default();
        let places = vec![restaurant("r1", HAMILTON), restaurant("r2", HAMILTON)];

        let quests = generator.generate(&places, &[], None, &UserPreferences::new());
        assert_eq!(quests.len(), 1);
        assert!(quests[0].distance.is_none());
    }

    #[test]
    fn test_preference_policy_ranks_and_caps() {
        let limits = QuestLimits {
            max_results: 2,
            ..QuestLimits::default()
        };
        let generator = QuestGenerator::new(limits, RankingPolicy::PreferenceScore);
        let places = vec![
            restaurant("r1", HAMILTON).with_price_level(1),
            restaurant("r2", HAMILTON).with_price_level(1),
            restaurant("r3", HAMILTON).with_price_level(4),
        ];
        let prefs = UserPreferences::new()
            .with_budget(BudgetTier::Broke)
            .with_radius_km(1.0);

        let quests = generator.generate(&places, &[], Some(&HAMILTON), &prefs);

        assert_eq!(quests.len(), 2);
        // the radius band does not apply under this policy
        assert!(quests.iter().all(|q| q.distance == Some(0.0)));
        assert!(score(&quests[0], &prefs) >= score(&quests[1], &prefs));
        assert_eq!(score(&quests[0], &prefs), 2.0);
    }
}
