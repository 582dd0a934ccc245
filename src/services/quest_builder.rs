use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{BestTime, Difficulty, Event, Location, Place, Quest, QuestStep, StepType};

/// Per-archetype caps bounding combinatorial growth
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestLimits {
    /// Café/park pairs, matched by index
    #[serde(default = "default_coffee_walk_pairs")]
    pub coffee_walk_pairs: usize,
    /// Trailing partners per anchor restaurant
    #[serde(default = "default_food_tour_partners")]
    pub food_tour_partners: usize,
    /// Trailing partners per anchor cheap eat
    #[serde(default = "default_budget_night_partners")]
    pub budget_night_partners: usize,
    /// Shop × café pairs
    #[serde(default = "default_cross_product_pairs")]
    pub shop_relax_pairs: usize,
    /// Restaurant × bar pairs
    #[serde(default = "default_cross_product_pairs")]
    pub night_out_pairs: usize,
    /// Sliding windows of three consecutive places
    #[serde(default = "default_exploration_windows")]
    pub exploration_windows: usize,
    /// Single-event quests
    #[serde(default = "default_event_quests")]
    pub standalone_events: usize,
    /// Event × food venue pairs
    #[serde(default = "default_event_quests")]
    pub event_food_pairs: usize,
    /// Output cap for the preference-score ranking policy
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_coffee_walk_pairs() -> usize {
    5
}

fn default_food_tour_partners() -> usize {
    3
}

fn default_budget_night_partners() -> usize {
    2
}

fn default_cross_product_pairs() -> usize {
    25
}

fn default_exploration_windows() -> usize {
    10
}

fn default_event_quests() -> usize {
    20
}

fn default_max_results() -> usize {
    10
}

impl Default for QuestLimits {
    fn default() -> Self {
        Self {
            coffee_walk_pairs: default_coffee_walk_pairs(),
            food_tour_partners: default_food_tour_partners(),
            budget_night_partners: default_budget_night_partners(),
            shop_relax_pairs: default_cross_product_pairs(),
            night_out_pairs: default_cross_product_pairs(),
            exploration_windows: default_exploration_windows(),
            standalone_events: default_event_quests(),
            event_food_pairs: default_event_quests(),
            max_results: default_max_results(),
        }
    }
}

impl QuestLimits {
    /// Load caps from `QUEST_*` environment variables, defaulting each one
    pub fn from_env() -> anyhow::Result<Self> {
        envy::prefixed("QUEST_")
            .from_env::<QuestLimits>()
            .map_err(|e| anyhow::anyhow!("Failed to load quest limits: {}", e))
    }
}

fn is_cafe(place: &Place) -> bool {
    place.has_category("cafe") || place.has_category("coffee")
}

fn is_park(place: &Place) -> bool {
    place.has_category("park") || place.has_category("outdoor")
}

fn is_restaurant(place: &Place) -> bool {
    place.has_category("restaurant")
}

fn is_bar(place: &Place) -> bool {
    place.has_category("bar") || place.has_category("night_club")
}

fn is_shop(place: &Place) -> bool {
    place.has_category("store") || place.has_category("shop")
}

fn is_cheap_eat(place: &Place) -> bool {
    matches!(place.price_level, Some(level) if level <= 2)
}

fn is_food_venue(place: &Place) -> bool {
    is_cafe(place) || is_restaurant(place) || is_bar(place)
}

fn price(place: &Place, default: u8) -> f64 {
    f64::from(place.price_level.unwrap_or(default))
}

/// Each anchor paired with up to `partners` items that follow it
fn trailing_pairs<'a>(items: &[&'a Place], partners: usize) -> Vec<(&'a Place, &'a Place)> {
    items
        .iter()
        .enumerate()
        .flat_map(|(i, anchor)| {
            items[i + 1..]
                .iter()
                .take(partners)
                .map(move |partner| (*anchor, *partner))
        })
        .collect()
}

/// Cross product, skipping a place paired with itself
fn cross_pairs<'a>(
    left: &[&'a Place],
    right: &[&'a Place],
    cap: usize,
) -> Vec<(&'a Place, &'a Place)> {
    left.iter()
        .flat_map(|a| right.iter().map(move |b| (*a, *b)))
        .filter(|(a, b)| a.place_id != b.place_id)
        .take(cap)
        .collect()
}

/// A stop before it is numbered
struct Stop {
    step_type: StepType,
    item_id: String,
    name: String,
    description: String,
    minutes: u32,
    location: Option<Location>,
}

impl Stop {
    fn place(place: &Place, description: impl Into<String>, minutes: u32) -> Self {
        Self {
            step_type: StepType::Place,
            item_id: place.place_id.clone(),
            name: place.name.clone(),
            description: description.into(),
            minutes,
            location: place.location,
        }
    }

    fn event(event: &Event, description: impl Into<String>, minutes: u32) -> Self {
        Self {
            step_type: StepType::Event,
            item_id: event.event_id.clone(),
            name: event.name.clone(),
            description: description.into(),
            minutes,
            location: event.location,
        }
    }
}

/// Fixed presentation of an archetype
struct Template {
    title: String,
    description: String,
    category: &'static str,
    difficulty: Difficulty,
    tags: Vec<String>,
    best_time: Option<BestTime>,
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

/// Numbers the stops from 1 and totals their time.
fn assemble(template: Template, stops: Vec<Stop>, cost: f64) -> Quest {
    let estimated_time = stops.iter().map(|s| s.minutes).sum();

    let steps = stops
        .into_iter()
        .zip(1u32..)
        .map(|(stop, order)| QuestStep {
            order,
            step_type: stop.step_type,
            item_id: stop.item_id,
            name: stop.name,
            description: stop.description,
            estimated_time: stop.minutes,
            location: stop.location,
        })
        .collect();

    Quest {
        quest_id: Uuid::new_v4(),
        title: template.title,
        description: template.description,
        category: template.category.to_string(),
        difficulty: template.difficulty,
        estimated_time,
        estimated_cost: cost,
        steps,
        tags: template.tags,
        best_time: template.best_time,
        distance: None,
        created_at: Utc::now(),
    }
}

fn event_best_time(event: &Event) -> BestTime {
    event
        .start_hour()
        .map(BestTime::from_hour)
        .unwrap_or(BestTime::Evening)
}

/// Builds candidate quests from the fixed archetypes
pub struct QuestBuilder<'a> {
    limits: &'a QuestLimits,
}

impl<'a> QuestBuilder<'a> {
    pub fn new(limits: &'a QuestLimits) -> Self {
        Self { limits }
    }

    /// Place-only archetypes. Expects an already filtered place set.
    pub fn build_place_quests(&self, places: &[Place]) -> Vec<Quest> {
        let cafes: Vec<&Place> = places.iter().filter(|p| is_cafe(p)).collect();
        let parks: Vec<&Place> = places.iter().filter(|p| is_park(p)).collect();
        let restaurants: Vec<&Place> = places.iter().filter(|p| is_restaurant(p)).collect();
        let bars: Vec<&Place> = places.iter().filter(|p| is_bar(p)).collect();
        let shops: Vec<&Place> = places.iter().filter(|p| is_shop(p)).collect();
        let cheap_eats: Vec<&Place> = places.iter().filter(|p| is_cheap_eat(p)).collect();

        let mut quests = Vec::new();

        for (cafe, park) in cafes
            .iter()
            .zip(parks.iter())
            .filter(|(c, p)| c.place_id != p.place_id)
            .take(self.limits.coffee_walk_pairs)
        {
            quests.push(coffee_walk(cafe, park));
        }

        if restaurants.len() >= 2 {
            for (a, b) in trailing_pairs(&restaurants, self.limits.food_tour_partners) {
                quests.push(food_tour(a, b));
            }
        }

        if cheap_eats.len() >= 2 {
            for (a, b) in trailing_pairs(&cheap_eats, self.limits.budget_night_partners) {
                quests.push(budget_night(a, b));
            }
        }

        for (shop, cafe) in cross_pairs(&shops, &cafes, self.limits.shop_relax_pairs) {
            quests.push(shop_and_relax(shop, cafe));
        }

        for (restaurant, bar) in cross_pairs(&restaurants, &bars, self.limits.night_out_pairs) {
            quests.push(night_out(restaurant, bar));
        }

        for window in places.windows(3).take(self.limits.exploration_windows) {
            quests.push(exploration(window));
        }

        tracing::debug!(
            places = places.len(),
            cafes = cafes.len(),
            parks = parks.len(),
            restaurants = restaurants.len(),
            bars = bars.len(),
            shops = shops.len(),
            quests = quests.len(),
            "Built place quests"
        );

        quests
    }

    /// Event archetypes: each event alone, and each event after a food stop.
    pub fn build_event_quests(&self, events: &[Event], places: &[Place]) -> Vec<Quest> {
        let food: Vec<&Place> = places.iter().filter(|p| is_food_venue(p)).collect();

        let mut quests: Vec<Quest> = events
            .iter()
            .take(self.limits.standalone_events)
            .map(standalone_event)
            .collect();

        let pairs = events
            .iter()
            .flat_map(|event| food.iter().map(move |place| (event, *place)))
            .take(self.limits.event_food_pairs);

        for (event, place) in pairs {
            quests.push(event_with_food(event, place));
        }

        tracing::debug!(
            events = events.len(),
            food_venues = food.len(),
            quests = quests.len(),
            "Built event quests"
        );

        quests
    }
}

fn coffee_walk(cafe: &Place, park: &Place) -> Quest {
    assemble(
        Template {
            title: "Coffee & Nature Walk".to_string(),
            description: format!(
                "Start with coffee at {}, then stroll through {}",
                cafe.name, park.name
            ),
            category: "chill",
            difficulty: Difficulty::LowEnergy,
            tags: tags(&["coffee", "outdoor", "relaxing", "walkable"]),
            best_time: Some(BestTime::Morning),
        },
        vec![
            Stop::place(cafe, "Grab your favourite coffee", 15),
            Stop::place(park, "Enjoy a relaxing walk", 45),
        ],
        price(cafe, 2) * 5.0,
    )
}

fn food_tour(first: &Place, second: &Place) -> Quest {
    assemble(
        Template {
            title: format!("Food Tour: {} & {}", first.name, second.name),
            description: format!("Taste your way through {} and {}", first.name, second.name),
            category: "foodie",
            difficulty: Difficulty::MediumEnergy,
            tags: tags(&["food", "foodie", "social"]),
            best_time: Some(BestTime::Evening),
        },
        vec![
            Stop::place(first, "Share a couple of starters", 45),
            Stop::place(second, "Save room for the mains", 45),
        ],
        (price(first, 2) + price(second, 2)) * 15.0,
    )
}

fn budget_night(first: &Place, second: &Place) -> Quest {
    assemble(
        Template {
            title: "$20 Budget Night".to_string(),
            description: format!("Affordable eats at {} and {}", first.name, second.name),
            category: "budget",
            difficulty: Difficulty::LowEnergy,
            tags: tags(&["cheap", "student", "food"]),
            best_time: Some(BestTime::Evening),
        },
        vec![
            Stop::place(first, "Stop 1", 45),
            Stop::place(second, "Stop 2", 45),
        ],
        (price(first, 1) + price(second, 1)) * 8.0,
    )
}

fn shop_and_relax(shop: &Place, cafe: &Place) -> Quest {
    assemble(
        Template {
            title: "Shop & Relax".to_string(),
            description: format!(
                "Browse {}, then unwind with a drink at {}",
                shop.name, cafe.name
            ),
            category: "shopping",
            difficulty: Difficulty::LowEnergy,
            tags: tags(&["shopping", "coffee", "relaxing"]),
            best_time: Some(BestTime::Afternoon),
        },
        vec![
            Stop::place(shop, "Browse the shelves", 45),
            Stop::place(cafe, "Rest your feet", 30),
        ],
        (price(shop, 2) + price(cafe, 2)) * 12.0,
    )
}

fn night_out(restaurant: &Place, bar: &Place) -> Quest {
    assemble(
        Template {
            title: "Night Out".to_string(),
            description: format!(
                "Dinner at {} followed by drinks at {}",
                restaurant.name, bar.name
            ),
            category: "nightlife",
            difficulty: Difficulty::MediumEnergy,
            tags: tags(&["nightlife", "food", "social", "date"]),
            best_time: Some(BestTime::Night),
        },
        vec![
            Stop::place(restaurant, "Dinner", 90),
            Stop::place(bar, "Drinks", 60),
        ],
        (price(restaurant, 3) + price(bar, 2)) * 20.0,
    )
}

fn exploration(window: &[Place]) -> Quest {
    let names: Vec<&str> = window.iter().map(|p| p.name.as_str()).collect();
    let cost: f64 = window.iter().map(|p| price(p, 2)).sum::<f64>() * 10.0;

    assemble(
        Template {
            title: "Neighbourhood Explorer".to_string(),
            description: format!("Discover {}", names.join(", ")),
            category: "adventure",
            difficulty: Difficulty::HighEnergy,
            tags: tags(&["explore", "adventure", "walkable"]),
            best_time: Some(BestTime::Afternoon),
        },
        window
            .iter()
            .enumerate()
            .map(|(i, place)| Stop::place(place, format!("Stop {}", i + 1), 40))
            .collect(),
        cost,
    )
}

fn standalone_event(event: &Event) -> Quest {
    let description = match &event.venue {
        Some(venue) => format!("Catch {} at {}", event.name, venue),
        None => format!("Catch {}", event.name),
    };

    let mut quest_tags = tags(&["events", "entertainment"]);
    let category_tag = event.category.to_lowercase();
    if !category_tag.is_empty() && !quest_tags.contains(&category_tag) {
        quest_tags.push(category_tag);
    }

    assemble(
        Template {
            title: event.name.clone(),
            description,
            category: "entertainment",
            difficulty: Difficulty::MediumEnergy,
            tags: quest_tags,
            best_time: Some(event_best_time(event)),
        },
        vec![Stop::event(event, "Main event", 120)],
        30.0,
    )
}

fn event_with_food(event: &Event, place: &Place) -> Quest {
    assemble(
        Template {
            title: format!("{} Night Out", event.name),
            description: format!("Grab a bite at {} before {}", place.name, event.name),
            category: "social",
            difficulty: Difficulty::MediumEnergy,
            tags: tags(&["events", "nightlife", "social", "food"]),
            best_time: Some(event_best_time(event)),
        },
        vec![
            Stop::place(place, "Pre-event bite", 60),
            Stop::event(event, "Main event", 120),
        ],
        50.0,
    )
}
