//! Noise filter for raw place lookups.
//!
//! Google tags nearly everything with `point_of_interest, establishment`, so
//! the raw nearby-search result is full of gas stations, banks, dentists and
//! bare city names. This module decides which places are worth building a
//! quest around. Every check is a case-insensitive substring test against
//! the joined category string, except the administrative/generic checks,
//! which look at whole tags.

use crate::models::Place;

/// Categories that are never quest material
const BLOCKED_CATEGORIES: &[&str] = &[
    // fuel & vehicles
    "gas_station",
    "parking",
    "car_dealer",
    "car_rental",
    "car_repair",
    "car_wash",
    // financial
    "atm",
    "bank",
    "accounting",
    "insurance_agency",
    // storage & trades
    "storage",
    "moving_company",
    "electrician",
    "plumber",
    "roofing_contractor",
    "locksmith",
    "painter",
    "general_contractor",
    "real_estate_agency",
    // medical
    "doctor",
    "dentist",
    "hospital",
    "pharmacy",
    "physiotherapist",
    "veterinary_care",
    // funerary
    "funeral_home",
    "cemetery",
    // government, postal & legal
    "local_government_office",
    "city_hall",
    "courthouse",
    "embassy",
    "police",
    "fire_station",
    "post_office",
    "lawyer",
];

/// Tags that only describe an administrative area, never a venue
const ADMINISTRATIVE_TAGS: &[&str] = &[
    "political",
    "locality",
    "sublocality",
    "sublocality_level_1",
    "sublocality_level_2",
    "neighborhood",
    "colloquial_area",
    "administrative_area_level_1",
    "administrative_area_level_2",
    "administrative_area_level_3",
    "country",
    "postal_code",
    "route",
    "premise",
];

/// Tags that carry no information on their own
const GENERIC_TAGS: &[&str] = &["lodging", "establishment", "point_of_interest"];

/// Categories that always make the cut
const ALLOWED_CATEGORIES: &[&str] = &[
    // food & drink
    "restaurant",
    "cafe",
    "coffee",
    "bakery",
    "bar",
    "night_club",
    "meal_takeaway",
    "food",
    // culture & entertainment
    "museum",
    "art_gallery",
    "movie_theater",
    "bowling_alley",
    "casino",
    "library",
    "stadium",
    "tourist_attraction",
    "aquarium",
    "zoo",
    "amusement_park",
    // recreation
    "park",
    "campground",
    "natural_feature",
    // retail
    "shopping_mall",
    "book_store",
    "clothing_store",
    "department_store",
    "shoe_store",
    "jewelry_store",
    "florist",
    // wellness
    "gym",
    "spa",
];

/// Utility retailers that Google still tags as stores
const UTILITY_RETAIL_NAMES: &[&str] = &[
    "courier",
    "postal",
    "canada post",
    "fedex",
    "ups store",
    "hardware",
    "tire",
    "automotive",
    "auto parts",
];

/// Whether a single place is worth building quests around
pub fn is_interesting(place: &Place) -> bool {
    let category = place.category.to_lowercase();
    let tags = place.category_tags();

    if BLOCKED_CATEGORIES.iter().any(|c| category.contains(c)) {
        return false;
    }

    if tags.is_empty()
        || tags.iter().all(|t| ADMINISTRATIVE_TAGS.contains(&t.as_str()))
        || tags.iter().all(|t| GENERIC_TAGS.contains(&t.as_str()))
    {
        return false;
    }

    if ALLOWED_CATEGORIES.iter().any(|c| category.contains(c)) {
        return true;
    }

    if category.contains("store") || category.contains("shop") {
        let name = place.name.to_lowercase();
        return !UTILITY_RETAIL_NAMES.iter().any(|n| name.contains(n));
    }

    category.contains("point_of_interest") && tags.len() > 1
}

/// Drops uninteresting places, preserving input order.
pub fn filter_interesting(places: &[Place]) -> Vec<Place> {
    let kept: Vec<Place> = places.iter().filter(|p| is_interesting(p)).cloned().collect();

    tracing::debug!(
        input = places.len(),
        kept = kept.len(),
        dropped = places.len() - kept.len(),
        "Filtered places"
    );

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, category: &str) -> Place {
        Place::new(name.to_lowercase().replace(' ', "-"), name, category)
    }

    #[test]
    fn test_blocked_categories_are_dropped() {
        assert!(!is_interesting(&place("Esso", "gas_station, point_of_interest, establishment")));
        assert!(!is_interesting(&place("TD", "bank, finance, point_of_interest")));
        assert!(!is_interesting(&place("Impark", "parking, point_of_interest")));
        assert!(!is_interesting(&place("Smile Dental", "dentist, health")));
        // blocked wins over allowed
        assert!(!is_interesting(&place("Hospital Cafe", "cafe, hospital")));
    }

    #[test]
    fn test_administrative_and_generic_are_dropped() {
        assert!(!is_interesting(&place("Hamilton", "locality, political")));
        assert!(!is_interesting(&place("Westdale", "neighborhood, political")));
        assert!(!is_interesting(&place("Motel", "lodging")));
        assert!(!is_interesting(&place("Hotel", "lodging, point_of_interest, establishment")));
        assert!(!is_interesting(&place("Thing", "establishment")));
        assert!(!is_interesting(&place("Nothing", "")));
    }

    #[test]
    fn test_allowed_categories_are_kept() {
        assert!(is_interesting(&place("Mulberry", "cafe, food, point_of_interest, establishment")));
        assert!(is_interesting(&place("AGH", "art_gallery, museum")));
        assert!(is_interesting(&place("Bayfront", "park, point_of_interest")));
        assert!(is_interesting(&place("Goodlife", "gym, health")));
    }

    #[test]
    fn test_stores_without_utility_names_are_kept() {
        assert!(is_interesting(&place("Vintage Finds", "home_goods_store, point_of_interest")));
        assert!(!is_interesting(&place("Kal Tire", "store, point_of_interest")));
        assert!(!is_interesting(&place("Westdale Hardware", "hardware_store, store")));
        assert!(!is_interesting(&place("Canada Post Outlet", "store, point_of_interest")));
    }

    #[test]
    fn test_point_of_interest_needs_secondary_tag() {
        assert!(is_interesting(&place("Waterfall", "point_of_interest, landmark")));
        assert!(!is_interesting(&place("Bare", "point_of_interest")));
    }

    #[test]
    fn test_unknown_categories_are_dropped() {
        assert!(!is_interesting(&place("Mystery", "church")));
    }

    #[test]
    fn test_filter_preserves_order_and_is_idempotent() {
        let places = vec![
            place("Mulberry", "cafe, food"),
            place("Esso", "gas_station"),
            place("Bayfront", "park"),
            place("Hamilton", "locality, political"),
            place("Arkells Bar", "bar, night_club"),
        ];

        let once = filter_interesting(&places);
        let names: Vec<&str> = once.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mulberry", "Bayfront", "Arkells Bar"]);

        let twice = filter_interesting(&once);
        assert_eq!(once, twice);
    }
}
