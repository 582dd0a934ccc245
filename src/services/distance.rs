use crate::models::{Location, Quest};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points in kilometers.
pub fn haversine_km(from: &Location, to: &Location) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Clamp guards against a > 1.0 from rounding at antipodes
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Distance from the user to the quest's first stop.
///
/// Only the first step is considered, not the full route. Returns
/// `f64::INFINITY` when the user location is unknown, the quest has no
/// steps, or the first step has no coordinates.
pub fn quest_distance(quest: &Quest, user_location: Option<&Location>) -> f64 {
    match (user_location, quest.start_location()) {
        (Some(user), Some(start)) => haversine_km(user, start),
        _ => f64::INFINITY,
    }
}
