//! Place and event lookup providers
//!
//! Route handlers and the quest search only depend on these traits, so the
//! Google and Ticketmaster clients can be swapped for stubs in tests.
use serde_json::Value;

use crate::{
    error::AppResult,
    models::{Event, Location, Place},
    services::distance::haversine_km,
};

pub mod google_places;
pub mod ticketmaster;

pub use google_places::GooglePlacesProvider;
pub use ticketmaster::TicketmasterProvider;

/// Parameters for a nearby place search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPlacesQuery {
    pub location: Location,
    pub radius_m: f64,
    pub place_type: Option<String>,
    pub keyword: Option<String>,
}

impl NearbyPlacesQuery {
    pub fn new(location: Location, radius_km: f64) -> Self {
        Self {
            location,
            radius_m: radius_km * 1000.0,
            place_type: None,
            keyword: None,
        }
    }

    /// Stable cache fingerprint; coordinates are rounded to roughly 10 m
    pub fn fingerprint(&self) -> String {
        format!(
            "{:.4},{:.4}:{}:{}:{}",
            self.location.lat,
            self.location.lng,
            self.radius_m.round(),
            self.place_type.as_deref().unwrap_or_default(),
            self.keyword.as_deref().unwrap_or_default(),
        )
    }
}

/// Parameters for a nearby event search
#[derive(Debug, Clone, PartialEq)]
pub struct EventSearchQuery {
    pub location: Location,
    pub radius_km: u32,
    /// ISO-8601 lower bound on the event start, passed through as-is
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub size: u32,
}

impl EventSearchQuery {
    pub const DEFAULT_SIZE: u32 = 20;

    pub fn new(location: Location, radius_km: f64) -> Self {
        Self {
            location,
            radius_km: radius_km.max(0.0).round() as u32,
            start_date: None,
            end_date: None,
            size: Self::DEFAULT_SIZE,
        }
    }

    pub fn fingerprint(&self) -> String {
        format!(
            "{:.4},{:.4}:{}:{}:{}:{}",
            self.location.lat,
            self.location.lng,
            self.radius_km,
            self.start_date.as_deref().unwrap_or_default(),
            self.end_date.as_deref().unwrap_or_default(),
            self.size,
        )
    }
}

/// Source of nearby places
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Places around the query location, each with `distance` from that location
    async fn nearby_places(&self, query: &NearbyPlacesQuery) -> AppResult<Vec<Place>>;

    /// Raw details for one place; `None` when the provider does not know it
    async fn place_details(&self, place_id: &str) -> AppResult<Option<Value>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Source of nearby events
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EventProvider: Send + Sync {
    /// Events around the query location, soonest first
    async fn nearby_events(&self, query: &EventSearchQuery) -> AppResult<Vec<Event>>;

    fn name(&self) -> &'static str;
}

/// Distance in km from the search centre, when the item has a location
pub(crate) fn distance_from(centre: &Location, location: Option<&Location>) -> Option<f64> {
    location.map(|loc| haversine_km(centre, loc))
}
