use chrono::{DateTime, NaiveTime, Utc};
use serde::Deserialize;

pub mod place;
pub mod quest;
pub mod social;
pub mod user_preferences;

pub use place::{Event, Location, Place, PriceRange};
pub use quest::{BestTime, Difficulty, Quest, QuestStep, StepType};
pub use social::{
    Favorite, FavoriteItemType, Friend, FriendRequest, Message, QuestCompletion, QuestInvite,
    RequestStatus,
};
pub use user_preferences::{BudgetTier, UserPreferences};

// ============================================================================
// Google Places API Types
// ============================================================================

/// Raw response from GET /nearbysearch/json
#[derive(Debug, Clone, Deserialize)]
pub struct ApiNearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<ApiPlaceResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlaceResult {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub photos: Vec<ApiPhoto>,
    #[serde(default)]
    pub geometry: Option<ApiGeometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPhoto {
    #[serde(default)]
    pub photo_reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGeometry {
    #[serde(default)]
    pub location: Option<ApiLatLng>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<ApiPlaceResult> for Place {
    fn from(result: ApiPlaceResult) -> Self {
        let photo_reference = result
            .photos
            .into_iter()
            .find_map(|photo| photo.photo_reference);

        let location = result
            .geometry
            .and_then(|g| g.location)
            .map(|l| Location::new(l.lat, l.lng));

        Place {
            place_id: result.place_id,
            name: result.name,
            category: result.types.join(", "),
            address: result.vicinity,
            rating: result.rating,
            price_level: result.price_level,
            photo_reference,
            distance: None,
            location,
        }
    }
}

/// Raw response from GET /details/json
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlaceDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

// ============================================================================
// Ticketmaster Discovery API Types
// ============================================================================

/// Raw response from GET /events.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEventSearchResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<ApiEmbeddedEvents>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEmbeddedEvents {
    #[serde(default)]
    pub events: Vec<ApiEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dates: Option<ApiDates>,
    #[serde(default)]
    pub price_ranges: Vec<ApiPriceRange>,
    #[serde(default)]
    pub classifications: Vec<ApiClassification>,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<ApiEventEmbedded>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDates {
    #[serde(default)]
    pub start: Option<ApiStart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStart {
    #[serde(default)]
    pub date_time: Option<String>,
    /// Venue-local time as `HH:MM:SS`
    #[serde(default)]
    pub local_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPriceRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiClassification {
    #[serde(default)]
    pub segment: Option<ApiNamed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiNamed {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEventEmbedded {
    #[serde(default)]
    pub venues: Vec<ApiVenue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiVenue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<ApiVenueLocation>,
}

/// Ticketmaster sends venue coordinates as strings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiVenueLocation {
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

impl ApiVenueLocation {
    fn parse(&self) -> Option<Location> {
        let lat = self.latitude.as_deref()?.trim().parse::<f64>().ok()?;
        let lng = self.longitude.as_deref()?.trim().parse::<f64>().ok()?;
        Some(Location::new(lat, lng))
    }
}

impl From<ApiEvent> for Event {
    fn from(event: ApiEvent) -> Self {
        let venue = event
            .embedded
            .and_then(|e| e.venues.into_iter().next());

        let location = venue
            .as_ref()
            .and_then(|v| v.location.as_ref())
            .and_then(ApiVenueLocation::parse);

        let start = event.dates.and_then(|d| d.start);

        let start_time = start
            .as_ref()
            .and_then(|s| s.date_time.as_deref())
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let local_start_time = start
            .as_ref()
            .and_then(|s| s.local_time.as_deref())
            .and_then(|raw| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S").ok());

        let price_range = event.price_ranges.into_iter().next().map(|p| PriceRange {
            min: p.min,
            max: p.max,
            currency: p.currency.unwrap_or_else(|| "CAD".to_string()),
        });

        let category = event
            .classifications
            .into_iter()
            .next()
            .and_then(|c| c.segment)
            .map(|s| s.name)
            .unwrap_or_else(|| "Event".to_string());

        Event {
            event_id: event.id,
            name: event.name,
            category,
            venue: venue.and_then(|v| v.name),
            start_time,
            local_start_time,
            price_range,
            url: event.url,
            distance: None,
            location,
        }
    }
}
