use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A venue returned by the place lookup provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    /// Raw category tags joined with ", " (e.g. "cafe, food, establishment")
    pub category: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Ordinal cost indicator, 0 (free) to 4 (very expensive)
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub photo_reference: Option<String>,
    /// Kilometers from the search centre
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Place {
    /// Creates a place with only the required fields set
    pub fn new(
        place_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            category: category.into(),
            address: None,
            rating: None,
            price_level: None,
            photo_reference: None,
            distance: None,
            location: None,
        }
    }

    pub fn with_price_level(mut self, price_level: u8) -> Self {
        self.price_level = Some(price_level);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Case-insensitive substring test against the joined category string
    pub fn has_category(&self, needle: &str) -> bool {
        self.category.to_lowercase().contains(needle)
    }

    /// Individual category tags, lowercased and trimmed
    pub fn category_tags(&self) -> Vec<String> {
        self.category
            .split(',')
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// Ticket price range for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: String,
}

/// A scheduled event returned by the event lookup provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Wall-clock start time at the venue
    #[serde(default)]
    pub local_start_time: Option<NaiveTime>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Event {
    pub fn new(
        event_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            name: name.into(),
            category: category.into(),
            venue: None,
            start_time: None,
            local_start_time: None,
            price_range: None,
            url: None,
            distance: None,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_local_start_time(mut self, local_start_time: NaiveTime) -> Self {
        self.local_start_time = Some(local_start_time);
        self
    }

    /// Start hour at the venue, falling back to the UTC hour
    pub fn start_hour(&self) -> Option<u32> {
        self.local_start_time
            .map(|t| t.hour())
            .or_else(|| self.start_time.map(|t| t.hour()))
    }
}
