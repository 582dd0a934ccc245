/// Google Places (legacy web service) provider
use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ApiNearbySearchResponse, ApiPlaceDetailsResponse, Location, Place},
    services::providers::{distance_from, NearbyPlacesQuery, PlaceProvider},
};

const PLACES_CACHE_TTL: u64 = 1800; // 30 minutes
const MAX_RADIUS_M: f64 = 50_000.0;
const DETAIL_FIELDS: &str =
    "name,rating,formatted_phone_number,opening_hours,website,price_level,photos";

#[derive(Clone)]
pub struct GooglePlacesProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    cache: Option<Cache>,
}

impl GooglePlacesProvider {
    pub fn new(api_key: Option<String>, api_url: String, cache: Option<Cache>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::ExternalApi("GOOGLE_MAPS_API_KEY is not configured".to_string())
            })
    }

    async fn fetch_nearby(&self, query: &NearbyPlacesQuery) -> AppResult<Vec<Place>> {
        let api_key = self.api_key()?;
        let url = format!("{}/nearbysearch/json", self.api_url);

        let mut params = vec![
            (
                "location",
                format!("{},{}", query.location.lat, query.location.lng),
            ),
            ("radius", clamp_radius(query.radius_m).to_string()),
            ("key", api_key.to_string()),
        ];
        if let Some(place_type) = &query.place_type {
            params.push(("type", place_type.clone()));
        }
        if let Some(keyword) = &query.keyword {
            params.push(("keyword", keyword.clone()));
        }

        let response = self.http_client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Google Places returned status {}: {}",
                status, body
            )));
        }

        let body: ApiNearbySearchResponse = response.json().await?;
        let places = places_from_response(body, &query.location)?;

        tracing::info!(
            lat = query.location.lat,
            lng = query.location.lng,
            radius_m = clamp_radius(query.radius_m),
            results = places.len(),
            provider = "google_places",
            "Nearby place search completed"
        );

        Ok(places)
    }
}

#[async_trait::async_trait]
impl PlaceProvider for GooglePlacesProvider {
    async fn nearby_places(&self, query: &NearbyPlacesQuery) -> AppResult<Vec<Place>> {
        let Some(cache) = &self.cache else {
            return self.fetch_nearby(query).await;
        };

        let key = CacheKey::NearbyPlaces(query.fingerprint());
        cached!(cache, key, PLACES_CACHE_TTL, self.fetch_nearby(query))
    }

    async fn place_details(&self, place_id: &str) -> AppResult<Option<Value>> {
        if place_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Place id cannot be empty".to_string()));
        }

        let api_key = self.api_key()?;
        let url = format!("{}/details/json", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("key", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Google Places returned status {}: {}",
                status, body
            )));
        }

        let body: ApiPlaceDetailsResponse = response.json().await?;
        details_from_response(body)
    }

    fn name(&self) -> &'static str {
        "google_places"
    }
}

/// Google rejects radii above 50 km
fn clamp_radius(radius_m: f64) -> f64 {
    radius_m.clamp(0.0, MAX_RADIUS_M)
}

fn places_from_response(
    response: ApiNearbySearchResponse,
    centre: &Location,
) -> AppResult<Vec<Place>> {
    match response.status.as_str() {
        "OK" => Ok(response
            .results
            .into_iter()
            .map(|result| {
                let mut place = Place::from(result);
                place.distance = distance_from(centre, place.location.as_ref());
                place
            })
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => Err(AppError::ExternalApi(format!(
            "Google Places status {}: {}",
            status,
            response.error_message.as_deref().unwrap_or("unknown error")
        ))),
    }
}

fn details_from_response(response: ApiPlaceDetailsResponse) -> AppResult<Option<Value>> {
    match response.status.as_str() {
        "OK" => Ok(response.result),
        "NOT_FOUND" | "ZERO_RESULTS" | "INVALID_REQUEST" => Ok(None),
        status => Err(AppError::ExternalApi(format!(
            "Google Places details status {}",
            status
        ))),
    }
}
