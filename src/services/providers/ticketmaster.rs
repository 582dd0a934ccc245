/// Ticketmaster Discovery API provider
use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ApiEventSearchResponse, Event, Location},
    services::providers::{distance_from, EventProvider, EventSearchQuery},
};

const EVENTS_CACHE_TTL: u64 = 900; // 15 minutes
const MAX_PAGE_SIZE: u32 = 200;

#[derive(Clone)]
pub struct TicketmasterProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    cache: Option<Cache>,
}

impl TicketmasterProvider {
    pub fn new(api_key: Option<String>, api_url: String, cache: Option<Cache>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    async fn fetch_events(&self, query: &EventSearchQuery) -> AppResult<Vec<Event>> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::ExternalApi("TICKETMASTER_API_KEY is not configured".to_string())
            })?;

        let url = format!("{}/events.json", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&search_params(query, api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Ticketmaster returned status {}: {}",
                status, body
            )));
        }

        let body: ApiEventSearchResponse = response.json().await?;
        let events = events_from_response(body, &query.location);

        tracing::info!(
            lat = query.location.lat,
            lng = query.location.lng,
            radius_km = query.radius_km,
            results = events.len(),
            provider = "ticketmaster",
            "Nearby event search completed"
        );

        Ok(events)
    }
}

#[async_trait::async_trait]
impl EventProvider for TicketmasterProvider {
    async fn nearby_events(&self, query: &EventSearchQuery) -> AppResult<Vec<Event>> {
        let Some(cache) = &self.cache else {
            return self.fetch_events(query).await;
        };

        let key = CacheKey::NearbyEvents(query.fingerprint());
        cached!(cache, key, EVENTS_CACHE_TTL, self.fetch_events(query))
    }

    fn name(&self) -> &'static str {
        "ticketmaster"
    }
}

fn search_params(query: &EventSearchQuery, api_key: &str) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("apikey", api_key.to_string()),
        (
            "latlong",
            format!("{},{}", query.location.lat, query.location.lng),
        ),
        ("radius", query.radius_km.to_string()),
        ("unit", "km".to_string()),
        ("size", query.size.min(MAX_PAGE_SIZE).to_string()),
        ("sort", "date,asc".to_string()),
    ];
    if let Some(start) = &query.start_date {
        params.push(("startDateTime", start.clone()));
    }
    if let Some(end) = &query.end_date {
        params.push(("endDateTime", end.clone()));
    }
    params
}

fn events_from_response(response: ApiEventSearchResponse, centre: &Location) -> Vec<Event> {
    response
        .embedded
        .map(|embedded| embedded.events)
        .unwrap_or_default()
        .into_iter()
        .map(|api_event| {
            let mut event = Event::from(api_event);
            event.distance = distance_from(centre, event.location.as_ref());
            event
        })
        .collect()
}
