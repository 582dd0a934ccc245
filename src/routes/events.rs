use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{Event, Location},
    routes::AppState,
    services::{
        providers::EventSearchQuery,
        quest_search::{validate_location, validate_radius},
    },
};

#[derive(Debug, Deserialize)]
pub struct NearbyEventsRequest {
    pub location: Location,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub size: Option<u32>,
}

fn default_radius_km() -> f64 {
    25.0
}

pub async fn nearby(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NearbyEventsRequest>,
) -> AppResult<Json<Vec<Event>>> {
    validate_location(&request.location)?;
    validate_radius(request.radius_km)?;

    let mut query = EventSearchQuery::new(request.location, request.radius_km);
    query.start_date = request.start_date;
    query.end_date = request.end_date;
    if let Some(size) = request.size {
        query.size = size;
    }

    let events = state.events.nearby_events(&query).await?;
    Ok(Json(events))
}
