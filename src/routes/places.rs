use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{Location, Place},
    routes::AppState,
    services::{
        providers::NearbyPlacesQuery,
        quest_search::{validate_location, validate_radius},
    },
};

#[derive(Debug, Deserialize)]
pub struct NearbyPlacesRequest {
    pub location: Location,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default)]
    pub place_type: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

fn default_radius_km() -> f64 {
    5.0
}

/// Raw nearby places, unfiltered
pub async fn nearby(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NearbyPlacesRequest>,
) -> AppResult<Json<Vec<Place>>> {
    validate_location(&request.location)?;
    validate_radius(request.radius_km)?;

    let mut query = NearbyPlacesQuery::new(request.location, request.radius_km);
    query.place_type = request.place_type.filter(|t| !t.trim().is_empty());
    query.keyword = request.keyword.filter(|k| !k.trim().is_empty());

    let places = state.places.nearby_places(&query).await?;
    Ok(Json(places))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> AppResult<Json<Value>> {
    state
        .places
        .place_details(&place_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Place {} not found", place_id)))
}
