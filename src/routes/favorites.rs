use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::Favorite,
    routes::{required, AppState},
};

pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(mut favorite): Json<Favorite>,
) -> AppResult<(StatusCode, Json<Value>)> {
    favorite.user_id = required(&favorite.user_id, "user_id")?;
    favorite.item_id = required(&favorite.item_id, "item_id")?;

    let saved = state.favorites.save(favorite).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Favorite added",
            "favorite_id": saved.item_id
        })),
    ))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Favorite>>> {
    let favorites = state.favorites.list_for_user(&user_id).await?;
    Ok(Json(favorites))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    if !state.favorites.remove(&user_id, &item_id).await? {
        return Err(AppError::NotFound(format!(
            "Favorite {} not found for user {}",
            item_id, user_id
        )));
    }

    Ok(Json(json!({ "message": "Favorite removed" })))
}
