use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    db::{FavoriteRepository, FriendRepository, InMemoryStore, InviteRepository, MessageRepository},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        providers::{EventProvider, PlaceProvider},
        QuestGenerator, QuestSearch,
    },
};

pub mod events;
pub mod favorites;
pub mod friends;
pub mod places;
pub mod quests;

/// Everything the handlers need, injected once at startup
#[derive(Clone)]
pub struct AppState {
    pub places: Arc<dyn PlaceProvider>,
    pub events: Arc<dyn EventProvider>,
    pub quest_search: QuestSearch,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub friends: Arc<dyn FriendRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub invites: Arc<dyn InviteRepository>,
}

impl AppState {
    /// Wires the providers to a fresh in-memory store for the social features
    pub fn with_memory_store(
        places: Arc<dyn PlaceProvider>,
        events: Arc<dyn EventProvider>,
        generator: QuestGenerator,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let quest_search = QuestSearch::new(places.clone(), events.clone(), Arc::new(generator));

        Self {
            places,
            events,
            quest_search,
            favorites: store.clone(),
            friends: store.clone(),
            messages: store.clone(),
            invites: store,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Lookups
        .route("/places/nearby", post(places::nearby))
        .route("/places/:place_id", get(places::details))
        .route("/events/nearby", post(events::nearby))
        // Quests
        .route("/quests/generate", post(quests::generate))
        .route("/quests/complete", post(quests::complete))
        .route("/quests/invite", post(quests::invite))
        .route("/quests/invites/:user_id", get(quests::list_invites))
        // Favorites
        .route("/favorites", post(favorites::add))
        .route("/favorites/:user_id", get(favorites::list))
        .route("/favorites/:user_id/:item_id", delete(favorites::remove))
        // Friends & messages
        .route("/friends/request", post(friends::send_request))
        .route("/friends/requests/:user_id", get(friends::sent_requests))
        .route("/friends/:user_id", get(friends::list))
        .route("/messages/send", post(friends::send_message))
        .route("/messages/:user_id/:friend_id", get(friends::conversation))
}

async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Trims a required text field, rejecting blanks
pub(crate) fn required(value: &str, field: &str) -> crate::error::AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::AppError::InvalidInput(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}
