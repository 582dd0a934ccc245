use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use sidequest_api::{
    error::{AppError, AppResult},
    models::{Event, Location, Place},
    routes::{create_router, AppState},
    services::{
        providers::{EventProvider, EventSearchQuery, NearbyPlacesQuery, PlaceProvider},
        QuestGenerator,
    },
};

const HAMILTON: Location = Location {
    lat: 43.2557,
    lng: -79.8711,
};

/// Serves a fixed list of places, or fails every call
struct StubPlaces {
    places: Vec<Place>,
    fail: bool,
}

#[async_trait::async_trait]
impl PlaceProvider for StubPlaces {
    async fn nearby_places(&self, _query: &NearbyPlacesQuery) -> AppResult<Vec<Place>> {
        if self.fail {
            return Err(AppError::ExternalApi("places unavailable".to_string()));
        }
        Ok(self.places.clone())
    }

    async fn place_details(&self, place_id: &str) -> AppResult<Option<Value>> {
        Ok(self
            .places
            .iter()
            .find(|p| p.place_id == place_id)
            .map(|p| json!({ "name": p.name })))
    }

    fn name(&self) -> &'static str {
        "stub_places"
    }
}

struct StubEvents {
    events: Vec<Event>,
    fail: bool,
}

#[async_trait::async_trait]
impl EventProvider for StubEvents {
    async fn nearby_events(&self, _query: &EventSearchQuery) -> AppResult<Vec<Event>> {
        if self.fail {
            return Err(AppError::ExternalApi("events unavailable".to_string()));
        }
        Ok(self.events.clone())
    }

    fn name(&self) -> &'static str {
        "stub_events"
    }
}

fn server_with(places: StubPlaces, events: StubEvents) -> TestServer {
    let state = AppState::with_memory_store(
        Arc::new(places),
        Arc::new(events),
        QuestGenerator::default(),
    );
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

fn create_test_server() -> TestServer {
    server_with(
        StubPlaces {
            places: Vec::new(),
            fail: false,
        },
        StubEvents {
            events: Vec::new(),
            fail: false,
        },
    )
}

fn downtown_places() -> Vec<Place> {
    vec![
        Place::new("cafe-1", "Mulberry Coffeehouse", "cafe, food, establishment")
            .with_price_level(1)
            .with_location(HAMILTON),
        Place::new("park-1", "Gore Park", "park, point_of_interest, establishment")
            .with_location(HAMILTON),
    ]
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-abc-123"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-abc-123");

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert_eq!(generated.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_generate_without_data_returns_fallback() {
    let server = create_test_server();

    let response = server
        .post("/api/quests/generate")
        .json(&json!({
            "location": { "lat": 43.2557, "lng": -79.8711 },
            "radius_km": 25.0
        }))
        .await;

    response.assert_status_ok();
    let quests: Vec<Value> = response.json();
    assert_eq!(quests.len(), 3);
    for quest in &quests {
        let steps = quest["steps"].as_array().unwrap();
        assert!(!steps.is_empty());
        assert_eq!(steps[0]["order"], 1);
        assert!(steps[0]["location"]["lat"].is_f64());
    }
}

#[tokio::test]
async fn test_generate_with_failing_providers_returns_fallback() {
    let server = server_with(
        StubPlaces {
            places: downtown_places(),
            fail: true,
        },
        StubEvents {
            events: Vec::new(),
            fail: true,
        },
    );

    let response = server
        .post("/api/quests/generate")
        .json(&json!({ "location": { "lat": 43.2557, "lng": -79.8711 } }))
        .await;

    response.assert_status_ok();
    let quests: Vec<Value> = response.json();
    assert_eq!(quests.len(), 3);
}

#[tokio::test]
async fn test_generate_builds_coffee_walk_from_places() {
    let server = server_with(
        StubPlaces {
            places: downtown_places(),
            fail: false,
        },
        StubEvents {
            events: Vec::new(),
            fail: false,
        },
    );

    let response = server
        .post("/api/quests/generate")
        .json(&json!({
            "location": { "lat": 43.2557, "lng": -79.8711 },
            "radius_km": 5.0,
            "preferences": { "budget": "broke", "mood": "chill" }
        }))
        .await;

    response.assert_status_ok();
    let quests: Vec<Value> = response.json();
    let walk = quests
        .iter()
        .find(|q| q["title"] == "Coffee & Nature Walk")
        .expect("coffee walk quest");

    assert_eq!(walk["estimated_cost"], 5.0);
    assert_eq!(walk["estimated_time"], 60);
    assert_eq!(walk["distance"], 0.0);
    assert_eq!(walk["steps"][0]["type"], "place");
    assert_eq!(walk["steps"][0]["item_id"], "cafe-1");
    assert_eq!(walk["steps"][1]["item_id"], "park-1");
}

#[tokio::test]
async fn test_generate_rejects_bad_radius() {
    let server = create_test_server();

    let response = server
        .post("/api/quests/generate")
        .json(&json!({
            "location": { "lat": 43.2557, "lng": -79.8711 },
            "radius_km": -3.0
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("radius_km"));
}

#[tokio::test]
async fn test_nearby_places_and_details() {
    let server = server_with(
        StubPlaces {
            places: downtown_places(),
            fail: false,
        },
        StubEvents {
            events: Vec::new(),
            fail: false,
        },
    );

    let response = server
        .post("/api/places/nearby")
        .json(&json!({ "location": { "lat": 43.2557, "lng": -79.8711 }, "radius_km": 2.0 }))
        .await;
    response.assert_status_ok();
    let places: Vec<Value> = response.json();
    assert_eq!(places.len(), 2);

    let response = server.get("/api/places/park-1").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "name": "Gore Park" }));

    let response = server.get("/api/places/nowhere").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nearby_places_provider_failure_is_bad_gateway() {
    let server = server_with(
        StubPlaces {
            places: Vec::new(),
            fail: true,
        },
        StubEvents {
            events: Vec::new(),
            fail: false,
        },
    );

    let response = server
        .post("/api/places/nearby")
        .json(&json!({ "location": { "lat": 43.2557, "lng": -79.8711 } }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_nearby_events() {
    let server = server_with(
        StubPlaces {
            places: Vec::new(),
            fail: false,
        },
        StubEvents {
            events: vec![Event::new("tm-1", "Arkells", "Music").with_location(HAMILTON)],
            fail: false,
        },
    );

    let response = server
        .post("/api/events/nearby")
        .json(&json!({ "location": { "lat": 43.2557, "lng": -79.8711 } }))
        .await;
    response.assert_status_ok();
    let events: Vec<Value> = response.json();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_id"], "tm-1");
}

#[tokio::test]
async fn test_favorites_lifecycle() {
    let server = create_test_server();

    let response = server
        .post("/api/favorites")
        .json(&json!({
            "user_id": "u1",
            "item_id": "park-1",
            "item_type": "place",
            "notes": "picnic spot"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["favorite_id"], "park-1");

    let response = server.get("/api/favorites/u1").await;
    response.assert_status_ok();
    let favorites: Vec<Value> = response.json();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["notes"], "picnic spot");

    server
        .delete("/api/favorites/u1/park-1")
        .await
        .assert_status_ok();
    server
        .delete("/api/favorites/u1/park-1")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let favorites: Vec<Value> = server.get("/api/favorites/u1").await.json();
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn test_friend_requests_are_auto_accepted_once() {
    let server = create_test_server();

    for _ in 0..2 {
        let response = server
            .post("/api/friends/request")
            .json(&json!({ "sender_id": "u1", "receiver_email": "Sam@Example.com" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let request: Value = response.json();
        assert_eq!(request["status"], "accepted");
    }

    let friends: Vec<Value> = server.get("/api/friends/u1").await.json();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["friend_email"], "sam@example.com");
    assert_eq!(friends[0]["friend_name"], "sam");

    let friends: Vec<Value> = server.get("/api/friends/u2").await.json();
    assert!(friends.is_empty());

    let sent: Vec<Value> = server.get("/api/friends/requests/u1").await.json();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0]["receiver_email"], "sam@example.com");

    let sent: Vec<Value> = server.get("/api/friends/requests/u2").await.json();
    assert!(sent.is_empty());
}

#[tokio::test]
async fn test_friend_request_rejects_bad_email() {
    let server = create_test_server();

    let response = server
        .post("/api/friends/request")
        .json(&json!({ "sender_id": "u1", "receiver_email": "not-an-email" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_conversation_in_both_directions() {
    let server = create_test_server();

    for (from, to, content) in [("a", "b", "coffee?"), ("c", "a", "spam"), ("b", "a", "yes")] {
        server
            .post("/api/messages/send")
            .json(&json!({ "sender_id": from, "receiver_id": to, "content": content }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let messages: Vec<Value> = server.get("/api/messages/b/a").await.json();
    let contents: Vec<&str> = messages
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["coffee?", "yes"]);

    server
        .post("/api/messages/send")
        .json(&json!({ "sender_id": "a", "receiver_id": "b", "content": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quest_invites() {
    let server = create_test_server();

    let response = server
        .post("/api/quests/invite")
        .json(&json!({ "quest_id": "q-1", "sender_id": "a", "receiver_id": "b" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let invite: Value = response.json();
    assert_eq!(invite["status"], "pending");
    assert!(invite["invite_id"].is_string());

    let invites: Vec<Value> = server.get("/api/quests/invites/b").await.json();
    assert_eq!(invites.len(), 1);
    assert_eq!(invites[0]["quest_id"], "q-1");

    let invites: Vec<Value> = server.get("/api/quests/invites/a").await.json();
    assert!(invites.is_empty());
}

#[tokio::test]
async fn test_complete_quest_awards_xp() {
    let server = create_test_server();

    let response = server
        .post("/api/quests/complete")
        .json(&json!({ "user_id": "u1", "quest_id": "q-9", "rating": 5 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["xp_earned"], 100);
    assert_eq!(body["completion_id"], "u1_q-9");

    server
        .post("/api/quests/complete")
        .json(&json!({ "user_id": "u1", "quest_id": "q-9", "rating": 9 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
