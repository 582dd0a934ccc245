use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Location, Quest, UserPreferences},
    services::{
        providers::{EventProvider, EventSearchQuery, NearbyPlacesQuery, PlaceProvider},
        quest_generator::QuestGenerator,
    },
};

/// Fetches places and events around a location and turns them into quests
///
/// A failing provider counts as "nothing found" for that source, so a dead
/// event API still yields place quests, and two dead APIs yield the fallback set.
#[derive(Clone)]
pub struct QuestSearch {
    places: Arc<dyn PlaceProvider>,
    events: Arc<dyn EventProvider>,
    generator: Arc<QuestGenerator>,
}

impl QuestSearch {
    pub fn new(
        places: Arc<dyn PlaceProvider>,
        events: Arc<dyn EventProvider>,
        generator: Arc<QuestGenerator>,
    ) -> Self {
        Self {
            places,
            events,
            generator,
        }
    }

    pub async fn generate(
        &self,
        location: Location,
        radius_km: f64,
        prefs: UserPreferences,
    ) -> AppResult<Vec<Quest>> {
        validate_location(&location)?;
        validate_radius(radius_km)?;

        let prefs = prefs.with_radius_km(radius_km);
        let place_query = NearbyPlacesQuery::new(location, radius_km);
        let event_query = EventSearchQuery::new(location, radius_km);

        let (places, events) = tokio::join!(
            self.places.nearby_places(&place_query),
            self.events.nearby_events(&event_query),
        );

        let places = places.unwrap_or_else(|e| {
            tracing::warn!(error = %e, provider = self.places.name(), "Place lookup failed");
            Vec::new()
        });
        let events = events.unwrap_or_else(|e| {
            tracing::warn!(error = %e, provider = self.events.name(), "Event lookup failed");
            Vec::new()
        });

        tracing::info!(
            lat = location.lat,
            lng = location.lng,
            radius_km,
            places = places.len(),
            events = events.len(),
            policy = ?self.generator.policy(),
            "Generating quests"
        );

        let quests = self
            .generator
            .generate(&places, &events, Some(&location), &prefs);

        tracing::info!(quests = quests.len(), "Quest generation finished");
        Ok(quests)
    }
}

pub fn validate_location(location: &Location) -> AppResult<()> {
    let valid = location.lat.is_finite()
        && location.lng.is_finite()
        && (-90.0..=90.0).contains(&location.lat)
        && (-180.0..=180.0).contains(&location.lng);

    if !valid {
        return Err(AppError::InvalidInput(format!(
            "Invalid location: {}, {}",
            location.lat, location.lng
        )));
    }
    Ok(())
}

pub fn validate_radius(radius_km: f64) -> AppResult<()> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(AppError::InvalidInput(format!(
            "radius_km must be positive, got {}",
            radius_km
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetTier, Event, Place};
    use crate::services::providers::{MockEventProvider, MockPlaceProvider};
    use tokio_test::{assert_err, assert_ok};

    const HAMILTON: Location = Location {
        lat: 43.2557,
        lng: -79.8711,
    };

    fn places_returning(result: AppResult<Vec<Place>>) -> MockPlaceProvider {
        let mut mock = MockPlaceProvider::new();
        mock.expect_name().return_const("mock_places");
        let mut result = Some(result);
        mock.expect_nearby_places()
            .times(1)
            .returning(move |_| result.take().unwrap_or_else(|| Ok(Vec::new())));
        mock
    }

    fn events_returning(result: AppResult<Vec<Event>>) -> MockEventProvider {
        let mut mock = MockEventProvider::new();
        mock.expect_name().return_const("mock_events");
        let mut result = Some(result);
        mock.expect_nearby_events()
            .times(1)
            .returning(move |_| result.take().unwrap_or_else(|| Ok(Vec::new())));
        mock
    }

    fn search(places: MockPlaceProvider, events: MockEventProvider) -> QuestSearch {
        QuestSearch::new(
            Arc::new(places),
            Arc::new(events),
            Arc::new(QuestGenerator::default()),
        )
    }

    #[tokio::test]
    async fn test_both_providers_failing_yields_fallback() {
        let search = search(
            places_returning(Err(AppError::ExternalApi("down".to_string()))),
            events_returning(Err(AppError::ExternalApi("down".to_string()))),
        );

        let quests = assert_ok!(search.generate(HAMILTON, 25.0, UserPreferences::new()).await);
        assert_eq!(quests.len(), 3);
    }

    #[tokio::test]
    async fn test_event_failure_keeps_place_quests() {
        let cafe = Place::new("c1", "Mulberry", "cafe, food")
            .with_price_level(1)
            .with_location(HAMILTON);
        let park = Place::new("p1", "Gore Park", "park, point_of_interest")
            .with_location(HAMILTON);

        let search = search(
            places_returning(Ok(vec![cafe, park])),
            events_returning(Err(AppError::ExternalApi("down".to_string()))),
        );

        let quests = assert_ok!(search.generate(HAMILTON, 5.0, UserPreferences::new()).await);
        assert!(!quests.is_empty());
        assert!(quests.iter().all(|q| q.distance == Some(0.0)));
        assert!(quests.iter().any(|q| q.title.contains("Coffee")));
    }

    #[tokio::test]
    async fn test_radius_is_forwarded_to_providers() {
        let mut places = MockPlaceProvider::new();
        places.expect_name().return_const("mock_places");
        places
            .expect_nearby_places()
            .withf(|q| q.radius_m == 12_000.0 && q.location == HAMILTON)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let mut events = MockEventProvider::new();
        events.expect_name().return_const("mock_events");
        events
            .expect_nearby_events()
            .withf(|q| q.radius_km == 12)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let prefs = UserPreferences::new().with_budget(BudgetTier::Broke);
        assert_ok!(search(places, events).generate(HAMILTON, 12.0, prefs).await);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_lookup() {
        let mut places = MockPlaceProvider::new();
        places.expect_nearby_places().never();
        let mut events = MockEventProvider::new();
        events.expect_nearby_events().never();
        let search = search(places, events);

        assert_err!(search.generate(HAMILTON, 0.0, UserPreferences::new()).await);
        assert_err!(search.generate(HAMILTON, f64::NAN, UserPreferences::new()).await);
        assert_err!(
            search
                .generate(Location::new(91.0, 0.0), 5.0, UserPreferences::new())
                .await
        );
    }
}
