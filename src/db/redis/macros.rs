/// Read-through caching for provider lookups.
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues
/// the result for a background write with the given TTL, and returns it. A
/// failed cache read is logged and treated as a miss, so Redis being down
/// only costs an extra upstream call.
///
/// Expands to an `AppResult<_>`; use it as the tail expression of an async
/// fn returning `AppResult<_>` so the error type is inferred.
///
/// # Example
/// ```rust,ignore
/// async fn nearby_places(&self, query: &NearbyPlacesQuery) -> AppResult<Vec<Place>> {
///     cached!(cache, key, PLACES_CACHE_TTL, self.fetch_nearby(query))
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let hit = match $cache.get_from_cache(&$key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key = %$key, "Cache read failed, fetching fresh");
                None
            }
        };

        match hit {
            Some(cached) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(cached)
            }
            None => {
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
