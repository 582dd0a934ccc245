use serde::Deserialize;

use crate::services::quest_generator::RankingPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Google Places API key; place lookups fail per call when unset
    #[serde(default)]
    pub google_maps_api_key: Option<String>,

    /// Google Places API base URL
    #[serde(default = "default_google_places_url")]
    pub google_places_url: String,

    /// Ticketmaster Discovery API key; event lookups fail per call when unset
    #[serde(default)]
    pub ticketmaster_api_key: Option<String>,

    /// Ticketmaster Discovery API base URL
    #[serde(default = "default_ticketmaster_url")]
    pub ticketmaster_url: String,

    /// Redis connection URL; provider caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Origin allowed by CORS
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    #[serde(default)]
    pub ranking_policy: RankingPolicy,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_google_places_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_ticketmaster_url() -> String {
    "https://app.ticketmaster.com/discovery/v2".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Origins accepted by CORS: the local dev server plus the configured frontend
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ];
        if !origins.contains(&self.frontend_url) {
            origins.push(self.frontend_url.clone());
        }
        origins
    }
}
