//! Geocoding providers.
//!
//! A [`LocationProvider`] turns a free-text query into ranked, already-normalized
//! [`Candidate`]s. The search box only ever talks to this trait, so the backing
//! service can be swapped without touching keyboard or rendering logic.

use crate::config::{Config, ProviderKind};
use crate::error::{ConfigError, ProviderError};
use crate::normalize;
use crate::types::Candidate;
use reqwest::{Client, Url};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub trait LocationProvider: Send + Sync + 'static {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Look up `query`, returning at most `limit` candidates in provider rank order.
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Candidate>, ProviderError>> + Send;
}

// ---------------------------------------------------------------------------
// Shared HTTP plumbing
// ---------------------------------------------------------------------------

/// Parse a provider base URL, normalizing it to end with `/` so relative joins
/// append instead of replacing the last path segment.
fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    let mut url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ConfigError> {
    Ok(Client::builder().user_agent(user_agent).timeout(timeout).build()?)
}

/// Send a GET and decode the body as JSON, treating non-2xx as an error.
async fn get_json(client: &Client, url: Url) -> Result<Value, ProviderError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

// ---------------------------------------------------------------------------
// Nominatim (OpenStreetMap)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NominatimProvider {
    client: Client,
    base: Url,
}

impl NominatimProvider {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            base: parse_endpoint(endpoint)?,
        })
    }

    fn search_url(&self, query: &str, limit: usize) -> Result<Url, ProviderError> {
        let mut url = self
            .base
            .join("search")
            .map_err(|_| ProviderError::UnexpectedShape("invalid search URL"))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("addressdetails", "1")
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

impl LocationProvider for NominatimProvider {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, ProviderError> {
        let url = self.search_url(query, limit)?;
        debug!(provider = self.name(), %url, "Location lookup");
        let body = get_json(&self.client, url).await?;
        normalize::nominatim_response(&body, limit)
    }
}

// ---------------------------------------------------------------------------
// Mapbox geocoding v5
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MapboxProvider {
    client: Client,
    base: Url,
    token: String,
}

impl MapboxProvider {
    pub fn new(
        endpoint: &str,
        token: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        if token.trim().is_empty() {
            return Err(ConfigError::MissingMapboxToken);
        }
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            base: parse_endpoint(endpoint)?,
            token: token.to_string(),
        })
    }

    fn search_url(&self, query: &str, limit: usize) -> Result<Url, ProviderError> {
        let mut url = self
            .base
            .join("geocoding/v5/mapbox.places/")
            .map_err(|_| ProviderError::UnexpectedShape("invalid geocoding URL"))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::UnexpectedShape("invalid geocoding URL"))?
            .pop_if_empty()
            .push(&format!("{query}.json"));
        url.query_pairs_mut()
            .append_pair("access_token", &self.token)
            .append_pair("autocomplete", "true")
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

impl LocationProvider for MapboxProvider {
    fn name(&self) -> &'static str {
        "mapbox"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, ProviderError> {
        let url = self.search_url(query, limit)?;
        // the URL carries the access token, so only the query is logged
        debug!(provider = self.name(), query, "Location lookup");
        let body = get_json(&self.client, url).await?;
        normalize::mapbox_response(&body, limit)
    }
}

// ---------------------------------------------------------------------------
// Config-selected provider
// ---------------------------------------------------------------------------

/// The provider chosen by [`Config::provider`].
#[derive(Debug, Clone)]
pub enum Provider {
    Nominatim(NominatimProvider),
    Mapbox(MapboxProvider),
}

impl Provider {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        if config.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        let endpoint = config.endpoint();
        match config.provider {
            ProviderKind::Nominatim => Ok(Self::Nominatim(NominatimProvider::new(
                endpoint,
                &config.user_agent,
                config.timeout(),
            )?)),
            ProviderKind::Mapbox => {
                let token = config
                    .mapbox_token
                    .as_deref()
                    .ok_or(ConfigError::MissingMapboxToken)?;
                Ok(Self::Mapbox(MapboxProvider::new(
                    endpoint,
                    token,
                    &config.user_agent,
                    config.timeout(),
                )?))
            }
        }
    }
}

impl LocationProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Self::Nominatim(p) => p.name(),
            Self::Mapbox(p) => p.name(),
        }
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, ProviderError> {
        match self {
            Self::Nominatim(p) => p.search(query, limit).await,
            Self::Mapbox(p) => p.search(query, limit).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominatim_url_carries_policy_params() {
        let p =
            NominatimProvider::new("https://nominatim.example.org", "ua", Duration::from_secs(1))
                .unwrap();
        let url = p.search_url("San Francisco", 5).unwrap();
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "San Francisco".into())));
        assert!(pairs.contains(&("format".into(), "json".into())));
        assert!(pairs.contains(&("addressdetails".into(), "1".into())));
        assert!(pairs.contains(&("limit".into(), "5".into())));
    }

    #[test]
    fn endpoint_subpath_is_preserved() {
        let p = NominatimProvider::new("http://127.0.0.1:8080/osm", "ua", Duration::from_secs(1))
            .unwrap();
        assert_eq!(p.search_url("abc", 1).unwrap().path(), "/osm/search");
    }

    #[test]
    fn mapbox_url_encodes_query_into_path() {
        let p = MapboxProvider::new("https://api.mapbox.com", "pk.x", "ua", Duration::from_secs(1))
            .unwrap();
        let url = p.search_url("Pier 39/SF", 5).unwrap();
        assert_eq!(url.path(), "/geocoding/v5/mapbox.places/Pier%2039%2FSF.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("access_token".into(), "pk.x".into())));
        assert!(pairs.contains(&("autocomplete".into(), "true".into())));
    }

    #[test]
    fn from_config_validates() {
        let mut config = Config::default();
        assert!(matches!(Provider::from_config(&config), Ok(Provider::Nominatim(_))));

        config.provider = ProviderKind::Mapbox;
        assert!(matches!(Provider::from_config(&config), Err(ConfigError::MissingMapboxToken)));

        config.mapbox_token = Some("pk.y".into());
        assert!(matches!(Provider::from_config(&config), Ok(Provider::Mapbox(_))));

        config.endpoint = Some("ftp://example.org".into());
        assert!(matches!(
            Provider::from_config(&config),
            Err(ConfigError::InvalidEndpoint { .. })
        ));

        config.limit = 0;
        assert!(matches!(Provider::from_config(&config), Err(ConfigError::ZeroLimit)));
    }
}
