//! Error types for provider lookups and configuration.

use thiserror::Error;

/// Failure of a single lookup against a geocoding provider.
///
/// Inside the search box these are absorbed (logged, list left empty). They only
/// reach callers that talk to a provider directly, such as the HTTP proxy or CLI.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request to location provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("location provider returned HTTP {0}")]
    Status(u16),

    #[error("could not decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected provider response: {0}")]
    UnexpectedShape(&'static str),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown provider '{0}' (expected 'nominatim' or 'mapbox')")]
    UnknownProvider(String),

    #[error("mapbox provider needs an access token (set mapbox_token or PLACEFIND_MAPBOX_TOKEN)")]
    MissingMapboxToken,

    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("limit must be at least 1")]
    ZeroLimit,

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
