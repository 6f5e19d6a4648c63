//! `.placefind.toml` loading with environment overrides.

use crate::error::ConfigError;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = ".placefind.toml";

pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_USER_AGENT: &str = concat!("placefind/", env!("CARGO_PKG_VERSION"));

pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
pub const MAPBOX_ENDPOINT: &str = "https://api.mapbox.com";

/// Known keys in `.placefind.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &[
    "provider",
    "endpoint",
    "user_agent",
    "limit",
    "debounce_ms",
    "min_query_len",
    "timeout_ms",
    "mapbox_token",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Nominatim,
    Mapbox,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nominatim" | "osm" => Ok(Self::Nominatim),
            "mapbox" => Ok(Self::Mapbox),
            _ => Err(ConfigError::UnknownProvider(name.to_string())),
        }
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::Nominatim => NOMINATIM_ENDPOINT,
            Self::Mapbox => MAPBOX_ENDPOINT,
        }
    }
}

/// Runtime configuration. Loaded from `.placefind.toml` or defaults.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub provider: ProviderKind,
    /// Base URL of the provider. `None` means the provider's public endpoint.
    pub endpoint: Option<String>,
    /// Sent with every provider request, as Nominatim's usage policy requires.
    pub user_agent: String,
    /// Result cap passed to the provider.
    pub limit: usize,
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub timeout_ms: u64,
    #[serde(skip_serializing)]
    pub mapbox_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Nominatim,
            endpoint: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limit: DEFAULT_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            mapbox_token: None,
        }
    }
}

impl Config {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(self.provider.default_endpoint())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Apply `PLACEFIND_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("PLACEFIND_PROVIDER") {
            match ProviderKind::parse(&name) {
                Ok(kind) => self.provider = kind,
                Err(e) => warn!("Ignoring PLACEFIND_PROVIDER: {e}"),
            }
        }
        if let Some(endpoint) = lookup("PLACEFIND_ENDPOINT").filter(|s| !s.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(token) = lookup("PLACEFIND_MAPBOX_TOKEN").filter(|s| !s.is_empty()) {
            self.mapbox_token = Some(token);
        }
    }
}

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn warn_unknown_keys(table: &toml::Table) {
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        let closest = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
        match closest {
            Some(suggestion) if edit_distance(key, suggestion) <= 3 => warn!(
                key = key.as_str(),
                suggestion = *suggestion,
                "Unknown key in {CONFIG_FILE}, did you mean '{suggestion}'?"
            ),
            _ => warn!(
                key = key.as_str(),
                "Unknown key in {CONFIG_FILE} (known keys: {})",
                KNOWN_CONFIG_KEYS.join(", ")
            ),
        }
    }
}

fn read_usize(table: &toml::Table, key: &str) -> Option<usize> {
    let value = table.get(key)?;
    match value.as_integer().and_then(|n| usize::try_from(n).ok()) {
        Some(n) => Some(n),
        None => {
            warn!(key, "Expected a non-negative integer in {CONFIG_FILE}, keeping default");
            None
        }
    }
}

fn read_string(table: &toml::Table, key: &str) -> Option<String> {
    let value = table.get(key)?;
    match value.as_str() {
        Some(s) => Some(s.to_string()),
        None => {
            warn!(key, "Expected a string in {CONFIG_FILE}, keeping default");
            None
        }
    }
}

/// Merge a parsed config table over the defaults.
pub fn config_from_table(table: &toml::Table) -> Config {
    let mut config = Config::default();
    warn_unknown_keys(table);

    if let Some(name) = read_string(table, "provider") {
        match ProviderKind::parse(&name) {
            Ok(kind) => config.provider = kind,
            Err(e) => warn!("{e}; using nominatim"),
        }
    }
    if let Some(endpoint) = read_string(table, "endpoint") {
        config.endpoint = Some(endpoint);
    }
    if let Some(user_agent) = read_string(table, "user_agent") {
        config.user_agent = user_agent;
    }
    if let Some(limit) = read_usize(table, "limit") {
        config.limit = limit;
    }
    if let Some(ms) = read_usize(table, "debounce_ms") {
        config.debounce_ms = ms as u64;
    }
    if let Some(len) = read_usize(table, "min_query_len") {
        config.min_query_len = len;
    }
    if let Some(ms) = read_usize(table, "timeout_ms") {
        config.timeout_ms = ms as u64;
    }
    config.mapbox_token = read_string(table, "mapbox_token");
    config
}

/// Load configuration from `.placefind.toml` in the given directory.
///
/// Returns defaults merged with any overrides from the file and the environment.
/// If the file doesn't exist or can't be parsed, returns defaults with a warning.
pub fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    let mut config = if path.exists() {
        debug!(path = %path.display(), "Loading {CONFIG_FILE}");
        match std::fs::read_to_string(&path) {
            Ok(content) => match content.parse::<toml::Table>() {
                Ok(table) => config_from_table(&table),
                Err(e) => {
                    warn!("Failed to parse {CONFIG_FILE}: {e}");
                    Config::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {CONFIG_FILE}: {e}");
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    config.apply_env();
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_search_box_policy() {
        let config = Config::default();
        assert_eq!(config.limit, 5);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.min_query_len, 3);
        assert_eq!(config.endpoint(), NOMINATIM_ENDPOINT);
    }

    #[test]
    fn table_overrides_defaults() {
        let table: toml::Table = r#"
            provider = "mapbox"
            limit = 8
            debounce_ms = 150
            mapbox_token = "pk.test"
        "#
        .parse()
        .unwrap();
        let config = config_from_table(&table);
        assert_eq!(config.provider, ProviderKind::Mapbox);
        assert_eq!(config.limit, 8);
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.mapbox_token.as_deref(), Some("pk.test"));
        assert_eq!(config.endpoint(), MAPBOX_ENDPOINT);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let table: toml::Table = r#"
            provider = "bing"
            limit = -2
            debounce_ms = "fast"
            limt = 4
        "#
        .parse()
        .unwrap();
        let config = config_from_table(&table);
        assert_eq!(config.provider, ProviderKind::Nominatim);
        assert_eq!(config.limit, DEFAULT_LIMIT);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("PLACEFIND_PROVIDER", "mapbox"),
            ("PLACEFIND_MAPBOX_TOKEN", "pk.env"),
            ("PLACEFIND_ENDPOINT", "http://127.0.0.1:9000"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.provider, ProviderKind::Mapbox);
        assert_eq!(config.mapbox_token.as_deref(), Some("pk.env"));
        assert_eq!(config.endpoint(), "http://127.0.0.1:9000");
    }

    #[test]
    fn load_reads_file_and_survives_garbage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "limit = 2\nuser_agent = \"events-app\"\n")
            .unwrap();
        let config = load_config(dir.path());
        assert_eq!(config.limit, 2);
        assert_eq!(config.user_agent, "events-app");

        std::fs::write(dir.path().join(CONFIG_FILE), "this is = = not toml").unwrap();
        let config = load_config(dir.path());
        assert_eq!(config.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn edit_distance_suggests_close_keys() {
        assert_eq!(edit_distance("limt", "limit"), 1);
        assert_eq!(edit_distance("debounce", "debounce_ms"), 3);
    }
}
