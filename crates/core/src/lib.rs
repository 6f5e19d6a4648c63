//! placefind core: a debounced, keyboard-navigable location autocomplete.
//!
//! The pieces, bottom up:
//! - [`types`]: `Candidate`, `Coordinates`, `Selection`
//! - [`normalize`]: provider JSON to `Candidate`
//! - [`provider`]: the `LocationProvider` trait with Nominatim and Mapbox adapters
//! - [`search_box`]: the synchronous state machine
//! - [`debounce`]: a cancellable delayed task
//! - [`controller`]: `LocationSearch`, tying the above to a tokio runtime
//! - [`config`]: `.placefind.toml` and environment loading

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod search_box;
pub mod types;

pub use config::{load_config, Config, ProviderKind};
pub use controller::{LocationSearch, SearchEvent, SearchOptions};
pub use error::{ConfigError, ProviderError};
pub use provider::{LocationProvider, MapboxProvider, NominatimProvider, Provider};
pub use search_box::{Key, SearchBox, SearchSnapshot};
pub use types::{Candidate, Coordinates, Selection};
