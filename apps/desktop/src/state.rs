//! Global application state using Dioxus signals.

use std::path::Path;
use std::sync::{Arc, Mutex};

use dioxus::prelude::*;
use placefind_core::{load_config, LocationProvider, Provider, SearchOptions, Selection};
use tracing::error;

/// Provider and timing built once at startup from `.placefind.toml`.
pub struct AppState {
    /// `Err` carries the configuration problem shown in place of the search box.
    pub provider: Result<Arc<Provider>, String>,
    pub options: SearchOptions,
    pub provider_name: &'static str,
}

impl AppState {
    /// Load config from the current working directory and build the provider.
    pub fn from_cwd() -> Self {
        Self::from_path(Path::new("."))
    }

    pub fn from_path(root: &Path) -> Self {
        let config = load_config(root);
        let options = SearchOptions::from(&config);
        match Provider::from_config(&config) {
            Ok(provider) => AppState {
                provider_name: provider.name(),
                provider: Ok(Arc::new(provider)),
                options,
            },
            Err(e) => {
                error!("Location search disabled: {e}");
                AppState { provider: Err(e.to_string()), options, provider_name: "none" }
            }
        }
    }
}

/// Holds the startup state between `main` and the first render. Signals need a
/// live Dioxus runtime, so the state is parked here until `App` mounts.
static STARTUP: Mutex<Option<AppState>> = Mutex::new(None);

pub fn park_startup(state: AppState) {
    if let Ok(mut slot) = STARTUP.lock() {
        *slot = Some(state);
    }
}

/// Hand the parked state over once. Later calls get `None`.
pub fn take_startup() -> Option<AppState> {
    STARTUP.lock().ok().and_then(|mut slot| slot.take())
}

// ---------------------------------------------------------------------------
// Global signals
// ---------------------------------------------------------------------------

/// Core state: set once on first render
pub static CORE: GlobalSignal<Option<AppState>> = Signal::global(|| None);

/// Location committed from the search box, stored by the event form
pub static SELECTED_LOCATION: GlobalSignal<Option<Selection>> = Signal::global(|| None);

/// Event title typed into the form
pub static EVENT_TITLE: GlobalSignal<String> = Signal::global(String::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_state_is_taken_once() {
        park_startup(AppState::from_path(Path::new("/nonexistent/placefind")));
        let state = take_startup().unwrap();
        assert_eq!(state.options.limit, 5);
        assert!(take_startup().is_none());
    }
}
