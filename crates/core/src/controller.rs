//! Async driver for the search box: debounces input, runs lookups on the tokio
//! runtime, and reports state changes and selections over a channel.

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::provider::LocationProvider;
use crate::search_box::{Key, QueryChange, SearchBox, SearchSnapshot};
use crate::types::Selection;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Timing and limits for a [`LocationSearch`].
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub debounce: Duration,
    pub limit: usize,
    pub min_query_len: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SearchOptions {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            limit: config.limit,
            min_query_len: config.min_query_len,
        }
    }
}

/// Notifications for whoever renders the box.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Loading flag or suggestions changed asynchronously; re-read the snapshot.
    Updated,
    /// A candidate was committed. Sent exactly once per commit.
    Selected(Selection),
}

/// One location search box bound to a provider.
///
/// All methods must be called from within a tokio runtime. Dropping it cancels
/// any pending debounce timer; lookups already in flight finish but their results
/// are discarded.
pub struct LocationSearch<P: LocationProvider> {
    state: Arc<Mutex<SearchBox>>,
    provider: Arc<P>,
    debouncer: Debouncer,
    limit: usize,
    events: mpsc::UnboundedSender<SearchEvent>,
}

impl<P: LocationProvider> LocationSearch<P> {
    pub fn new(
        provider: Arc<P>,
        options: SearchOptions,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let search = Self {
            state: Arc::new(Mutex::new(SearchBox::new(options.min_query_len))),
            provider,
            debouncer: Debouncer::new(options.debounce),
            limit: options.limit,
            events,
        };
        (search, rx)
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.lock().snapshot()
    }

    /// The user edited the query text.
    pub fn input(&mut self, text: &str) {
        let change = self.state.lock().on_query_change(text);
        match change {
            QueryChange::TooShort => {
                self.debouncer.cancel();
            }
            QueryChange::Debounce(query) => {
                let state = Arc::clone(&self.state);
                let provider = Arc::clone(&self.provider);
                let events = self.events.clone();
                let limit = self.limit;
                self.debouncer.schedule(move || {
                    let ticket = state.lock().begin_search(&query);
                    let _ = events.send(SearchEvent::Updated);
                    tokio::spawn(async move {
                        let result = provider.search(&ticket.query, limit).await;
                        let applied = state.lock().complete_search(&ticket, result);
                        if applied {
                            let _ = events.send(SearchEvent::Updated);
                        }
                    });
                });
            }
        }
    }

    pub fn key(&mut self, key: Key) {
        let selection = self.state.lock().on_key(key);
        if let Some(selection) = selection {
            self.commit(selection);
        }
    }

    pub fn hover(&mut self, index: usize) {
        self.state.lock().on_hover(index);
    }

    /// Pointer click on the candidate at `index`.
    pub fn select(&mut self, index: usize) {
        let selection = self.state.lock().select(index);
        if let Some(selection) = selection {
            self.commit(selection);
        }
    }

    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.state.lock().clear();
    }

    fn commit(&mut self, selection: Selection) {
        self.debouncer.cancel();
        let _ = self.events.send(SearchEvent::Selected(selection));
    }
}
