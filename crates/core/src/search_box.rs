//! The location search box state machine.
//!
//! [`SearchBox`] is synchronous and owns no timers or I/O: it records what the user
//! did and tells the caller what to do next (schedule a lookup, emit a selection).
//! [`crate::controller::LocationSearch`] drives it with a debouncer and a provider.
//!
//! The active index is `Option<usize>`; `None` is the "no keyboard selection"
//! position. It is always `None` or a valid index into the current suggestions.

use crate::config::DEFAULT_MIN_QUERY_LEN;
use crate::error::ProviderError;
use crate::types::{Candidate, Selection};
use tracing::{debug, warn};

/// Keys the search box reacts to. Anything else maps to [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM-style key name (`"ArrowDown"`, `"Enter"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowDown" => Self::ArrowDown,
            "ArrowUp" => Self::ArrowUp,
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// What the caller must do after a query change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    /// Below the minimum length: list cleared, nothing to look up.
    TooShort,
    /// (Re)start the debounce timer for this text.
    Debounce(String),
}

/// A dispatched lookup. Only the most recently issued ticket can update the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

/// Point-in-time copy of the box for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub suggestions: Vec<Candidate>,
    pub active_index: Option<usize>,
    pub loading: bool,
}

#[derive(Debug, Clone)]
pub struct SearchBox {
    query: String,
    suggestions: Vec<Candidate>,
    active: Option<usize>,
    loading: bool,
    /// Sequence number of the latest dispatched (or invalidating) action.
    latest_seq: u64,
    min_query_len: usize,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUERY_LEN)
    }
}

impl SearchBox {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            active: None,
            loading: false,
            latest_seq: 0,
            min_query_len,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Candidate] {
        &self.suggestions
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            suggestions: self.suggestions.clone(),
            active_index: self.active,
            loading: self.loading,
        }
    }

    fn reset_list(&mut self) {
        self.suggestions.clear();
        self.active = None;
    }

    /// Make every outstanding ticket stale and drop the loading indicator.
    fn invalidate_in_flight(&mut self) {
        self.latest_seq += 1;
        self.loading = false;
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Store new query text. Short queries clear the list and cancel any pending
    /// lookup's effect; longer ones ask the caller to debounce a search.
    pub fn on_query_change(&mut self, text: &str) -> QueryChange {
        self.query = text.to_string();
        self.active = None;

        if text.chars().count() < self.min_query_len {
            self.reset_list();
            self.invalidate_in_flight();
            return QueryChange::TooShort;
        }
        QueryChange::Debounce(text.to_string())
    }

    /// Mark a lookup as dispatched. Called when the debounce timer fires.
    pub fn begin_search(&mut self, query: &str) -> SearchTicket {
        self.latest_seq += 1;
        self.loading = true;
        debug!(seq = self.latest_seq, query, "Dispatching location lookup");
        SearchTicket { seq: self.latest_seq, query: query.to_string() }
    }

    /// Apply a lookup result. Returns `false` if the ticket was stale and the
    /// result was discarded. Failures are logged and leave the list empty.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<Candidate>, ProviderError>,
    ) -> bool {
        if ticket.seq != self.latest_seq {
            debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                query = ticket.query.as_str(),
                "Discarding stale location results"
            );
            return false;
        }

        self.loading = false;
        self.active = None;
        match result {
            Ok(candidates) => self.suggestions = candidates,
            Err(e) => {
                warn!(query = ticket.query.as_str(), "Error fetching location suggestions: {e}");
                self.suggestions.clear();
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Handle a key press. Returns the selection when `Enter` commits a candidate.
    pub fn on_key(&mut self, key: Key) -> Option<Selection> {
        match key {
            Key::ArrowDown => {
                let last = self.suggestions.len().checked_sub(1)?;
                self.active = Some(match self.active {
                    None => 0,
                    Some(i) => (i + 1).min(last),
                });
                None
            }
            Key::ArrowUp => {
                if let Some(i) = self.active.filter(|&i| i > 0) {
                    self.active = Some(i - 1);
                }
                None
            }
            Key::Enter => self.active.and_then(|i| self.select(i)),
            Key::Escape => {
                self.reset_list();
                None
            }
            Key::Other => None,
        }
    }

    /// Pointer highlight. Out-of-range indices are ignored.
    pub fn on_hover(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.active = Some(index);
        }
    }

    // -----------------------------------------------------------------------
    // Commit / clear
    // -----------------------------------------------------------------------

    /// Commit the candidate at `index`: the query shows its display name, the list
    /// closes, and the selection is returned for the caller to emit.
    pub fn select(&mut self, index: usize) -> Option<Selection> {
        let candidate = self.suggestions.get(index)?;
        let selection = candidate.to_selection();
        self.query = candidate.secondary_label.clone();
        self.reset_list();
        self.invalidate_in_flight();
        Some(selection)
    }

    /// Reset to an empty box without emitting anything.
    pub fn clear(&mut self) {
        self.query.clear();
        self.reset_list();
        self.invalidate_in_flight();
    }
}
