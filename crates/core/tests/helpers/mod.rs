//! Shared test doubles: a scripted in-memory provider and an in-process fake
//! geocoding server.

#![allow(dead_code)]

use axum::Router;
use parking_lot::Mutex;
use placefind_core::{Candidate, Coordinates, LocationProvider, ProviderError, SearchEvent};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub enum Reply {
    Results(Vec<Candidate>),
    Fail,
}

/// Provider that records every query and answers from a script, optionally
/// after a per-query delay (tokio time, so paused-clock tests stay deterministic).
#[derive(Default)]
pub struct ScriptedProvider {
    calls: Mutex<Vec<String>>,
    replies: HashMap<String, (Duration, Reply)>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, query: &str, reply: Reply) -> Self {
        self.replies.insert(query.to_string(), (Duration::ZERO, reply));
        self
    }

    pub fn reply_after(mut self, query: &str, delay: Duration, reply: Reply) -> Self {
        self.replies.insert(query.to_string(), (delay, reply));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl LocationProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, ProviderError> {
        self.calls.lock().push(query.to_string());
        let (delay, reply) = self
            .replies
            .get(query)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::Results(Vec::new())));
        tokio::time::sleep(delay).await;
        match reply {
            Reply::Results(mut list) => {
                list.truncate(limit);
                Ok(list)
            }
            Reply::Fail => Err(ProviderError::Status(503)),
        }
    }
}

pub fn candidate(id: &str, name: &str, lat: f64, lon: f64) -> Candidate {
    Candidate {
        id: id.to_string(),
        primary_label: name.to_string(),
        secondary_label: format!("{name}, California, United States"),
        coordinates: Coordinates::new(lat, lon),
        address_details: Default::default(),
    }
}

/// Everything currently buffered on the event channel.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<SearchEvent>) -> Vec<SearchEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn selections(events: &[SearchEvent]) -> Vec<placefind_core::Selection> {
    events
        .iter()
        .filter_map(|e| match e {
            SearchEvent::Selected(s) => Some(s.clone()),
            SearchEvent::Updated => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fake HTTP server
// ---------------------------------------------------------------------------

/// Serve `app` on an ephemeral localhost port and return its address.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server");
    });
    addr
}
