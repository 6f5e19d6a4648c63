//! Provider adapters against an in-process fake geocoding server.

mod helpers;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use helpers::spawn_server;
use parking_lot::Mutex;
use placefind_core::{
    Coordinates, Key, LocationProvider, LocationSearch, MapboxProvider, NominatimProvider,
    ProviderError, SearchEvent, SearchOptions,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// What the fake server saw: (user agent, query params).
type Seen = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn nominatim_search(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    seen.lock().push((agent, params));
    Json(json!([
        {
            "place_id": 297_012_345u64,
            "name": "San Francisco",
            "display_name": "San Francisco, California, United States",
            "lat": "37.7792588",
            "lon": "-122.4193286",
            "address": { "city": "San Francisco", "state": "California" }
        },
        {
            "place_id": "88",
            "display_name": "San Jose, Santa Clara County, California",
            "lat": "garbage",
            "lon": "-121.8863",
            "address": { "city": "San Jose" }
        }
    ]))
}

async fn fake_nominatim() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/search", get(nominatim_search))
        .route("/broken/search", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }))
        .route("/html/search", get(|| async { "<html>rate limited</html>" }))
        .with_state(seen.clone());
    let addr = spawn_server(app).await;
    (format!("http://{addr}"), seen)
}

fn nominatim(endpoint: &str) -> NominatimProvider {
    NominatimProvider::new(endpoint, "events-dashboard-tests", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn nominatim_sends_policy_headers_and_params() {
    let (base, seen) = fake_nominatim().await;
    let results = nominatim(&base).search("San", 5).await.unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    let (agent, params) = &seen[0];
    assert_eq!(agent, "events-dashboard-tests");
    assert_eq!(params["q"], "San");
    assert_eq!(params["format"], "json");
    assert_eq!(params["addressdetails"], "1");
    assert_eq!(params["limit"], "5");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "297012345");
    assert_eq!(results[0].primary_label, "San Francisco");
    assert_eq!(results[0].coordinates, Coordinates::new(37.7792588, -122.4193286));
    // malformed latitude degrades the record instead of failing the response
    assert_eq!(results[1].primary_label, "San Jose");
    assert!(results[1].coordinates.is_none());
}

#[tokio::test]
async fn nominatim_non_success_is_status_error() {
    let (base, _) = fake_nominatim().await;
    let err = nominatim(&format!("{base}/broken")).search("San", 5).await.unwrap_err();
    assert!(matches!(err, ProviderError::Status(503)), "got {err}");
}

#[tokio::test]
async fn nominatim_non_json_is_decode_error() {
    let (base, _) = fake_nominatim().await;
    let err = nominatim(&format!("{base}/html")).search("San", 5).await.unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)), "got {err}");
}

#[tokio::test]
async fn unreachable_provider_is_http_error() {
    // bind then drop to get a port nobody is listening on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = nominatim(&format!("http://{addr}")).search("San", 5).await.unwrap_err();
    assert!(matches!(err, ProviderError::Http(_)), "got {err}");
}

#[tokio::test]
async fn mapbox_reads_features_and_token() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/geocoding/v5/mapbox.places/{query}",
            get(
                |State(seen): State<Seen>,
                 Path(query): Path<String>,
                 Query(mut params): Query<HashMap<String, String>>| async move {
                    params.insert("path".into(), query);
                    seen.lock().push((String::new(), params));
                    Json(json!({
                        "type": "FeatureCollection",
                        "features": [{
                            "id": "place.123",
                            "text": "Oakland",
                            "place_name": "Oakland, California, United States",
                            "center": [-122.2712, 37.8044]
                        }]
                    }))
                },
            ),
        )
        .with_state(seen.clone());
    let addr = spawn_server(app).await;

    let provider =
        MapboxProvider::new(&format!("http://{addr}"), "pk.test", "ua", Duration::from_secs(5))
            .unwrap();
    let results = provider.search("Oakland", 5).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].coordinates, Coordinates::new(37.8044, -122.2712));
    let seen = seen.lock();
    assert_eq!(seen[0].1["path"], "Oakland.json");
    assert_eq!(seen[0].1["access_token"], "pk.test");
    assert_eq!(seen[0].1["autocomplete"], "true");
}

#[tokio::test]
async fn search_box_end_to_end_over_http() {
    let (base, seen) = fake_nominatim().await;
    let provider = Arc::new(nominatim(&base));
    let options =
        SearchOptions { debounce: Duration::from_millis(20), limit: 5, min_query_len: 3 };
    let (mut search, mut rx) = LocationSearch::new(provider, options);

    search.input("Sa");
    search.input("San");

    // one Updated when the lookup starts, one when it lands
    for _ in 0..2 {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert_eq!(event, Some(SearchEvent::Updated));
    }
    assert_eq!(search.snapshot().suggestions.len(), 2);
    assert_eq!(seen.lock().len(), 1);

    search.key(Key::ArrowDown);
    search.key(Key::Enter);
    match rx.recv().await {
        Some(SearchEvent::Selected(selection)) => {
            assert_eq!(selection.id, "297012345");
            assert_eq!(selection.address_details["state"], "California");
        }
        other => panic!("expected a selection, got {other:?}"),
    }
}
