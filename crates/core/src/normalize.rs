//! Provider response normalization.
//!
//! Every provider record, whatever its shape, is mapped to a [`Candidate`] here so
//! that rendering and keyboard handling never see provider-specific JSON. Records
//! are degraded field by field rather than dropped: a result with no coordinates
//! still shows up in the list, it just carries `coordinates: None`.

use crate::error::ProviderError;
use crate::types::{Candidate, Coordinates};
use serde_json::Value;
use std::collections::BTreeMap;

/// Address components tried, in order, when a record has no `name`.
const PRIMARY_ADDRESS_KEYS: &[&str] = &["road", "hamlet", "village", "town", "city", "county"];

// ---------------------------------------------------------------------------
// Scalar helpers
// ---------------------------------------------------------------------------

/// Non-empty string or number rendered as text.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Float from either a JSON number or a numeric string (Nominatim sends strings).
fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_field(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(as_text)
}

/// First comma-delimited segment of a display string.
pub fn first_segment(display: &str) -> &str {
    display.split(',').next().unwrap_or("").trim()
}

/// Pick the short label: `name`, then the first present address component, then
/// the first segment of the display string.
pub fn primary_label(
    name: Option<&str>,
    address: &BTreeMap<String, String>,
    display: &str,
) -> String {
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        return name.to_string();
    }
    PRIMARY_ADDRESS_KEYS
        .iter()
        .find_map(|key| address.get(*key).filter(|v| !v.trim().is_empty()))
        .cloned()
        .unwrap_or_else(|| first_segment(display).to_string())
}

// ---------------------------------------------------------------------------
// Nominatim
// ---------------------------------------------------------------------------

/// Normalize one Nominatim `/search` record. `rank` is its position in the response,
/// used as a fallback id.
pub fn nominatim_place(rank: usize, record: &Value) -> Candidate {
    let display = text_field(record, "display_name").unwrap_or_default();

    let address_details: BTreeMap<String, String> = record
        .get("address")
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| as_text(v).map(|text| (k.clone(), text)))
                .collect()
        })
        .unwrap_or_default();

    let latitude = record.get("lat").and_then(as_float);
    let longitude = record.get("lon").and_then(as_float);
    let coordinates = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
        _ => None,
    };

    let name = text_field(record, "name");
    Candidate {
        id: text_field(record, "place_id").unwrap_or_else(|| format!("result-{rank}")),
        primary_label: primary_label(name.as_deref(), &address_details, &display),
        secondary_label: display,
        coordinates,
        address_details,
    }
}

/// Normalize a full Nominatim response body, keeping provider order.
///
/// `null` counts as an empty result; anything other than an array is rejected.
pub fn nominatim_response(body: &Value, limit: usize) -> Result<Vec<Candidate>, ProviderError> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(records) => Ok(records
            .iter()
            .take(limit)
            .enumerate()
            .map(|(rank, record)| nominatim_place(rank, record))
            .collect()),
        _ => Err(ProviderError::UnexpectedShape("expected a JSON array of places")),
    }
}

// ---------------------------------------------------------------------------
// Mapbox
// ---------------------------------------------------------------------------

/// Normalize one Mapbox geocoding feature. Mapbox orders `center` as
/// `[longitude, latitude]`.
pub fn mapbox_feature(rank: usize, record: &Value) -> Candidate {
    let display = text_field(record, "place_name").unwrap_or_default();

    let coordinates = record.get("center").and_then(Value::as_array).and_then(|center| {
        match (center.first().and_then(as_float), center.get(1).and_then(as_float)) {
            (Some(lon), Some(lat)) => Coordinates::new(lat, lon),
            _ => None,
        }
    });

    // context entries look like {"id": "place.123", "text": "San Francisco"}
    let address_details: BTreeMap<String, String> = record
        .get("context")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let kind = entry.get("id")?.as_str()?.split('.').next()?.to_string();
                    Some((kind, text_field(entry, "text")?))
                })
                .collect()
        })
        .unwrap_or_default();

    let text = text_field(record, "text");
    Candidate {
        id: text_field(record, "id").unwrap_or_else(|| format!("result-{rank}")),
        primary_label: primary_label(text.as_deref(), &BTreeMap::new(), &display),
        secondary_label: display,
        coordinates,
        address_details,
    }
}

/// Normalize a Mapbox response body (`{"features": [...]}`). Missing `features`
/// counts as no results.
pub fn mapbox_response(body: &Value, limit: usize) -> Result<Vec<Candidate>, ProviderError> {
    if !body.is_object() {
        return Err(ProviderError::UnexpectedShape("expected a JSON object with features"));
    }
    Ok(body
        .get("features")
        .and_then(Value::as_array)
        .map(|features| {
            features
                .iter()
                .take(limit)
                .enumerate()
                .map(|(rank, feature)| mapbox_feature(rank, feature))
                .collect()
        })
        .unwrap_or_default())
}
