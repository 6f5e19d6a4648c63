//! Core types shared across placefind: coordinates, normalized search candidates,
//! and the selection object handed to the event form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A WGS84 position. Always latitude first, regardless of provider ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build coordinates only if both values are finite and within range.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self { latitude, longitude })
    }

    /// `[latitude, longitude]`, the pair shape the event form stores.
    pub fn as_pair(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// One provider result, normalized. Regenerated on every response, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    /// Short human-readable label (place name, road, town, ...).
    pub primary_label: String,
    /// The provider's full display string.
    pub secondary_label: String,
    /// Absent when the provider record had missing or malformed coordinates.
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub address_details: BTreeMap<String, String>,
}

impl Candidate {
    /// The selection emitted when this candidate is committed.
    pub fn to_selection(&self) -> Selection {
        Selection {
            id: self.id.clone(),
            address: self.secondary_label.clone(),
            display_name: self.secondary_label.clone(),
            coordinates: self.coordinates.map(|c| c.as_pair()),
            address_details: self.address_details.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The location handed to the parent form once per commit.
///
/// Serializes as `{ id, address, displayName, coordinates: [lat, lon] | null, addressDetails }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub id: String,
    pub address: String,
    pub display_name: String,
    pub coordinates: Option<[f64; 2]>,
    #[serde(default)]
    pub address_details: BTreeMap<String, String>,
}
