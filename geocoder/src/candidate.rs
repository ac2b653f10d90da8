//! Location records as returned by the geo-encoder and the flattened candidate offered to users.

use serde::Deserialize;

/// Id + name pair nested inside a wire record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
}

/// One raw record of the geo-encoder response (`data[]`). Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub city: Option<Place>,
    #[serde(default)]
    pub region: Option<Place>,
}

impl LocationRecord {
    /// Place identifier used for deduplication.
    pub fn place_id(&self) -> Option<i64> {
        self.city.as_ref().map(|c| c.id)
    }

    /// Flattens into a candidate; records without a city or region are not selectable.
    pub fn into_candidate(self) -> Option<LocationCandidate> {
        let city = self.city?;
        let region = self.region?;
        Some(LocationCandidate {
            place_id: city.id,
            place_name: city.name,
            region_id: region.id,
            region_name: region.name,
        })
    }
}

/// `{ placeId, placeName, regionId, regionName }`; lives only as long as one "choose city" render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCandidate {
    pub place_id: i64,
    pub place_name: String,
    pub region_id: i64,
    pub region_name: String,
}

impl LocationCandidate {
    pub fn new(
        place_id: i64,
        place_name: impl Into<String>,
        region_id: i64,
        region_name: impl Into<String>,
    ) -> Self {
        Self {
            place_id,
            place_name: place_name.into(),
            region_id,
            region_name: region_name.into(),
        }
    }
}
