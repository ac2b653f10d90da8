//! HTTP geo-encoder client.
//!
//! Issues `GET <endpoint>?<query_param>=<query>` and reads `{"data": [LocationRecord, ...]}`.
//! Transport errors, non-success statuses and unparsable bodies all surface as
//! [`GeocodeError::UpstreamUnavailable`].

use crate::candidate::{LocationCandidate, LocationRecord};
use crate::error::GeocodeError;
use crate::{validate_query, Geocoder};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Query-string parameter name used by the OLX location autocomplete endpoint.
pub const DEFAULT_QUERY_PARAM: &str = "query";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    data: Vec<LocationRecord>,
}

/// [`Geocoder`] over reqwest. One request per lookup.
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: Client,
    endpoint: String,
    query_param: String,
}

impl HttpGeocoder {
    /// Creates a client for `endpoint` with the given request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        query_param: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GeocodeError::UpstreamUnavailable(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            query_param: query_param.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self, query: &str) -> Result<Vec<LocationRecord>, GeocodeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[(self.query_param.as_str(), query)])
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GeocodeError::UpstreamUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::UpstreamUnavailable(format!(
                "geo-encoder error ({}): {}",
                status, error_text
            )));
        }

        let body: GeoResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::UpstreamUnavailable(format!("bad response body: {}", e)))?;
        Ok(body.data)
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    #[instrument(skip(self))]
    async fn lookup(&self, query: &str) -> Result<Vec<LocationCandidate>, GeocodeError> {
        let query = validate_query(query)?;
        info!(query = %query, endpoint = %self.endpoint, "step: geocoder lookup request");

        let records = self.fetch(query).await.map_err(|e| {
            error!(error = %e, query = %query, "Geocoder lookup failed");
            e
        })?;
        let raw_count = records.len();
        let candidates: Vec<LocationCandidate> = records
            .into_iter()
            .filter_map(LocationRecord::into_candidate)
            .collect();

        info!(
            query = %query,
            raw_count = raw_count,
            candidates = candidates.len(),
            "step: geocoder lookup done"
        );
        Ok(candidates)
    }
}
