//! # Geocoder
//!
//! Resolves free-text city names into [`LocationCandidate`]s through an HTTP geo-encoder
//! (OLX location autocomplete by default) and deduplicates the answer.
//!
//! ## Modules
//!
//! - [`candidate`] – `LocationCandidate` and the raw wire records
//! - [`dedup`] – order-preserving deduplication by place id
//! - [`http`] – `HttpGeocoder`, the [`Geocoder`] implementation over reqwest
//!
//! The gateway performs exactly one request per lookup: no retries, no caching. Queries shorter
//! than [`MIN_QUERY_CHARS`] are rejected before any network activity.

mod candidate;
mod dedup;
mod error;
mod http;

pub use candidate::{LocationCandidate, LocationRecord, Place};
pub use dedup::dedup_by_place;
pub use error::GeocodeError;
pub use http::{HttpGeocoder, DEFAULT_QUERY_PARAM};

use async_trait::async_trait;

/// Minimum number of characters (after trimming) a lookup query must have.
pub const MIN_QUERY_CHARS: usize = 3;

/// Async location lookup. An empty result is a success, not an error.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<LocationCandidate>, GeocodeError>;
}

/// Rejects queries shorter than [`MIN_QUERY_CHARS`]; returns the trimmed query otherwise.
pub fn validate_query(query: &str) -> Result<&str, GeocodeError> {
    let trimmed = query.trim();
    let len = trimmed.chars().count();
    if len < MIN_QUERY_CHARS {
        return Err(GeocodeError::InvalidQuery { len });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query_counts_chars_not_bytes() {
        // Two Cyrillic letters are four bytes but still too short.
        assert_eq!(
            validate_query("Ки").unwrap_err(),
            GeocodeError::InvalidQuery { len: 2 }
        );
        assert_eq!(validate_query("Київ").unwrap(), "Київ");
    }

    #[test]
    fn test_validate_query_trims() {
        assert_eq!(
            validate_query("  ab  ").unwrap_err(),
            GeocodeError::InvalidQuery { len: 2 }
        );
        assert_eq!(validate_query("  Lviv ").unwrap(), "Lviv");
    }
}
